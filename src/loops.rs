// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Fixed-cadence loop driver for long-running orchestrator tasks.

use crate::error::{OrchestratorError, OrchestratorResult};
use async_trait::async_trait;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// One unit of periodic work. Recoverable failures must be handled inside
/// `step`; an error returned from it terminates the driver.
#[async_trait]
pub trait LoopStep: Send {
    fn name(&self) -> &'static str;

    async fn step(&mut self) -> OrchestratorResult<()>;
}

/// Invokes `step` repeatedly, separated by `period`. This is not a strict
/// fixed-rate scheduler: the next tick starts `period` after the previous
/// step returned. Terminates with `Cancelled` when the token fires, or with
/// the step's error when it fails.
pub async fn run_loop<S>(
    cancel: &CancellationToken,
    period: Duration,
    step: &mut S,
) -> OrchestratorResult<()>
where
    S: LoopStep,
{
    debug!("starting {} loop, period {:?}", step.name(), period);

    loop {
        if cancel.is_cancelled() {
            return Err(OrchestratorError::Cancelled);
        }
        step.step().await?;
        tokio::select! {
            _ = cancel.cancelled() => return Err(OrchestratorError::Cancelled),
            _ = tokio::time::sleep(period) => {}
        }
    }
}
