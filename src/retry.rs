// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Bounded-attempt retry harness wrapping every external call the oracle
//! makes. All errors are retried uniformly up to the attempt budget;
//! cancellation is propagated immediately.

use crate::error::{OrchestratorError, OrchestratorResult};
use backoff::backoff::Backoff;
use std::future::Future;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

const INITIAL_RETRY_INTERVAL: Duration = Duration::from_millis(400);
const MAX_RETRY_INTERVAL: Duration = Duration::from_secs(120);

/// Calls `op` up to `max_attempts` times, sleeping an exponential back-off
/// between attempts. `on_retry(attempt, err)` runs before each re-attempt.
/// Returns the last error once the budget is exhausted.
///
/// The in-flight operation and every back-off sleep are raced against
/// `cancel`; cancellation aborts with `OrchestratorError::Cancelled`
/// without further attempts.
pub async fn retry_with_attempts<T, F, Fut, O>(
    cancel: &CancellationToken,
    max_attempts: u32,
    mut on_retry: O,
    mut op: F,
) -> OrchestratorResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = OrchestratorResult<T>>,
    O: FnMut(u32, &OrchestratorError),
{
    // The delay sequence (in secs), applied with jitter:
    // 0.4, 0.8, 1.6, 3.2, 6.4, 12.8, 25.6, 51.2, 102.4, 120, 120 ...
    let mut backoff = backoff::ExponentialBackoff {
        initial_interval: INITIAL_RETRY_INTERVAL,
        randomization_factor: 0.1,
        multiplier: 2.0,
        max_interval: MAX_RETRY_INTERVAL,
        max_elapsed_time: None,
        ..Default::default()
    };

    let max_attempts = max_attempts.max(1);
    let mut attempt = 1u32;
    loop {
        let result = tokio::select! {
            _ = cancel.cancelled() => return Err(OrchestratorError::Cancelled),
            result = op() => result,
        };
        let err = match result {
            Ok(value) => return Ok(value),
            Err(err) if err.is_cancellation() => return Err(err),
            Err(err) => err,
        };
        if attempt >= max_attempts {
            return Err(err);
        }
        on_retry(attempt, &err);
        let delay = backoff.next_backoff().unwrap_or(MAX_RETRY_INTERVAL);
        tokio::select! {
            _ = cancel.cancelled() => return Err(OrchestratorError::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }
        attempt += 1;
    }
}
