// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The Ethereum oracle loop.
//!
//! Watches the bridge contract for finalized events and ferries them to the
//! home chain as signed claims, where a quorum of orchestrators attesting to
//! the same event nonce makes it observed. Scans are confirmation-delayed,
//! bounded per tick, and resumable: the cursor only advances after a fully
//! successful scan and submission, and a periodic resync rewinds it to the
//! home chain's last claimed height.

use crate::config::EthOracleConfig;
use crate::cosmos_client::CosmosNetwork;
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::eth_client::EthereumNetwork;
use crate::events::{EthEvents, EthereumEvent};
use crate::loops::{run_loop, LoopStep};
use crate::metrics::OrchestratorMetrics;
use crate::retry::retry_with_attempts;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Minimum number of confirmations for an Ethereum block to be read
pub const ETH_BLOCK_CONFIRMATION_DELAY: u64 = 12;

/// Maximum block range for a single event scan. After long downtime the
/// oracle catches up this many blocks per tick instead of issuing one huge
/// log query the provider would reject.
pub const MAX_BLOCKS_PER_SCAN: u64 = 2000;

/// Pause between consecutive claim submissions. The home chain enforces
/// strictly contiguous per-orchestrator event nonces at mempool admission,
/// so claim n+1 must not arrive before claim n has executed; with ~1s block
/// time this wait covers one block.
pub const INTER_CLAIM_DELAY: Duration = Duration::from_millis(1200);

/// How often the cursor is reset from the home chain's last claimed height
pub const RESYNC_INTERVAL: Duration = Duration::from_secs(48 * 60 * 60);

/// Everything the oracle borrows from the orchestrator host.
pub struct EthOracleDeps<E, C> {
    pub eth: Arc<E>,
    pub cosmos: Arc<C>,
    /// This orchestrator's home chain account address (bech32)
    pub orchestrator_address: String,
    pub config: EthOracleConfig,
    pub metrics: Arc<OrchestratorMetrics>,
}

/// Runs the Ethereum oracle until `cancel` fires.
///
/// `last_observed_block` seeds the scan cursor; the caller typically reads
/// it from the home chain's last claim record. The oracle keeps no state of
/// its own beyond this in-memory cursor.
pub async fn run_eth_oracle<E, C>(
    cancel: &CancellationToken,
    last_observed_block: u64,
    deps: EthOracleDeps<E, C>,
) -> OrchestratorResult<()>
where
    E: EthereumNetwork,
    C: CosmosNetwork,
{
    deps.config.validate().map_err(OrchestratorError::Generic)?;

    info!(
        "starting Ethereum oracle loop, last observed block: {}, loop duration: {:?}",
        last_observed_block, deps.config.loop_duration
    );

    let loop_duration = deps.config.loop_duration;
    let mut oracle = EthOracle {
        eth: deps.eth,
        cosmos: deps.cosmos,
        orchestrator_address: deps.orchestrator_address,
        max_attempts: deps.config.max_retry_attempts,
        metrics: deps.metrics,
        cancel: cancel.clone(),
        last_checked_height: last_observed_block,
        last_resync: Instant::now(),
    };
    run_loop(cancel, loop_duration, &mut oracle).await
}

struct EthOracle<E, C> {
    eth: Arc<E>,
    cosmos: Arc<C>,
    orchestrator_address: String,
    max_attempts: u32,
    metrics: Arc<OrchestratorMetrics>,
    cancel: CancellationToken,
    /// Highest Ethereum block already scanned (inclusive). Advanced only
    /// after a successful scan and submission.
    last_checked_height: u64,
    last_resync: Instant,
}

#[async_trait]
impl<E, C> LoopStep for EthOracle<E, C>
where
    E: EthereumNetwork,
    C: CosmosNetwork,
{
    fn name(&self) -> &'static str {
        "eth_oracle"
    }

    async fn step(&mut self) -> OrchestratorResult<()> {
        match self.observe_once().await {
            Ok(()) => Ok(()),
            Err(err) if err.is_cancellation() => Err(err),
            // A failed tick leaves the cursor in place; the next tick
            // re-attempts the same window
            Err(err) => {
                error!("oracle tick failed: {:?}", err);
                self.metrics.oracle_tick_failures.inc();
                Ok(())
            }
        }
    }
}

impl<E, C> EthOracle<E, C>
where
    E: EthereumNetwork,
    C: CosmosNetwork,
{
    async fn observe_once(&mut self) -> OrchestratorResult<()> {
        let mut latest_height = self.get_latest_eth_height().await?;

        // Not enough blocks on Ethereum yet
        if latest_height <= ETH_BLOCK_CONFIRMATION_DELAY {
            return Ok(());
        }

        // Never read within the confirmation delay of the head
        latest_height -= ETH_BLOCK_CONFIRMATION_DELAY;
        if latest_height <= self.last_checked_height {
            return Ok(());
        }

        if latest_height > self.last_checked_height + MAX_BLOCKS_PER_SCAN {
            latest_height = self.last_checked_height + MAX_BLOCKS_PER_SCAN;
        }

        let events = self
            .get_eth_events(self.last_checked_height, latest_height)
            .await?;
        self.send_new_event_claims(&events).await?;

        debug!(
            "scanned Ethereum blocks {}-{}",
            self.last_checked_height, latest_height
        );
        self.last_checked_height = latest_height;
        self.metrics
            .last_scanned_eth_block
            .set(latest_height as i64);

        if self.last_resync.elapsed() >= RESYNC_INTERVAL {
            self.auto_resync().await?;
        }

        Ok(())
    }

    async fn get_latest_eth_height(&self) -> OrchestratorResult<u64> {
        let metrics = &self.metrics;
        retry_with_attempts(
            &self.cancel,
            self.max_attempts,
            |attempt, err| {
                metrics
                    .external_call_retries
                    .with_label_values(&["get_latest_eth_height"])
                    .inc();
                warn!(
                    "failed to get latest Ethereum height, will retry ({}): {:?}",
                    attempt, err
                );
            },
            || self.eth.get_latest_block_number(),
        )
        .await
    }

    async fn get_eth_events(
        &self,
        start_block: u64,
        end_block: u64,
    ) -> OrchestratorResult<EthEvents> {
        let metrics = &self.metrics;
        retry_with_attempts(
            &self.cancel,
            self.max_attempts,
            |attempt, err| {
                metrics
                    .external_call_retries
                    .with_label_values(&["scan_eth_events"])
                    .inc();
                warn!(
                    "error during Ethereum event scan, will retry ({}): {:?}",
                    attempt, err
                );
            },
            || self.scan_eth_events(start_block, end_block),
        )
        .await
    }

    // If any of the five queries fails, the whole scan is retried from
    // scratch so a window is never submitted half-populated.
    async fn scan_eth_events(
        &self,
        start_block: u64,
        end_block: u64,
    ) -> OrchestratorResult<EthEvents> {
        let old_deposits = self
            .eth
            .get_old_deposit_events(start_block, end_block)
            .await?;
        let deposits = self.eth.get_deposit_events(start_block, end_block).await?;
        let withdrawals = self
            .eth
            .get_withdrawal_events(start_block, end_block)
            .await?;
        let erc20_deployments = self
            .eth
            .get_erc20_deployed_events(start_block, end_block)
            .await?;
        let valset_updates = self
            .eth
            .get_valset_updated_events(start_block, end_block)
            .await?;

        Ok(EthEvents {
            old_deposits,
            deposits,
            withdrawals,
            valset_updates,
            erc20_deployments,
        })
    }

    async fn send_new_event_claims(&self, events: &EthEvents) -> OrchestratorResult<()> {
        let metrics = &self.metrics;
        retry_with_attempts(
            &self.cancel,
            self.max_attempts,
            |attempt, err| {
                metrics
                    .external_call_retries
                    .with_label_values(&["send_event_claims"])
                    .inc();
                warn!(
                    "failed to send event claims to the home chain, will retry ({}): {:?}",
                    attempt, err
                );
            },
            || self.submit_new_event_claims(events),
        )
        .await
    }

    async fn submit_new_event_claims(&self, events: &EthEvents) -> OrchestratorResult<()> {
        let last_claim = self
            .cosmos
            .last_claim_event(&self.orchestrator_address)
            .await?;
        self.metrics
            .last_observed_event_nonce
            .set(last_claim.ethereum_event_nonce as i64);

        let new_events = events.filter(last_claim.ethereum_event_nonce);
        if new_events.num() == 0 {
            info!(
                "no new events on Ethereum, last claimed event nonce: {}",
                last_claim.ethereum_event_nonce
            );
            return Ok(());
        }

        let sorted_events = new_events.sorted();
        for event in &sorted_events {
            self.send_event_claim(event).await?;
            self.metrics
                .claims_submitted
                .with_label_values(&[event.kind()])
                .inc();

            // Wait for the previous claim to execute before submitting the
            // next one; out-of-order arrival fails CheckTx with a
            // "non contiguous event nonce" rejection
            tokio::select! {
                _ = self.cancel.cancelled() => return Err(OrchestratorError::Cancelled),
                _ = tokio::time::sleep(INTER_CLAIM_DELAY) => {}
            }
        }

        info!(
            "sent {} new event claims to the home chain",
            sorted_events.len()
        );
        Ok(())
    }

    async fn send_event_claim(&self, event: &EthereumEvent) -> OrchestratorResult<()> {
        match event {
            EthereumEvent::OldDeposit(e) => self.cosmos.send_old_deposit_claim(e).await,
            EthereumEvent::Deposit(e) => self.cosmos.send_deposit_claim(e).await,
            EthereumEvent::Withdrawal(e) => self.cosmos.send_withdrawal_claim(e).await,
            EthereumEvent::ValsetUpdate(e) => self.cosmos.send_valset_claim(e).await,
            EthereumEvent::Erc20Deployed(e) => self.cosmos.send_erc20_deployed_claim(e).await,
        }
    }

    // Events can be missed even after a successful tick: provider log
    // indexing lags block production, an unbonding validator has its claims
    // silently rejected, and a transient provider failure can drop events
    // inside a window the cursor already passed. Rewinding to the home
    // chain's last claimed height re-scans those blocks; re-submission is
    // safe because claims are deduplicated by (orchestrator, event nonce).
    async fn auto_resync(&mut self) -> OrchestratorResult<()> {
        let metrics = &self.metrics;
        let cosmos = &self.cosmos;
        let orchestrator_address = &self.orchestrator_address;
        let last_claim = retry_with_attempts(
            &self.cancel,
            self.max_attempts,
            |attempt, err| {
                metrics
                    .external_call_retries
                    .with_label_values(&["get_last_claim_event"])
                    .inc();
                warn!(
                    "failed to get last claimed event, will retry ({}): {:?}",
                    attempt, err
                );
            },
            || cosmos.last_claim_event(orchestrator_address),
        )
        .await?;

        self.last_checked_height = last_claim.ethereum_event_height;
        self.last_resync = Instant::now();
        self.metrics.auto_resyncs.inc();

        info!(
            "auto resync with last claimed event on the home chain, last claimed eth height: {}",
            self.last_checked_height
        );
        Ok(())
    }
}
