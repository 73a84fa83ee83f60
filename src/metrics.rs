// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

use prometheus::{
    register_int_counter_vec_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, IntCounter, IntCounterVec, IntGauge, Registry,
};

#[derive(Clone, Debug)]
pub struct OrchestratorMetrics {
    /// Highest source chain block the oracle has fully scanned and claimed
    pub(crate) last_scanned_eth_block: IntGauge,
    /// Last claimed event nonce as reported by the home chain
    pub(crate) last_observed_event_nonce: IntGauge,
    pub(crate) claims_submitted: IntCounterVec,
    pub(crate) oracle_tick_failures: IntCounter,
    pub(crate) external_call_retries: IntCounterVec,
    pub(crate) auto_resyncs: IntCounter,
}

impl OrchestratorMetrics {
    pub fn new(registry: &Registry) -> Self {
        Self {
            last_scanned_eth_block: register_int_gauge_with_registry!(
                "orchestrator_last_scanned_eth_block",
                "Highest Ethereum block already scanned by the oracle",
                registry,
            )
            .unwrap(),
            last_observed_event_nonce: register_int_gauge_with_registry!(
                "orchestrator_last_observed_event_nonce",
                "Last claimed event nonce reported by the home chain",
                registry,
            )
            .unwrap(),
            claims_submitted: register_int_counter_vec_with_registry!(
                "orchestrator_claims_submitted",
                "Total number of claims submitted to the home chain, by event kind",
                &["kind"],
                registry,
            )
            .unwrap(),
            oracle_tick_failures: register_int_counter_with_registry!(
                "orchestrator_oracle_tick_failures",
                "Total number of oracle ticks that failed after exhausting retries",
                registry,
            )
            .unwrap(),
            external_call_retries: register_int_counter_vec_with_registry!(
                "orchestrator_external_call_retries",
                "Total number of retried external calls, by operation",
                &["op"],
                registry,
            )
            .unwrap(),
            auto_resyncs: register_int_counter_with_registry!(
                "orchestrator_auto_resyncs",
                "Total number of cursor resyncs against the home chain",
                registry,
            )
            .unwrap(),
        }
    }

    pub fn new_for_testing() -> Self {
        Self::new(&Registry::new())
    }
}
