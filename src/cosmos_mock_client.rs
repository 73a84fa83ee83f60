// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

//! A mock implementation of the home chain adapter.

use crate::cosmos_client::{CosmosNetwork, LastClaimEvent};
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::events::{
    DepositEvent, Erc20DeployedEvent, OldDepositEvent, ValsetUpdateEvent, WithdrawalEvent,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmittedClaim {
    pub kind: &'static str,
    pub event_nonce: u64,
    pub block_number: u64,
    pub submitted_at: Instant,
}

#[derive(Debug, Default)]
pub struct MockCosmosNetwork {
    last_claim: Mutex<LastClaimEvent>,
    submitted: Mutex<Vec<SubmittedClaim>>,
    queried_orchestrators: Mutex<Vec<String>>,
    last_claim_errors: Mutex<VecDeque<OrchestratorError>>,
    submit_errors: Mutex<VecDeque<OrchestratorError>>,
}

impl MockCosmosNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_last_claim(&self, ethereum_event_nonce: u64, ethereum_event_height: u64) {
        *self.last_claim.lock().unwrap() = LastClaimEvent {
            ethereum_event_nonce,
            ethereum_event_height,
        };
    }

    pub fn push_last_claim_error(&self, err: OrchestratorError) {
        self.last_claim_errors.lock().unwrap().push_back(err);
    }

    pub fn push_submit_error(&self, err: OrchestratorError) {
        self.submit_errors.lock().unwrap().push_back(err);
    }

    pub fn submitted(&self) -> Vec<SubmittedClaim> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn queried_orchestrators(&self) -> Vec<String> {
        self.queried_orchestrators.lock().unwrap().clone()
    }

    fn record_claim(&self, kind: &'static str, event_nonce: u64, block_number: u64) -> OrchestratorResult<()> {
        if let Some(err) = self.submit_errors.lock().unwrap().pop_front() {
            return Err(err);
        }
        self.submitted.lock().unwrap().push(SubmittedClaim {
            kind,
            event_nonce,
            block_number,
            submitted_at: Instant::now(),
        });
        // Mirror the home chain: a successfully executed claim advances the
        // orchestrator's last claim record
        *self.last_claim.lock().unwrap() = LastClaimEvent {
            ethereum_event_nonce: event_nonce,
            ethereum_event_height: block_number,
        };
        Ok(())
    }
}

#[async_trait]
impl CosmosNetwork for MockCosmosNetwork {
    async fn last_claim_event(&self, orchestrator: &str) -> OrchestratorResult<LastClaimEvent> {
        self.queried_orchestrators
            .lock()
            .unwrap()
            .push(orchestrator.to_string());
        if let Some(err) = self.last_claim_errors.lock().unwrap().pop_front() {
            return Err(err);
        }
        Ok(*self.last_claim.lock().unwrap())
    }

    async fn send_old_deposit_claim(&self, event: &OldDepositEvent) -> OrchestratorResult<()> {
        self.record_claim("old_deposit", event.event_nonce, event.block_number)
    }

    async fn send_deposit_claim(&self, event: &DepositEvent) -> OrchestratorResult<()> {
        self.record_claim("deposit", event.event_nonce, event.block_number)
    }

    async fn send_withdrawal_claim(&self, event: &WithdrawalEvent) -> OrchestratorResult<()> {
        self.record_claim("withdrawal", event.event_nonce, event.block_number)
    }

    async fn send_valset_claim(&self, event: &ValsetUpdateEvent) -> OrchestratorResult<()> {
        self.record_claim("valset_update", event.event_nonce, event.block_number)
    }

    async fn send_erc20_deployed_claim(
        &self,
        event: &Erc20DeployedEvent,
    ) -> OrchestratorResult<()> {
        self.record_claim("erc20_deployed", event.event_nonce, event.block_number)
    }
}
