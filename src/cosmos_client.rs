// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Home chain adapter consumed by the oracle.
//!
//! The concrete client (keys, signer, broadcaster) is constructed by the
//! embedding orchestrator daemon; the oracle only needs one read and five
//! claim submissions. Submissions wait for transaction acknowledgement, not
//! inclusion finality.

use crate::error::OrchestratorResult;
use crate::events::{
    DepositEvent, Erc20DeployedEvent, OldDepositEvent, ValsetUpdateEvent, WithdrawalEvent,
};
use async_trait::async_trait;

/// The highest Ethereum event this orchestrator has successfully claimed,
/// as recorded by the home chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LastClaimEvent {
    pub ethereum_event_nonce: u64,
    /// Source block the claimed event was observed in.
    pub ethereum_event_height: u64,
}

#[async_trait]
pub trait CosmosNetwork: Send + Sync {
    /// Reads the last claim state for `orchestrator` (a bech32 account
    /// address). Returns the zero value if the orchestrator has never
    /// claimed anything.
    async fn last_claim_event(&self, orchestrator: &str) -> OrchestratorResult<LastClaimEvent>;

    async fn send_old_deposit_claim(&self, event: &OldDepositEvent) -> OrchestratorResult<()>;

    async fn send_deposit_claim(&self, event: &DepositEvent) -> OrchestratorResult<()>;

    async fn send_withdrawal_claim(&self, event: &WithdrawalEvent) -> OrchestratorResult<()>;

    async fn send_valset_claim(&self, event: &ValsetUpdateEvent) -> OrchestratorResult<()>;

    async fn send_erc20_deployed_claim(&self, event: &Erc20DeployedEvent)
        -> OrchestratorResult<()>;
}
