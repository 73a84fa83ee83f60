// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Typed Ethereum bridge events and the per-scan event set.
//!
//! The bridge contract assigns a single monotonically increasing event nonce
//! across all event kinds, so a scan window can be flattened into one
//! globally ordered sequence.

use ethers::types::Address as EthAddress;
use ethers::types::{H256, U256};

/// Legacy deposit to the home chain, without a payload string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OldDepositEvent {
    pub event_nonce: u64,
    pub block_number: u64,
    pub erc20: EthAddress,
    pub sender: EthAddress,
    /// Home chain recipient, left-padded to 32 bytes.
    pub destination: H256,
    pub amount: U256,
}

/// Deposit to the home chain carrying an opaque payload string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositEvent {
    pub event_nonce: u64,
    pub block_number: u64,
    pub erc20: EthAddress,
    pub sender: EthAddress,
    pub destination: H256,
    pub amount: U256,
    pub data: String,
}

/// A withdrawal batch was executed on Ethereum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalEvent {
    pub event_nonce: u64,
    pub block_number: u64,
    pub batch_nonce: u64,
    pub erc20: EthAddress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValsetMember {
    pub eth_address: EthAddress,
    pub power: u64,
}

/// The bridge validator set was rotated on Ethereum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValsetUpdateEvent {
    pub event_nonce: u64,
    pub block_number: u64,
    pub valset_nonce: u64,
    pub reward_amount: U256,
    pub reward_token: EthAddress,
    pub members: Vec<ValsetMember>,
}

/// A new ERC20 representation of a home chain denom was deployed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Erc20DeployedEvent {
    pub event_nonce: u64,
    pub block_number: u64,
    pub cosmos_denom: String,
    pub erc20: EthAddress,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// One bridge event of any kind.
///
/// The sum is closed: every kind the contract can emit has a variant, so
/// nonce extraction can never see an unknown kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EthereumEvent {
    OldDeposit(OldDepositEvent),
    Deposit(DepositEvent),
    Withdrawal(WithdrawalEvent),
    ValsetUpdate(ValsetUpdateEvent),
    Erc20Deployed(Erc20DeployedEvent),
}

impl EthereumEvent {
    pub fn event_nonce(&self) -> u64 {
        match self {
            EthereumEvent::OldDeposit(e) => e.event_nonce,
            EthereumEvent::Deposit(e) => e.event_nonce,
            EthereumEvent::Withdrawal(e) => e.event_nonce,
            EthereumEvent::ValsetUpdate(e) => e.event_nonce,
            EthereumEvent::Erc20Deployed(e) => e.event_nonce,
        }
    }

    pub fn block_number(&self) -> u64 {
        match self {
            EthereumEvent::OldDeposit(e) => e.block_number,
            EthereumEvent::Deposit(e) => e.block_number,
            EthereumEvent::Withdrawal(e) => e.block_number,
            EthereumEvent::ValsetUpdate(e) => e.block_number,
            EthereumEvent::Erc20Deployed(e) => e.block_number,
        }
    }

    /// Short kind label, also used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            EthereumEvent::OldDeposit(_) => "old_deposit",
            EthereumEvent::Deposit(_) => "deposit",
            EthereumEvent::Withdrawal(_) => "withdrawal",
            EthereumEvent::ValsetUpdate(_) => "valset_update",
            EthereumEvent::Erc20Deployed(_) => "erc20_deployed",
        }
    }
}

/// All bridge events observed in one scan window, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EthEvents {
    pub old_deposits: Vec<OldDepositEvent>,
    pub deposits: Vec<DepositEvent>,
    pub withdrawals: Vec<WithdrawalEvent>,
    pub valset_updates: Vec<ValsetUpdateEvent>,
    pub erc20_deployments: Vec<Erc20DeployedEvent>,
}

impl EthEvents {
    pub fn num(&self) -> usize {
        self.old_deposits.len()
            + self.deposits.len()
            + self.withdrawals.len()
            + self.valset_updates.len()
            + self.erc20_deployments.len()
    }

    /// Keeps only events with a nonce strictly greater than `nonce`,
    /// preserving the relative order within each kind.
    pub fn filter(&self, nonce: u64) -> EthEvents {
        EthEvents {
            old_deposits: self
                .old_deposits
                .iter()
                .filter(|e| e.event_nonce > nonce)
                .cloned()
                .collect(),
            deposits: self
                .deposits
                .iter()
                .filter(|e| e.event_nonce > nonce)
                .cloned()
                .collect(),
            withdrawals: self
                .withdrawals
                .iter()
                .filter(|e| e.event_nonce > nonce)
                .cloned()
                .collect(),
            valset_updates: self
                .valset_updates
                .iter()
                .filter(|e| e.event_nonce > nonce)
                .cloned()
                .collect(),
            erc20_deployments: self
                .erc20_deployments
                .iter()
                .filter(|e| e.event_nonce > nonce)
                .cloned()
                .collect(),
        }
    }

    /// Flattens all kinds into a single sequence in ascending nonce order.
    /// Nonces are globally unique across kinds, so ties cannot occur in
    /// valid data and the merge order of kinds is irrelevant.
    pub fn sorted(&self) -> Vec<EthereumEvent> {
        let mut events = Vec::with_capacity(self.num());
        events.extend(self.old_deposits.iter().cloned().map(EthereumEvent::OldDeposit));
        events.extend(self.deposits.iter().cloned().map(EthereumEvent::Deposit));
        events.extend(self.withdrawals.iter().cloned().map(EthereumEvent::Withdrawal));
        events.extend(
            self.valset_updates
                .iter()
                .cloned()
                .map(EthereumEvent::ValsetUpdate),
        );
        events.extend(
            self.erc20_deployments
                .iter()
                .cloned()
                .map(EthereumEvent::Erc20Deployed),
        );
        events.sort_by_key(|e| e.event_nonce());
        events
    }
}
