// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

//! A mock implementation of the Ethereum adapter.

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::eth_client::EthereumNetwork;
use crate::events::{
    DepositEvent, Erc20DeployedEvent, OldDepositEvent, ValsetUpdateEvent, WithdrawalEvent,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

// Mock client used in test environments. Events are preset per kind and
// served back filtered by the queried block range, mirroring the inclusive
// range semantics of the real adapter.
#[derive(Debug, Default)]
pub struct MockEthereumNetwork {
    latest_block_number: AtomicU64,
    old_deposits: Mutex<Vec<OldDepositEvent>>,
    deposits: Mutex<Vec<DepositEvent>>,
    withdrawals: Mutex<Vec<WithdrawalEvent>>,
    valset_updates: Mutex<Vec<ValsetUpdateEvent>>,
    erc20_deployments: Mutex<Vec<Erc20DeployedEvent>>,
    head_errors: Mutex<VecDeque<OrchestratorError>>,
    // A pushed scan error fails the next scan at its first query
    scan_errors: Mutex<VecDeque<OrchestratorError>>,
    scanned_ranges: Mutex<Vec<(u64, u64)>>,
}

impl MockEthereumNetwork {
    pub fn new(latest_block_number: u64) -> Self {
        let self_ = Self::default();
        self_.set_latest_block_number(latest_block_number);
        self_
    }

    pub fn set_latest_block_number(&self, value: u64) {
        self.latest_block_number.store(value, Ordering::Relaxed);
    }

    pub fn add_old_deposit(&self, event: OldDepositEvent) {
        self.old_deposits.lock().unwrap().push(event);
    }

    pub fn add_deposit(&self, event: DepositEvent) {
        self.deposits.lock().unwrap().push(event);
    }

    pub fn add_withdrawal(&self, event: WithdrawalEvent) {
        self.withdrawals.lock().unwrap().push(event);
    }

    pub fn add_valset_update(&self, event: ValsetUpdateEvent) {
        self.valset_updates.lock().unwrap().push(event);
    }

    pub fn add_erc20_deployment(&self, event: Erc20DeployedEvent) {
        self.erc20_deployments.lock().unwrap().push(event);
    }

    pub fn push_head_error(&self, err: OrchestratorError) {
        self.head_errors.lock().unwrap().push_back(err);
    }

    pub fn push_scan_error(&self, err: OrchestratorError) {
        self.scan_errors.lock().unwrap().push_back(err);
    }

    /// Block ranges of the scans performed so far
    pub fn scanned_ranges(&self) -> Vec<(u64, u64)> {
        self.scanned_ranges.lock().unwrap().clone()
    }
}

fn in_range<T: Clone>(
    events: &Mutex<Vec<T>>,
    block: impl Fn(&T) -> u64,
    from: u64,
    to: u64,
) -> Vec<T> {
    events
        .lock()
        .unwrap()
        .iter()
        .cloned()
        .filter(|e| {
            let number = block(e);
            number >= from && number <= to
        })
        .collect()
}

#[async_trait]
impl EthereumNetwork for MockEthereumNetwork {
    async fn get_latest_block_number(&self) -> OrchestratorResult<u64> {
        if let Some(err) = self.head_errors.lock().unwrap().pop_front() {
            return Err(err);
        }
        Ok(self.latest_block_number.load(Ordering::Relaxed))
    }

    async fn get_old_deposit_events(
        &self,
        start_block: u64,
        end_block: u64,
    ) -> OrchestratorResult<Vec<OldDepositEvent>> {
        if let Some(err) = self.scan_errors.lock().unwrap().pop_front() {
            return Err(err);
        }
        self.scanned_ranges
            .lock()
            .unwrap()
            .push((start_block, end_block));
        Ok(in_range(
            &self.old_deposits,
            |e| e.block_number,
            start_block,
            end_block,
        ))
    }

    async fn get_deposit_events(
        &self,
        start_block: u64,
        end_block: u64,
    ) -> OrchestratorResult<Vec<DepositEvent>> {
        Ok(in_range(
            &self.deposits,
            |e| e.block_number,
            start_block,
            end_block,
        ))
    }

    async fn get_withdrawal_events(
        &self,
        start_block: u64,
        end_block: u64,
    ) -> OrchestratorResult<Vec<WithdrawalEvent>> {
        Ok(in_range(
            &self.withdrawals,
            |e| e.block_number,
            start_block,
            end_block,
        ))
    }

    async fn get_erc20_deployed_events(
        &self,
        start_block: u64,
        end_block: u64,
    ) -> OrchestratorResult<Vec<Erc20DeployedEvent>> {
        Ok(in_range(
            &self.erc20_deployments,
            |e| e.block_number,
            start_block,
            end_block,
        ))
    }

    async fn get_valset_updated_events(
        &self,
        start_block: u64,
        end_block: u64,
    ) -> OrchestratorResult<Vec<ValsetUpdateEvent>> {
        Ok(in_range(
            &self.valset_updates,
            |e| e.block_number,
            start_block,
            end_block,
        ))
    }
}
