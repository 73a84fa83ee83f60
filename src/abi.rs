// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Hand-rolled typed bindings for the Peggy bridge contract events.
//!
//! Each `*Filter` struct mirrors one Solidity event declaration; decoding a
//! raw log yields the filter struct, which is then converted into the
//! corresponding domain event with the block number attached.

use crate::events::{
    DepositEvent, Erc20DeployedEvent, EthereumEvent, OldDepositEvent, ValsetMember,
    ValsetUpdateEvent, WithdrawalEvent,
};
use ethers::contract::EthEvent;
use ethers::types::Address as EthAddress;
use ethers::types::{H256, U256};

#[derive(Clone, Debug, PartialEq, Eq, EthEvent)]
#[ethevent(
    name = "SendToCosmosEvent",
    abi = "SendToCosmosEvent(address,address,bytes32,uint256,uint256)"
)]
pub struct SendToCosmosEventFilter {
    #[ethevent(indexed)]
    pub erc20: EthAddress,
    #[ethevent(indexed)]
    pub sender: EthAddress,
    #[ethevent(indexed)]
    pub destination: [u8; 32],
    pub amount: U256,
    pub event_nonce: U256,
}

#[derive(Clone, Debug, PartialEq, Eq, EthEvent)]
#[ethevent(
    name = "SendToCosmosV2Event",
    abi = "SendToCosmosV2Event(address,address,bytes32,uint256,uint256,string)"
)]
pub struct SendToCosmosV2EventFilter {
    #[ethevent(indexed)]
    pub erc20: EthAddress,
    #[ethevent(indexed)]
    pub sender: EthAddress,
    #[ethevent(indexed)]
    pub destination: [u8; 32],
    pub amount: U256,
    pub event_nonce: U256,
    pub data: String,
}

#[derive(Clone, Debug, PartialEq, Eq, EthEvent)]
#[ethevent(
    name = "TransactionBatchExecutedEvent",
    abi = "TransactionBatchExecutedEvent(uint256,address,uint256)"
)]
pub struct TransactionBatchExecutedEventFilter {
    #[ethevent(indexed)]
    pub batch_nonce: U256,
    #[ethevent(indexed)]
    pub token: EthAddress,
    pub event_nonce: U256,
}

#[derive(Clone, Debug, PartialEq, Eq, EthEvent)]
#[ethevent(
    name = "ValsetUpdatedEvent",
    abi = "ValsetUpdatedEvent(uint256,uint256,uint256,address,address[],uint256[])"
)]
pub struct ValsetUpdatedEventFilter {
    #[ethevent(indexed)]
    pub new_valset_nonce: U256,
    pub event_nonce: U256,
    pub reward_amount: U256,
    pub reward_token: EthAddress,
    pub validators: Vec<EthAddress>,
    pub powers: Vec<U256>,
}

#[derive(Clone, Debug, PartialEq, Eq, EthEvent)]
#[ethevent(
    name = "ERC20DeployedEvent",
    abi = "ERC20DeployedEvent(string,address,string,string,uint8,uint256)"
)]
pub struct Erc20DeployedEventFilter {
    pub cosmos_denom: String,
    #[ethevent(indexed)]
    pub token_contract: EthAddress,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub event_nonce: U256,
}

impl SendToCosmosEventFilter {
    pub fn into_event(self, block_number: u64) -> OldDepositEvent {
        OldDepositEvent {
            event_nonce: self.event_nonce.as_u64(),
            block_number,
            erc20: self.erc20,
            sender: self.sender,
            destination: H256::from(self.destination),
            amount: self.amount,
        }
    }
}

impl SendToCosmosV2EventFilter {
    pub fn into_event(self, block_number: u64) -> DepositEvent {
        DepositEvent {
            event_nonce: self.event_nonce.as_u64(),
            block_number,
            erc20: self.erc20,
            sender: self.sender,
            destination: H256::from(self.destination),
            amount: self.amount,
            data: self.data,
        }
    }
}

impl TransactionBatchExecutedEventFilter {
    pub fn into_event(self, block_number: u64) -> WithdrawalEvent {
        WithdrawalEvent {
            event_nonce: self.event_nonce.as_u64(),
            block_number,
            batch_nonce: self.batch_nonce.as_u64(),
            erc20: self.token,
        }
    }
}

impl ValsetUpdatedEventFilter {
    pub fn into_event(self, block_number: u64) -> ValsetUpdateEvent {
        // The contract emits validators and powers as parallel arrays
        let members = self
            .validators
            .into_iter()
            .zip(self.powers)
            .map(|(eth_address, power)| ValsetMember {
                eth_address,
                power: power.as_u64(),
            })
            .collect();
        ValsetUpdateEvent {
            event_nonce: self.event_nonce.as_u64(),
            block_number,
            valset_nonce: self.new_valset_nonce.as_u64(),
            reward_amount: self.reward_amount,
            reward_token: self.reward_token,
            members,
        }
    }
}

impl Erc20DeployedEventFilter {
    pub fn into_event(self, block_number: u64) -> Erc20DeployedEvent {
        Erc20DeployedEvent {
            event_nonce: self.event_nonce.as_u64(),
            block_number,
            cosmos_denom: self.cosmos_denom,
            erc20: self.token_contract,
            name: self.name,
            symbol: self.symbol,
            decimals: self.decimals,
        }
    }
}

/// Convenience for tests and debugging tools that work on mixed logs.
pub fn try_from_log(log: &ethers::types::Log) -> Option<EthereumEvent> {
    let block_number = log.block_number?.as_u64();
    let raw = ethers::abi::RawLog {
        topics: log.topics.clone(),
        data: log.data.to_vec(),
    };
    let topic0 = log.topics.first()?;
    if *topic0 == SendToCosmosEventFilter::signature() {
        return <SendToCosmosEventFilter as ethers::contract::EthEvent>::decode_log(&raw)
            .ok()
            .map(|e| EthereumEvent::OldDeposit(e.into_event(block_number)));
    }
    if *topic0 == SendToCosmosV2EventFilter::signature() {
        return <SendToCosmosV2EventFilter as ethers::contract::EthEvent>::decode_log(&raw)
            .ok()
            .map(|e| EthereumEvent::Deposit(e.into_event(block_number)));
    }
    if *topic0 == TransactionBatchExecutedEventFilter::signature() {
        return <TransactionBatchExecutedEventFilter as ethers::contract::EthEvent>::decode_log(&raw)
            .ok()
            .map(|e| EthereumEvent::Withdrawal(e.into_event(block_number)));
    }
    if *topic0 == ValsetUpdatedEventFilter::signature() {
        return <ValsetUpdatedEventFilter as ethers::contract::EthEvent>::decode_log(&raw)
            .ok()
            .map(|e| EthereumEvent::ValsetUpdate(e.into_event(block_number)));
    }
    if *topic0 == Erc20DeployedEventFilter::signature() {
        return <Erc20DeployedEventFilter as ethers::contract::EthEvent>::decode_log(&raw)
            .ok()
            .map(|e| EthereumEvent::Erc20Deployed(e.into_event(block_number)));
    }
    None
}
