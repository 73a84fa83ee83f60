// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Read-only Ethereum adapter for the oracle.
//!
//! One `eth_getLogs` query per event kind, filtered by the bridge contract
//! address and the event's topic0. Callsites are responsible for keeping the
//! queried block range small enough for the provider.

use crate::abi::{
    Erc20DeployedEventFilter, SendToCosmosEventFilter, SendToCosmosV2EventFilter,
    TransactionBatchExecutedEventFilter, ValsetUpdatedEventFilter,
};
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::events::{
    DepositEvent, Erc20DeployedEvent, OldDepositEvent, ValsetUpdateEvent, WithdrawalEvent,
};
use async_trait::async_trait;
use ethers::contract::EthEvent;
use ethers::providers::{Http, JsonRpcClient, Middleware, Provider};
use ethers::types::Address as EthAddress;
use ethers::types::Filter;
use tap::TapFallible;

/// The six read-only queries the oracle performs against the source chain.
///
/// Required semantics: `[start_block, end_block]` inclusive, deterministic,
/// no duplicates, results ascending by `(block, log_index)`.
#[async_trait]
pub trait EthereumNetwork: Send + Sync {
    async fn get_latest_block_number(&self) -> OrchestratorResult<u64>;

    async fn get_old_deposit_events(
        &self,
        start_block: u64,
        end_block: u64,
    ) -> OrchestratorResult<Vec<OldDepositEvent>>;

    async fn get_deposit_events(
        &self,
        start_block: u64,
        end_block: u64,
    ) -> OrchestratorResult<Vec<DepositEvent>>;

    async fn get_withdrawal_events(
        &self,
        start_block: u64,
        end_block: u64,
    ) -> OrchestratorResult<Vec<WithdrawalEvent>>;

    async fn get_erc20_deployed_events(
        &self,
        start_block: u64,
        end_block: u64,
    ) -> OrchestratorResult<Vec<Erc20DeployedEvent>>;

    async fn get_valset_updated_events(
        &self,
        start_block: u64,
        end_block: u64,
    ) -> OrchestratorResult<Vec<ValsetUpdateEvent>>;
}

pub struct EthereumClient<P> {
    provider: Provider<P>,
    peggy_contract: EthAddress,
}

impl EthereumClient<Http> {
    pub async fn new(provider_url: &str, peggy_contract: EthAddress) -> anyhow::Result<Self> {
        let provider = Provider::<Http>::try_from(provider_url)?;
        let self_ = Self {
            provider,
            peggy_contract,
        };
        self_.describe().await?;
        Ok(self_)
    }
}

impl<P> EthereumClient<P>
where
    P: JsonRpcClient + 'static,
{
    pub fn new_for_testing(provider: Provider<P>, peggy_contract: EthAddress) -> Self {
        Self {
            provider,
            peggy_contract,
        }
    }

    // Log connection info so misconfigured endpoints show up at startup
    async fn describe(&self) -> anyhow::Result<()> {
        let chain_id = self.provider.get_chainid().await?;
        let block_number = self.provider.get_block_number().await?;
        tracing::info!(
            "EthereumClient connected to chain {}, current block: {}, bridge contract: {:?}",
            chain_id,
            block_number,
            self.peggy_contract
        );
        Ok(())
    }

    async fn query_events<T: EthEvent>(
        &self,
        start_block: u64,
        end_block: u64,
    ) -> OrchestratorResult<Vec<(T, u64)>> {
        let filter = Filter::new()
            .address(self.peggy_contract)
            .from_block(start_block)
            .to_block(end_block)
            .topic0(T::signature());
        let logs = self
            .provider
            .get_logs(&filter)
            .await
            .map_err(OrchestratorError::from)
            .tap_err(|e| {
                tracing::error!("get_logs failed. Filter: {:?}. Error {:?}", filter, e)
            })?;

        let mut decoded = Vec::with_capacity(logs.len());
        for log in logs {
            // Safeguard check that the provider only returns logs emitted
            // from the requested contract address
            if log.address != self.peggy_contract {
                return Err(OrchestratorError::EthProviderDataError(format!(
                    "Provider returned log from unexpected contract address (expected: {:?}): {:?}",
                    self.peggy_contract, log
                )));
            }
            let block_number = log
                .block_number
                .ok_or_else(|| {
                    OrchestratorError::EthProviderDataError(
                        "Provider returned log without block_number".into(),
                    )
                })?
                .as_u64();
            let log_index = log
                .log_index
                .ok_or_else(|| {
                    OrchestratorError::EthProviderDataError(
                        "Provider returned log without log_index".into(),
                    )
                })?
                .as_u64();
            let raw = ethers::abi::RawLog {
                topics: log.topics,
                data: log.data.to_vec(),
            };
            let event = T::decode_log(&raw).map_err(|e| {
                OrchestratorError::EthProviderDataError(format!(
                    "Failed to decode {} log: {:?}",
                    T::name(),
                    e
                ))
            })?;
            decoded.push((block_number, log_index, event));
        }
        decoded.sort_by_key(|(block, index, _)| (*block, *index));
        Ok(decoded
            .into_iter()
            .map(|(block, _, event)| (event, block))
            .collect())
    }
}

#[async_trait]
impl<P> EthereumNetwork for EthereumClient<P>
where
    P: JsonRpcClient + 'static,
{
    async fn get_latest_block_number(&self) -> OrchestratorResult<u64> {
        let block_number = self
            .provider
            .get_block_number()
            .await
            .map_err(OrchestratorError::from)?;
        Ok(block_number.as_u64())
    }

    async fn get_old_deposit_events(
        &self,
        start_block: u64,
        end_block: u64,
    ) -> OrchestratorResult<Vec<OldDepositEvent>> {
        Ok(self
            .query_events::<SendToCosmosEventFilter>(start_block, end_block)
            .await?
            .into_iter()
            .map(|(event, block)| event.into_event(block))
            .collect())
    }

    async fn get_deposit_events(
        &self,
        start_block: u64,
        end_block: u64,
    ) -> OrchestratorResult<Vec<DepositEvent>> {
        Ok(self
            .query_events::<SendToCosmosV2EventFilter>(start_block, end_block)
            .await?
            .into_iter()
            .map(|(event, block)| event.into_event(block))
            .collect())
    }

    async fn get_withdrawal_events(
        &self,
        start_block: u64,
        end_block: u64,
    ) -> OrchestratorResult<Vec<WithdrawalEvent>> {
        Ok(self
            .query_events::<TransactionBatchExecutedEventFilter>(start_block, end_block)
            .await?
            .into_iter()
            .map(|(event, block)| event.into_event(block))
            .collect())
    }

    async fn get_erc20_deployed_events(
        &self,
        start_block: u64,
        end_block: u64,
    ) -> OrchestratorResult<Vec<Erc20DeployedEvent>> {
        Ok(self
            .query_events::<Erc20DeployedEventFilter>(start_block, end_block)
            .await?
            .into_iter()
            .map(|(event, block)| event.into_event(block))
            .collect())
    }

    async fn get_valset_updated_events(
        &self,
        start_block: u64,
        end_block: u64,
    ) -> OrchestratorResult<Vec<ValsetUpdateEvent>> {
        Ok(self
            .query_events::<ValsetUpdatedEventFilter>(start_block, end_block)
            .await?
            .into_iter()
            .map(|(event, block)| event.into_event(block))
            .collect())
    }
}
