// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorError {
    // The driving cancellation token was triggered
    Cancelled,
    // Transient Ethereum provider error
    EthProviderError(String),
    // Ethereum provider returned malformed or inconsistent data
    EthProviderDataError(String),
    // Home chain RPC or claim broadcast error
    CosmosRpcError(String),
    // Uncategorized error
    Generic(String),
}

impl OrchestratorError {
    /// Returns a short string identifying the error type for metrics labels
    pub fn error_type(&self) -> &'static str {
        match self {
            OrchestratorError::Cancelled => "cancelled",
            OrchestratorError::EthProviderError(_) => "eth_provider_error",
            OrchestratorError::EthProviderDataError(_) => "eth_provider_data_error",
            OrchestratorError::CosmosRpcError(_) => "cosmos_rpc_error",
            OrchestratorError::Generic(_) => "generic",
        }
    }

    /// Cancellation is terminal: the retry harness and the loop driver
    /// propagate it instead of retrying.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, OrchestratorError::Cancelled)
    }
}

impl From<ethers::providers::ProviderError> for OrchestratorError {
    fn from(e: ethers::providers::ProviderError) -> Self {
        OrchestratorError::EthProviderError(format!("{e:?}"))
    }
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
