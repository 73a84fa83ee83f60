// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Ethereum-to-Cosmos event oracle for a Peggy bridge orchestrator.
//!
//! Each orchestrator process runs [`oracle::run_eth_oracle`] alongside its
//! sibling loops. The oracle scans finalized Ethereum blocks for bridge
//! events, orders them by the contract's global event nonce, and relays
//! them to the home chain as claims; the home chain acts on an event once a
//! quorum of orchestrators has claimed it.

pub mod abi;
pub mod config;
pub mod cosmos_client;
pub mod error;
pub mod eth_client;
pub mod events;
pub mod loops;
pub mod metrics;
pub mod oracle;
pub mod retry;

#[cfg(test)]
pub mod cosmos_mock_client;
#[cfg(test)]
pub mod eth_mock_client;
