// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Oracle loop configuration, deserialized from the host daemon's config
//! file section.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EthOracleConfig {
    /// Cadence of the oracle loop
    #[serde(default = "default_loop_duration")]
    pub loop_duration: Duration,

    /// Attempt budget for each external call
    #[serde(default = "default_max_retry_attempts")]
    pub max_retry_attempts: u32,
}

impl Default for EthOracleConfig {
    fn default() -> Self {
        Self {
            loop_duration: default_loop_duration(),
            max_retry_attempts: default_max_retry_attempts(),
        }
    }
}

fn default_loop_duration() -> Duration {
    Duration::from_secs(10)
}

fn default_max_retry_attempts() -> u32 {
    10
}

impl EthOracleConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.loop_duration.is_zero() {
            return Err("loop_duration must be positive".to_string());
        }
        if self.max_retry_attempts == 0 {
            return Err("max_retry_attempts must be at least 1".to_string());
        }
        Ok(())
    }
}
