// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Buffer configuration.
//!
//! Loaded from TOML, for example:
//!
//! ```toml
//! operation_timeout_ms = 5000
//! report_capacity = 64
//!
//! [retry]
//! policy = "bounded"
//! max_retries = 3
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::policy::RetryPolicy;

/// Settings for a [`RequestBuffer`](crate::RequestBuffer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BufferConfig {
    /// Per-attempt timeout for replays, in milliseconds. Absent means no
    /// timeout. Never applied to operations run directly by `submit`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_timeout_ms: Option<u64>,
    /// Capacity of the drain report channel.
    #[serde(default = "default_report_capacity")]
    pub report_capacity: usize,
    /// Policy for replays that fail.
    #[serde(default)]
    pub retry: RetryPolicy,
}

fn default_report_capacity() -> usize {
    64
}

impl Default for BufferConfig {
    fn default() -> Self {
        BufferConfig {
            operation_timeout_ms: None,
            report_capacity: default_report_capacity(),
            retry: RetryPolicy::default(),
        }
    }
}

impl BufferConfig {
    /// Creates a default config with the given retry policy.
    pub fn with_policy(retry: RetryPolicy) -> Self {
        BufferConfig {
            retry,
            ..Self::default()
        }
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: BufferConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.report_capacity == 0 {
            return Err(Error::Config("report_capacity must be > 0".to_string()));
        }
        if self.retry == RetryPolicy::bounded(0) {
            return Err(Error::Config(
                "max_retries must be > 0\n  hint: use policy = \"single-attempt\" to drop on the first failure"
                    .to_string(),
            ));
        }
        if self.operation_timeout_ms == Some(0) {
            return Err(Error::Config(
                "operation_timeout_ms must be > 0 (omit it to disable the timeout)".to_string(),
            ));
        }
        Ok(())
    }

    /// Per-attempt replay timeout, if configured.
    pub fn operation_timeout(&self) -> Option<Duration> {
        self.operation_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
