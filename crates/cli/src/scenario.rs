// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted scenarios for the simulator.
//!
//! ```toml
//! reachable = false
//!
//! [buffer.retry]
//! policy = "single-attempt"
//!
//! [[steps]]
//! action = "submit"
//! label = "save-draft"
//! fail_times = 1
//!
//! [[steps]]
//! action = "online"
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use reqbuf_core::BufferConfig;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A full scenario: starting connectivity, optional buffer config, steps.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Connectivity before the first step.
    #[serde(default = "default_reachable")]
    pub reachable: bool,
    /// Buffer settings; overridden by `--config` or `REQBUF_CONFIG`.
    #[serde(default)]
    pub buffer: Option<BufferConfig>,
    pub steps: Vec<Step>,
}

fn default_reachable() -> bool {
    true
}

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Step {
    /// Connectivity becomes reachable (drains if anything is pending).
    Online,
    /// Connectivity becomes unreachable.
    Offline,
    /// Drain explicitly, regardless of connectivity.
    Drain,
    /// Submit a simulated operation.
    Submit {
        label: String,
        /// Number of leading invocations that fail.
        #[serde(default)]
        fail_times: u32,
        /// Fail every invocation.
        #[serde(default)]
        always_fail: bool,
    },
}

impl Step {
    /// How many leading invocations of a submitted operation fail.
    pub fn failures(&self) -> u32 {
        match self {
            Step::Submit {
                always_fail: true, ..
            } => u32::MAX,
            Step::Submit { fail_times, .. } => *fail_times,
            _ => 0,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Online => write!(f, "online"),
            Step::Offline => write!(f, "offline"),
            Step::Drain => write!(f, "drain"),
            Step::Submit { label, .. } => write!(f, "submit {label}"),
        }
    }
}

impl Scenario {
    /// Parses and validates a TOML scenario.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Reads and validates a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.steps.is_empty() {
            return Err(Error::InvalidScenario("no steps".to_string()));
        }
        for (index, step) in self.steps.iter().enumerate() {
            if let Step::Submit {
                label,
                fail_times,
                always_fail,
            } = step
            {
                if label.trim().is_empty() {
                    return Err(Error::InvalidScenario(format!(
                        "step {}: label cannot be empty",
                        index + 1
                    )));
                }
                if *always_fail && *fail_times > 0 {
                    return Err(Error::InvalidScenario(format!(
                        "step {}: use either fail_times or always_fail, not both",
                        index + 1
                    )));
                }
            }
        }
        if let Some(buffer) = &self.buffer {
            buffer.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "scenario_tests.rs"]
mod tests;
