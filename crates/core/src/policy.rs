// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Retry policy applied to operations that fail during a drain.
//!
//! The policy only decides whether a failed entry is requeued for the next
//! reachable edge or dropped. It never changes queue order, and a failed
//! entry is never retried again within the same drain cycle.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default retry budget for [`RetryPolicy::Bounded`].
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Decision for an entry whose drain attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Put the entry back for the next drain cycle.
    Requeue,
    /// Remove the entry permanently.
    Drop,
}

/// How failed drain attempts are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "kebab-case")]
pub enum RetryPolicy {
    /// Requeue until the entry has failed more than `max_retries` times.
    ///
    /// An always-failing operation is attempted `max_retries + 1` times in
    /// total, one attempt per reachable edge.
    Bounded {
        #[serde(default = "default_max_retries")]
        max_retries: u32,
    },
    /// Drop every entry that fails its replay attempt.
    SingleAttempt,
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::Bounded {
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl RetryPolicy {
    /// Shorthand for a bounded policy.
    pub fn bounded(max_retries: u32) -> Self {
        RetryPolicy::Bounded { max_retries }
    }

    /// Decides the fate of an entry given its failure count, already
    /// including the attempt that just failed.
    pub fn verdict(&self, failed_attempts: u32) -> Verdict {
        match self {
            RetryPolicy::Bounded { max_retries } if failed_attempts <= *max_retries => {
                Verdict::Requeue
            }
            RetryPolicy::Bounded { .. } | RetryPolicy::SingleAttempt => Verdict::Drop,
        }
    }
}

impl fmt::Display for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryPolicy::Bounded { max_retries } => write!(f, "bounded (max {max_retries} retries)"),
            RetryPolicy::SingleAttempt => write!(f, "single-attempt"),
        }
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
