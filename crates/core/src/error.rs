// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for reqbuf-core.

use std::time::Duration;

use thiserror::Error;

/// Errors raised by the buffer itself (never by the operations it runs).
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid config: {0}")]
    Config(String),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no tokio runtime available\n  hint: create the buffer from within a tokio runtime")]
    NoRuntime,
}

/// A specialized Result type for reqbuf-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a queued operation did not succeed during a drain attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    #[error("{0}")]
    Failed(String),

    #[error("timed out after {}ms", .0.as_millis())]
    TimedOut(Duration),

    #[error("panicked: {0}")]
    Panicked(String),
}

impl serde::Serialize for OperationError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
