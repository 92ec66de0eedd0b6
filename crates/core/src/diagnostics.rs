// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostics for failed replays.
//!
//! A queued caller has already been told its request was accepted, so drain
//! failures have nowhere to go except this side channel.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use crate::error::OperationError;
use crate::operation::EntryId;

/// A notice about a queued operation that failed during a drain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Bounded policy: the attempt failed and the entry was requeued.
    RetryScheduled {
        id: EntryId,
        label: Option<String>,
        attempts: u32,
        error: OperationError,
    },
    /// Bounded policy: the retry budget is spent and the entry was dropped.
    Dropped {
        id: EntryId,
        label: Option<String>,
        max_retries: u32,
        error: OperationError,
    },
    /// Single-attempt policy: the replay failed and the entry was dropped.
    RetryFailed {
        id: EntryId,
        label: Option<String>,
        error: OperationError,
    },
}

impl Diagnostic {
    pub fn id(&self) -> EntryId {
        match self {
            Diagnostic::RetryScheduled { id, .. }
            | Diagnostic::Dropped { id, .. }
            | Diagnostic::RetryFailed { id, .. } => *id,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Diagnostic::RetryScheduled { label, .. }
            | Diagnostic::Dropped { label, .. }
            | Diagnostic::RetryFailed { label, .. } => label.as_deref(),
        }
    }

    pub fn error(&self) -> &OperationError {
        match self {
            Diagnostic::RetryScheduled { error, .. }
            | Diagnostic::Dropped { error, .. }
            | Diagnostic::RetryFailed { error, .. } => error,
        }
    }

    /// True for the terminal variants.
    pub fn is_drop(&self) -> bool {
        !matches!(self, Diagnostic::RetryScheduled { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::RetryScheduled { attempts, .. } => {
                write!(f, "request failed on attempt {attempts}, will retry when back online")
            }
            Diagnostic::Dropped { max_retries, .. } => {
                write!(f, "request dropped after {max_retries} failed attempts")
            }
            Diagnostic::RetryFailed { .. } => {
                write!(f, "request failed when retrying after coming back online")
            }
        }
    }
}

/// Receives diagnostics emitted by the drain loop.
pub trait DiagnosticSink: Send + Sync + 'static {
    fn emit(&self, diagnostic: &Diagnostic);
}

/// Default sink: logs every diagnostic at WARN.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        tracing::warn!(
            id = %diagnostic.id(),
            label = diagnostic.label().unwrap_or(""),
            error = %diagnostic.error(),
            "{}",
            diagnostic
        );
    }
}

/// Sink that keeps every diagnostic in memory.
///
/// Useful for hosts that surface drops in their UI, and for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies out everything recorded so far.
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes and returns everything recorded so far.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.records.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, diagnostic: &Diagnostic) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic.clone());
    }
}

#[cfg(test)]
#[path = "diagnostics_tests.rs"]
mod tests;
