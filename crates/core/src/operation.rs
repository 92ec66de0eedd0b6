// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Operations and the queue entries that wrap them.
//!
//! An [`Operation`] is an opaque, re-invocable async action. The buffer only
//! cares whether an invocation succeeded; any value it produces is discarded
//! once the operation has been queued.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};

use crate::error::OperationError;

/// Future returned by a single invocation of an [`Operation`].
pub type OperationFuture = BoxFuture<'static, Result<(), OperationError>>;

/// Buffer-unique identifier assigned to every queued entry.
///
/// Ids increase monotonically in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A zero-argument async action that can be attempted more than once.
#[derive(Clone)]
pub struct Operation {
    label: Option<String>,
    invoke: Arc<dyn Fn() -> OperationFuture + Send + Sync>,
}

impl Operation {
    /// Wraps a closure producing a fallible future.
    ///
    /// The success value is ignored and the error is kept only as its
    /// display string.
    pub fn new<F, Fut, T, E>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: 'static,
        E: fmt::Display + 'static,
    {
        let invoke = move || -> OperationFuture {
            let fut = f();
            async move {
                fut.await
                    .map(|_| ())
                    .map_err(|e| OperationError::Failed(e.to_string()))
            }
            .boxed()
        };
        Operation {
            label: None,
            invoke: Arc::new(invoke),
        }
    }

    /// Attaches a display label used by the read model and diagnostics.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns the label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Starts one attempt.
    pub fn invoke(&self) -> OperationFuture {
        (self.invoke)()
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// An operation waiting in the queue.
#[derive(Debug, Clone)]
pub struct QueuedEntry {
    id: EntryId,
    operation: Operation,
    attempts: u32,
    queued_at: DateTime<Utc>,
}

impl QueuedEntry {
    pub(crate) fn new(id: EntryId, operation: Operation) -> Self {
        QueuedEntry {
            id,
            operation,
            attempts: 0,
            queued_at: Utc::now(),
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// Consumes the entry, returning the wrapped operation.
    pub fn into_operation(self) -> Operation {
        self.operation
    }

    /// Number of failed drain attempts so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn queued_at(&self) -> DateTime<Utc> {
        self.queued_at
    }

    /// Records a failed attempt and returns the new count.
    pub(crate) fn record_failure(&mut self) -> u32 {
        self.attempts = self.attempts.saturating_add(1);
        self.attempts
    }

    /// Read-model projection of this entry.
    pub fn to_pending(&self) -> PendingRequest {
        PendingRequest {
            id: self.id,
            label: self.operation.label.clone(),
            attempts: self.attempts,
            queued_at: self.queued_at,
        }
    }
}

/// What the presentation layer sees for each pending operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRequest {
    pub id: EntryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub attempts: u32,
    pub queued_at: DateTime<Utc>,
}

impl fmt::Display for PendingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{}{}", label, self.id)?,
            None => write!(f, "request{}", self.id)?,
        }
        if self.attempts > 0 {
            write!(f, " (attempts {})", self.attempts)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;
