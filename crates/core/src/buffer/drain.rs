// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Drain cycle: snapshot, clear, replay, merge back.
//!
//! 1. Under the state lock, take every entry out of the visible queue and
//!    mark the buffer as draining. The snapshot is owned by value.
//! 2. Without the lock, attempt each entry once, in order, one at a time.
//! 3. Under the lock again, put requeued entries in front of anything
//!    submitted meanwhile and clear the draining flag.
//!
//! Between steps 1 and 3 the read model shows in-flight entries as gone.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use serde::Serialize;
use tracing::debug;

use super::Shared;
use crate::diagnostics::Diagnostic;
use crate::error::OperationError;
use crate::operation::QueuedEntry;
use crate::policy::{RetryPolicy, Verdict};

/// Outcome counts for one drain cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub requeued: usize,
    pub dropped: usize,
}

impl DrainReport {
    /// True when the cycle had nothing to replay.
    pub fn is_empty(&self) -> bool {
        self.attempted == 0
    }
}

impl fmt::Display for DrainReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} attempted, {} succeeded, {} requeued, {} dropped",
            self.attempted, self.succeeded, self.requeued, self.dropped
        )
    }
}

impl Shared {
    pub(super) async fn drain(&self) -> DrainReport {
        let _cycle = self.drain_lock.lock().await;

        let snapshot = {
            let mut state = self.lock();
            if state.queue.is_empty() {
                return DrainReport::default();
            }
            state.draining = true;
            let snapshot = state.queue.take_all();
            self.publish(&state);
            snapshot
        };
        debug!(entries = snapshot.len(), "drain started");

        let mut report = DrainReport::default();
        let mut requeued = Vec::new();
        for mut entry in snapshot {
            report.attempted += 1;
            let error = match self.attempt(&entry).await {
                Ok(()) => {
                    report.succeeded += 1;
                    continue;
                }
                Err(error) => error,
            };

            let attempts = entry.record_failure();
            match self.policy.verdict(attempts) {
                Verdict::Requeue => {
                    report.requeued += 1;
                    self.sink.emit(&Diagnostic::RetryScheduled {
                        id: entry.id(),
                        label: entry.operation().label().map(str::to_string),
                        attempts,
                        error,
                    });
                    requeued.push(entry);
                }
                Verdict::Drop => {
                    report.dropped += 1;
                    self.sink.emit(&self.drop_diagnostic(&entry, error));
                }
            }
        }

        {
            let mut state = self.lock();
            state.queue.restore(requeued);
            state.draining = false;
            self.publish(&state);
        }
        debug!(%report, "drain finished");
        // Nobody listening is fine.
        let _ = self.reports.send(report.clone());
        report
    }

    /// Runs one attempt, turning timeouts and panics into failures.
    async fn attempt(&self, entry: &QueuedEntry) -> Result<(), OperationError> {
        let invoked = std::panic::catch_unwind(AssertUnwindSafe(|| entry.operation().invoke()));
        let invocation = match invoked {
            Ok(future) => AssertUnwindSafe(future).catch_unwind(),
            Err(payload) => return Err(OperationError::Panicked(panic_message(payload.as_ref()))),
        };

        let outcome = match self.operation_timeout {
            Some(limit) => match tokio::time::timeout(limit, invocation).await {
                Ok(outcome) => outcome,
                Err(_) => return Err(OperationError::TimedOut(limit)),
            },
            None => invocation.await,
        };

        outcome.unwrap_or_else(|payload| {
            Err(OperationError::Panicked(panic_message(payload.as_ref())))
        })
    }

    fn drop_diagnostic(&self, entry: &QueuedEntry, error: OperationError) -> Diagnostic {
        let id = entry.id();
        let label = entry.operation().label().map(str::to_string);
        match self.policy {
            RetryPolicy::Bounded { max_retries } => Diagnostic::Dropped {
                id,
                label,
                max_retries,
                error,
            },
            RetryPolicy::SingleAttempt => Diagnostic::RetryFailed { id, label, error },
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
