// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The request buffer.
//!
//! `submit` branches on the cached connectivity flag: reachable runs the
//! operation inline and hands its result back untouched, unreachable queues
//! it and acknowledges immediately. A "became reachable" edge replays the
//! queue on a background task (see [`drain`]).
//!
//! The state lock is a plain mutex that is never held across an await, so
//! every mutation is a short synchronous step between suspension points.

mod drain;
mod lifecycle;

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tracing::debug;

pub use drain::DrainReport;

use crate::config::BufferConfig;
use crate::connectivity::ConnectivitySignal;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::{Error, Result};
use crate::operation::{EntryId, Operation, PendingRequest, QueuedEntry};
use crate::policy::RetryPolicy;
use crate::queue::OfflineQueue;

/// What `submit` did with an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission<T> {
    /// Ran immediately; carries the operation's value.
    Completed(T),
    /// Accepted for delivery once connectivity returns.
    Queued(EntryId),
}

impl<T> Submission<T> {
    pub fn is_queued(&self) -> bool {
        matches!(self, Submission::Queued(_))
    }

    /// The value of an operation that ran immediately.
    pub fn completed(self) -> Option<T> {
        match self {
            Submission::Completed(value) => Some(value),
            Submission::Queued(_) => None,
        }
    }

    /// The entry id of a queued operation.
    pub fn queued_id(&self) -> Option<EntryId> {
        match self {
            Submission::Completed(_) => None,
            Submission::Queued(id) => Some(*id),
        }
    }
}

/// Read model for the presentation layer.
///
/// While a drain is running, entries it is replaying are not listed in
/// `pending`; only `draining` hints that work is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BufferView {
    pub reachable: bool,
    pub draining: bool,
    pub pending: Vec<PendingRequest>,
}

struct BufferState {
    reachable: bool,
    draining: bool,
    queue: OfflineQueue,
}

impl BufferState {
    fn view(&self) -> BufferView {
        BufferView {
            reachable: self.reachable,
            draining: self.draining,
            pending: self.queue.pending(),
        }
    }
}

/// State shared between the buffer handle and its background tasks.
struct Shared {
    state: Mutex<BufferState>,
    view: watch::Sender<BufferView>,
    reports: broadcast::Sender<DrainReport>,
    /// Held for the whole of a drain cycle so cycles never overlap.
    drain_lock: tokio::sync::Mutex<()>,
    next_id: AtomicU64,
    policy: RetryPolicy,
    operation_timeout: Option<Duration>,
    sink: Arc<dyn DiagnosticSink>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, BufferState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &BufferState) {
        self.view.send_replace(state.view());
    }

    fn next_id(&self) -> EntryId {
        EntryId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Applies a connectivity notification to the cached flag.
    ///
    /// Returns true only for an unreachable → reachable transition.
    fn apply_connectivity(&self, reachable: bool) -> bool {
        let mut state = self.lock();
        if state.reachable == reachable {
            debug!(reachable, "connectivity notification without state change");
            return false;
        }
        state.reachable = reachable;
        self.publish(&state);
        debug!(reachable, pending = state.queue.len(), "connectivity edge");
        reachable
    }
}

/// Client-side buffer that defers operations while the network is down.
///
/// Must be created inside a tokio runtime. Dropping the buffer stops its
/// background tasks and releases the connectivity subscription; use
/// [`shutdown`](RequestBuffer::shutdown) to also get pending operations back.
pub struct RequestBuffer {
    shared: Arc<Shared>,
    tasks: lifecycle::Tasks,
}

impl RequestBuffer {
    /// Creates a buffer that logs diagnostics through `tracing`.
    pub fn new<S: ConnectivitySignal>(signal: Arc<S>, config: BufferConfig) -> Result<Self> {
        Self::with_sink(signal, config, Arc::new(TracingSink))
    }

    /// Creates a buffer with a custom diagnostics sink.
    pub fn with_sink<S: ConnectivitySignal>(
        signal: Arc<S>,
        config: BufferConfig,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Result<Self> {
        config.validate()?;
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| Error::NoRuntime)?;

        // Subscribe before sampling so no edge can fall between the two.
        let events = signal.subscribe();
        let state = BufferState {
            reachable: signal.is_reachable(),
            draining: false,
            queue: OfflineQueue::new(),
        };
        let (view, _) = watch::channel(state.view());
        let (reports, _) = broadcast::channel(config.report_capacity);
        debug!(
            reachable = state.reachable,
            policy = %config.retry,
            "request buffer created"
        );

        let shared = Arc::new(Shared {
            state: Mutex::new(state),
            view,
            reports,
            drain_lock: tokio::sync::Mutex::new(()),
            next_id: AtomicU64::new(0),
            policy: config.retry,
            operation_timeout: config.operation_timeout(),
            sink,
        });
        let tasks = lifecycle::Tasks::spawn(&runtime, Arc::clone(&shared), signal, events);

        Ok(RequestBuffer { shared, tasks })
    }

    /// Runs `op` now if reachable, otherwise queues it.
    ///
    /// While reachable the result is exactly what `op` produces, including
    /// its error; nothing is retried. While unreachable this resolves at once
    /// with [`Submission::Queued`] and later failures are only visible
    /// through diagnostics.
    pub async fn submit<F, Fut, T, E>(&self, op: F) -> std::result::Result<Submission<T>, E>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        T: 'static,
        E: fmt::Display + 'static,
    {
        self.submit_inner(None, op).await
    }

    /// Like [`submit`](Self::submit), labelling the operation for display.
    pub async fn submit_named<F, Fut, T, E>(
        &self,
        label: impl Into<String>,
        op: F,
    ) -> std::result::Result<Submission<T>, E>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        T: 'static,
        E: fmt::Display + 'static,
    {
        self.submit_inner(Some(label.into()), op).await
    }

    async fn submit_inner<F, Fut, T, E>(
        &self,
        label: Option<String>,
        op: F,
    ) -> std::result::Result<Submission<T>, E>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        T: 'static,
        E: fmt::Display + 'static,
    {
        let op = {
            let mut state = self.shared.lock();
            if !state.reachable {
                let mut operation = Operation::new(op);
                if let Some(label) = label {
                    operation = operation.with_label(label);
                }
                let id = self.shared.next_id();
                state.queue.enqueue(QueuedEntry::new(id, operation));
                self.shared.publish(&state);
                debug!(id = %id, pending = state.queue.len(), "queued request while unreachable");
                return Ok(Submission::Queued(id));
            }
            op
        };
        op().await.map(Submission::Completed)
    }

    /// Replays the queue once, in order.
    ///
    /// Called automatically on every reachable edge. Waits for any running
    /// cycle first. Returns an empty report without touching any state when
    /// the queue is empty.
    pub async fn drain(&self) -> DrainReport {
        self.shared.drain().await
    }

    /// Pending operations in queue order.
    pub fn pending(&self) -> Vec<PendingRequest> {
        self.shared.lock().queue.pending()
    }

    pub fn pending_count(&self) -> usize {
        self.shared.lock().queue.len()
    }

    /// Cached connectivity state.
    pub fn is_reachable(&self) -> bool {
        self.shared.lock().reachable
    }

    pub fn is_draining(&self) -> bool {
        self.shared.lock().draining
    }

    /// Current read model.
    pub fn view(&self) -> BufferView {
        self.shared.lock().view()
    }

    /// Subscribes to read-model updates, republished after every mutation.
    pub fn watch(&self) -> watch::Receiver<BufferView> {
        self.shared.view.subscribe()
    }

    /// Subscribes to the report of every non-empty drain cycle.
    pub fn subscribe_reports(&self) -> broadcast::Receiver<DrainReport> {
        self.shared.reports.subscribe()
    }

    pub fn policy(&self) -> RetryPolicy {
        self.shared.policy
    }

    /// Stops listening for connectivity, lets a running drain finish, and
    /// returns whatever is still pending.
    pub async fn shutdown(self) -> Vec<QueuedEntry> {
        let RequestBuffer { shared, tasks } = self;
        tasks.shutdown().await;

        let mut state = shared.lock();
        let entries = state.queue.take_all();
        shared.publish(&state);
        debug!(returned = entries.len(), "request buffer shut down");
        entries
    }
}

impl fmt::Debug for RequestBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.lock();
        f.debug_struct("RequestBuffer")
            .field("reachable", &state.reachable)
            .field("draining", &state.draining)
            .field("pending", &state.queue.len())
            .field("policy", &self.shared.policy)
            .finish()
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
