// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! reqbuf-core: client-side request retry buffer.
//!
//! Operations submitted while the network is reachable run immediately and
//! their result goes straight back to the caller. Operations submitted while
//! unreachable are queued in arrival order and replayed once connectivity
//! returns, with a configurable retry policy deciding what happens to
//! replays that fail.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐ submit ┌───────────────┐ edges ┌────────────────────┐
//! │    Caller    │───────►│ RequestBuffer │◄──────│ ConnectivitySignal │
//! └──────────────┘        └───────────────┘       └────────────────────┘
//!                            │         │
//!                  drain req ▼         ▼ publish
//!                     ┌───────────┐  ┌───────────┐
//!                     │drain task │  │BufferView │ (watch channel)
//!                     └───────────┘  └───────────┘
//!                            │
//!                            ▼
//!                     ┌───────────────┐
//!                     │DiagnosticSink │ (requeue / drop notices)
//!                     └───────────────┘
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use reqbuf_core::{BufferConfig, ConnectivityMonitor, RequestBuffer};
//!
//! let monitor = Arc::new(ConnectivityMonitor::new(false));
//! let buffer = RequestBuffer::new(monitor.clone(), BufferConfig::default())?;
//!
//! // Offline: accepted for later delivery.
//! buffer.submit(|| async { api.save_draft().await }).await?;
//! assert_eq!(buffer.pending_count(), 1);
//!
//! // Back online: the queue is replayed in the background.
//! monitor.set_reachable(true);
//! ```

pub mod buffer;
pub mod config;
pub mod connectivity;
pub mod diagnostics;
pub mod error;
pub mod operation;
pub mod policy;
mod queue;

pub use buffer::{BufferView, DrainReport, RequestBuffer, Submission};
pub use config::BufferConfig;
pub use connectivity::{ConnectivityEvent, ConnectivityMonitor, ConnectivitySignal};
pub use diagnostics::{Diagnostic, DiagnosticSink, MemorySink, TracingSink};
pub use error::{Error, OperationError, Result};
pub use operation::{EntryId, Operation, PendingRequest, QueuedEntry};
pub use policy::{RetryPolicy, Verdict};

#[cfg(test)]
mod test_helpers;
