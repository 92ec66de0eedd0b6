// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Drives a [`Scenario`] against a real [`RequestBuffer`].
//!
//! Connectivity is simulated with a [`ConnectivityMonitor`]. After each step
//! the runner waits for the buffer to settle (the read model reflects the new
//! connectivity and any triggered drain has reported) before recording it.

use std::future::{self, Ready};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqbuf_core::{
    BufferConfig, BufferView, ConnectivityMonitor, Diagnostic, DiagnosticSink, DrainReport,
    EntryId, MemorySink, PendingRequest, RequestBuffer, Submission, TracingSink,
};
use serde::Serialize;
use tokio::time::timeout;
use tracing::debug;

use crate::error::{Error, Result};
use crate::scenario::{Scenario, Step};

/// Upper bound on how long a single step may take to settle.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(30);

/// What happened when a step ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// Submitted while unreachable.
    Queued { id: EntryId },
    /// Submitted while reachable and run inline.
    Ran {
        ok: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    /// Connectivity step. `drain` is set when the edge replayed the queue.
    Connectivity {
        reachable: bool,
        changed: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        drain: Option<DrainReport>,
    },
    /// Explicit drain.
    Drained { report: DrainReport },
}

/// One executed step.
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    /// 1-based position in the scenario.
    pub index: usize,
    pub step: Step,
    pub outcome: Outcome,
    /// Pending list once the step settled.
    pub pending: Vec<PendingRequest>,
    /// Diagnostics emitted while the step ran.
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of running a whole scenario.
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    pub steps: Vec<StepRecord>,
    #[serde(rename = "final")]
    pub final_view: BufferView,
}

impl Transcript {
    /// All diagnostics in emission order.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.steps.iter().flat_map(|s| s.diagnostics.iter())
    }
}

/// Records diagnostics per step and still logs them.
#[derive(Debug, Default)]
struct TeeSink {
    memory: MemorySink,
}

impl DiagnosticSink for TeeSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        TracingSink.emit(diagnostic);
        self.memory.emit(diagnostic);
    }
}

/// Runs `scenario` on a fresh buffer built from `config`.
///
/// Must be called from inside a tokio runtime.
pub async fn run(scenario: &Scenario, config: BufferConfig) -> Result<Transcript> {
    let monitor = Arc::new(ConnectivityMonitor::new(scenario.reachable));
    let sink = Arc::new(TeeSink::default());
    let buffer = RequestBuffer::with_sink(
        Arc::clone(&monitor),
        config,
        Arc::clone(&sink) as Arc<dyn DiagnosticSink>,
    )?;

    let mut steps = Vec::with_capacity(scenario.steps.len());
    for (i, step) in scenario.steps.iter().enumerate() {
        debug!(step = i + 1, %step, "running step");
        let outcome = match step {
            Step::Online => set_connectivity(&monitor, &buffer, true).await?,
            Step::Offline => set_connectivity(&monitor, &buffer, false).await?,
            Step::Drain => Outcome::Drained {
                report: buffer.drain().await,
            },
            Step::Submit { label, .. } => submit(&buffer, label, step.failures()).await,
        };
        steps.push(StepRecord {
            index: i + 1,
            step: step.clone(),
            outcome,
            pending: buffer.pending(),
            diagnostics: sink.memory.take(),
        });
    }

    let final_view = buffer.view();
    let leftover = buffer.shutdown().await;
    debug!(pending = leftover.len(), "scenario finished");
    Ok(Transcript { steps, final_view })
}

async fn set_connectivity(
    monitor: &ConnectivityMonitor,
    buffer: &RequestBuffer,
    reachable: bool,
) -> Result<Outcome> {
    // Subscribe before flipping the signal so the report cannot be missed.
    let mut reports = buffer.subscribe_reports();
    let mut view = buffer.watch();
    let had_pending = buffer.pending_count() > 0;

    let changed = monitor.set_reachable(reachable);
    match timeout(SETTLE_TIMEOUT, view.wait_for(|v| v.reachable == reachable)).await {
        Ok(Ok(_)) => {}
        _ => return Err(Error::Timeout("connectivity change")),
    }

    let drain = if changed && reachable && had_pending {
        match timeout(SETTLE_TIMEOUT, reports.recv()).await {
            Ok(Ok(report)) => Some(report),
            _ => return Err(Error::Timeout("drain report")),
        }
    } else {
        None
    };

    Ok(Outcome::Connectivity {
        reachable,
        changed,
        drain,
    })
}

async fn submit(buffer: &RequestBuffer, label: &str, failures: u32) -> Outcome {
    match buffer
        .submit_named(label, simulated(label.to_string(), failures))
        .await
    {
        Ok(Submission::Queued(id)) => Outcome::Queued { id },
        Ok(Submission::Completed(())) => Outcome::Ran {
            ok: true,
            error: None,
        },
        Err(error) => Outcome::Ran {
            ok: false,
            error: Some(error),
        },
    }
}

/// An operation that fails its first `failures` invocations.
fn simulated(
    label: String,
    failures: u32,
) -> impl Fn() -> Ready<std::result::Result<(), String>> + Send + Sync + 'static {
    let calls = AtomicU32::new(0);
    move || {
        let call = calls.fetch_add(1, Ordering::SeqCst).saturating_add(1);
        if call <= failures {
            future::ready(Err(format!("{label}: simulated failure {call}")))
        } else {
            future::ready(Ok(()))
        }
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
