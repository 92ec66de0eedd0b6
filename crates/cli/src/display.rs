// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt::Write;

use reqbuf_core::{BufferView, Diagnostic, PendingRequest};

use crate::error::Result;
use crate::runner::{Outcome, StepRecord, Transcript};

/// Renders a transcript as one block per step followed by a summary line.
pub fn format_transcript(transcript: &Transcript) -> String {
    let mut out = String::new();
    for record in &transcript.steps {
        out.push_str(&format_step(record));
    }
    out.push_str(&format_final(&transcript.final_view));
    out
}

/// Pretty-printed JSON of the whole transcript.
pub fn format_transcript_json(transcript: &Transcript) -> Result<String> {
    Ok(serde_json::to_string_pretty(transcript)?)
}

pub fn format_step(record: &StepRecord) -> String {
    let mut out = format!(
        "[{}] {} -> {}\n",
        record.index,
        record.step,
        format_outcome(&record.outcome)
    );
    for diagnostic in &record.diagnostics {
        let _ = writeln!(out, "    warning: {}", format_diagnostic(diagnostic));
    }
    let _ = writeln!(out, "    pending: {}", format_pending(&record.pending));
    out
}

pub fn format_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Queued { id } => format!("queued {id}"),
        Outcome::Ran { ok: true, .. } => "ok".to_string(),
        Outcome::Ran { error, .. } => {
            format!("failed: {}", error.as_deref().unwrap_or("unknown error"))
        }
        Outcome::Connectivity { changed: false, .. } => "no change".to_string(),
        Outcome::Connectivity {
            drain: Some(report),
            ..
        } => format!("drained: {report}"),
        Outcome::Connectivity { reachable, .. } => reachability(*reachable).to_string(),
        Outcome::Drained { report } if report.is_empty() => "nothing to drain".to_string(),
        Outcome::Drained { report } => format!("drained: {report}"),
    }
}

/// `label#id: message (error)`
pub fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    format!(
        "{}{}: {} ({})",
        diagnostic.label().unwrap_or("request"),
        diagnostic.id(),
        diagnostic,
        diagnostic.error()
    )
}

pub fn format_pending(pending: &[PendingRequest]) -> String {
    if pending.is_empty() {
        return "(none)".to_string();
    }
    pending
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_final(view: &BufferView) -> String {
    let mut out = format!(
        "final: {}, {} pending\n",
        reachability(view.reachable),
        view.pending.len()
    );
    if !view.pending.is_empty() {
        let _ = writeln!(out, "    pending: {}", format_pending(&view.pending));
    }
    out
}

fn reachability(reachable: bool) -> &'static str {
    if reachable {
        "reachable"
    } else {
        "unreachable"
    }
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
