// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use super::*;
use reqbuf_core::RetryPolicy;

fn scenario(toml: &str) -> Scenario {
    Scenario::from_toml_str(toml).unwrap()
}

async fn run_default(toml: &str) -> Transcript {
    run(&scenario(toml), BufferConfig::default()).await.unwrap()
}

fn drain_of(record: &StepRecord) -> Option<DrainReport> {
    match &record.outcome {
        Outcome::Connectivity { drain, .. } => drain.clone(),
        Outcome::Drained { report } => Some(report.clone()),
        other => panic!("not a drain step: {other:?}"),
    }
}

#[test]
fn simulated_fails_leading_invocations_then_succeeds() {
    let op = simulated("save".to_string(), 2);
    assert_eq!(
        op().into_inner(),
        Err("save: simulated failure 1".to_string())
    );
    assert_eq!(
        op().into_inner(),
        Err("save: simulated failure 2".to_string())
    );
    assert_eq!(op().into_inner(), Ok(()));
    assert_eq!(op().into_inner(), Ok(()));
}

#[tokio::test]
async fn submit_while_online_runs_inline() {
    let transcript = run_default(
        r#"
        steps = [
            { action = "submit", label = "ok" },
            { action = "submit", label = "bad", always_fail = true },
        ]
        "#,
    )
    .await;

    assert_eq!(
        transcript.steps[0].outcome,
        Outcome::Ran {
            ok: true,
            error: None
        }
    );
    assert_eq!(
        transcript.steps[1].outcome,
        Outcome::Ran {
            ok: false,
            error: Some("bad: simulated failure 1".to_string())
        }
    );
    assert!(transcript.final_view.pending.is_empty());
    assert_eq!(transcript.diagnostics().count(), 0);
}

#[tokio::test]
async fn offline_submissions_replay_on_reconnect() {
    let transcript = run_default(
        r#"
        reachable = false
        steps = [
            { action = "submit", label = "first" },
            { action = "submit", label = "second", fail_times = 1 },
            { action = "online" },
            { action = "offline" },
            { action = "online" },
        ]
        "#,
    )
    .await;

    assert_eq!(transcript.steps[0].outcome, Outcome::Queued { id: EntryId(1) });
    assert_eq!(transcript.steps[1].outcome, Outcome::Queued { id: EntryId(2) });
    assert_eq!(transcript.steps[1].pending.len(), 2);

    let first_edge = drain_of(&transcript.steps[2]).unwrap();
    assert_eq!(
        first_edge,
        DrainReport {
            attempted: 2,
            succeeded: 1,
            requeued: 1,
            dropped: 0
        }
    );
    let pending = &transcript.steps[2].pending;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].label.as_deref(), Some("second"));
    assert_eq!(pending[0].attempts, 1);
    assert!(matches!(
        transcript.steps[2].diagnostics.as_slice(),
        [Diagnostic::RetryScheduled { attempts: 1, .. }]
    ));

    let second_edge = drain_of(&transcript.steps[4]).unwrap();
    assert_eq!(second_edge.succeeded, 1);
    assert!(transcript.final_view.pending.is_empty());
    assert!(transcript.final_view.reachable);
}

#[tokio::test]
async fn always_failing_request_is_dropped_after_max_retries() {
    let transcript = run_default(
        r#"
        reachable = false
        steps = [
            { action = "submit", label = "doomed", always_fail = true },
            { action = "online" }, { action = "offline" },
            { action = "online" }, { action = "offline" },
            { action = "online" }, { action = "offline" },
            { action = "online" },
        ]
        "#,
    )
    .await;

    let drops: Vec<_> = transcript.diagnostics().filter(|d| d.is_drop()).collect();
    assert_eq!(drops.len(), 1);
    assert_eq!(
        drops[0].to_string(),
        "request dropped after 3 failed attempts"
    );
    assert_eq!(transcript.diagnostics().count(), 4);

    let last = transcript.steps.last().unwrap();
    assert_eq!(drain_of(last).unwrap().dropped, 1);
    assert!(transcript.final_view.pending.is_empty());
}

#[tokio::test]
async fn single_attempt_policy_drops_on_first_replay_failure() {
    let config = BufferConfig::with_policy(RetryPolicy::SingleAttempt);
    let transcript = run(
        &scenario(
            r#"
            reachable = false
            steps = [
                { action = "submit", label = "once", always_fail = true },
                { action = "online" },
            ]
            "#,
        ),
        config,
    )
    .await
    .unwrap();

    let edge = &transcript.steps[1];
    assert_eq!(drain_of(edge).unwrap().dropped, 1);
    assert!(matches!(
        edge.diagnostics.as_slice(),
        [Diagnostic::RetryFailed { .. }]
    ));
    assert!(edge.pending.is_empty());
}

#[tokio::test]
async fn repeated_online_is_not_an_edge() {
    let transcript = run_default(r#"steps = [{ action = "online" }]"#).await;

    assert_eq!(
        transcript.steps[0].outcome,
        Outcome::Connectivity {
            reachable: true,
            changed: false,
            drain: None
        }
    );
}

#[tokio::test]
async fn online_edge_with_empty_queue_reports_no_drain() {
    let transcript = run_default(
        r#"
        reachable = false
        steps = [{ action = "online" }]
        "#,
    )
    .await;

    assert_eq!(
        transcript.steps[0].outcome,
        Outcome::Connectivity {
            reachable: true,
            changed: true,
            drain: None
        }
    );
}

#[tokio::test]
async fn explicit_drain_replays_while_offline() {
    let transcript = run_default(
        r#"
        reachable = false
        steps = [
            { action = "submit", label = "a" },
            { action = "drain" },
            { action = "drain" },
        ]
        "#,
    )
    .await;

    assert_eq!(drain_of(&transcript.steps[1]).unwrap().succeeded, 1);
    assert!(drain_of(&transcript.steps[2]).unwrap().is_empty());
    assert!(!transcript.final_view.reachable);
}

#[tokio::test]
async fn transcript_serializes_with_final_view() {
    let transcript = run_default(
        r#"
        reachable = false
        steps = [{ action = "submit", label = "a" }]
        "#,
    )
    .await;

    let json = serde_json::to_value(&transcript).unwrap();
    assert_eq!(json["steps"][0]["step"]["action"], "submit");
    assert_eq!(json["steps"][0]["outcome"]["kind"], "queued");
    assert_eq!(json["steps"][0]["outcome"]["id"], 1);
    assert_eq!(json["final"]["reachable"], false);
    assert_eq!(json["final"]["pending"][0]["label"], "a");
}
