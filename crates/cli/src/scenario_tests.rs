// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use reqbuf_core::RetryPolicy;
use tempfile::TempDir;
use yare::parameterized;

const BASIC: &str = r#"
reachable = false

[[steps]]
action = "submit"
label = "save-draft"
fail_times = 1

[[steps]]
action = "online"
"#;

#[test]
fn parses_basic_scenario() {
    let scenario = Scenario::from_toml_str(BASIC).unwrap();

    assert!(!scenario.reachable);
    assert_eq!(scenario.buffer, None);
    assert_eq!(
        scenario.steps,
        vec![
            Step::Submit {
                label: "save-draft".into(),
                fail_times: 1,
                always_fail: false,
            },
            Step::Online,
        ]
    );
}

#[test]
fn reachable_defaults_to_true() {
    let scenario = Scenario::from_toml_str("[[steps]]\naction = \"offline\"\n").unwrap();
    assert!(scenario.reachable);
}

#[test]
fn parses_embedded_buffer_config() {
    let scenario = Scenario::from_toml_str(
        r#"
[buffer.retry]
policy = "single-attempt"

[[steps]]
action = "drain"
"#,
    )
    .unwrap();

    assert_eq!(scenario.buffer.unwrap().retry, RetryPolicy::SingleAttempt);
}

#[parameterized(
    no_steps = { "steps = []\n", "no steps" },
    empty_label = { "[[steps]]\naction = \"submit\"\nlabel = \" \"\n", "label cannot be empty" },
    both_failure_modes = {
        "[[steps]]\naction = \"submit\"\nlabel = \"x\"\nfail_times = 2\nalways_fail = true\n",
        "not both"
    },
)]
fn rejects_invalid_scenarios(content: &str, expected: &str) {
    let err = Scenario::from_toml_str(content).unwrap_err();
    assert!(matches!(err, Error::InvalidScenario(_)));
    assert!(err.to_string().contains(expected));
}

#[parameterized(
    unknown_action = { "[[steps]]\naction = \"reboot\"\n" },
    missing_label = { "[[steps]]\naction = \"submit\"\n" },
    missing_steps = { "reachable = true\n" },
)]
fn rejects_malformed_scenarios(content: &str) {
    let err = Scenario::from_toml_str(content).unwrap_err();
    assert!(matches!(err, Error::ScenarioParse(_)));
}

#[test]
fn rejects_invalid_embedded_config() {
    let err = Scenario::from_toml_str("[buffer]\nreport_capacity = 0\n\n[[steps]]\naction = \"online\"\n")
        .unwrap_err();
    assert!(matches!(err, Error::Buffer(_)));
}

#[parameterized(
    online = { Step::Online, 0 },
    retry_once = { Step::Submit { label: "a".into(), fail_times: 2, always_fail: false }, 2 },
    always = { Step::Submit { label: "a".into(), fail_times: 0, always_fail: true }, u32::MAX },
)]
fn step_failures(step: Step, expected: u32) {
    assert_eq!(step.failures(), expected);
}

#[test]
fn step_display() {
    let submit = Step::Submit {
        label: "upload".into(),
        fail_times: 0,
        always_fail: false,
    };
    assert_eq!(submit.to_string(), "submit upload");
    assert_eq!(Step::Online.to_string(), "online");
}

#[test]
fn load_reports_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = Scenario::load(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, Error::Read { .. }));
}

#[test]
fn load_reads_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scenario.toml");
    std::fs::write(&path, BASIC).unwrap();
    assert_eq!(Scenario::load(&path).unwrap().steps.len(), 2);
}
