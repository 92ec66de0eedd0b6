// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// The simulator binary with a clean environment.
pub fn reqbuf() -> Command {
    let mut cmd = cargo_bin_cmd!("reqbuf");
    cmd.env_remove("REQBUF_LOG").env_remove("REQBUF_CONFIG");
    cmd
}

/// Writes `content` to `name` inside `dir` and returns the path.
pub fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Offline submit that fails once, then two reconnects.
pub const FLAKY_SCENARIO: &str = r#"
reachable = false

[[steps]]
action = "submit"
label = "save-draft"
fail_times = 1

[[steps]]
action = "online"

[[steps]]
action = "offline"

[[steps]]
action = "online"
"#;

/// An always-failing request replayed across four reconnects.
pub const DOOMED_SCENARIO: &str = r#"
reachable = false
steps = [
    { action = "submit", label = "upload", always_fail = true },
    { action = "online" }, { action = "offline" },
    { action = "online" }, { action = "offline" },
    { action = "online" }, { action = "offline" },
    { action = "online" },
]
"#;
