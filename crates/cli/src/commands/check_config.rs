// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use reqbuf_core::BufferConfig;

use crate::error::Result;

pub fn run(path: &Path) -> Result<()> {
    let config = BufferConfig::load(path)?;
    print!("{}", format_summary(path, &config));
    Ok(())
}

pub(crate) fn format_summary(path: &Path, config: &BufferConfig) -> String {
    let timeout = config
        .operation_timeout()
        .map(|limit| format!("{}ms", limit.as_millis()))
        .unwrap_or_else(|| "none".to_string());
    format!(
        "{}: ok\n  retry: {}\n  operation timeout: {}\n  report capacity: {}\n",
        path.display(),
        config.retry,
        timeout,
        config.report_capacity
    )
}

#[cfg(test)]
#[path = "check_config_tests.rs"]
mod tests;
