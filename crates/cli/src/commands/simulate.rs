// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use reqbuf_core::BufferConfig;
use tracing::debug;

use crate::display::{format_transcript, format_transcript_json};
use crate::env;
use crate::error::Result;
use crate::runner;
use crate::scenario::Scenario;

pub fn run(scenario_path: &Path, config_path: Option<PathBuf>, json: bool) -> Result<()> {
    let scenario = Scenario::load(scenario_path)?;
    let config = resolve_config(config_path, env::config_path(), scenario.buffer.clone())?;
    debug!(policy = %config.retry, steps = scenario.steps.len(), "starting simulation");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let transcript = runtime.block_on(runner::run(&scenario, config))?;

    if json {
        println!("{}", format_transcript_json(&transcript)?);
    } else {
        print!("{}", format_transcript(&transcript));
    }
    Ok(())
}

/// Picks the buffer config: `--config`, then `REQBUF_CONFIG`, then the
/// scenario's own `[buffer]` table, then defaults.
pub(crate) fn resolve_config(
    flag: Option<PathBuf>,
    env: Option<PathBuf>,
    embedded: Option<BufferConfig>,
) -> Result<BufferConfig> {
    if let Some(path) = flag.or(env) {
        return Ok(BufferConfig::load(&path)?);
    }
    Ok(embedded.unwrap_or_default())
}

#[cfg(test)]
#[path = "simulate_tests.rs"]
mod tests;
