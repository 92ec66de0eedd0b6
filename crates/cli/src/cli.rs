// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand};

const QUICKSTART_HELP: &str = "\
Get started:
  reqbuf simulate scenario.toml            Replay a scripted scenario
  reqbuf simulate scenario.toml --json     Same, as JSON
  reqbuf check-config buffer.toml          Validate buffer settings";

#[derive(Parser)]
#[command(name = "reqbuf")]
#[command(about = "Exercise an offline request buffer with scripted connectivity")]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a scenario against a fresh buffer and print what happened
    Simulate {
        /// Scenario file (TOML)
        scenario: PathBuf,

        /// Buffer config file (defaults to $REQBUF_CONFIG, then the
        /// scenario's [buffer] table)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Print the transcript as JSON
        #[arg(long)]
        json: bool,

        /// Log buffer activity to stderr
        #[arg(long, short = 'v')]
        verbose: bool,
    },

    /// Validate a buffer config file and print the effective settings
    #[command(name = "check-config")]
    CheckConfig {
        /// Buffer config file (TOML)
        path: PathBuf,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
