// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! reqbuf_cli - a simulator for the `reqbuf-core` request buffer.
//!
//! Scenarios script connectivity changes and submissions; the simulator runs
//! them against a real [`RequestBuffer`](reqbuf_core::RequestBuffer) and
//! prints what the buffer did after every step.
//!
//! ```rust,ignore
//! use reqbuf_cli::{runner, Scenario};
//!
//! let scenario = Scenario::load(Path::new("offline.toml"))?;
//! let transcript = runner::run(&scenario, BufferConfig::default()).await?;
//! ```

mod cli;
mod commands;
mod display;
mod logging;

pub mod env;
pub mod error;
pub mod runner;
pub mod scenario;

pub use cli::{Cli, Command};
pub use error::{Error, Result};
pub use scenario::{Scenario, Step};

/// Executes a parsed command.
pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Simulate {
            scenario,
            config,
            json,
            verbose,
        } => {
            logging::init(verbose);
            commands::simulate::run(&scenario, config, json)
        }
        Command::CheckConfig { path } => {
            logging::init(false);
            commands::check_config::run(&path)
        }
    }
}
