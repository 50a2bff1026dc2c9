//! Command-line front ends for the `fepbench` library.
//!
//! Each tool is a separate binary under `src/bin/`; this library holds their argument
//! definitions, configuration merging, logging setup and command bodies.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;

use crate::error::Result;
use tracing::{error, info};

/// Runs a command body and turns its outcome into the process exit status.
pub fn finish(tool: &str, result: Result<()>) {
    match result {
        Ok(()) => info!("{} completed successfully.", tool),
        Err(e) => {
            error!("{} failed: {}", tool, e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
