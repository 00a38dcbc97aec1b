//! # docfix CLI
//!
//! Command-line interface for batch Markdown post-processing.
//!
//! This binary provides human-friendly access to `docfix-core` functionality.
//! Run `docfix --help` for usage information.

mod cli;
pub mod ui;

use std::process::ExitCode;

fn main() -> ExitCode {
    cli::run()
}
