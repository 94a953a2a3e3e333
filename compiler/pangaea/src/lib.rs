//! The Pangaea command-line driver.
//!
//! Thin layer over `pangaea_eval`: it reads scripts, renders syntax errors
//! with source snippets, runs the REPL and the parallel `*.pg` test runner.

pub mod commands;
pub mod diagnostic;
pub mod error;
pub mod tracing_setup;

pub use error::CliError;

/// Version printed by `pangaea -v`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
