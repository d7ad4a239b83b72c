//! # zatca-cli
//!
//! Library half of the `zatca-qr` binary. `main.rs` only initialises tracing
//! and reports errors; parsing, dispatch and every command live here so they
//! can be unit tested.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use config::QrConfig;
pub use error::{CliError, CliResult};
