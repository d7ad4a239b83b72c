//! # zatca-qr
//!
//! Command-line front end for the ZATCA phase-1 QR payload codec.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           zatca-qr                                      │
//! │                                                                         │
//! │  args ──► command ──► QrConfig (file → env, when needed) ──► zatca-core │
//! │              │                                                          │
//! │              ▼                                                          │
//! │   stdout (text or --json), exit code                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Logs go to stderr so payloads on stdout can be piped.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use zatca_cli::cli::{self, Cli};
use zatca_cli::CliError;

fn main() -> ExitCode {
    let args = Cli::parse();
    init_tracing(args.verbose);

    match cli::run(&args, &mut std::io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, args.json);
            ExitCode::from(err.exit_code())
        }
    }
}

/// `RUST_LOG` wins over `-v` when set.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn report_error(err: &CliError, json: bool) {
    if json {
        if let Ok(text) = serde_json::to_string(&err.report()) {
            eprintln!("{}", text);
            return;
        }
    }
    eprintln!("error: {}", err);
}
