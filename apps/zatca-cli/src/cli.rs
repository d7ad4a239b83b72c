//! # Argument Parsing and Dispatch
//!
//! `Cli` is the clap definition of `zatca-qr`; [`run`] executes one parsed
//! invocation and writes its output.
//!
//! The config file is only read by commands that use it, so a broken
//! config never stops `decode`.

use std::fmt::Display;
use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use crate::commands::{self, config::ConfigCommand};
use crate::commands::decode::DecodeArgs;
use crate::commands::encode::EncodeArgs;
use crate::commands::verify::VerifyArgs;
use crate::config::QrConfig;
use crate::error::CliResult;

#[derive(Parser, Debug)]
#[command(author, version, about = "ZATCA QR payload tool", long_about = None)]
pub struct Cli {
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        help = "Path to the TOML configuration file"
    )]
    pub config_path: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase log verbosity (-v info, -vv debug)"
    )]
    pub verbose: u8,

    #[arg(long, global = true, help = "Print results and errors as JSON")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the QR payload for an invoice
    Encode(EncodeArgs),

    /// Show the fields carried by a payload
    Decode(DecodeArgs),

    /// Check a payload against expected invoice values
    Verify(VerifyArgs),

    /// Show or create the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

impl Cli {
    fn load_config(&self) -> CliResult<QrConfig> {
        let config = QrConfig::load(self.config_path.clone())?;
        debug!(?config, "Configuration loaded");
        Ok(config)
    }
}

/// Runs one invocation, writing command output to `out`.
pub fn run(cli: &Cli, out: &mut impl Write) -> CliResult<()> {
    match &cli.command {
        Commands::Encode(args) => {
            let config = cli.load_config()?;
            emit(out, &commands::encode::execute(args, &config)?, cli.json)
        }
        Commands::Decode(args) => emit(out, &commands::decode::execute(args)?, cli.json),
        Commands::Verify(args) => {
            let config = cli.load_config()?;
            let output = commands::verify::execute(args, &config)?;
            emit(out, &output, cli.json)?;
            output.ensure_valid()
        }
        Commands::Config { command } => {
            let config = cli.load_config()?;
            let output = commands::config::execute(command, &config, cli.config_path.clone())?;
            emit(out, &output, cli.json)
        }
    }
}

fn emit<T: Serialize + Display>(out: &mut impl Write, output: &T, json: bool) -> CliResult<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(output)?)?;
    } else {
        writeln!(out, "{}", output)?;
    }
    Ok(())
}
