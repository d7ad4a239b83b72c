//! # Config Command
//!
//! `zatca-qr config show` prints the effective configuration (file and
//! environment merged). `zatca-qr config init` writes a config file.

use std::fmt;
use std::path::PathBuf;

use clap::Subcommand;
use serde::Serialize;
use tracing::info;

use super::resolve_seller;
use crate::config::QrConfig;
use crate::error::{CliError, CliResult};

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write a config file with the given seller identity
    Init {
        #[arg(long, help = "Seller name")]
        seller_name: Option<String>,

        #[arg(long, help = "15-digit VAT registration number")]
        tax_id: Option<String>,

        #[arg(long, help = "Overwrite an existing file")]
        force: bool,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigOutput {
    pub path: Option<PathBuf>,
    pub config: QrConfig,
}

impl fmt::Display for ConfigOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => writeln!(f, "# {}", path.display())?,
            None => writeln!(f, "# (no config path)")?,
        }
        let body = toml::to_string_pretty(&self.config).map_err(|_| fmt::Error)?;
        write!(f, "{}", body.trim_end())
    }
}

pub fn execute(
    command: &ConfigCommand,
    config: &QrConfig,
    config_path: Option<PathBuf>,
) -> CliResult<ConfigOutput> {
    let path = config_path.or_else(QrConfig::default_config_path);

    match command {
        ConfigCommand::Show => Ok(ConfigOutput {
            path,
            config: config.clone(),
        }),
        ConfigCommand::Init {
            seller_name,
            tax_id,
            force,
        } => {
            let path = path.ok_or_else(|| CliError::Config("no config path available".into()))?;
            if path.exists() && !force {
                return Err(CliError::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }

            // Stored normalized, so the file is valid as written.
            let seller = resolve_seller(config, seller_name.as_deref(), tax_id.as_deref())?;
            let mut new_config = config.clone();
            new_config.seller.name = seller.name;
            new_config.seller.tax_id = seller.tax_id;

            let path = new_config.save(Some(path))?;
            info!(?path, "Config initialised");

            Ok(ConfigOutput {
                path: Some(path),
                config: new_config,
            })
        }
    }
}
