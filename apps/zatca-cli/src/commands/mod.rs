//! # CLI Commands Module
//!
//! One module per `zatca-qr` subcommand.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (shared helpers)
//! ├── encode.rs   ◄─── Build a payload from seller identity + totals
//! ├── decode.rs   ◄─── Show the fields (or raw triplets) of a payload
//! ├── verify.rs   ◄─── Compare a stored payload against expected values
//! └── config.rs   ◄─── Show or create the config file
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cli::run                                                               │
//! │  ────────                                                               │
//! │  Cli ──► QrConfig::load(--config) ──► commands::X::execute()            │
//! │          (skipped for decode)                                           │
//! │                                                       │                 │
//! │                                                       ▼                 │
//! │                                   Ok(output: Serialize + Display)       │
//! │                                                       │                 │
//! │                            --json ? serde_json : Display ──► stdout     │
//! │                                                                         │
//! │  Err(CliError) ──► stderr, exit code from CliError::exit_code()         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands never print; they return values so tests can inspect them.

pub mod config;
pub mod decode;
pub mod encode;
pub mod verify;

use zatca_core::SellerIdentity;

use crate::config::QrConfig;
use crate::error::CliResult;

/// Resolves the seller identity, letting command-line flags win over the
/// loaded configuration.
pub fn resolve_seller(
    config: &QrConfig,
    seller_name: Option<&str>,
    tax_id: Option<&str>,
) -> CliResult<SellerIdentity> {
    let mut config = config.clone();
    if let Some(name) = seller_name {
        config.seller.name = name.to_string();
    }
    if let Some(tax_id) = tax_id {
        config.seller.tax_id = tax_id.to_string();
    }
    config.seller_identity()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    fn configured() -> QrConfig {
        let mut config = QrConfig::default();
        config.seller.name = "File Co".into();
        config.seller.tax_id = "314265267200003".into();
        config
    }

    #[test]
    fn test_flags_override_config() {
        let seller = resolve_seller(&configured(), Some("Flag Co"), None).unwrap();
        assert_eq!(seller.name, "Flag Co");
        assert_eq!(seller.tax_id, "314265267200003");
    }

    #[test]
    fn test_config_used_without_flags() {
        let seller = resolve_seller(&configured(), None, None).unwrap();
        assert_eq!(seller.name, "File Co");
    }

    #[test]
    fn test_flags_alone_are_enough() {
        let seller =
            resolve_seller(&QrConfig::default(), Some("Test Co"), Some("314265267200003")).unwrap();
        assert_eq!(seller.name, "Test Co");

        let err = resolve_seller(&QrConfig::default(), Some("Test Co"), None).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
