//! # CLI Configuration
//!
//! Supplies the seller identity and invoice defaults to every command.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --seller-name "..." --tax-id 314265267200003                       │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     ZATCA_SELLER_NAME, ZATCA_TAX_ID, ZATCA_VAT_RATE                    │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config <path>, or the platform config dir:                       │
//! │     ~/.config/zatca-qr/config.toml (Linux)                             │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     no seller identity, 15% VAT                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [seller]
//! name = "Test Co"
//! tax_id = "314265267200003"
//!
//! [invoice]
//! vat_rate_bps = 1500
//! ```
//!
//! The seller identity is read-only after loading and is handed to the codec
//! explicitly on each call.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use zatca_core::{QrError, SellerIdentity, TaxRate};

use crate::error::{CliError, CliResult};

pub const ENV_SELLER_NAME: &str = "ZATCA_SELLER_NAME";
pub const ENV_TAX_ID: &str = "ZATCA_TAX_ID";
pub const ENV_VAT_RATE: &str = "ZATCA_VAT_RATE";

// =============================================================================
// Sections
// =============================================================================

/// `[seller]` section: values for tags 1 and 2.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerSettings {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub tax_id: String,
}

/// `[invoice]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSettings {
    /// VAT rate used by `encode --net`, in basis points (1500 = 15%).
    #[serde(default = "default_vat_rate_bps")]
    pub vat_rate_bps: u32,
}

fn default_vat_rate_bps() -> u32 {
    TaxRate::STANDARD_VAT.bps()
}

impl Default for InvoiceSettings {
    fn default() -> Self {
        InvoiceSettings {
            vat_rate_bps: default_vat_rate_bps(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrConfig {
    #[serde(default)]
    pub seller: SellerSettings,

    #[serde(default)]
    pub invoice: InvoiceSettings,
}

impl QrConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file
    /// 3. Environment variables
    ///
    /// A missing file is not an error; a file that does not parse is.
    pub fn load(config_path: Option<PathBuf>) -> CliResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document.
    pub fn from_toml(contents: &str) -> CliResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Saves configuration as pretty TOML and returns the path written.
    pub fn save(&self, config_path: Option<PathBuf>) -> CliResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| CliError::Config("no config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(path)
    }

    /// Checks values that do not depend on which command runs.
    pub fn validate(&self) -> CliResult<()> {
        if self.invoice.vat_rate_bps > 10000 {
            return Err(CliError::Config(format!(
                "vat_rate_bps must be between 0 and 10000, got {}",
                self.invoice.vat_rate_bps
            )));
        }

        Ok(())
    }

    /// Applies overrides from a key lookup (the process environment in
    /// production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup(ENV_SELLER_NAME) {
            debug!("Overriding seller name from environment");
            self.seller.name = name;
        }

        if let Some(tax_id) = lookup(ENV_TAX_ID) {
            debug!("Overriding VAT number from environment");
            self.seller.tax_id = tax_id;
        }

        if let Some(rate) = lookup(ENV_VAT_RATE) {
            match rate.trim().parse::<f64>() {
                Ok(pct) if pct >= 0.0 => {
                    self.invoice.vat_rate_bps = TaxRate::from_percentage(pct).bps();
                }
                _ => warn!(rate = %rate, "Ignoring invalid VAT rate in environment"),
            }
        }
    }

    /// Validates and returns the seller identity.
    ///
    /// Unset values are reported as configuration errors; set but invalid
    /// values surface the codec's own validation error.
    pub fn seller_identity(&self) -> CliResult<SellerIdentity> {
        if self.seller.name.trim().is_empty() {
            return Err(CliError::Config(format!(
                "seller name is not set (use [seller] name, {} or --seller-name)",
                ENV_SELLER_NAME
            )));
        }
        if self.seller.tax_id.trim().is_empty() {
            return Err(CliError::Config(format!(
                "VAT registration number is not set (use [seller] tax_id, {} or --tax-id)",
                ENV_TAX_ID
            )));
        }

        SellerIdentity::new(&self.seller.name, &self.seller.tax_id)
            .map_err(|err| CliError::Qr(QrError::Validation(err)))
    }

    /// Returns the configured VAT rate.
    pub fn vat_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.invoice.vat_rate_bps)
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "zatca", "zatca-qr")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use zatca_core::ValidationError;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = QrConfig::default();
        assert!(config.seller.name.is_empty());
        assert_eq!(config.vat_rate(), TaxRate::STANDARD_VAT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let config = QrConfig::from_toml(
            r#"
            [seller]
            name = "مؤسسة وثبة العز"
            tax_id = "314-265-267-200-003"
            "#,
        )
        .unwrap();

        assert_eq!(config.invoice.vat_rate_bps, 1500);
        let seller = config.seller_identity().unwrap();
        assert_eq!(seller.name, "مؤسسة وثبة العز");
        assert_eq!(seller.tax_id, "314265267200003");
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = QrConfig::from_toml("[seller\nname = 1").unwrap_err();
        assert!(matches!(err, CliError::TomlParse(_)));
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = QrConfig::from_toml(
            r#"
            [seller]
            name = "File Co"
            tax_id = "314265267200003"
            "#,
        )
        .unwrap();

        config.apply_overrides(lookup_from(&[
            (ENV_SELLER_NAME, "Env Co"),
            (ENV_VAT_RATE, "5"),
        ]));

        assert_eq!(config.seller.name, "Env Co");
        assert_eq!(config.seller.tax_id, "314265267200003");
        assert_eq!(config.invoice.vat_rate_bps, 500);
    }

    #[test]
    fn test_invalid_vat_override_is_ignored() {
        let mut config = QrConfig::default();
        config.apply_overrides(lookup_from(&[(ENV_VAT_RATE, "fifteen")]));
        assert_eq!(config.invoice.vat_rate_bps, 1500);

        config.apply_overrides(lookup_from(&[(ENV_VAT_RATE, "-3")]));
        assert_eq!(config.invoice.vat_rate_bps, 1500);
    }

    #[test]
    fn test_validation() {
        let mut config = QrConfig::default();
        config.invoice.vat_rate_bps = 10001;
        assert!(matches!(config.validate(), Err(CliError::Config(_))));
    }

    #[test]
    fn test_seller_identity_errors() {
        let config = QrConfig::default();
        assert!(matches!(config.seller_identity(), Err(CliError::Config(_))));

        let mut config = QrConfig::default();
        config.seller.name = "Test Co".into();
        config.seller.tax_id = "123".into();
        assert!(matches!(
            config.seller_identity(),
            Err(CliError::Qr(QrError::Validation(ValidationError::BadTaxId { .. })))
        ));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("zatca-qr-config-{}", std::process::id()));
        let path = dir.join("config.toml");

        let mut config = QrConfig::default();
        config.seller.name = "Test Co".into();
        config.seller.tax_id = "314265267200003".into();

        let written = config.save(Some(path.clone())).unwrap();
        assert_eq!(written, path);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[seller]"));
        assert_eq!(QrConfig::from_toml(&contents).unwrap(), config);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
