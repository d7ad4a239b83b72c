//! # Verify Command
//!
//! `zatca-qr verify <payload> --total X --vat Y` checks a stored payload
//! against the values the invoice should carry. Seller values default to
//! the configured identity.
//!
//! A payload that decodes but differs is reported field by field and the
//! process exits with status 1.

use std::fmt;

use clap::Args;
use serde::Serialize;
use tracing::warn;
use zatca_core::{verify_payload_report, ExpectedFields, FieldMismatch};

use super::resolve_seller;
use crate::config::QrConfig;
use crate::error::{CliError, CliResult};

#[derive(Args, Debug, Clone, Default)]
pub struct VerifyArgs {
    #[arg(help = "Base64 payload string")]
    pub payload: String,

    #[arg(long, help = "Expected total including VAT")]
    pub total: String,

    #[arg(long, help = "Expected VAT amount")]
    pub vat: String,

    #[arg(long, help = "Expected invoice time (not compared when omitted)")]
    pub timestamp: Option<String>,

    #[arg(long, help = "Expected seller name (overrides config)")]
    pub seller_name: Option<String>,

    #[arg(long, help = "Expected VAT registration number (overrides config)")]
    pub tax_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyOutput {
    pub valid: bool,
    pub mismatches: Vec<FieldMismatch>,
}

impl VerifyOutput {
    /// Turns a failed comparison into the command's error.
    pub fn ensure_valid(&self) -> CliResult<()> {
        if self.valid {
            Ok(())
        } else {
            Err(CliError::VerificationFailed {
                mismatches: self.mismatches.len(),
            })
        }
    }
}

impl fmt::Display for VerifyOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            return write!(f, "OK: payload matches the expected values");
        }

        write!(f, "MISMATCH:")?;
        for mismatch in &self.mismatches {
            write!(f, "\n  {}", mismatch)?;
        }
        Ok(())
    }
}

pub fn execute(args: &VerifyArgs, config: &QrConfig) -> CliResult<VerifyOutput> {
    let seller = resolve_seller(config, args.seller_name.as_deref(), args.tax_id.as_deref())?;

    let expected = ExpectedFields {
        seller_name: seller.name,
        tax_id: seller.tax_id,
        timestamp: args.timestamp.clone(),
        total_amount: args.total.clone(),
        tax_amount: args.vat.clone(),
    };

    let report = verify_payload_report(args.payload.trim(), &expected)?;
    if !report.is_valid() {
        warn!(mismatches = report.mismatches.len(), "QR payload does not match invoice");
    }

    Ok(VerifyOutput {
        valid: report.is_valid(),
        mismatches: report.mismatches,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use zatca_core::FieldTag;

    const SCENARIO_PAYLOAD: &str =
        "AQdUZXN0IENvAg8zMTQyNjUyNjcyMDAwMDMDEzIwMjQtMDEtMTVUMTA6MzA6MDAEBzExNTAuNTAFBjE1MC4wMA==";

    fn config() -> QrConfig {
        let mut config = QrConfig::default();
        config.seller.name = "Test Co".into();
        config.seller.tax_id = "314265267200003".into();
        config
    }

    fn args(total: &str, vat: &str) -> VerifyArgs {
        VerifyArgs {
            payload: SCENARIO_PAYLOAD.into(),
            total: total.into(),
            vat: vat.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_matching_payload() {
        let output = execute(&args("1150.5", "150"), &config()).unwrap();
        assert!(output.valid);
        assert!(output.ensure_valid().is_ok());
        assert!(output.to_string().starts_with("OK"));
    }

    #[test]
    fn test_mismatch_is_reported_per_field() {
        let output = execute(&args("1150.50", "150.01"), &config()).unwrap();
        assert!(!output.valid);
        assert_eq!(output.mismatches.len(), 1);
        assert_eq!(output.mismatches[0].tag, FieldTag::TaxAmount);
        assert!(output.to_string().contains("expected '150.01', got '150.00'"));

        let err = output.ensure_valid().unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_timestamp_compared_when_given() {
        let mut verify = args("1150.50", "150.00");
        verify.timestamp = Some("2024-01-15T10:31:00".into());

        let output = execute(&verify, &config()).unwrap();
        assert_eq!(output.mismatches.len(), 1);
        assert_eq!(output.mismatches[0].tag, FieldTag::Timestamp);
    }

    #[test]
    fn test_seller_flag_overrides_config() {
        let mut verify = args("1150.50", "150.00");
        verify.seller_name = Some("Other Co".into());

        let output = execute(&verify, &config()).unwrap();
        assert_eq!(output.mismatches[0].tag, FieldTag::SellerName);
    }

    #[test]
    fn test_undecodable_payload_is_an_error() {
        let mut verify = args("1150.50", "150.00");
        verify.payload = "AQ==".into();

        let err = execute(&verify, &config()).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }
}
