//! # Encode Command
//!
//! `zatca-qr encode` builds the payload string for one invoice.
//!
//! ```text
//! zatca-qr encode --total 1150.50 --vat 150.00 --timestamp 2024-01-15T10:30:00
//! zatca-qr encode --net 1000.50                 # VAT at the configured rate
//! zatca-qr encode --net 1000 --vat-rate 5
//! ```
//!
//! Without `--timestamp` the current local time is used.

use std::fmt;

use chrono::Local;
use clap::Args;
use serde::Serialize;
use tracing::info;
use zatca_core::validation::format_timestamp;
use zatca_core::{
    decode_payload, encode_payload, DecodedPayload, FieldTag, InvoiceTotals, Money, QrError,
    TaxRate,
};

use super::resolve_seller;
use crate::config::QrConfig;
use crate::error::{CliError, CliResult};

#[derive(Args, Debug, Clone, Default)]
pub struct EncodeArgs {
    #[arg(long, help = "Invoice total including VAT, e.g. 1150.50")]
    pub total: Option<String>,

    #[arg(long, help = "VAT portion of the total, e.g. 150.00")]
    pub vat: Option<String>,

    #[arg(
        long,
        conflicts_with_all = ["total", "vat"],
        help = "Net (pre-VAT) amount; total and VAT are derived from it"
    )]
    pub net: Option<String>,

    #[arg(
        long,
        requires = "net",
        help = "VAT rate in percent for --net (defaults to the configured rate)"
    )]
    pub vat_rate: Option<f64>,

    #[arg(long, help = "Invoice time as YYYY-MM-DDTHH:MM:SS (default: now)")]
    pub timestamp: Option<String>,

    #[arg(long, help = "Seller name (overrides config)")]
    pub seller_name: Option<String>,

    #[arg(long, help = "15-digit VAT registration number (overrides config)")]
    pub tax_id: Option<String>,
}

/// The payload plus the values it carries, as they sit on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct EncodeOutput {
    pub payload: String,
    pub fields: DecodedPayload,
}

impl fmt::Display for EncodeOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.payload)
    }
}

pub fn execute(args: &EncodeArgs, config: &QrConfig) -> CliResult<EncodeOutput> {
    let seller = resolve_seller(config, args.seller_name.as_deref(), args.tax_id.as_deref())?;

    let timestamp = match &args.timestamp {
        Some(timestamp) => timestamp.clone(),
        None => format_timestamp(Local::now().naive_local()),
    };

    let (total, vat) = resolve_totals(args, config)?;

    let payload = encode_payload(&seller.name, &seller.tax_id, &timestamp, &total, &vat)?;
    let fields = decode_payload(&payload).map_err(QrError::from)?;

    info!(
        total = %fields.total_amount,
        vat = %fields.tax_amount,
        "Encoded invoice QR payload"
    );

    Ok(EncodeOutput { payload, fields })
}

/// Picks the amount strings for tags 4 and 5.
///
/// Explicit totals are passed through untouched so the codec reports any
/// problem against the right field.
fn resolve_totals(args: &EncodeArgs, config: &QrConfig) -> CliResult<(String, String)> {
    match (&args.total, &args.vat, &args.net) {
        (Some(total), Some(vat), None) => Ok((total.clone(), vat.clone())),
        (None, None, Some(net)) => {
            let net = Money::parse(FieldTag::TotalAmount, net).map_err(QrError::from)?;
            let rate = match args.vat_rate {
                Some(pct) if (0.0..=100.0).contains(&pct) => TaxRate::from_percentage(pct),
                Some(pct) => {
                    return Err(CliError::InvalidArguments(format!(
                        "--vat-rate must be between 0 and 100, got {pct}"
                    )))
                }
                None => config.vat_rate(),
            };
            let totals = InvoiceTotals::from_net(net, rate);
            Ok((totals.total.to_string(), totals.vat.to_string()))
        }
        _ => Err(CliError::InvalidArguments(
            "provide --total and --vat together, or --net alone".into(),
        )),
    }
}
