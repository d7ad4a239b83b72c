//! # zatca-core: ZATCA Phase-1 QR Payload Codec
//!
//! This crate is the single canonical implementation of the QR payload
//! printed on simplified VAT invoices. It contains pure functions only.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Invoice System                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │        Invoice creation (totals, discount, VAT arithmetic)      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ SellerIdentity + totals                │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ zatca-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │validation │  │    tlv    │  │  payload  │  │   money   │  │   │
//! │  │   │ per-field │─►│  encoder  │─►│ encode    │  │  halalas  │  │   │
//! │  │   │  rules    │  │  reader   │  │ decode    │  │  rounding │  │   │
//! │  │   └───────────┘  └───────────┘  │ verify    │  └───────────┘  │   │
//! │  │                                 └───────────┘                 │   │
//! │  │   NO I/O • NO GLOBAL STATE • PURE FUNCTIONS                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Base64 string                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │      Invoice record (stores string) ──► QR image renderer       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`validation`] - Field rules (seller name, VAT number, timestamp, amounts)
//! - [`tlv`] - Tag-Length-Value encoder and stream reader
//! - [`payload`] - Encode / decode / verify the full five-field payload
//! - [`money`] - Integer amounts with a fixed rounding policy
//! - [`types`] - Field tags, seller identity, decoded payload, reports
//! - [`error`] - Typed errors
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use zatca_core::{decode_payload, InvoiceTotals, Money, SellerIdentity};
//!
//! // Seller identity comes from configuration, never from a constant
//! let seller = SellerIdentity::new("Test Co", "314265267200003").unwrap();
//!
//! let issued_at = NaiveDate::from_ymd_opt(2024, 1, 15)
//!     .unwrap()
//!     .and_hms_opt(10, 30, 0)
//!     .unwrap();
//! let totals = InvoiceTotals::new(Money::from_cents(115050), Money::from_cents(15000));
//!
//! let qr = seller.encode_invoice(issued_at, &totals).unwrap();
//!
//! let decoded = decode_payload(&qr).unwrap();
//! assert_eq!(decoded.timestamp, "2024-01-15T10:30:00");
//! assert_eq!(decoded.total_amount, totals.total);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod payload;
pub mod tlv;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{
    DecodingError, EncodingError, QrError, QrResult, ValidationError, ValidationResult,
};
pub use money::Money;
pub use payload::{decode_payload, decode_raw, encode_payload, verify_payload, verify_payload_report};
pub use types::*;
