//! # Domain Types
//!
//! Types shared by the validator, encoder and decoder.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ SellerIdentity  │   │  InvoiceTotals  │   │ DecodedPayload  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name           │   │  total (Money)  │   │  seller_name    │       │
//! │  │  tax_id (15)    │   │  vat   (Money)  │   │  tax_id         │       │
//! │  └─────────────────┘   └─────────────────┘   │  timestamp      │       │
//! │                                              │  total_amount   │       │
//! │  ┌─────────────────┐   ┌─────────────────┐   │  tax_amount     │       │
//! │  │    FieldTag     │   │     TaxRate     │   └─────────────────┘       │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  1..=5, fixed   │   │  bps (u32)      │                             │
//! │  └─────────────────┘   │  1500 = 15%     │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Seller Identity Is Configuration
//! The seller name and tax registration number are owned by whoever creates
//! invoices and handed to every encode call. Nothing in this crate stores them.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{QrResult, ValidationResult};
use crate::money::Money;
use crate::validation::{format_timestamp, validate_seller_name, validate_tax_id};

// =============================================================================
// Field Tag
// =============================================================================

/// The five payload fields, in wire order.
///
/// Tag numbers are fixed by the regulator and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FieldTag {
    /// Tag 1: seller name (UTF-8, Arabic allowed).
    SellerName,
    /// Tag 2: VAT registration number (15 digits).
    TaxId,
    /// Tag 3: issuance date and time (`YYYY-MM-DDTHH:MM:SS`).
    Timestamp,
    /// Tag 4: invoice total including VAT.
    TotalAmount,
    /// Tag 5: VAT amount.
    TaxAmount,
}

impl FieldTag {
    /// All tags in the order they appear on the wire.
    pub const ALL: [FieldTag; 5] = [
        FieldTag::SellerName,
        FieldTag::TaxId,
        FieldTag::Timestamp,
        FieldTag::TotalAmount,
        FieldTag::TaxAmount,
    ];

    /// Returns the tag byte written before the length byte.
    #[inline]
    pub const fn byte(self) -> u8 {
        match self {
            FieldTag::SellerName => 1,
            FieldTag::TaxId => 2,
            FieldTag::Timestamp => 3,
            FieldTag::TotalAmount => 4,
            FieldTag::TaxAmount => 5,
        }
    }

    /// Maps a tag byte back to its field, if it is one of the five.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(FieldTag::SellerName),
            2 => Some(FieldTag::TaxId),
            3 => Some(FieldTag::Timestamp),
            4 => Some(FieldTag::TotalAmount),
            5 => Some(FieldTag::TaxAmount),
            _ => None,
        }
    }

    /// Human-readable field name.
    pub const fn label(self) -> &'static str {
        match self {
            FieldTag::SellerName => "Seller Name",
            FieldTag::TaxId => "VAT Registration Number",
            FieldTag::Timestamp => "Invoice Date & Time",
            FieldTag::TotalAmount => "Total Amount",
            FieldTag::TaxAmount => "VAT Amount",
        }
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag {} ({})", self.byte(), self.label())
    }
}

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so the Saudi standard VAT rate of 15% is 1500 bps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Standard Saudi VAT rate (15%).
    pub const STANDARD_VAT: TaxRate = TaxRate(1500);

    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::STANDARD_VAT
    }
}

// =============================================================================
// Seller Identity
// =============================================================================

/// Who issued the invoice: the values for tags 1 and 2.
///
/// Constructed once per process or request from configuration, then passed
/// into [`SellerIdentity::encode_invoice`] for every invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SellerIdentity {
    /// Trimmed seller name.
    pub name: String,

    /// 15-digit VAT registration number, separators removed.
    pub tax_id: String,
}

impl SellerIdentity {
    /// Validates and normalizes a seller identity.
    ///
    /// ## Example
    /// ```rust
    /// use zatca_core::SellerIdentity;
    ///
    /// let seller = SellerIdentity::new("  Test Co ", "314-265-267-200-003").unwrap();
    /// assert_eq!(seller.name, "Test Co");
    /// assert_eq!(seller.tax_id, "314265267200003");
    ///
    /// assert!(SellerIdentity::new("Test Co", "31426526720000").is_err());
    /// ```
    pub fn new(name: &str, tax_id: &str) -> ValidationResult<Self> {
        Ok(SellerIdentity {
            name: validate_seller_name(name)?,
            tax_id: validate_tax_id(tax_id)?,
        })
    }

    /// Encodes the QR payload for one invoice issued by this seller.
    ///
    /// ## User Workflow
    /// ```text
    /// Invoice finalized (totals computed)
    ///      │
    ///      ▼
    /// seller.encode_invoice(issued_at, &totals) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Base64 string stored on the invoice record
    ///      │
    ///      ▼
    /// Rendered as a QR image on the printed invoice
    /// ```
    pub fn encode_invoice(
        &self,
        issued_at: NaiveDateTime,
        totals: &InvoiceTotals,
    ) -> QrResult<String> {
        crate::payload::encode_payload(
            &self.name,
            &self.tax_id,
            &format_timestamp(issued_at),
            &totals.total.to_string(),
            &totals.vat.to_string(),
        )
    }
}

// =============================================================================
// Invoice Totals
// =============================================================================

/// The two monetary values carried by the payload (tags 4 and 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Total including VAT.
    pub total: Money,

    /// VAT portion of the total.
    pub vat: Money,
}

impl InvoiceTotals {
    pub const fn new(total: Money, vat: Money) -> Self {
        InvoiceTotals { total, vat }
    }

    /// Derives VAT-inclusive totals from a net (pre-VAT) amount.
    ///
    /// ## Example
    /// ```rust
    /// use zatca_core::{InvoiceTotals, Money, TaxRate};
    ///
    /// let totals = InvoiceTotals::from_net(Money::from_cents(100050), TaxRate::STANDARD_VAT);
    /// assert_eq!(totals.vat.cents(), 15008);   // 150.075 -> 150.08
    /// assert_eq!(totals.total.cents(), 115058);
    /// ```
    pub fn from_net(net: Money, rate: TaxRate) -> Self {
        let vat = net.calculate_tax(rate);
        InvoiceTotals {
            total: net + vat,
            vat,
        }
    }
}

// =============================================================================
// Decoded Payload
// =============================================================================

/// The five values recovered from a payload string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DecodedPayload {
    pub seller_name: String,
    pub tax_id: String,
    pub timestamp: String,
    pub total_amount: Money,
    pub tax_amount: Money,
}

impl DecodedPayload {
    /// Returns the text value of a field exactly as it sits on the wire.
    pub fn field_text(&self, tag: FieldTag) -> String {
        match tag {
            FieldTag::SellerName => self.seller_name.clone(),
            FieldTag::TaxId => self.tax_id.clone(),
            FieldTag::Timestamp => self.timestamp.clone(),
            FieldTag::TotalAmount => self.total_amount.to_string(),
            FieldTag::TaxAmount => self.tax_amount.to_string(),
        }
    }
}

// =============================================================================
// Verification
// =============================================================================

/// Values a stored payload is expected to carry.
///
/// Inputs are raw; they are normalized the same way the encoder normalizes
/// before comparison. `timestamp` is optional because callers frequently
/// only know the totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedFields {
    pub seller_name: String,
    pub tax_id: String,
    pub timestamp: Option<String>,
    pub total_amount: String,
    pub tax_amount: String,
}

/// One field whose decoded value differs from what was expected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldMismatch {
    pub tag: FieldTag,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for FieldMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} mismatch: expected '{}', got '{}'",
            self.tag, self.expected, self.actual
        )
    }
}

/// Outcome of comparing a payload against expected values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VerificationReport {
    pub mismatches: Vec<FieldMismatch>,
}

impl VerificationReport {
    /// True when every compared field matched.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.mismatches.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn test_tag_bytes_are_ordered() {
        let bytes: Vec<u8> = FieldTag::ALL.iter().map(|t| t.byte()).collect();
        assert_eq!(bytes, vec![1, 2, 3, 4, 5]);

        for tag in FieldTag::ALL {
            assert_eq!(FieldTag::from_byte(tag.byte()), Some(tag));
        }
        assert_eq!(FieldTag::from_byte(0), None);
        assert_eq!(FieldTag::from_byte(6), None);
    }

    #[test]
    fn test_tag_display() {
        assert_eq!(FieldTag::SellerName.to_string(), "Tag 1 (Seller Name)");
        assert_eq!(FieldTag::TaxAmount.to_string(), "Tag 5 (VAT Amount)");
    }

    #[test]
    fn test_seller_identity_rejects_bad_tax_id() {
        let err = SellerIdentity::new("Test Co", "31426526720000").unwrap_err();
        assert!(matches!(err, ValidationError::BadTaxId { .. }));

        let err = SellerIdentity::new("   ", "314265267200003").unwrap_err();
        assert_eq!(err, ValidationError::EmptyName);
    }

    #[test]
    fn test_totals_from_net() {
        let totals = InvoiceTotals::from_net(Money::from_cents(100000), TaxRate::STANDARD_VAT);
        assert_eq!(totals.vat.cents(), 15000);
        assert_eq!(totals.total.cents(), 115000);

        let zero_rated = InvoiceTotals::from_net(Money::from_cents(5000), TaxRate::from_bps(0));
        assert_eq!(zero_rated.vat, Money::zero());
        assert_eq!(zero_rated.total.cents(), 5000);
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        assert_eq!(TaxRate::from_percentage(15.0), TaxRate::STANDARD_VAT);
        assert_eq!(TaxRate::from_percentage(8.25).bps(), 825);
    }

    #[test]
    fn test_mismatch_display() {
        let mismatch = FieldMismatch {
            tag: FieldTag::TotalAmount,
            expected: "1150.50".to_string(),
            actual: "1150.00".to_string(),
        };
        assert_eq!(
            mismatch.to_string(),
            "Tag 4 (Total Amount) mismatch: expected '1150.50', got '1150.00'"
        );
    }

    #[test]
    fn test_decoded_payload_serializes_to_json() {
        let decoded = DecodedPayload {
            seller_name: "Test Co".to_string(),
            tax_id: "314265267200003".to_string(),
            timestamp: "2024-01-15T10:30:00".to_string(),
            total_amount: Money::from_cents(115050),
            tax_amount: Money::from_cents(15000),
        };
        let json = serde_json::to_value(&decoded).unwrap();
        assert_eq!(json["seller_name"], "Test Co");
        assert_eq!(json["total_amount"], "1150.50");
        assert_eq!(decoded.field_text(FieldTag::TaxAmount), "150.00");
    }
}
