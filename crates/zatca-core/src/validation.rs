//! # Validation Module
//!
//! One pure validation/normalization function per payload field type.
//!
//! ## Field Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Tag │ Field          │ Rule                        │ Error           │
//! │  ────┼────────────────┼─────────────────────────────┼──────────────── │
//! │   1  │ Seller Name    │ non-empty after trim        │ EmptyName       │
//! │   2  │ VAT Number     │ 15 ASCII digits after       │ BadTaxId        │
//! │      │                │ removing spaces and dashes  │                 │
//! │   3  │ Timestamp      │ exactly YYYY-MM-DDTHH:MM:SS │ BadTimestamp    │
//! │   4  │ Total Amount   │ non-negative, 2 decimals    │ BadAmount       │
//! │   5  │ VAT Amount     │ non-negative, 2 decimals    │ BadAmount       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The 255-byte ceiling on field values is enforced by the encoder, not here.
//!
//! ## Usage
//! ```rust
//! use zatca_core::validation::{validate_tax_id, validate_timestamp};
//!
//! assert_eq!(validate_tax_id("314 265 267 200 003").unwrap(), "314265267200003");
//! assert!(validate_timestamp("2024-01-15T10:30:45Z").is_err());
//! ```

use chrono::{NaiveDateTime, Timelike};

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::FieldTag;

/// Number of digits in a VAT registration number.
pub const TAX_ID_DIGITS: usize = 15;

/// chrono format matching the wire timestamp shape.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// =============================================================================
// Text Validators
// =============================================================================

/// Validates the seller name (tag 1).
///
/// ## Returns
/// The trimmed name.
pub fn validate_seller_name(raw: &str) -> ValidationResult<String> {
    let name = raw.trim();

    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    Ok(name.to_string())
}

/// Validates a VAT registration number (tag 2).
///
/// ## Rules
/// - Whitespace and dashes are removed first
/// - What remains must be exactly 15 ASCII digits
///
/// ## Example
/// ```rust
/// use zatca_core::validation::validate_tax_id;
///
/// assert_eq!(validate_tax_id("314-265-267-200-003").unwrap(), "314265267200003");
/// assert!(validate_tax_id("31426526720000").is_err());   // 14 digits
/// assert!(validate_tax_id("3142652672000034").is_err()); // 16 digits
/// ```
pub fn validate_tax_id(raw: &str) -> ValidationResult<String> {
    let digits = strip_tax_id_separators(raw);

    if digits.len() != TAX_ID_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::BadTaxId {
            value: raw.to_string(),
        });
    }

    Ok(digits)
}

/// Removes the separators people type into VAT numbers.
pub(crate) fn strip_tax_id_separators(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// Validates an issuance timestamp (tag 3).
///
/// ## Rules
/// - Exactly 19 characters shaped `YYYY-MM-DDTHH:MM:SS`
/// - No timezone suffix, no fractional seconds, no other separators
/// - Must be a real date and time (no month 13, no February 30, no second 60)
///
/// ## Example
/// ```rust
/// use zatca_core::validation::validate_timestamp;
///
/// assert!(validate_timestamp("2024-01-15T10:30:45").is_ok());
/// assert!(validate_timestamp("2024-01-15T10:30").is_err());
/// assert!(validate_timestamp("2024-01-15 10:30:45").is_err());
/// assert!(validate_timestamp("2024-13-15T10:30:45").is_err());
/// ```
pub fn validate_timestamp(raw: &str) -> ValidationResult<String> {
    let bad = || ValidationError::BadTimestamp {
        value: raw.to_string(),
    };

    if !has_timestamp_shape(raw) {
        return Err(bad());
    }

    let parsed = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|_| bad())?;

    // chrono reads second 60 as a leap second; the wire format allows 00..59
    if parsed.nanosecond() >= 1_000_000_000 {
        return Err(bad());
    }

    Ok(raw.to_string())
}

/// Checks the fixed character layout; chrono alone accepts single-digit fields.
fn has_timestamp_shape(raw: &str) -> bool {
    const PATTERN: &[u8; 19] = b"dddd-dd-ddTdd:dd:dd";

    let bytes = raw.as_bytes();
    bytes.len() == PATTERN.len()
        && bytes.iter().zip(PATTERN).all(|(&b, &p)| match p {
            b'd' => b.is_ascii_digit(),
            sep => b == sep,
        })
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates and normalizes an amount (tags 4 and 5).
///
/// ## Returns
/// The amount rendered with exactly two fractional digits, rounded half
/// away from zero (see [`Money::parse`]).
///
/// ## Example
/// ```rust
/// use zatca_core::validation::validate_amount;
/// use zatca_core::FieldTag;
///
/// assert_eq!(validate_amount(FieldTag::TotalAmount, "1234.5").unwrap(), "1234.50");
/// assert!(validate_amount(FieldTag::TaxAmount, "-0.01").is_err());
/// ```
pub fn validate_amount(field: FieldTag, raw: &str) -> ValidationResult<String> {
    Money::parse(field, raw).map(|money| money.to_string())
}

// =============================================================================
// Formatting Helpers
// =============================================================================

/// Formats a date-time in the exact wire shape, dropping sub-second precision.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use zatca_core::validation::format_timestamp;
///
/// let issued_at = NaiveDate::from_ymd_opt(2024, 1, 15)
///     .unwrap()
///     .and_hms_milli_opt(10, 30, 0, 750)
///     .unwrap();
/// assert_eq!(format_timestamp(issued_at), "2024-01-15T10:30:00");
/// ```
pub fn format_timestamp(dt: NaiveDateTime) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
