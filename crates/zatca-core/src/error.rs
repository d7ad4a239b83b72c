//! # Error Types
//!
//! Codec error types for zatca-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  QrError                                                               │
//! │  ├── ValidationError  - caller-correctable input problems              │
//! │  │     EmptyName | BadTaxId | BadTimestamp | BadAmount                 │
//! │  ├── EncodingError    - a value does not fit the single length byte    │
//! │  │     ValueTooLong                                                    │
//! │  └── DecodingError    - verification path only                         │
//! │        InvalidEncoding | MalformedStream                               │
//! │                                                                         │
//! │  Flow: encode_payload → QrError → invoice creation blocks persistence  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Every error names the field it concerns, so callers branch on kind
//! 3. Errors are enum variants, never String
//! 4. Nothing is retried: every error here is deterministic

use thiserror::Error;

use crate::tlv::MAX_VALUE_LEN;
use crate::types::FieldTag;

// =============================================================================
// Validation Error
// =============================================================================

/// A field value failed validation before encoding.
///
/// ## User Workflow
/// ```text
/// Cashier saves invoice
///      │
///      ▼
/// encode_payload(...)
///      │
///      ▼
/// BadTaxId { value: "31426526720000" }
///      │
///      ▼
/// Invoice is not persisted; settings screen shows the VAT number error
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Seller name is empty after trimming.
    #[error("seller name is required")]
    EmptyName,

    /// Tax registration number is not exactly 15 digits once spaces and
    /// dashes are removed.
    #[error("VAT registration number must be exactly 15 digits, got '{value}'")]
    BadTaxId { value: String },

    /// Timestamp does not match `YYYY-MM-DDTHH:MM:SS` or is not a real
    /// calendar date and time.
    #[error("invoice timestamp must match YYYY-MM-DDTHH:MM:SS, got '{value}'")]
    BadTimestamp { value: String },

    /// Amount is malformed or negative.
    #[error("{field} is not a valid amount: {reason}")]
    BadAmount { field: FieldTag, reason: String },
}

impl ValidationError {
    /// The payload field this error concerns.
    pub fn field(&self) -> FieldTag {
        match self {
            ValidationError::EmptyName => FieldTag::SellerName,
            ValidationError::BadTaxId { .. } => FieldTag::TaxId,
            ValidationError::BadTimestamp { .. } => FieldTag::Timestamp,
            ValidationError::BadAmount { field, .. } => *field,
        }
    }
}

// =============================================================================
// Encoding Error
// =============================================================================

/// A validated value could not be written as a TLV triplet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// The UTF-8 representation is longer than one length byte can describe.
    ///
    /// Values are never truncated: a cut-off seller name would be a
    /// regulator-facing data error.
    #[error("{tag} is {length} bytes long; the maximum is {}", MAX_VALUE_LEN)]
    ValueTooLong { tag: FieldTag, length: usize },
}

// =============================================================================
// Decoding Error
// =============================================================================

/// A payload string could not be turned back into the five fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodingError {
    /// The text is not valid standard Base64.
    #[error("payload is not valid Base64: {0}")]
    InvalidEncoding(String),

    /// The byte stream is not exactly tags 1 through 5 in order.
    ///
    /// ## When This Occurs
    /// - Unknown, repeated or out-of-order tag
    /// - Length byte overruns the remaining bytes
    /// - Trailing bytes after tag 5, or the stream ends before tag 5
    /// - A value is not UTF-8, or an amount is not a two-decimal number
    #[error("malformed TLV stream at byte {offset}: {reason}")]
    MalformedStream { offset: usize, reason: String },
}

impl DecodingError {
    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        DecodingError::MalformedStream {
            offset,
            reason: reason.into(),
        }
    }
}

// =============================================================================
// QR Error
// =============================================================================

/// Any failure produced by the codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QrError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("decoding error: {0}")]
    Decoding(#[from] DecodingError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Convenience type alias for Results with QrError.
pub type QrResult<T> = Result<T, QrError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::BadTaxId {
            value: "123".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "VAT registration number must be exactly 15 digits, got '123'"
        );

        let err = ValidationError::BadAmount {
            field: FieldTag::TaxAmount,
            reason: "must not be negative".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Tag 5 (VAT Amount) is not a valid amount: must not be negative"
        );
    }

    #[test]
    fn test_validation_error_field() {
        assert_eq!(ValidationError::EmptyName.field(), FieldTag::SellerName);
        let err = ValidationError::BadTimestamp {
            value: "2024-01-15".to_string(),
        };
        assert_eq!(err.field(), FieldTag::Timestamp);
    }

    #[test]
    fn test_encoding_error_message() {
        let err = EncodingError::ValueTooLong {
            tag: FieldTag::SellerName,
            length: 256,
        };
        assert_eq!(
            err.to_string(),
            "Tag 1 (Seller Name) is 256 bytes long; the maximum is 255"
        );
    }

    #[test]
    fn test_errors_convert_to_qr_error() {
        let qr: QrError = ValidationError::EmptyName.into();
        assert!(matches!(qr, QrError::Validation(ValidationError::EmptyName)));

        let qr: QrError = DecodingError::malformed(3, "unexpected tag 7").into();
        assert_eq!(
            qr.to_string(),
            "decoding error: malformed TLV stream at byte 3: unexpected tag 7"
        );
    }
}
