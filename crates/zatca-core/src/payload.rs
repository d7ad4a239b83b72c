//! # Payload Codec
//!
//! Encodes the five invoice fields into the Base64 string rendered as the QR
//! code, and decodes such strings back for verification.
//!
//! ## Encode Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  seller name, VAT number, timestamp, total, VAT                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validation (fail fast: first bad field wins)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TLV tag 1 ‖ tag 2 ‖ tag 3 ‖ tag 4 ‖ tag 5   (no separators/padding)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  standard Base64 (padded, single line)  ──►  stored on the invoice     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Decoding is the mirror image and only runs on the verification path.
//! Every function here is pure and safe to call from any number of threads.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::borrow::Cow;
use tracing::debug;

use crate::error::{DecodingError, QrResult};
use crate::money::Money;
use crate::tlv::{encode_field_into, TlvReader};
use crate::types::{DecodedPayload, ExpectedFields, FieldMismatch, FieldTag, VerificationReport};
use crate::validation::{
    strip_tax_id_separators, validate_amount, validate_seller_name, validate_tax_id,
    validate_timestamp,
};

// =============================================================================
// Encode
// =============================================================================

/// Builds the QR payload string for one invoice.
///
/// Values are validated in tag order and the first failure is returned, so
/// the caller learns exactly which field to fix. Output is deterministic:
/// the same inputs always give the same string.
///
/// ## Example
/// ```rust
/// use zatca_core::encode_payload;
///
/// let qr = encode_payload(
///     "Test Co",
///     "314265267200003",
///     "2024-01-15T10:30:00",
///     "1150.50",
///     "150.00",
/// )
/// .unwrap();
/// assert_eq!(
///     qr,
///     "AQdUZXN0IENvAg8zMTQyNjUyNjcyMDAwMDMDEzIwMjQtMDEtMTVUMTA6MzA6MDAEBzExNTAuNTAFBjE1MC4wMA=="
/// );
/// ```
pub fn encode_payload(
    seller_name: &str,
    tax_id: &str,
    timestamp: &str,
    total_amount: &str,
    tax_amount: &str,
) -> QrResult<String> {
    let fields = [
        (FieldTag::SellerName, validate_seller_name(seller_name)?),
        (FieldTag::TaxId, validate_tax_id(tax_id)?),
        (FieldTag::Timestamp, validate_timestamp(timestamp)?),
        (
            FieldTag::TotalAmount,
            validate_amount(FieldTag::TotalAmount, total_amount)?,
        ),
        (
            FieldTag::TaxAmount,
            validate_amount(FieldTag::TaxAmount, tax_amount)?,
        ),
    ];

    let capacity = fields.iter().map(|(_, value)| value.len() + 2).sum();
    let mut stream = Vec::with_capacity(capacity);
    for (tag, value) in &fields {
        encode_field_into(&mut stream, *tag, value)?;
    }

    let text = STANDARD.encode(&stream);
    debug!(bytes = stream.len(), chars = text.len(), "Encoded QR payload");
    Ok(text)
}

// =============================================================================
// Decode
// =============================================================================

/// Recovers the five fields from a payload string.
///
/// ## Rules
/// - Text must be standard, padded Base64 ([`DecodingError::InvalidEncoding`])
/// - Exactly tags 1, 2, 3, 4, 5 in that order, nothing before, between or
///   after ([`DecodingError::MalformedStream`])
/// - Values must be UTF-8; amounts must carry exactly two fractional digits
///
/// Tags 1-3 are returned as found: an empty seller name or a VAT number that
/// is not 15 digits decodes without error. Use [`verify_payload_report`] to
/// compare them against known values.
///
/// ## Example
/// ```rust
/// use zatca_core::{decode_payload, encode_payload};
///
/// let qr = encode_payload("Test Co", "314265267200003", "2024-01-15T10:30:00", "1150.5", "150")
///     .unwrap();
/// let decoded = decode_payload(&qr).unwrap();
/// assert_eq!(decoded.seller_name, "Test Co");
/// assert_eq!(decoded.total_amount.to_string(), "1150.50");
/// ```
pub fn decode_payload(text: &str) -> Result<DecodedPayload, DecodingError> {
    let result = decode_stream(&from_text(text)?);
    if let Err(err) = &result {
        debug!(%err, "Rejected QR payload");
    }
    result
}

fn decode_stream(bytes: &[u8]) -> Result<DecodedPayload, DecodingError> {
    let mut reader = TlvReader::new(bytes);

    let (_, seller_name) = read_field(&mut reader, FieldTag::SellerName)?;
    let (_, tax_id) = read_field(&mut reader, FieldTag::TaxId)?;
    let (_, timestamp) = read_field(&mut reader, FieldTag::Timestamp)?;
    let (total_offset, total) = read_field(&mut reader, FieldTag::TotalAmount)?;
    let (tax_offset, tax) = read_field(&mut reader, FieldTag::TaxAmount)?;

    let end = reader.offset();
    if end != bytes.len() {
        return Err(DecodingError::malformed(
            end,
            format!("{} unexpected bytes after tag 5", bytes.len() - end),
        ));
    }

    Ok(DecodedPayload {
        seller_name,
        tax_id,
        timestamp,
        total_amount: parse_wire_amount(FieldTag::TotalAmount, &total, total_offset)?,
        tax_amount: parse_wire_amount(FieldTag::TaxAmount, &tax, tax_offset)?,
    })
}

/// Reads the next triplet and requires it to carry `expected`.
fn read_field(
    reader: &mut TlvReader<'_>,
    expected: FieldTag,
) -> Result<(usize, String), DecodingError> {
    let field = match reader.next() {
        Some(field) => field?,
        None => {
            return Err(DecodingError::malformed(
                reader.offset(),
                format!("stream ended before {}", expected),
            ))
        }
    };

    if field.tag != expected.byte() {
        let reason = match FieldTag::from_byte(field.tag) {
            Some(found) => format!("expected {}, found {}", expected, found),
            None => format!("expected {}, found unknown tag {}", expected, field.tag),
        };
        return Err(DecodingError::malformed(field.offset, reason));
    }

    let value = std::str::from_utf8(field.value).map_err(|_| {
        DecodingError::malformed(field.offset, format!("{} is not valid UTF-8", expected))
    })?;

    Ok((field.offset, value.to_string()))
}

/// Amounts on the wire must already be in canonical two-decimal form.
fn parse_wire_amount(tag: FieldTag, text: &str, offset: usize) -> Result<Money, DecodingError> {
    match Money::parse(tag, text) {
        Ok(money) if money.to_string() == text => Ok(money),
        _ => Err(DecodingError::malformed(
            offset,
            format!("{} is not a two-decimal amount: '{}'", tag, text),
        )),
    }
}

fn from_text(text: &str) -> Result<Vec<u8>, DecodingError> {
    STANDARD
        .decode(text)
        .map_err(|err| DecodingError::InvalidEncoding(err.to_string()))
}

// =============================================================================
// Raw Inspection
// =============================================================================

/// An owned triplet from [`decode_raw`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTriplet {
    pub tag: u8,
    pub value: Vec<u8>,
}

impl RawTriplet {
    /// The value as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.value)
    }
}

/// Lists every triplet in a payload without checking tags or values.
///
/// Meant for debugging payloads that [`decode_payload`] rejects: framing
/// errors are still reported, but unknown or misordered tags are returned
/// as-is.
pub fn decode_raw(text: &str) -> Result<Vec<RawTriplet>, DecodingError> {
    let bytes = from_text(text)?;
    TlvReader::new(&bytes)
        .map(|field| {
            field.map(|field| RawTriplet {
                tag: field.tag,
                value: field.value.to_vec(),
            })
        })
        .collect()
}

// =============================================================================
// Verify
// =============================================================================

/// Checks a stored payload against the values it should carry.
///
/// Test/debug path only. Returns `false` for any mismatch and for payloads
/// that do not decode.
///
/// ## Example
/// ```rust
/// use zatca_core::{encode_payload, verify_payload};
///
/// let qr = encode_payload("Test Co", "314265267200003", "2024-01-15T10:30:00", "1150.50", "150.00")
///     .unwrap();
/// assert!(verify_payload(&qr, "Test Co", "314-265-267-200-003", "1150.5", "150"));
/// assert!(!verify_payload(&qr, "Test Co", "314265267200003", "1150.50", "150.01"));
/// ```
pub fn verify_payload(
    text: &str,
    expected_seller_name: &str,
    expected_tax_id: &str,
    expected_total: &str,
    expected_tax_amount: &str,
) -> bool {
    let expected = ExpectedFields {
        seller_name: expected_seller_name.to_string(),
        tax_id: expected_tax_id.to_string(),
        timestamp: None,
        total_amount: expected_total.to_string(),
        tax_amount: expected_tax_amount.to_string(),
    };

    match verify_payload_report(text, &expected) {
        Ok(report) => report.is_valid(),
        Err(_) => false,
    }
}

/// Compares a payload field by field and reports every difference.
///
/// Expected values are normalized like the encoder does (trimmed name,
/// separator-free VAT number, two-decimal amounts) before comparison.
/// The timestamp is compared only when one is given.
pub fn verify_payload_report(
    text: &str,
    expected: &ExpectedFields,
) -> QrResult<VerificationReport> {
    let decoded = decode_payload(text)?;

    let mut wanted = vec![
        (FieldTag::SellerName, expected.seller_name.trim().to_string()),
        (FieldTag::TaxId, strip_tax_id_separators(&expected.tax_id)),
    ];
    if let Some(timestamp) = &expected.timestamp {
        wanted.push((FieldTag::Timestamp, timestamp.clone()));
    }
    wanted.push((
        FieldTag::TotalAmount,
        normalize_amount(FieldTag::TotalAmount, &expected.total_amount),
    ));
    wanted.push((
        FieldTag::TaxAmount,
        normalize_amount(FieldTag::TaxAmount, &expected.tax_amount),
    ));

    let mismatches: Vec<FieldMismatch> = wanted
        .into_iter()
        .filter_map(|(tag, expected)| {
            let actual = decoded.field_text(tag);
            (actual != expected).then_some(FieldMismatch {
                tag,
                expected,
                actual,
            })
        })
        .collect();

    debug!(mismatches = mismatches.len(), "Verified QR payload");
    Ok(VerificationReport { mismatches })
}

/// An expected amount that does not parse is compared verbatim, so it
/// surfaces as a mismatch rather than an error.
fn normalize_amount(tag: FieldTag, raw: &str) -> String {
    validate_amount(tag, raw).unwrap_or_else(|_| raw.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================
