//! # TLV Module
//!
//! Tag-Length-Value triplets as laid out in the QR payload.
//!
//! ## Wire Layout
//! ```text
//! ┌──────────┬──────────┬────────────────────────────┐
//! │ tag (u8) │ len (u8) │ value: `len` UTF-8 bytes   │
//! └──────────┴──────────┴────────────────────────────┘
//!   0x01       0x07       "Test Co"
//! ```
//!
//! A single length byte caps every value at 255 bytes. Longer values are an
//! error, never truncated.

use crate::error::{DecodingError, EncodingError};
use crate::types::FieldTag;

/// Largest value a single length byte can describe.
pub const MAX_VALUE_LEN: usize = u8::MAX as usize;

// =============================================================================
// Encoder
// =============================================================================

/// Encodes one field as `[tag][length][UTF-8 bytes]`.
///
/// ## Example
/// ```rust
/// use zatca_core::tlv::encode_field;
/// use zatca_core::FieldTag;
///
/// let bytes = encode_field(FieldTag::SellerName, "Test Co").unwrap();
/// assert_eq!(bytes, b"\x01\x07Test Co");
/// ```
pub fn encode_field(tag: FieldTag, value: &str) -> Result<Vec<u8>, EncodingError> {
    let mut out = Vec::with_capacity(2 + value.len());
    encode_field_into(&mut out, tag, value)?;
    Ok(out)
}

/// Appends one encoded field to `out`. On error `out` is left untouched.
pub fn encode_field_into(
    out: &mut Vec<u8>,
    tag: FieldTag,
    value: &str,
) -> Result<(), EncodingError> {
    let bytes = value.as_bytes();
    let length = u8::try_from(bytes.len()).map_err(|_| EncodingError::ValueTooLong {
        tag,
        length: bytes.len(),
    })?;

    out.push(tag.byte());
    out.push(length);
    out.extend_from_slice(bytes);
    Ok(())
}

// =============================================================================
// Reader
// =============================================================================

/// One raw triplet as it appears in a byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawField<'a> {
    /// Offset of the tag byte within the stream.
    pub offset: usize,
    pub tag: u8,
    pub value: &'a [u8],
}

/// Walks a byte stream triplet by triplet.
///
/// Only framing is checked here: each triplet needs its two header bytes
/// and its full value. Tag order and meaning are the decoder's concern.
/// After the first error the reader yields nothing more.
///
/// ## Example
/// ```rust
/// use zatca_core::tlv::TlvReader;
///
/// let stream = b"\x01\x02ab\x09\x00";
/// let fields: Vec<_> = TlvReader::new(stream).collect::<Result<_, _>>().unwrap();
/// assert_eq!(fields.len(), 2);
/// assert_eq!(fields[0].value, b"ab");
/// assert_eq!(fields[1].tag, 9);
/// ```
#[derive(Debug, Clone)]
pub struct TlvReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> TlvReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Current read offset.
    pub fn offset(&self) -> usize {
        self.position
    }

    fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }
}

impl<'a> Iterator for TlvReader<'a> {
    type Item = Result<RawField<'a>, DecodingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining() == 0 {
            return None;
        }

        let offset = self.position;
        if self.remaining() < 2 {
            self.position = self.buffer.len();
            return Some(Err(DecodingError::malformed(
                offset,
                "truncated field header",
            )));
        }

        let tag = self.buffer[offset];
        let length = self.buffer[offset + 1] as usize;
        let start = offset + 2;

        if length > self.buffer.len() - start {
            self.position = self.buffer.len();
            return Some(Err(DecodingError::malformed(
                offset,
                format!(
                    "length {} for tag {} overruns the {} remaining bytes",
                    length,
                    tag,
                    self.buffer.len() - start
                ),
            )));
        }

        self.position = start + length;
        Some(Ok(RawField {
            offset,
            tag,
            value: &self.buffer[start..start + length],
        }))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_field_layout() {
        let bytes = encode_field(FieldTag::TaxId, "314265267200003").unwrap();
        assert_eq!(bytes[0], 2);
        assert_eq!(bytes[1], 15);
        assert_eq!(&bytes[2..], b"314265267200003");
    }

    #[test]
    fn test_length_counts_bytes_not_chars() {
        // 3 Arabic letters, 2 bytes each in UTF-8
        let bytes = encode_field(FieldTag::SellerName, "عزة").unwrap();
        assert_eq!(bytes[1], 6);
        assert_eq!(std::str::from_utf8(&bytes[2..]).unwrap(), "عزة");
    }

    #[test]
    fn test_empty_value_is_encodable() {
        assert_eq!(encode_field(FieldTag::TaxAmount, "").unwrap(), vec![5, 0]);
    }

    #[test]
    fn test_length_boundary() {
        let exact = "a".repeat(255);
        let bytes = encode_field(FieldTag::SellerName, &exact).unwrap();
        assert_eq!(bytes[1], 255);
        assert_eq!(bytes.len(), 257);

        let over = "a".repeat(256);
        assert_eq!(
            encode_field(FieldTag::SellerName, &over),
            Err(EncodingError::ValueTooLong {
                tag: FieldTag::SellerName,
                length: 256
            })
        );
    }

    #[test]
    fn test_failed_append_leaves_buffer_untouched() {
        let mut out = vec![1, 2, 3];
        let too_long = "é".repeat(128); // 256 bytes
        assert!(encode_field_into(&mut out, FieldTag::SellerName, &too_long).is_err());
        assert_eq!(out, vec![1, 2, 3]);
    }

    #[test]
    fn test_reader_walks_fields_in_sequence() {
        let mut stream = encode_field(FieldTag::SellerName, "Test Co").unwrap();
        encode_field_into(&mut stream, FieldTag::TaxId, "314265267200003").unwrap();

        let mut reader = TlvReader::new(&stream);
        let first = reader.next().unwrap().unwrap();
        assert_eq!((first.offset, first.tag, first.value), (0, 1, &b"Test Co"[..]));

        let second = reader.next().unwrap().unwrap();
        assert_eq!(second.offset, 9);
        assert_eq!(second.tag, 2);

        assert!(reader.next().is_none());
        assert_eq!(reader.offset(), stream.len());
    }

    #[test]
    fn test_reader_rejects_truncated_header() {
        let mut reader = TlvReader::new(b"\x01\x01a\x02");
        assert!(reader.next().unwrap().is_ok());
        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(err, DecodingError::MalformedStream { offset: 3, .. }));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_reader_rejects_overrunning_length() {
        let mut reader = TlvReader::new(b"\x01\x05abc");
        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(err, DecodingError::MalformedStream { offset: 0, .. }));
        assert!(reader.next().is_none());
    }
}
