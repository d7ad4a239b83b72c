//! # Decode Command
//!
//! `zatca-qr decode <payload>` prints the five fields of a payload.
//! With `--raw` it lists every triplet as found, which is how payloads
//! rejected by the strict decoder get diagnosed.

use std::fmt;

use clap::Args;
use serde::Serialize;
use zatca_core::{decode_payload, decode_raw, DecodedPayload, FieldTag, QrError};

use crate::error::CliResult;

#[derive(Args, Debug, Clone, Default)]
pub struct DecodeArgs {
    #[arg(help = "Base64 payload string")]
    pub payload: String,

    #[arg(long, help = "List raw triplets without checking tags or values")]
    pub raw: bool,
}

/// One triplet as found on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawFieldView {
    pub tag: u8,
    pub label: Option<&'static str>,
    pub length: usize,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum DecodeOutput {
    Fields(DecodedPayload),
    Raw(Vec<RawFieldView>),
}

impl fmt::Display for DecodeOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeOutput::Fields(decoded) => {
                for (i, tag) in FieldTag::ALL.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{:<26} {}", format!("{}:", tag.label()), decoded.field_text(*tag))?;
                }
                Ok(())
            }
            DecodeOutput::Raw(fields) => {
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(
                        f,
                        "tag {:>3}  len {:>3}  {:<24} {}",
                        field.tag,
                        field.length,
                        field.label.unwrap_or("(unknown)"),
                        field.value
                    )?;
                }
                Ok(())
            }
        }
    }
}

pub fn execute(args: &DecodeArgs) -> CliResult<DecodeOutput> {
    let payload = args.payload.trim();

    if args.raw {
        let fields = decode_raw(payload)
            .map_err(QrError::from)?
            .into_iter()
            .map(|triplet| RawFieldView {
                tag: triplet.tag,
                label: FieldTag::from_byte(triplet.tag).map(FieldTag::label),
                length: triplet.value.len(),
                value: triplet.text().into_owned(),
            })
            .collect();
        return Ok(DecodeOutput::Raw(fields));
    }

    let decoded = decode_payload(payload).map_err(QrError::from)?;
    Ok(DecodeOutput::Fields(decoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CliError, ErrorCode};
    use zatca_core::DecodingError;

    const SCENARIO_PAYLOAD: &str =
        "AQdUZXN0IENvAg8zMTQyNjUyNjcyMDAwMDMDEzIwMjQtMDEtMTVUMTA6MzA6MDAEBzExNTAuNTAFBjE1MC4wMA==";

    // Tags 2 and 3 swapped.
    const SWAPPED_PAYLOAD: &str =
        "AQdUZXN0IENvAxMyMDI0LTAxLTE1VDEwOjMwOjAwAg8zMTQyNjUyNjcyMDAwMDMEBzExNTAuNTAFBjE1MC4wMA==";

    fn args(payload: &str, raw: bool) -> DecodeArgs {
        DecodeArgs {
            payload: payload.into(),
            raw,
        }
    }

    #[test]
    fn test_decode_fields() {
        let output = execute(&args(SCENARIO_PAYLOAD, false)).unwrap();
        let DecodeOutput::Fields(decoded) = &output else {
            panic!("expected decoded fields");
        };
        assert_eq!(decoded.tax_id, "314265267200003");

        let text = output.to_string();
        assert_eq!(text.lines().count(), 5);
        assert!(text.lines().next().unwrap().ends_with("Test Co"));
        assert!(text.contains("2024-01-15T10:30:00"));
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let padded = format!("  {SCENARIO_PAYLOAD}\n");
        assert!(execute(&args(&padded, false)).is_ok());
    }

    #[test]
    fn test_json_shape() {
        let output = execute(&args(SCENARIO_PAYLOAD, false)).unwrap();
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["seller_name"], "Test Co");
        assert_eq!(json["total_amount"], "1150.50");
    }

    #[test]
    fn test_strict_decode_rejects_swapped_tags() {
        let err = execute(&args(SWAPPED_PAYLOAD, false)).unwrap_err();
        assert!(matches!(
            err,
            CliError::Qr(QrError::Decoding(DecodingError::MalformedStream { offset: 9, .. }))
        ));
        assert_eq!(err.code(), ErrorCode::DecodingError);
    }

    #[test]
    fn test_raw_lists_swapped_tags_as_found() {
        let output = execute(&args(SWAPPED_PAYLOAD, true)).unwrap();
        let DecodeOutput::Raw(fields) = &output else {
            panic!("expected raw triplets");
        };

        let tags: Vec<u8> = fields.iter().map(|f| f.tag).collect();
        assert_eq!(tags, vec![1, 3, 2, 4, 5]);
        assert_eq!(fields[1].label, Some("Invoice Date & Time"));
        assert_eq!(fields[1].length, 19);
        assert_eq!(output.to_string().lines().count(), 5);
    }

    #[test]
    fn test_invalid_base64() {
        let err = execute(&args("not base64!", true)).unwrap_err();
        assert!(matches!(
            err,
            CliError::Qr(QrError::Decoding(DecodingError::InvalidEncoding(_)))
        ));
    }
}
