//! # CLI Error Type
//!
//! Unified error type for the `zatca-qr` commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command function  ─── Result<T, CliError>                              │
//! │         │                                                               │
//! │         ├── QrError (validation / encoding / decoding) ──┐              │
//! │         ├── config file / environment problems ─────────┤              │
//! │         ├── I/O, TOML, JSON ────────────────────────────┤              │
//! │         ▼                                                ▼              │
//! │  main() prints "error: ..." (or {"code","message"} with --json)        │
//! │         and exits with CliError::exit_code()                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;
use zatca_core::QrError;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Flags were combined in a way the command cannot use.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The codec rejected an input or a payload.
    #[error(transparent)]
    Qr(#[from] QrError),

    /// A payload decoded but did not carry the expected values.
    #[error("payload verification failed: {mismatches} field(s) differ")]
    VerificationFailed { mismatches: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("could not write config file: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Machine-readable error codes for `--json` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    EncodingError,
    DecodingError,
    VerificationFailed,
    ConfigError,
    Internal,
}

/// Serialized form of a failed command.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
}

impl CliError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CliError::Qr(QrError::Validation(_)) | CliError::InvalidArguments(_) => {
                ErrorCode::ValidationError
            }
            CliError::Qr(QrError::Encoding(_)) => ErrorCode::EncodingError,
            CliError::Qr(QrError::Decoding(_)) => ErrorCode::DecodingError,
            CliError::VerificationFailed { .. } => ErrorCode::VerificationFailed,
            CliError::Config(_) | CliError::TomlParse(_) => ErrorCode::ConfigError,
            CliError::Io(_) | CliError::TomlWrite(_) | CliError::Json(_) => ErrorCode::Internal,
        }
    }

    /// Process exit status: 1 for a failed check, 2 for bad input or
    /// configuration, 3 for anything else.
    pub fn exit_code(&self) -> u8 {
        match self.code() {
            ErrorCode::VerificationFailed | ErrorCode::DecodingError => 1,
            ErrorCode::ValidationError | ErrorCode::EncodingError | ErrorCode::ConfigError => 2,
            ErrorCode::Internal => 3,
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

/// Convenience type alias for command results.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use zatca_core::{DecodingError, ValidationError};

    #[test]
    fn test_codes_and_exit_status() {
        let err: CliError = QrError::Validation(ValidationError::EmptyName).into();
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "validation error: seller name is required");

        let err: CliError = QrError::Decoding(DecodingError::InvalidEncoding("x".into())).into();
        assert_eq!(err.exit_code(), 1);

        let err = CliError::InvalidArguments("--net conflicts with --total".into());
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert_eq!(err.exit_code(), 2);

        let err = CliError::VerificationFailed { mismatches: 2 };
        assert_eq!(err.code(), ErrorCode::VerificationFailed);
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_report_serializes_screaming_code() {
        let report = CliError::Config("seller name is not set".into()).report();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["code"], "CONFIG_ERROR");
        assert_eq!(json["message"], "configuration error: seller name is not set");
    }
}
