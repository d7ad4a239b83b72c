//! # Money Module
//!
//! Provides the `Money` type for the two payload amounts.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Formatting a float to 2 places rounds the *binary* value:              │
//! │    format(1.005, ".2f") = "1.00"   ❌ not the 1.01 the cashier typed    │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Halalas (1 SAR = 100 halalas)                   │
//! │    "1.005" is parsed digit by digit, rounded once, stored as 101       │
//! │    Rendering is always "<riyals>.<2 digits>"                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding Policy
//! Inputs with more than two fractional digits are rounded **half away from
//! zero** on the third fractional digit: `"10.005"` becomes `10.01`,
//! `"10.004"` becomes `10.00`. Inputs with fewer digits are padded:
//! `"1234.5"` becomes `1234.50`.
//!
//! ## Usage
//! ```rust
//! use zatca_core::money::Money;
//! use zatca_core::FieldTag;
//!
//! let total = Money::parse(FieldTag::TotalAmount, "1234.5").unwrap();
//! assert_eq!(total.to_string(), "1234.50");
//!
//! let vat = Money::from_cents(15000);
//! assert_eq!(vat.to_string(), "150.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use ts_rs::TS;

use crate::error::{ValidationError, ValidationResult};
use crate::types::{FieldTag, TaxRate};

/// Largest integer part accepted when parsing (keeps cents inside i64).
const MAX_INTEGER_DIGITS: usize = 15;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (halalas for SAR).
///
/// Serialized as its two-decimal string (`"1150.50"`), which is also the
/// exact text written into the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(into = "String", try_from = "String")]
#[ts(export)]
pub struct Money(#[ts(type = "string")] i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use zatca_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Parses a decimal amount for the given payload field.
    ///
    /// ## Rules
    /// - Plain decimal digits with an optional `.` and fractional digits
    /// - Surrounding whitespace is ignored
    /// - No sign, no exponent, no thousands separators
    /// - Negative values are rejected (the payload carries only totals)
    /// - More than two fractional digits are rounded half away from zero
    ///
    /// ## Example
    /// ```rust
    /// use zatca_core::money::Money;
    /// use zatca_core::FieldTag;
    ///
    /// let tag = FieldTag::TaxAmount;
    /// assert_eq!(Money::parse(tag, "150").unwrap().cents(), 15000);
    /// assert_eq!(Money::parse(tag, "0.125").unwrap().cents(), 13);
    /// assert!(Money::parse(tag, "-1.00").is_err());
    /// assert!(Money::parse(tag, "1e3").is_err());
    /// ```
    pub fn parse(field: FieldTag, raw: &str) -> ValidationResult<Money> {
        let bad = |reason: &str| ValidationError::BadAmount {
            field,
            reason: reason.to_string(),
        };

        let raw = raw.trim();
        if raw.is_empty() {
            return Err(bad("amount is required"));
        }
        if raw.starts_with('-') {
            return Err(bad("must not be negative"));
        }

        let (int_part, frac_part) = match raw.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (raw, None),
        };

        if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad("expected digits before the decimal point"));
        }
        if int_part.len() > MAX_INTEGER_DIGITS {
            return Err(bad("amount is too large"));
        }

        let frac_digits: &[u8] = match frac_part {
            Some(frac) if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) => {
                return Err(bad("expected digits after the decimal point"));
            }
            Some(frac) => frac.as_bytes(),
            None => &[],
        };

        let digit = |i: usize| frac_digits.get(i).map_or(0, |b| i64::from(b - b'0'));

        // Fits: at most 15 integer digits, so * 100 stays far below i64::MAX.
        let whole: i64 = int_part
            .parse()
            .map_err(|_| bad("amount is too large"))?;
        let mut cents = whole * 100 + digit(0) * 10 + digit(1);
        if digit(2) >= 5 {
            cents += 1;
        }

        Ok(Money(cents))
    }

    /// Calculates tax on this amount, rounding half up to the nearest cent.
    ///
    /// ## Example
    /// ```rust
    /// use zatca_core::money::Money;
    /// use zatca_core::TaxRate;
    ///
    /// let net = Money::from_cents(100050); // 1000.50
    /// let vat = net.calculate_tax(TaxRate::STANDARD_VAT);
    /// // 1000.50 × 15% = 150.075 → 150.08
    /// assert_eq!(vat.cents(), 15008);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 so large invoices cannot overflow the intermediate product
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders exactly two fractional digits with no currency symbol.
///
/// This is the text the encoder writes for tags 4 and 5.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Money> for String {
    fn from(money: Money) -> Self {
        money.to_string()
    }
}

impl TryFrom<String> for Money {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Money::parse(FieldTag::TotalAmount, &value)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> ValidationResult<Money> {
        Money::parse(FieldTag::TotalAmount, raw)
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(115050).to_string(), "1150.50");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(7).to_string(), "0.07");
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
    }

    #[test]
    fn test_parse_pads_short_fractions() {
        assert_eq!(parse("1234.5").unwrap().to_string(), "1234.50");
        assert_eq!(parse("1234").unwrap().to_string(), "1234.00");
        assert_eq!(parse("0.01").unwrap().cents(), 1);
        assert_eq!(parse("  42.10 ").unwrap().cents(), 4210);
    }

    #[test]
    fn test_parse_rounds_half_away_from_zero() {
        assert_eq!(parse("10.005").unwrap().cents(), 1001);
        assert_eq!(parse("10.004").unwrap().cents(), 1000);
        assert_eq!(parse("10.0049999").unwrap().cents(), 1000);
        assert_eq!(parse("1000.501").unwrap().cents(), 100050);
        assert_eq!(parse("0.995").unwrap().cents(), 100);
        assert_eq!(parse("99.999").unwrap().to_string(), "100.00");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for raw in ["", "   ", "-1.00", "+1.00", "1e3", "1,000.00", "abc", ".50", "12.", "1.2.3"] {
            let err = parse(raw).unwrap_err();
            assert!(
                matches!(err, ValidationError::BadAmount { field: FieldTag::TotalAmount, .. }),
                "expected BadAmount for {raw:?}"
            );
        }
        assert!(parse("1234567890123456").is_err());
        assert!(parse("123456789012345.99").is_ok());
    }

    #[test]
    fn test_tax_calculation_with_rounding() {
        // 1000.50 at 15% = 150.075 → 150.08
        let tax = Money::from_cents(100050).calculate_tax(TaxRate::STANDARD_VAT);
        assert_eq!(tax.cents(), 15008);

        let tax = Money::from_cents(1000).calculate_tax(TaxRate::from_bps(825));
        assert_eq!(tax.cents(), 83);
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);
        assert_eq!((a + b).cents(), 1500);
        assert_eq!(a + Money::default(), a);
    }

    #[test]
    fn test_serde_uses_decimal_string() {
        let json = serde_json::to_string(&Money::from_cents(15000)).unwrap();
        assert_eq!(json, "\"150.00\"");

        let back: Money = serde_json::from_str("\"150.5\"").unwrap();
        assert_eq!(back.cents(), 15050);

        assert!(serde_json::from_str::<Money>("\"-3.00\"").is_err());
    }
}
