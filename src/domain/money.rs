use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::fmt;
use std::str::FromStr;

/// Money is represented as integer cents so that grouped sums in the store are exact.
/// 1 unit = 100 cents, so 50.00 = 5000 cents.
pub type Cents = i64;

/// Largest amount a single transaction may carry: 10,000,000,000.00.
///
/// Any per-seller sum stays inside `i64` until a seller has more than
/// 900,000 transactions of this size.
pub const MAX_AMOUNT_CENTS: Cents = 1_000_000_000_000;

/// Format cents as a human-readable amount.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Parse a decimal string into cents.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000
///
/// More than two fractional digits is rejected rather than truncated.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let value = Decimal::from_str(input.trim()).map_err(|_| ParseCentsError::InvalidFormat)?;
    decimal_to_cents(value)
}

/// Convert an exact decimal amount into cents.
pub fn decimal_to_cents(value: Decimal) -> Result<Cents, ParseCentsError> {
    let scaled = value
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(ParseCentsError::OutOfRange)?;
    if !scaled.fract().is_zero() {
        return Err(ParseCentsError::TooPrecise);
    }
    scaled.to_i64().ok_or(ParseCentsError::OutOfRange)
}

/// Convert an income threshold into cents, rounding up.
///
/// For integer cent sums `sum < threshold` holds exactly when `sum < ceil(threshold)`,
/// so sub-cent thresholds keep their strict comparison. Thresholds beyond the `i64`
/// range saturate, which keeps the comparison's result for every representable sum.
pub fn threshold_to_cents(value: Decimal) -> Cents {
    let saturated = if value.is_sign_negative() {
        Cents::MIN
    } else {
        Cents::MAX
    };
    value
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.ceil().to_i64())
        .unwrap_or(saturated)
}

/// Cents as a two-place decimal, for API responses.
pub fn cents_to_decimal(cents: Cents) -> Decimal {
    Decimal::new(cents, 2)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
    TooPrecise,
    OutOfRange,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::TooPrecise => write!(f, "at most two decimal places are allowed"),
            ParseCentsError::OutOfRange => write!(f, "amount is out of range"),
        }
    }
}

impl std::error::Error for ParseCentsError {}
