use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Money is held as integer cents so balances never pick up floating-point drift.
/// 1 unit = 100 cents, so 50.00 = 5000 cents.
pub type Cents = i64;

/// Monthly interest rate, expressed in percent (5 means 5%).
pub type Rate = Decimal;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseMoneyError {
    #[error("invalid money format: '{0}'")]
    InvalidFormat(String),

    #[error("amount out of range: '{0}'")]
    OutOfRange(String),

    #[error("invalid interest rate: '{0}'")]
    InvalidRate(String),
}

/// Format cents as a plain decimal string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Parse a decimal string into cents.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000, "$7" -> 700
///
/// Digits beyond the second decimal place are truncated.
pub fn parse_cents(input: &str) -> Result<Cents, ParseMoneyError> {
    let raw = input.trim();
    let invalid = || ParseMoneyError::InvalidFormat(raw.to_string());

    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let unsigned = unsigned.strip_prefix('$').unwrap_or(unsigned);

    let (units_str, decimals_str) = match unsigned.split_once('.') {
        Some((units, decimals)) => (units, decimals),
        None => (unsigned, ""),
    };
    if units_str.is_empty() && decimals_str.is_empty() {
        return Err(invalid());
    }
    if !units_str.chars().all(|c| c.is_ascii_digit())
        || !decimals_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str
            .parse()
            .map_err(|_| ParseMoneyError::OutOfRange(raw.to_string()))?
    };

    // Pad a single digit ("5" means 50 cents), truncate anything past two
    let decimal_cents: i64 = match decimals_str.len() {
        0 => 0,
        1 => decimals_str.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => decimals_str[..2].parse().map_err(|_| invalid())?,
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(decimal_cents))
        .ok_or_else(|| ParseMoneyError::OutOfRange(raw.to_string()))?;
    Ok(if negative { -cents } else { cents })
}

/// Parse a percentage such as "5", "1.25" or "2.5%".
pub fn parse_rate(input: &str) -> Result<Rate, ParseMoneyError> {
    let raw = input.trim();
    let number = raw.strip_suffix('%').unwrap_or(raw).trim();
    number
        .parse::<Decimal>()
        .map_err(|_| ParseMoneyError::InvalidRate(raw.to_string()))
}

/// Interest earned by `balance` at `rate_percent`, rounded to the cent
/// (midpoint away from zero). Returns `None` if the result does not fit in `Cents`.
pub fn interest_on(balance: Cents, rate_percent: Rate) -> Option<Cents> {
    let interest = Decimal::from(balance)
        .checked_mul(rate_percent)?
        .checked_div(Decimal::ONE_HUNDRED)?;
    interest
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}
