//! Percentage parsing
//!
//! The extraction pipeline reports percentages in whatever shape the
//! source document used: `"50"`, `"50,5%"`, `"1/2"`, a bare number, or an
//! explicit "not informed" marker. Everything is folded into decimal
//! percentage points, with an explicit unknown marker for unspecified
//! values. Malformed input is an error the caller degrades to unknown —
//! never a panic, never a fatal failure.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::model::RawPercent;

/// Tokens meaning "the document does not say".
const UNSPECIFIED: &[&str] = &[
    "",
    "não informado",
    "nao informado",
    "not informed",
    "indeterminado",
    "indeterminate",
    "parcial",
    "partial",
];

/// Malformed percentage input.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PercentError {
    #[error("unparseable percentage {0:?}")]
    Malformed(String),

    #[error("fraction with zero denominator {0:?}")]
    ZeroDenominator(String),
}

/// Parse a raw percentage into decimal percentage points.
///
/// Returns `Ok(None)` when the value is an unspecified sentinel. Values
/// in the unit interval are fractions of the whole and are scaled by 100;
/// values above 1 are already percentage points.
pub fn parse_percent(raw: &RawPercent) -> Result<Option<Decimal>, PercentError> {
    match raw {
        RawPercent::Number(n) => {
            let value =
                Decimal::from_f64(*n).ok_or_else(|| PercentError::Malformed(n.to_string()))?;
            as_points(value, || n.to_string()).map(Some)
        }
        RawPercent::Text(text) => parse_percent_text(text),
    }
}

/// Parse a textual percentage.
pub fn parse_percent_text(text: &str) -> Result<Option<Decimal>, PercentError> {
    let trimmed = text.trim();
    if UNSPECIFIED.contains(&trimmed.to_lowercase().as_str()) {
        return Ok(None);
    }

    if trimmed.contains('/') {
        return parse_fraction(trimmed).map(Some);
    }

    // Drop stray symbols ("%", currency marks), unify the decimal comma.
    let digits: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    let value: Decimal = digits
        .parse()
        .map_err(|_| PercentError::Malformed(text.to_string()))?;
    as_points(value, || text.to_string()).map(Some)
}

/// `a/b` fraction of the whole, in percentage points.
fn parse_fraction(text: &str) -> Result<Decimal, PercentError> {
    let mut parts = text.splitn(2, '/');
    let numerator: i64 = parts
        .next()
        .unwrap_or("")
        .trim()
        .parse()
        .map_err(|_| PercentError::Malformed(text.to_string()))?;
    let denominator: i64 = parts
        .next()
        .unwrap_or("")
        .trim()
        .parse()
        .map_err(|_| PercentError::Malformed(text.to_string()))?;
    if denominator == 0 {
        return Err(PercentError::ZeroDenominator(text.to_string()));
    }
    as_points(Decimal::from(numerator) / Decimal::from(denominator), || {
        text.to_string()
    })
}

/// Scale unit-interval values to points and reject negatives.
fn as_points(value: Decimal, raw: impl FnOnce() -> String) -> Result<Decimal, PercentError> {
    if value.is_sign_negative() {
        return Err(PercentError::Malformed(raw()));
    }
    if value <= Decimal::ONE {
        Ok(value * Decimal::ONE_HUNDRED)
    } else {
        Ok(value)
    }
}
