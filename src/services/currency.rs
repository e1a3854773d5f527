use serde::Serialize;
use thiserror::Error;

use super::calculator::round2;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unsupported currency pair: {from} -> {to}")]
pub struct UnsupportedPair {
    pub from: String,
    pub to: String,
}

/// Fixed demo rates, `(from, to, rate)`.
const RATES: &[(&str, &str, f64)] = &[
    ("USD", "EUR", 0.85),
    ("USD", "GBP", 0.73),
    ("USD", "JPY", 110.0),
    ("USD", "CAD", 1.25),
    ("EUR", "USD", 1.18),
    ("EUR", "GBP", 0.86),
    ("EUR", "JPY", 129.0),
    ("EUR", "CAD", 1.47),
    ("GBP", "USD", 1.37),
    ("GBP", "EUR", 1.16),
    ("GBP", "JPY", 150.0),
    ("GBP", "CAD", 1.71),
    ("JPY", "USD", 0.0091),
    ("JPY", "EUR", 0.0078),
    ("JPY", "GBP", 0.0067),
    ("JPY", "CAD", 0.011),
    ("CAD", "USD", 0.80),
    ("CAD", "EUR", 0.68),
    ("CAD", "GBP", 0.58),
    ("CAD", "JPY", 90.0),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub original_amount: f64,
    pub from_currency: String,
    pub to_currency: String,
    pub converted_amount: f64,
    pub exchange_rate: f64,
}

#[must_use]
pub fn rate(from: &str, to: &str) -> Option<f64> {
    RATES
        .iter()
        .find(|(f, t, _)| *f == from && *t == to)
        .map(|(_, _, r)| *r)
}

/// Currency codes are matched exactly (upper case).
pub fn convert(amount: f64, from: &str, to: &str) -> Result<Conversion, UnsupportedPair> {
    let exchange_rate = rate(from, to).ok_or_else(|| UnsupportedPair {
        from: from.to_string(),
        to: to.to_string(),
    })?;

    Ok(Conversion {
        original_amount: amount,
        from_currency: from.to_string(),
        to_currency: to.to_string(),
        converted_amount: round2(amount * exchange_rate),
        exchange_rate,
    })
}
