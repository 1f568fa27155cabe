//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog sources deliver prices as text. `WPGraphQL` formats them for
//! display (`"$85.00"`, `"1,250.00"`), the REST API sends bare decimals and
//! the fixtures use plain numbers. [`parse_price`] is the single place where
//! that text becomes a [`Decimal`].

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a price string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The price field is empty or whitespace.
    #[error("price is missing")]
    Missing,
    /// The text is not a decimal number.
    #[error("price is not a number: {0:?}")]
    Invalid(String),
    /// The text is a range such as `"$10.00 - $20.00"` (variable products).
    #[error("price is a range, not a unit price: {0:?}")]
    Range(String),
    /// The value is below zero.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
}

/// Currency symbols stripped from the front of formatted prices.
const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£'];

/// Parse a catalog price string into a decimal amount.
///
/// Accepts plain decimals (`"85.00"`, `"85"`), display-formatted prices with a
/// leading currency symbol and thousands separators (`"$1,250.00"`), and
/// surrounding whitespace.
///
/// # Errors
///
/// - [`PriceError::Missing`] for empty input
/// - [`PriceError::Range`] for `"low - high"` price ranges
/// - [`PriceError::Invalid`] for anything else that is not a number
/// - [`PriceError::Negative`] for amounts below zero
///
/// # Examples
///
/// ```
/// use leon_core::parse_price;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_price("85.00"), Ok(Decimal::new(8500, 2)));
/// assert_eq!(parse_price(" $1,250.50 "), Ok(Decimal::new(125_050, 2)));
/// assert!(parse_price("").is_err());
/// assert!(parse_price("call us").is_err());
/// ```
pub fn parse_price(raw: &str) -> Result<Decimal, PriceError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PriceError::Missing);
    }

    if trimmed.contains(" - ") {
        return Err(PriceError::Range(trimmed.to_owned()));
    }

    let unsigned = trimmed.trim_start_matches(CURRENCY_SYMBOLS).trim_start();
    let digits: String = unsigned.chars().filter(|c| *c != ',').collect();

    let amount = digits
        .parse::<Decimal>()
        .map_err(|_| PriceError::Invalid(trimmed.to_owned()))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PriceError::Negative(amount));
    }

    Ok(amount)
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the store's default currency.
    #[must_use]
    pub fn usd(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::default())
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "{}{:.2}",
            self.currency_code.symbol(),
            self.amount.round_dp(2)
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    MXN,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD | Self::MXN => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_decimal() {
        assert_eq!(parse_price("85.00"), Ok(Decimal::new(8500, 2)));
        assert_eq!(parse_price("70"), Ok(Decimal::from(70)));
    }

    #[test]
    fn test_parse_formatted_price() {
        assert_eq!(parse_price("$185.00"), Ok(Decimal::new(18500, 2)));
        assert_eq!(parse_price("€ 1,200.00"), Ok(Decimal::new(120_000, 2)));
    }

    #[test]
    fn test_parse_missing_price() {
        assert_eq!(parse_price(""), Err(PriceError::Missing));
        assert_eq!(parse_price("   "), Err(PriceError::Missing));
    }

    #[test]
    fn test_parse_range_price() {
        assert!(matches!(
            parse_price("$10.00 - $20.00"),
            Err(PriceError::Range(_))
        ));
    }

    #[test]
    fn test_parse_invalid_price() {
        assert_eq!(
            parse_price("free"),
            Err(PriceError::Invalid("free".to_string()))
        );
    }

    #[test]
    fn test_parse_negative_price() {
        assert!(matches!(parse_price("-5.00"), Err(PriceError::Negative(_))));
    }

    #[test]
    fn test_price_display() {
        let price = Price::usd(Decimal::new(255, 0));
        assert_eq!(price.display(), "$255.00");

        let price = Price::new(Decimal::new(1999, 2), CurrencyCode::EUR);
        assert_eq!(price.to_string(), "€19.99");
    }
}
