use crate::core::errors::AnalyticsError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO 4217 currency code, e.g. `USD` or `INR`.
///
/// # Examples
///
/// ```
/// use tariff_analytics::core::currency::CurrencyCode;
///
/// let usd = CurrencyCode::parse("usd").unwrap();
/// assert_eq!(usd.as_str(), "USD");
/// assert!(CurrencyCode::parse("US1").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Parse a user-supplied code, normalizing to upper case.
    pub fn parse(code: &str) -> Result<Self, AnalyticsError> {
        let code = code.trim().to_ascii_uppercase();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AnalyticsError::invalid(
                "currency",
                format!("expected a 3-letter ISO code, got '{}'", code),
            ));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display name from the supported catalogue, if listed.
    pub fn display_name(&self) -> Option<&'static str> {
        SUPPORTED_CURRENCIES
            .iter()
            .find(|(code, _)| *code == self.0)
            .map(|(_, name)| *name)
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A (base, target) pair. One unit of `base` buys `rate` units of `target`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub base: CurrencyCode,
    pub target: CurrencyCode,
}

impl CurrencyPair {
    pub fn new(base: CurrencyCode, target: CurrencyCode) -> Result<Self, AnalyticsError> {
        if base == target {
            return Err(AnalyticsError::invalid(
                "currency_pair",
                format!("base and target are both {}", base),
            ));
        }
        Ok(Self { base, target })
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.target)
    }
}

/// Currencies offered by the forex analysis dropdowns.
pub const SUPPORTED_CURRENCIES: &[(&str, &str)] = &[
    ("USD", "US Dollar"),
    ("EUR", "Euro"),
    ("GBP", "British Pound"),
    ("INR", "Indian Rupee"),
    ("JPY", "Japanese Yen"),
    ("AUD", "Australian Dollar"),
    ("CAD", "Canadian Dollar"),
    ("CHF", "Swiss Franc"),
    ("CNY", "Chinese Yuan"),
    ("SGD", "Singapore Dollar"),
    ("NZD", "New Zealand Dollar"),
    ("ZAR", "South African Rand"),
    ("BRL", "Brazilian Real"),
    ("HKD", "Hong Kong Dollar"),
    ("SEK", "Swedish Krona"),
    ("NOK", "Norwegian Krone"),
    ("DKK", "Danish Krone"),
    ("MXN", "Mexican Peso"),
    ("KRW", "South Korean Won"),
    ("TRY", "Turkish Lira"),
    ("SAR", "Saudi Riyal"),
    ("AED", "UAE Dirham"),
];
