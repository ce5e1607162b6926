//! Listing price
//!
//! A non-negative decimal with two decimal places, stored as minor units
//! (cents) so arithmetic and comparisons stay exact.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Maximum digits before the decimal point (10 total, 2 after the point).
pub const MAX_INTEGER_DIGITS: usize = 8;

/// Maximum digits after the decimal point.
pub const DECIMAL_PLACES: usize = 2;

/// Non-negative price with two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "RawPrice")]
pub struct Price {
    cents: u64,
}

impl Price {
    /// Creates a price from minor units.
    pub fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    /// Returns the price in minor units.
    pub fn cents(&self) -> u64 {
        self.cents
    }

    /// Parses a decimal string such as `"100"`, `"99.5"` or `"1250.00"`.
    pub fn parse(input: &str) -> Result<Self, String> {
        let text = input.trim();
        if text.starts_with('-') {
            return Err("Price must be non-negative".to_string());
        }
        let text = text.strip_prefix('+').unwrap_or(text);

        let (whole, fraction) = match text.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (text, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(format!("'{}' is not a valid price", input));
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(format!("'{}' is not a valid price", input));
        }
        if fraction.len() > DECIMAL_PLACES {
            return Err(format!(
                "Price must have at most {} decimal places",
                DECIMAL_PLACES
            ));
        }

        let whole = whole.trim_start_matches('0');
        if whole.len() > MAX_INTEGER_DIGITS {
            return Err(format!(
                "Price must have at most {} digits before the decimal point",
                MAX_INTEGER_DIGITS
            ));
        }

        let units: u64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| format!("'{}' is not a valid price", input))?
        };
        let mut cents_text = fraction.to_string();
        while cents_text.len() < DECIMAL_PLACES {
            cents_text.push('0');
        }
        let cents: u64 = cents_text
            .parse()
            .map_err(|_| format!("'{}' is not a valid price", input))?;

        Ok(Self::from_cents(units * 100 + cents))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.cents / 100, self.cents % 100)
    }
}

// Prices go over the wire as strings so no precision is lost in JSON numbers.
impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Accepted input shapes: `"100.00"` or `100` / `99.5`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Text(String),
    Number(serde_json::Number),
}

impl TryFrom<RawPrice> for Price {
    type Error = String;

    fn try_from(raw: RawPrice) -> Result<Self, Self::Error> {
        match raw {
            RawPrice::Text(text) => Price::parse(&text),
            RawPrice::Number(number) => Price::parse(&number.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        assert_eq!(Price::parse("100.00").unwrap().cents(), 10_000);
        assert_eq!(Price::parse("100").unwrap().cents(), 10_000);
        assert_eq!(Price::parse("99.5").unwrap().cents(), 9_950);
        assert_eq!(Price::parse(".5").unwrap().cents(), 50);
        assert_eq!(Price::parse("0").unwrap().cents(), 0);
        assert_eq!(Price::parse(" 12.34 ").unwrap().cents(), 1_234);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Price::parse("-1").is_err());
        assert!(Price::parse("1.234").is_err());
        assert!(Price::parse("abc").is_err());
        assert!(Price::parse("").is_err());
        assert!(Price::parse(".").is_err());
        assert!(Price::parse("1e5").is_err());
        assert!(Price::parse("123456789").is_err());
    }

    #[test]
    fn test_display_has_two_decimals() {
        assert_eq!(Price::from_cents(10_000).to_string(), "100.00");
        assert_eq!(Price::from_cents(5).to_string(), "0.05");
        assert_eq!(Price::from_cents(123_450).to_string(), "1234.50");
    }

    #[test]
    fn test_serde_accepts_string_and_number() {
        let from_text: Price = serde_json::from_str(r#""250.75""#).unwrap();
        let from_int: Price = serde_json::from_str("250").unwrap();
        let from_float: Price = serde_json::from_str("250.5").unwrap();
        assert_eq!(from_text.cents(), 25_075);
        assert_eq!(from_int.cents(), 25_000);
        assert_eq!(from_float.cents(), 25_050);

        assert!(serde_json::from_str::<Price>("-3").is_err());
        assert!(serde_json::from_str::<Price>("true").is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Price::from_cents(10_000)).unwrap();
        assert_eq!(json, r#""100.00""#);
    }
}
