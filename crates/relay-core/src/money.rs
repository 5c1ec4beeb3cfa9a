//! # Money Types
//!
//! Decimal-string amounts as the provider's wire format expects them,
//! carried internally as integer minor units to keep arithmetic exact.

use crate::error::{GatewayError, GatewayResult};
use serde::{Deserialize, Serialize};

/// A 3-letter ISO 4217 currency code.
///
/// Codes outside the well-known set pass through unchanged; the provider
/// performs the authoritative validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// Parse a currency code, normalizing to uppercase.
    pub fn parse(code: &str) -> GatewayResult<Self> {
        let code = code.trim().to_ascii_uppercase();
        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(GatewayError::InvalidRequest(format!(
                "Invalid currency code: {:?}",
                code
            )));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of decimal places for this currency.
    /// Zero-exponent currencies per the provider's currency table.
    pub fn decimal_places(&self) -> u32 {
        match self.0.as_str() {
            "JPY" | "HUF" | "TWD" => 0,
            _ => 2,
        }
    }

    pub fn usd() -> Self {
        Self("USD".to_string())
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::usd()
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A monetary amount in minor units (cents for USD)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    /// Amount in smallest currency unit
    pub minor: i64,
    /// Currency code
    pub currency: Currency,
}

impl Amount {
    /// Create an amount from minor units
    pub fn from_minor(minor: i64, currency: Currency) -> Self {
        Self { minor, currency }
    }

    /// Zero in the given currency
    pub fn zero(currency: Currency) -> Self {
        Self { minor: 0, currency }
    }

    /// Parse a decimal string (e.g., "6.45") into minor units.
    ///
    /// Accepts at most `currency.decimal_places()` fraction digits; shorter
    /// fractions are scaled up ("1.5" means "1.50").
    pub fn parse(value: &str, currency: Currency) -> GatewayResult<Self> {
        let value = value.trim();
        let invalid =
            || GatewayError::InvalidRequest(format!("Invalid decimal amount: {:?}", value));

        let (negative, digits) = match value.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, value),
        };

        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };

        let places = currency.decimal_places() as usize;
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if frac.len() > places {
            return Err(invalid());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let scale = 10_i64.pow(currency.decimal_places());
        let mut frac_minor: i64 = if frac.is_empty() {
            0
        } else {
            frac.parse().map_err(|_| invalid())?
        };
        frac_minor *= 10_i64.pow((places - frac.len()) as u32);

        let minor = whole
            .checked_mul(scale)
            .and_then(|w| w.checked_add(frac_minor))
            .ok_or_else(invalid)?;

        Ok(Self {
            minor: if negative { -minor } else { minor },
            currency,
        })
    }

    /// Format as the provider's decimal string (e.g., "6.45", "1200" for JPY)
    pub fn to_value_string(&self) -> String {
        let places = self.currency.decimal_places();
        if places == 0 {
            return self.minor.to_string();
        }
        let scale = 10_i64.pow(places);
        let sign = if self.minor < 0 { "-" } else { "" };
        let abs = self.minor.unsigned_abs();
        let scale = scale as u64;
        format!(
            "{}{}.{:0width$}",
            sign,
            abs / scale,
            abs % scale,
            width = places as usize
        )
    }

    pub fn is_positive(&self) -> bool {
        self.minor > 0
    }

    /// Multiply by a quantity, failing on overflow
    pub fn checked_mul(&self, quantity: u32) -> GatewayResult<Self> {
        let minor = self.minor.checked_mul(quantity as i64).ok_or_else(|| {
            GatewayError::InvalidRequest("Amount overflow computing item total".to_string())
        })?;
        Ok(Self {
            minor,
            currency: self.currency.clone(),
        })
    }

    /// Add another amount of the same currency
    pub fn checked_add(&self, other: &Amount) -> GatewayResult<Self> {
        if self.currency != other.currency {
            return Err(GatewayError::InvalidRequest(format!(
                "Currency mismatch: {} vs {}",
                self.currency, other.currency
            )));
        }
        let minor = self.minor.checked_add(other.minor).ok_or_else(|| {
            GatewayError::InvalidRequest("Amount overflow computing total".to_string())
        })?;
        Ok(Self {
            minor,
            currency: self.currency.clone(),
        })
    }

    /// Subtract another amount of the same currency
    pub fn checked_sub(&self, other: &Amount) -> GatewayResult<Self> {
        self.checked_add(&Amount {
            minor: -other.minor,
            currency: other.currency.clone(),
        })
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.to_value_string(), self.currency)
    }
}
