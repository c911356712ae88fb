// Amount - exact token quantity in minor units
//
// Serialized as a decimal string at every persistence boundary so values
// never pass through floating point.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Decimals of the mock USDT token
pub const TOKEN_DECIMALS: u32 = 6;

/// Errors from parsing an amount
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Invalid amount: {0}")]
    Invalid(String),

    #[error("Amount overflow")]
    Overflow,

    #[error("Too many decimal places: {found} (max {max})")]
    TooPrecise { found: usize, max: u32 },
}

/// Non-negative integer count of minor token units
///
/// Capped at `u128::MAX` (about 3.4e38); arithmetic past it fails with
/// [`AmountError::Overflow`] or `None` rather than wrapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Create from raw minor units
    pub const fn new(minor_units: u128) -> Self {
        Self(minor_units)
    }

    /// Create from whole tokens (`tokens * 10^TOKEN_DECIMALS`)
    pub fn from_tokens(tokens: u64) -> Self {
        Self(tokens as u128 * 10u128.pow(TOKEN_DECIMALS))
    }

    /// Raw minor units
    pub fn minor_units(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    pub fn saturating_sub(self, other: Amount) -> Amount {
        Amount(self.0.saturating_sub(other.0))
    }

    /// `floor(self * percent / 100)`, exact for any `percent <= 100`
    pub fn percent(self, percent: u8) -> Amount {
        let p = percent as u128;
        // split so the multiplication can't overflow
        Amount((self.0 / 100) * p + (self.0 % 100) * p / 100)
    }

    /// Parse a decimal token string such as `"100.5"` into minor units
    pub fn parse_units(s: &str, decimals: u32) -> Result<Amount, AmountError> {
        let s = s.trim();
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(AmountError::Invalid(s.to_string()));
        }
        if frac.len() > decimals as usize {
            return Err(AmountError::TooPrecise {
                found: frac.len(),
                max: decimals,
            });
        }
        let digits_ok = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if !digits_ok(whole) || !digits_ok(frac) {
            return Err(AmountError::Invalid(s.to_string()));
        }

        let scale = 10u128
            .checked_pow(decimals)
            .ok_or(AmountError::Overflow)?;
        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| AmountError::Overflow)?
        };
        let frac_padded = format!("{:0<width$}", frac, width = decimals as usize);
        let frac: u128 = if frac_padded.is_empty() {
            0
        } else {
            frac_padded.parse().map_err(|_| AmountError::Overflow)?
        };

        whole
            .checked_mul(scale)
            .and_then(|w| w.checked_add(frac))
            .map(Amount)
            .ok_or(AmountError::Overflow)
    }

    /// Format as a decimal token string, trimming trailing zeros
    pub fn format_units(&self, decimals: u32) -> String {
        // past 10^38 every amount is below one whole token
        let (whole, frac) = match 10u128.checked_pow(decimals) {
            Some(scale) => (self.0 / scale, self.0 % scale),
            None => (0, self.0),
        };
        if frac == 0 {
            return whole.to_string();
        }
        let frac = format!("{:0>width$}", frac, width = decimals as usize);
        format!("{}.{}", whole, frac.trim_end_matches('0'))
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(value as u128)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(AmountError::Invalid(s.to_string()));
        }
        s.parse::<u128>()
            .map(Amount)
            .map_err(|_| AmountError::Overflow)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a decimal string or non-negative integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount(v as u128))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Amount, E> {
        Ok(Amount(v))
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}
