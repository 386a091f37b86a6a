//! Exact decimal values.
//!
//! Decimals are carried as a 128-bit unscaled mantissa plus a base-10 scale so
//! that values read from the wire keep every digit of their JSON text.

use crate::error::ConversionError;
use std::fmt;
use std::str::FromStr;

/// Fixed-point decimal: `mantissa * 10^-scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Decimal {
    mantissa: i128,
    scale: u32,
}

impl Decimal {
    pub const ZERO: Decimal = Decimal {
        mantissa: 0,
        scale: 0,
    };

    /// Largest scale a parsed decimal may carry.
    pub const MAX_SCALE: u32 = 38;

    /// Create a decimal from an unscaled value and a scale.
    pub fn new(mantissa: i128, scale: u32) -> Self {
        Self { mantissa, scale }
    }

    pub fn mantissa(&self) -> i128 {
        self.mantissa
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    /// Nearest `f64` (may lose precision).
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(0.0)
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Self::new(value as i128, 0)
    }
}

impl FromStr for Decimal {
    type Err = ConversionError;

    /// Parse decimal text such as `-12.50`, `3`, `.5` or `1.25E+3`.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || ConversionError::InvalidFormat(format!("Invalid decimal: {}", text));
        let overflow = || ConversionError::NumericOverflow(text.to_string());

        let trimmed = text.trim();
        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (number, exponent) = match unsigned.find(['e', 'E']) {
            Some(at) => {
                let exponent: i32 = unsigned[at + 1..].parse().map_err(|_| invalid())?;
                (&unsigned[..at], exponent)
            }
            None => (unsigned, 0),
        };

        let (integer, fraction) = number.split_once('.').unwrap_or((number, ""));
        if integer.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }

        let mut mantissa: i128 = 0;
        for c in integer.chars().chain(fraction.chars()) {
            let digit = c.to_digit(10).ok_or_else(invalid)?;
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add(digit as i128))
                .ok_or_else(overflow)?;
        }

        let mut scale = fraction.len() as i64 - exponent as i64;
        if mantissa == 0 {
            return Ok(Self::new(0, scale.clamp(0, Self::MAX_SCALE as i64) as u32));
        }
        // A non-zero mantissa overflows i128 after at most 38 steps.
        while scale < 0 {
            mantissa = mantissa.checked_mul(10).ok_or_else(overflow)?;
            scale += 1;
        }
        if scale > Self::MAX_SCALE as i64 {
            return Err(overflow());
        }
        let scale = scale as u32;

        Ok(Self::new(if negative { -mantissa } else { mantissa }, scale))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.unsigned_abs().to_string();
        let sign = if self.mantissa < 0 { "-" } else { "" };
        let scale = self.scale as usize;

        if scale == 0 {
            return write!(f, "{}{}", sign, digits);
        }

        let mut padded = "0".repeat((scale + 1).saturating_sub(digits.len()));
        padded.push_str(&digits);
        let (integer, fraction) = padded.split_at(padded.len() - scale);
        write!(f, "{}{}.{}", sign, integer, fraction)
    }
}
