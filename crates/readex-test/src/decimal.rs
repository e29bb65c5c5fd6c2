//! Exact fixed-point decimal used by the reference evaluator

use crate::eval::EvalError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Largest number of fractional digits a value may carry
pub const MAX_SCALE: u32 = 28;

/// `mantissa / 10^scale`
///
/// Arithmetic keeps trailing zeros (`55000 * 1.15` is `63250.00`) while
/// comparison and equality go by numeric value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Decimal {
    mantissa: i128,
    scale: u32,
}

impl Decimal {
    pub const ZERO: Decimal = Decimal {
        mantissa: 0,
        scale: 0,
    };

    pub fn new(mantissa: i128, scale: u32) -> Result<Self, EvalError> {
        if scale > MAX_SCALE {
            return Err(EvalError::Overflow("decimal scale"));
        }
        Ok(Self { mantissa, scale })
    }

    pub fn mantissa(self) -> i128 {
        self.mantissa
    }

    pub fn scale(self) -> u32 {
        self.scale
    }

    pub fn checked_add(self, other: Decimal) -> Result<Decimal, EvalError> {
        let (a, b, scale) = self.aligned(other)?;
        let mantissa = a.checked_add(b).ok_or(EvalError::Overflow("decimal addition"))?;
        Decimal::new(mantissa, scale)
    }

    pub fn checked_sub(self, other: Decimal) -> Result<Decimal, EvalError> {
        let (a, b, scale) = self.aligned(other)?;
        let mantissa = a.checked_sub(b).ok_or(EvalError::Overflow("decimal subtraction"))?;
        Decimal::new(mantissa, scale)
    }

    pub fn checked_mul(self, other: Decimal) -> Result<Decimal, EvalError> {
        let mantissa = self
            .mantissa
            .checked_mul(other.mantissa)
            .ok_or(EvalError::Overflow("decimal multiplication"))?;
        Decimal::new(mantissa, self.scale + other.scale)
    }

    pub fn to_f64(self) -> f64 {
        self.mantissa as f64 / 10f64.powi(self.scale as i32)
    }

    fn aligned(self, other: Decimal) -> Result<(i128, i128, u32), EvalError> {
        let scale = self.scale.max(other.scale);
        let widen = |value: Decimal| {
            pow10(scale - value.scale)
                .and_then(|factor| value.mantissa.checked_mul(factor))
                .ok_or(EvalError::Overflow("decimal rescale"))
        };
        Ok((widen(self)?, widen(other)?, scale))
    }

    /// Integer part and the fraction scaled to `MAX_SCALE` digits
    fn split(self) -> (i128, i128) {
        // Scale never exceeds MAX_SCALE, so both factors fit.
        let unit = pow10(self.scale).unwrap_or(1);
        let spread = pow10(MAX_SCALE - self.scale).unwrap_or(1);
        (self.mantissa / unit, (self.mantissa % unit) * spread)
    }
}

fn pow10(exponent: u32) -> Option<i128> {
    10i128.checked_pow(exponent)
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Decimal {
            mantissa: i128::from(value),
            scale: 0,
        }
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.split().cmp(&other.split())
    }
}

impl FromStr for Decimal {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EvalError::InvalidDecimal(s.to_string());
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (integral, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if integral.is_empty()
            || (digits.contains('.') && fraction.is_empty())
            || !integral.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let mut mantissa: i128 = 0;
        for b in integral.bytes().chain(fraction.bytes()) {
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add(i128::from(b - b'0')))
                .ok_or_else(invalid)?;
        }
        if negative {
            mantissa = -mantissa;
        }
        let scale = u32::try_from(fraction.len()).map_err(|_| invalid())?;
        Decimal::new(mantissa, scale)
    }
}

impl TryFrom<String> for Decimal {
    type Error = EvalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Decimal> for String {
    fn from(value: Decimal) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.unsigned_abs().to_string();
        let scale = self.scale as usize;
        let padded = if digits.len() <= scale {
            format!("{}{digits}", "0".repeat(scale + 1 - digits.len()))
        } else {
            digits
        };
        if self.mantissa < 0 {
            f.write_str("-")?;
        }
        let (integral, fraction) = padded.split_at(padded.len() - scale);
        f.write_str(integral)?;
        if !fraction.is_empty() {
            write!(f, ".{fraction}")?;
        }
        Ok(())
    }
}
