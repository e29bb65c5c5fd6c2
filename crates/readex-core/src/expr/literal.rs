//! Constant literal values

use crate::error::ReadexError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Value carried by a Constant node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Literal {
    Null,
    Bool(bool),
    /// Integral value; `int` or `long` according to the declared type
    Integer(i64),
    Decimal(DecimalLiteral),
    Double(f64),
    Char(char),
    String(String),
}

impl Literal {
    /// Whether the literal renders with a leading minus sign
    pub fn is_negative(&self) -> bool {
        match self {
            Literal::Integer(value) => *value < 0,
            Literal::Decimal(value) => value.is_negative(),
            Literal::Double(value) => value.is_finite() && value.is_sign_negative(),
            _ => false,
        }
    }
}

/// Exact decimal text such as `1.15` or `-0.500`
///
/// Kept as validated text so every digit, including trailing zeros, renders
/// exactly as it was written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DecimalLiteral(String);

impl DecimalLiteral {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.starts_with('-')
    }
}

impl FromStr for DecimalLiteral {
    type Err = ReadexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('-').unwrap_or(s);
        let (integral, fraction) = match digits.split_once('.') {
            Some((integral, fraction)) => (integral, Some(fraction)),
            None => (digits, None),
        };
        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(integral) || fraction.is_some_and(|f| !all_digits(f)) {
            return Err(ReadexError::invalid_literal("decimal", s));
        }
        Ok(DecimalLiteral(s.to_string()))
    }
}

impl TryFrom<String> for DecimalLiteral {
    type Error = ReadexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DecimalLiteral> for String {
    fn from(value: DecimalLiteral) -> Self {
        value.0
    }
}

impl fmt::Display for DecimalLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Integer(value.into())
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Integer(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Double(value)
    }
}

impl From<char> for Literal {
    fn from(value: char) -> Self {
        Literal::Char(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

impl From<DecimalLiteral> for Literal {
    fn from(value: DecimalLiteral) -> Self {
        Literal::Decimal(value)
    }
}
