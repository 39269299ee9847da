//! Loosely-typed provider values
//!
//! Management providers do not reliably report the type they declare: a
//! capacity may come back as a number from one class and as a decimal string
//! from another. Values are therefore carried as a tagged union and only
//! coerced when an accessor knows what it needs.

use crate::error::{SysError, SysResult};

/// A single property value as read from a provider record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderValue {
    Text(String),
    Signed(i64),
    Unsigned(u64),
    /// Null, empty or a representation we do not read (arrays, objects)
    Empty,
}

impl ProviderValue {
    pub fn is_empty(&self) -> bool {
        match self {
            ProviderValue::Empty => true,
            ProviderValue::Text(s) => clean_text(s).is_empty(),
            _ => false,
        }
    }

    /// Read the value as text, whatever its runtime representation
    pub fn to_text(&self, field: &str) -> SysResult<String> {
        match self {
            ProviderValue::Text(s) => {
                let cleaned = clean_text(s);
                if cleaned.is_empty() {
                    Err(SysError::parse(field, s.as_str()))
                } else {
                    Ok(cleaned)
                }
            }
            ProviderValue::Signed(v) => Ok(v.to_string()),
            ProviderValue::Unsigned(v) => Ok(v.to_string()),
            ProviderValue::Empty => Err(SysError::parse(field, "")),
        }
    }

    /// Read the value as an unsigned integer
    ///
    /// Text is parsed as a decimal number; negative signed values are rejected.
    pub fn to_unsigned(&self, field: &str) -> SysResult<u64> {
        match self {
            ProviderValue::Unsigned(v) => Ok(*v),
            ProviderValue::Signed(v) => {
                u64::try_from(*v).map_err(|_| SysError::parse(field, v.to_string()))
            }
            ProviderValue::Text(s) => {
                let cleaned = clean_text(s);
                cleaned
                    .parse::<u64>()
                    .map_err(|_| SysError::parse(field, cleaned.as_str()))
            }
            ProviderValue::Empty => Err(SysError::parse(field, "")),
        }
    }
}

/// Strip control and padding characters, then surrounding whitespace
pub fn clean_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}
