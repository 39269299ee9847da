//! Capacity units
//!
//! Byte counts are converted by integer division by 1024 per step, so
//! values are truncated rather than rounded.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display unit for memory and storage capacities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Bytes,
    #[serde(alias = "KB")]
    Kb,
    #[serde(alias = "MB")]
    Mb,
    #[default]
    #[serde(alias = "GB")]
    Gb,
}

impl Unit {
    /// Number of 1024 divisions applied for this unit
    fn steps(self) -> u32 {
        match self {
            Unit::Bytes => 0,
            Unit::Kb => 1,
            Unit::Mb => 2,
            Unit::Gb => 3,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Bytes => write!(f, "bytes"),
            Unit::Kb => write!(f, "KB"),
            Unit::Mb => write!(f, "MB"),
            Unit::Gb => write!(f, "GB"),
        }
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bytes" | "byte" | "b" => Ok(Unit::Bytes),
            "kb" | "k" => Ok(Unit::Kb),
            "mb" | "m" => Ok(Unit::Mb),
            "gb" | "g" => Ok(Unit::Gb),
            other => Err(format!(
                "unknown unit '{}' (expected bytes, kb, mb or gb)",
                other
            )),
        }
    }
}

/// Convert a byte count into `unit`
pub fn convert(bytes: u64, unit: Unit) -> u64 {
    (0..unit.steps()).fold(bytes, |value, _| value / 1024)
}

/// Suffix printed after a converted value
pub fn notation(unit: Unit) -> &'static str {
    match unit {
        Unit::Bytes => " bytes",
        Unit::Kb => "KB",
        Unit::Mb => "MB",
        Unit::Gb => "GB",
    }
}

/// Converted value followed by its notation, e.g. `"8GB"`
pub fn format_capacity(bytes: u64, unit: Unit) -> String {
    format!("{}{}", convert(bytes, unit), notation(unit))
}
