//! CPU fact parsing
//!
//! Architecture is reported differently per platform:
//! - Windows: WMI `AddressWidth` (32 or 64)
//! - Linux: the `lm` (long mode) flag in /proc/cpuinfo
//!
//! Both are normalized to [`Architecture`].

use serde::{Deserialize, Serialize};
use std::fmt;

use super::provider::clean_text;

/// Normalized CPU address width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Architecture {
    Bits32,
    Bits64,
}

impl Architecture {
    /// From a management provider's address width in bits
    pub fn from_address_width(width: u64) -> Self {
        if width == 64 {
            Architecture::Bits64
        } else {
            Architecture::Bits32
        }
    }

    /// From a cpuinfo `flags` value
    pub fn from_cpu_flags(flags: &str) -> Self {
        if flags.split_whitespace().any(|flag| flag == "lm") {
            Architecture::Bits64
        } else {
            Architecture::Bits32
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Architecture::Bits32 => write!(f, "32"),
            Architecture::Bits64 => write!(f, "64"),
        }
    }
}

/// Find `label` in cpuinfo-style content and return the text after the colon
///
/// Format: `model name\t: AMD Ryzen 7 5800X`. The first matching line wins
/// (cpuinfo repeats each block per logical processor). An empty value counts
/// as missing.
pub fn cpuinfo_field(content: &str, label: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if key.trim() != label {
            return None;
        }
        let value = clean_text(value);
        (!value.is_empty()).then_some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CPUINFO: &str = "processor\t: 0\n\
vendor_id\t: GenuineIntel\n\
model name\t: Intel(R) Core(TM) i7-8550U CPU @ 1.80GHz\n\
flags\t\t: fpu vme de pse tsc msr pae mce cx8 apic sep mtrr pge mca cmov lm constant_tsc\n\
\n\
processor\t: 1\n\
model name\t: Intel(R) Core(TM) i7-8550U CPU @ 1.80GHz\n";

    #[test]
    fn test_cpuinfo_field_takes_text_after_colon() {
        assert_eq!(
            cpuinfo_field(CPUINFO, "model name").as_deref(),
            Some("Intel(R) Core(TM) i7-8550U CPU @ 1.80GHz")
        );
        assert_eq!(
            cpuinfo_field(CPUINFO, "vendor_id").as_deref(),
            Some("GenuineIntel")
        );
    }

    #[test]
    fn test_cpuinfo_field_missing() {
        assert_eq!(cpuinfo_field(CPUINFO, "Hardware"), None);
        assert_eq!(cpuinfo_field("model name\t:\n", "model name"), None);
    }

    #[test]
    fn test_label_must_match_whole_key() {
        assert_eq!(cpuinfo_field("model\t\t: 142\n", "model name"), None);
        assert_eq!(cpuinfo_field("model name\t: X\n", "model").as_deref(), None);
    }

    #[test]
    fn test_architecture_normalization_agrees_across_sources() {
        let from_wmi = Architecture::from_address_width(64);
        let from_flags = Architecture::from_cpu_flags("fpu vme lm sse2");
        assert_eq!(from_wmi, from_flags);
        assert_eq!(from_wmi.to_string(), "64");

        assert_eq!(Architecture::from_address_width(32).to_string(), "32");
        assert_eq!(Architecture::from_cpu_flags("fpu vme sse2").to_string(), "32");
    }

    #[test]
    fn test_lm_flag_must_be_whole_word() {
        assert_eq!(
            Architecture::from_cpu_flags("fpu lmx slm"),
            Architecture::Bits32
        );
        assert_eq!(Architecture::from_cpu_flags("lm"), Architecture::Bits64);
    }
}
