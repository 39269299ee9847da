//! GPU fact parsing for tool output
//!
//! Linux has no structured local source for the display adapter's vendor,
//! product or driver, so these come from:
//! - `lshw -class display` for vendor, product and configuration
//! - `modinfo <driver>` for the driver's firmware version

use super::provider::clean_text;

/// Take the value of the first `label: value` line in lshw output
///
/// lshw indents its fields, e.g. `       vendor: Intel Corporation`.
pub fn lshw_field(output: &str, label: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let rest = line.trim_start().strip_prefix(label)?;
        let value = rest.strip_prefix(':')?;
        let value = clean_text(value);
        (!value.is_empty()).then_some(value)
    })
}

/// Extract the kernel driver name from an lshw `configuration` value
///
/// Format: `driver=i915 latency=0`
pub fn driver_from_configuration(configuration: &str) -> Option<String> {
    configuration
        .split_whitespace()
        .find_map(|param| param.strip_prefix("driver="))
        .filter(|driver| !driver.is_empty())
        .map(str::to_string)
}

/// Take the first `firmware:` entry printed by modinfo
///
/// Format: `firmware:       i915/tgl_dmc_ver2_12.bin`
pub fn modinfo_firmware(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let value = clean_text(line.strip_prefix("firmware:")?);
        (!value.is_empty()).then_some(value)
    })
}
