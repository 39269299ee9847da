//! Hardware and OS property queries
//!
//! One [`PlatformInfoSource`] is picked at startup for the running OS:
//! - Windows: WMI (`ROOT\CIMV2`) through [`management::ManagementSource`]
//! - Linux: /proc files, uname(2), lshw and modinfo through [`flatfile::FlatFileSource`]
//!
//! [`SystemProperties`] wraps the source, memoizes each fact and formats
//! capacities. Storage facts use a portable volume query instead of the
//! platform source.

pub mod cpu;
pub mod flatfile;
pub mod gpu;
pub mod management;
pub mod provider;
pub mod storage;
mod system;
pub mod tools;
#[cfg(target_os = "windows")]
pub mod wmi_session;

pub use cpu::Architecture;
pub use system::{Fact, SystemProperties, SystemReport};

use crate::config::Config;
use crate::error::SysResult;

/// Per-platform access to the raw facts
///
/// Implementations return either the value or a typed error, never a
/// placeholder.
pub trait PlatformInfoSource {
    fn cpu_model(&self) -> SysResult<String>;
    fn cpu_architecture(&self) -> SysResult<Architecture>;
    /// Total memory in bytes
    fn ram_total_bytes(&self) -> SysResult<u64>;
    fn os_name(&self) -> SysResult<String>;
    fn os_version(&self) -> SysResult<String>;
    fn gpu_vendor(&self) -> SysResult<String>;
    fn gpu_name(&self) -> SysResult<String>;
    fn gpu_driver(&self) -> SysResult<String>;
}

/// Build the property source for the platform this binary was compiled for
#[cfg(target_os = "linux")]
pub fn platform_source(config: &Config) -> SysResult<Box<dyn PlatformInfoSource>> {
    Ok(Box::new(flatfile::FlatFileSource::new(
        &config.linux,
        tools::ProcessRunner,
    )))
}

/// Build the property source for the platform this binary was compiled for
#[cfg(target_os = "windows")]
pub fn platform_source(_config: &Config) -> SysResult<Box<dyn PlatformInfoSource>> {
    let session = wmi_session::WmiSession::connect()?;
    Ok(Box::new(management::ManagementSource::new(session)))
}

/// Build the property source for the platform this binary was compiled for
#[cfg(not(any(target_os = "linux", target_os = "windows")))]
pub fn platform_source(_config: &Config) -> SysResult<Box<dyn PlatformInfoSource>> {
    Err(crate::error::SysError::Unsupported {
        platform: std::env::consts::OS.to_string(),
    })
}
