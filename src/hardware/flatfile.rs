//! Flat-file / kernel-interface / external-tool source (Linux)
//!
//! - CPU: /proc/cpuinfo
//! - Memory: /proc/meminfo `MemTotal`
//! - OS: uname(2)
//! - GPU: `lshw -class display`, then `modinfo <driver>` for the driver
//!
//! Missing tools or missing fields are errors; there is no fallback source.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::cpu::{cpuinfo_field, Architecture};
use super::gpu::{driver_from_configuration, lshw_field, modinfo_firmware};
use super::provider::clean_text;
use super::tools::CommandRunner;
use super::PlatformInfoSource;
use crate::config::LinuxConfig;
use crate::error::{SysError, SysResult};

/// Identity fields reported by uname(2)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsIdentity {
    pub sysname: String,
    pub release: String,
    pub version: String,
}

pub type IdentityFn = fn() -> SysResult<OsIdentity>;

/// [`PlatformInfoSource`] reading kernel pseudo-files and tool output
pub struct FlatFileSource<R> {
    cpuinfo_path: PathBuf,
    meminfo_path: PathBuf,
    lshw_program: String,
    modinfo_program: String,
    runner: R,
    identity: IdentityFn,
}

impl<R: CommandRunner> FlatFileSource<R> {
    /// Source using uname(2) for OS identity
    #[cfg(target_os = "linux")]
    pub fn new(config: &LinuxConfig, runner: R) -> Self {
        Self::with_identity(config, runner, uname_identity)
    }

    pub fn with_identity(config: &LinuxConfig, runner: R, identity: IdentityFn) -> Self {
        Self {
            cpuinfo_path: config.cpuinfo_path.clone(),
            meminfo_path: config.meminfo_path.clone(),
            lshw_program: config.lshw_program.clone(),
            modinfo_program: config.modinfo_program.clone(),
            runner,
            identity,
        }
    }

    fn cpu_field(&self, label: &str) -> SysResult<String> {
        let content = read_pseudo_file(&self.cpuinfo_path)?;
        cpuinfo_field(&content, label).ok_or_else(|| {
            SysError::not_found(
                format!("CPU info \"{}\"", label),
                self.cpuinfo_path.display().to_string(),
            )
        })
    }

    fn lshw_display_field(&self, label: &str) -> SysResult<String> {
        let output = self
            .runner
            .run(&self.lshw_program, &["-class", "display"])?;
        lshw_field(&output, label).ok_or_else(|| {
            SysError::not_found(format!("GPU {}", label), self.lshw_program.as_str())
        })
    }
}

impl<R: CommandRunner> PlatformInfoSource for FlatFileSource<R> {
    fn cpu_model(&self) -> SysResult<String> {
        self.cpu_field("model name")
    }

    fn cpu_architecture(&self) -> SysResult<Architecture> {
        let flags = self.cpu_field("flags")?;
        Ok(Architecture::from_cpu_flags(&flags))
    }

    fn ram_total_bytes(&self) -> SysResult<u64> {
        let content = read_pseudo_file(&self.meminfo_path)?;
        meminfo_total_bytes(&content).ok_or_else(|| {
            SysError::not_found("MemTotal", self.meminfo_path.display().to_string())
        })
    }

    fn os_name(&self) -> SysResult<String> {
        let identity = (self.identity)()?;
        let name = clean_text(&format!("{} {}", identity.sysname, identity.release));
        if name.is_empty() {
            return Err(SysError::not_found("sysname", "uname"));
        }
        Ok(name)
    }

    fn os_version(&self) -> SysResult<String> {
        let version = clean_text(&(self.identity)()?.version);
        if version.is_empty() {
            return Err(SysError::not_found("version", "uname"));
        }
        Ok(version)
    }

    fn gpu_vendor(&self) -> SysResult<String> {
        self.lshw_display_field("vendor")
    }

    fn gpu_name(&self) -> SysResult<String> {
        self.lshw_display_field("product")
    }

    fn gpu_driver(&self) -> SysResult<String> {
        let configuration = self.lshw_display_field("configuration")?;
        let driver = driver_from_configuration(&configuration).ok_or_else(|| {
            SysError::not_found("driver", format!("{} configuration", self.lshw_program))
        })?;
        debug!(%driver, "looking up display driver firmware");

        let output = self.runner.run(&self.modinfo_program, &[driver.as_str()])?;
        modinfo_firmware(&output).ok_or_else(|| {
            SysError::not_found(
                "firmware",
                format!("{} {}", self.modinfo_program, driver),
            )
        })
    }
}

fn read_pseudo_file(path: &Path) -> SysResult<String> {
    debug!(path = %path.display(), "reading pseudo-file");
    fs::read_to_string(path).map_err(|e| {
        SysError::query(
            e.raw_os_error(),
            format!("Failed to read {}: {}", path.display(), e),
        )
    })
}

/// Parse `MemTotal:       16384000 kB` into bytes
pub fn meminfo_total_bytes(content: &str) -> Option<u64> {
    let line = content.lines().find(|l| l.starts_with("MemTotal:"))?;
    let mut parts = line.split_whitespace().skip(1);
    let value: u64 = parts.next()?.parse().ok()?;
    match parts.next() {
        Some("kB") | Some("KB") | Some("kb") => value.checked_mul(1024),
        None => Some(value),
        Some(_) => None,
    }
}

#[cfg(target_os = "linux")]
fn uname_identity() -> SysResult<OsIdentity> {
    let uts = nix::sys::utsname::uname().map_err(|errno| {
        SysError::query(
            Some(errno as i32),
            format!("Failed to access utsname structure: {}", errno.desc()),
        )
    })?;

    Ok(OsIdentity {
        sysname: uts.sysname().to_string_lossy().into_owned(),
        release: uts.release().to_string_lossy().into_owned(),
        version: uts.version().to_string_lossy().into_owned(),
    })
}
