//! sysprops - hardware and OS facts for the calling process
//!
//! Reports CPU model/architecture, total memory, OS name/version,
//! GPU vendor/name/driver and primary-drive capacity/free space.
//! Read-only: nothing here changes system state.
//!
//! ```no_run
//! use sysprops::{Config, SystemProperties, Unit};
//!
//! let props = SystemProperties::from_config(&Config::default())?;
//! println!("{}", props.cpu_model()?);
//! println!("{}", props.ram_total(Unit::Gb)?);
//! # Ok::<(), sysprops::SysError>(())
//! ```

pub mod config;
pub mod error;
pub mod hardware;
pub mod logging;
pub mod units;

pub use config::Config;
pub use error::{SysError, SysResult};
pub use hardware::{Architecture, PlatformInfoSource, SystemProperties, SystemReport};
pub use units::{convert, format_capacity, notation, Unit};
