//! Structured management-interface source
//!
//! Issues class/property queries (`SELECT Name FROM CIM_Processor`) against a
//! management provider and reads one value per returned record. The
//! provider's declared types are not trusted; see [`ProviderValue`].

use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

use super::cpu::Architecture;
use super::provider::ProviderValue;
use super::PlatformInfoSource;
use crate::error::{SysError, SysResult};

const PROCESSOR: &str = "CIM_Processor";
const PHYSICAL_MEMORY: &str = "CIM_PhysicalMemory";
const OPERATING_SYSTEM: &str = "Win32_OperatingSystem";
const VIDEO_CONTROLLER: &str = "Win32_VideoController";

/// A session able to run class/property queries
pub trait ManagementQuery {
    /// One value per record returned for `SELECT property FROM class`
    fn query(&self, class: &str, property: &str) -> SysResult<Vec<ProviderValue>>;
}

/// Claim on a process-wide session slot
///
/// Management sessions are process global; while a guard is alive, further
/// `acquire` calls on the same slot fail with `Init`. Dropping the guard
/// frees the slot.
pub struct SessionGuard {
    slot: &'static AtomicBool,
}

impl SessionGuard {
    pub fn acquire(slot: &'static AtomicBool, provider: &str) -> SysResult<Self> {
        if slot.swap(true, Ordering::SeqCst) {
            return Err(SysError::Init {
                code: None,
                message: format!("a {} session is already open in this process", provider),
            });
        }
        Ok(Self { slot })
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.slot.store(false, Ordering::SeqCst);
    }
}

/// [`PlatformInfoSource`] backed by a management provider
pub struct ManagementSource<Q> {
    session: Q,
}

impl<Q: ManagementQuery> ManagementSource<Q> {
    pub fn new(session: Q) -> Self {
        Self { session }
    }

    /// Non-empty values for a property, or `FieldNotFound` if there are none
    fn values(&self, class: &str, property: &str) -> SysResult<Vec<ProviderValue>> {
        let values: Vec<ProviderValue> = self
            .session
            .query(class, property)?
            .into_iter()
            .filter(|value| !value.is_empty())
            .collect();

        debug!(class, property, records = values.len(), "management query");

        if values.is_empty() {
            return Err(SysError::not_found(
                format!("{}.{}", class, property),
                "management provider",
            ));
        }
        Ok(values)
    }

    /// Multi-record facts (several GPUs, several CPUs) report the first record
    fn first(&self, class: &str, property: &str) -> SysResult<ProviderValue> {
        let mut values = self.values(class, property)?;
        Ok(values.swap_remove(0))
    }

    fn first_text(&self, class: &str, property: &str) -> SysResult<String> {
        self.first(class, property)?.to_text(property)
    }
}

impl<Q: ManagementQuery> PlatformInfoSource for ManagementSource<Q> {
    fn cpu_model(&self) -> SysResult<String> {
        self.first_text(PROCESSOR, "Name")
    }

    fn cpu_architecture(&self) -> SysResult<Architecture> {
        let width = self
            .first(PROCESSOR, "AddressWidth")?
            .to_unsigned("AddressWidth")?;
        Ok(Architecture::from_address_width(width))
    }

    fn ram_total_bytes(&self) -> SysResult<u64> {
        // Capacity is reported per installed module
        self.values(PHYSICAL_MEMORY, "Capacity")?
            .iter()
            .try_fold(0u64, |total, module| {
                let capacity = module.to_unsigned("Capacity")?;
                total.checked_add(capacity).ok_or_else(|| {
                    SysError::parse("Capacity", format!("{} + {}", total, capacity))
                })
            })
    }

    fn os_name(&self) -> SysResult<String> {
        self.first_text(OPERATING_SYSTEM, "Caption")
    }

    fn os_version(&self) -> SysResult<String> {
        self.first_text(OPERATING_SYSTEM, "Version")
    }

    fn gpu_vendor(&self) -> SysResult<String> {
        self.first_text(VIDEO_CONTROLLER, "AdapterCompatibility")
    }

    fn gpu_name(&self) -> SysResult<String> {
        self.first_text(VIDEO_CONTROLLER, "Name")
    }

    fn gpu_driver(&self) -> SysResult<String> {
        self.first_text(VIDEO_CONTROLLER, "DriverVersion")
    }
}
