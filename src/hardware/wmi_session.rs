//! WMI session (Windows)
//!
//! Connects to `ROOT\CIMV2` once. The underlying COM session is process
//! global, so only one `WmiSession` may be alive at a time; a second
//! `connect` fails with an initialization error until the first is dropped.
//! The session is `!Send` and must stay on the thread that created it.

use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use tracing::debug;
use wmi::{Variant, WMIConnection, WMIError};

use super::management::{ManagementQuery, SessionGuard};
use super::provider::ProviderValue;
use crate::error::{SysError, SysResult};

static SESSION_OPEN: AtomicBool = AtomicBool::new(false);

pub struct WmiSession {
    // Dropped before the guard, so the slot frees only once COM is released
    connection: WMIConnection,
    _guard: SessionGuard,
}

impl WmiSession {
    /// Initialise COM, set security and connect to the CIMV2 namespace
    pub fn connect() -> SysResult<Self> {
        let guard = SessionGuard::acquire(&SESSION_OPEN, "WMI")?;

        let connection = WMIConnection::new().map_err(|e| SysError::Init {
            code: hresult(&e),
            message: format!("Failed to connect to WMI: {}", e),
        })?;
        debug!("connected to WMI ROOT\\CIMV2");

        Ok(Self {
            connection,
            _guard: guard,
        })
    }
}

/// HRESULT carried by a WMI error, when it has one
fn hresult(error: &WMIError) -> Option<i32> {
    match error {
        WMIError::HResultError { hres } => Some(*hres),
        _ => None,
    }
}

impl ManagementQuery for WmiSession {
    fn query(&self, class: &str, property: &str) -> SysResult<Vec<ProviderValue>> {
        let wql = format!("SELECT {} FROM {}", property, class);
        debug!(%wql, "WMI query");

        let records: Vec<HashMap<String, Variant>> =
            self.connection.raw_query(&wql).map_err(|e| {
                SysError::query(
                    hresult(&e),
                    format!(
                        "Failed to perform query for WMI object {}.{}: {}",
                        class, property, e
                    ),
                )
            })?;

        // Property names come back in the provider's own casing
        Ok(records
            .iter()
            .map(|record| {
                record
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(property))
                    .map(|(_, value)| variant_value(value))
                    .unwrap_or(ProviderValue::Empty)
            })
            .collect())
    }
}

/// Map a WMI variant by its runtime representation, not the declared CIM type
fn variant_value(value: &Variant) -> ProviderValue {
    match value {
        Variant::String(s) => ProviderValue::Text(s.clone()),
        Variant::I1(v) => ProviderValue::Signed(i64::from(*v)),
        Variant::I2(v) => ProviderValue::Signed(i64::from(*v)),
        Variant::I4(v) => ProviderValue::Signed(i64::from(*v)),
        Variant::I8(v) => ProviderValue::Signed(*v),
        Variant::UI1(v) => ProviderValue::Unsigned(u64::from(*v)),
        Variant::UI2(v) => ProviderValue::Unsigned(u64::from(*v)),
        Variant::UI4(v) => ProviderValue::Unsigned(u64::from(*v)),
        Variant::UI8(v) => ProviderValue::Unsigned(*v),
        Variant::Bool(v) => ProviderValue::Unsigned(u64::from(*v)),
        _ => ProviderValue::Empty,
    }
}
