//! System properties facade

use once_cell::unsync::OnceCell;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::cpu::Architecture;
use super::storage::{default_root, SysinfoVolumes, VolumeSpace, VolumeSpaceSource};
use super::{platform_source, PlatformInfoSource};
use crate::config::Config;
use crate::error::SysResult;
use crate::units::{format_capacity, Unit};

/// Facts computed once per [`SystemProperties`] instance
#[derive(Default)]
struct FactCache {
    cpu_model: OnceCell<String>,
    cpu_architecture: OnceCell<Architecture>,
    ram_total: OnceCell<u64>,
    os_name: OnceCell<String>,
    os_version: OnceCell<String>,
    gpu_vendor: OnceCell<String>,
    gpu_name: OnceCell<String>,
    gpu_driver: OnceCell<String>,
    volume: OnceCell<VolumeSpace>,
}

/// Named accessors for CPU, memory, OS, GPU and storage facts
///
/// Each fact is queried on first use and then reused for the life of the
/// instance, so results describe the system as of the first call. This
/// matters for total memory on Linux (memory visible to the kernel, not
/// installed capacity) and for storage free space. Errors are returned to
/// the caller and not cached.
pub struct SystemProperties {
    source: Box<dyn PlatformInfoSource>,
    volumes: Box<dyn VolumeSpaceSource>,
    storage_root: PathBuf,
    default_unit: Unit,
    cache: FactCache,
}

impl SystemProperties {
    pub fn new(source: Box<dyn PlatformInfoSource>, volumes: Box<dyn VolumeSpaceSource>) -> Self {
        Self {
            source,
            volumes,
            storage_root: default_root(),
            default_unit: Unit::default(),
            cache: FactCache::default(),
        }
    }

    /// Properties for the running platform, configured from `config`
    pub fn from_config(config: &Config) -> SysResult<Self> {
        let source = platform_source(config)?;
        Ok(Self::new(source, Box::new(SysinfoVolumes))
            .with_storage_root(&config.storage.root)
            .with_default_unit(config.display.unit))
    }

    pub fn with_storage_root(mut self, root: impl AsRef<Path>) -> Self {
        self.storage_root = root.as_ref().to_path_buf();
        self
    }

    /// Unit used when a capacity accessor is given `None`
    pub fn with_default_unit(mut self, unit: Unit) -> Self {
        self.default_unit = unit;
        self
    }

    fn unit(&self, unit: impl Into<Option<Unit>>) -> Unit {
        unit.into().unwrap_or(self.default_unit)
    }

    pub fn cpu_model(&self) -> SysResult<String> {
        self.cache
            .cpu_model
            .get_or_try_init(|| self.source.cpu_model())
            .cloned()
    }

    /// `"64"` or `"32"` on every platform
    pub fn cpu_architecture(&self) -> SysResult<String> {
        self.cache
            .cpu_architecture
            .get_or_try_init(|| self.source.cpu_architecture())
            .map(ToString::to_string)
    }

    pub fn ram_total(&self, unit: impl Into<Option<Unit>>) -> SysResult<String> {
        let bytes = self
            .cache
            .ram_total
            .get_or_try_init(|| self.source.ram_total_bytes())?;
        Ok(format_capacity(*bytes, self.unit(unit)))
    }

    pub fn os_name(&self) -> SysResult<String> {
        self.cache
            .os_name
            .get_or_try_init(|| self.source.os_name())
            .cloned()
    }

    pub fn os_version(&self) -> SysResult<String> {
        self.cache
            .os_version
            .get_or_try_init(|| self.source.os_version())
            .cloned()
    }

    pub fn gpu_vendor(&self) -> SysResult<String> {
        self.cache
            .gpu_vendor
            .get_or_try_init(|| self.source.gpu_vendor())
            .cloned()
    }

    pub fn gpu_name(&self) -> SysResult<String> {
        self.cache
            .gpu_name
            .get_or_try_init(|| self.source.gpu_name())
            .cloned()
    }

    pub fn gpu_driver(&self) -> SysResult<String> {
        self.cache
            .gpu_driver
            .get_or_try_init(|| self.source.gpu_driver())
            .cloned()
    }

    fn volume(&self) -> SysResult<&VolumeSpace> {
        self.cache
            .volume
            .get_or_try_init(|| self.volumes.space(&self.storage_root))
    }

    /// Capacity of the volume holding the storage root
    pub fn storage_capacity(&self, unit: impl Into<Option<Unit>>) -> SysResult<String> {
        let total = self.volume()?.total_bytes;
        Ok(format_capacity(total, self.unit(unit)))
    }

    /// Space available to the current user on the volume holding the storage root
    ///
    /// Memoized with the capacity: the value is as of the first storage query,
    /// not live free space.
    pub fn storage_free(&self, unit: impl Into<Option<Unit>>) -> SysResult<String> {
        let available = self.volume()?.available_bytes;
        Ok(format_capacity(available, self.unit(unit)))
    }

    /// Query every fact, keeping each failure next to the fact it belongs to
    pub fn report(&self, unit: impl Into<Option<Unit>>) -> SystemReport {
        let unit = self.unit(unit);
        SystemReport {
            cpu_model: self.cpu_model().into(),
            cpu_architecture: self.cpu_architecture().into(),
            ram_total: self.ram_total(unit).into(),
            os_name: self.os_name().into(),
            os_version: self.os_version().into(),
            gpu_vendor: self.gpu_vendor().into(),
            gpu_name: self.gpu_name().into(),
            gpu_driver: self.gpu_driver().into(),
            storage_capacity: self.storage_capacity(unit).into(),
            storage_free: self.storage_free(unit).into(),
        }
    }
}

/// Outcome of one fact query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Fact {
    Value(String),
    Error(String),
}

impl From<SysResult<String>> for Fact {
    fn from(result: SysResult<String>) -> Self {
        match result {
            Ok(value) => Fact::Value(value),
            Err(e) => Fact::Error(e.to_string()),
        }
    }
}

impl Fact {
    pub fn is_value(&self) -> bool {
        matches!(self, Fact::Value(_))
    }
}

/// Every fact from one [`SystemProperties`]
#[derive(Debug, Clone, Serialize)]
pub struct SystemReport {
    pub cpu_model: Fact,
    pub cpu_architecture: Fact,
    pub ram_total: Fact,
    pub os_name: Fact,
    pub os_version: Fact,
    pub gpu_vendor: Fact,
    pub gpu_name: Fact,
    pub gpu_driver: Fact,
    pub storage_capacity: Fact,
    pub storage_free: Fact,
}

impl SystemReport {
    /// Label/fact pairs in display order
    pub fn entries(&self) -> [(&'static str, &Fact); 10] {
        [
            ("CPU model", &self.cpu_model),
            ("CPU architecture", &self.cpu_architecture),
            ("RAM total", &self.ram_total),
            ("OS name", &self.os_name),
            ("OS version", &self.os_version),
            ("GPU vendor", &self.gpu_vendor),
            ("GPU name", &self.gpu_name),
            ("GPU driver", &self.gpu_driver),
            ("Storage capacity", &self.storage_capacity),
            ("Storage free", &self.storage_free),
        ]
    }

    /// Display the report as a boxed table
    pub fn display(&self) -> String {
        const WIDTH: usize = 62;
        const LABEL_WIDTH: usize = 18;
        let mut output = String::new();

        output.push_str(&format!("╔{}╗\n", "═".repeat(WIDTH)));
        output.push_str(&format!("║{:^WIDTH$}║\n", "SYSTEM PROPERTIES"));
        output.push_str(&format!("╠{}╣\n", "═".repeat(WIDTH)));

        let content_width = WIDTH - 2 - LABEL_WIDTH;
        for (label, fact) in self.entries() {
            let text = match fact {
                Fact::Value(value) => value.clone(),
                Fact::Error(e) => format!("error: {}", e),
            };
            let text: String = text.chars().take(content_width).collect();
            output.push_str(&format!(
                "║ {:<LABEL_WIDTH$}{:<content_width$} ║\n",
                format!("{}:", label),
                text
            ));
        }

        output.push_str(&format!("╚{}╝", "═".repeat(WIDTH)));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LinuxConfig;
    use crate::error::SysError;
    use crate::hardware::flatfile::tests::{fixed_identity, fixture, FakeRunner};
    use crate::hardware::flatfile::FlatFileSource;
    use crate::hardware::management::tests::FakeProvider;
    use crate::hardware::management::ManagementSource;
    use crate::hardware::provider::ProviderValue;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Counts calls into the platform source
    struct CountingSource {
        calls: Rc<Cell<usize>>,
    }

    impl CountingSource {
        fn hit<T>(&self, value: T) -> SysResult<T> {
            self.calls.set(self.calls.get() + 1);
            Ok(value)
        }
    }

    impl PlatformInfoSource for CountingSource {
        fn cpu_model(&self) -> SysResult<String> {
            self.hit("Example CPU X1".to_string())
        }
        fn cpu_architecture(&self) -> SysResult<Architecture> {
            self.hit(Architecture::Bits64)
        }
        fn ram_total_bytes(&self) -> SysResult<u64> {
            self.hit(8_589_934_592)
        }
        fn os_name(&self) -> SysResult<String> {
            self.hit("Linux 6.1.0".to_string())
        }
        fn os_version(&self) -> SysResult<String> {
            self.hit("#1 SMP".to_string())
        }
        fn gpu_vendor(&self) -> SysResult<String> {
            self.hit("Intel Corporation".to_string())
        }
        fn gpu_name(&self) -> SysResult<String> {
            self.hit("UHD Graphics 620".to_string())
        }
        fn gpu_driver(&self) -> SysResult<String> {
            Err(SysError::not_found("firmware", "modinfo i915"))
        }
    }

    struct FixedVolume {
        calls: Rc<Cell<usize>>,
    }

    impl VolumeSpaceSource for FixedVolume {
        fn space(&self, root: &Path) -> SysResult<VolumeSpace> {
            self.calls.set(self.calls.get() + 1);
            Ok(VolumeSpace {
                mount_point: root.to_path_buf(),
                total_bytes: 512 * 1024 * 1024 * 1024,
                available_bytes: 100 * 1024 * 1024 * 1024 + 5,
            })
        }
    }

    fn counting() -> (SystemProperties, Rc<Cell<usize>>, Rc<Cell<usize>>) {
        let source_calls = Rc::new(Cell::new(0));
        let volume_calls = Rc::new(Cell::new(0));
        let props = SystemProperties::new(
            Box::new(CountingSource {
                calls: Rc::clone(&source_calls),
            }),
            Box::new(FixedVolume {
                calls: Rc::clone(&volume_calls),
            }),
        );
        (props, source_calls, volume_calls)
    }

    #[test]
    fn test_facts_are_queried_once() {
        let (props, source_calls, _) = counting();

        let first = props.cpu_model().unwrap();
        let second = props.cpu_model().unwrap();
        assert_eq!(first, second);
        assert_eq!(source_calls.get(), 1);

        props.ram_total(Unit::Gb).unwrap();
        props.ram_total(Unit::Mb).unwrap();
        assert_eq!(source_calls.get(), 2);
    }

    #[test]
    fn test_storage_queried_once_for_both_facts() {
        let (props, _, volume_calls) = counting();
        assert_eq!(props.storage_capacity(Unit::Gb).unwrap(), "512GB");
        assert_eq!(props.storage_free(Unit::Gb).unwrap(), "100GB");
        assert_eq!(props.storage_free(None).unwrap(), "100GB");
        assert_eq!(volume_calls.get(), 1);
    }

    #[test]
    fn test_errors_are_not_cached_as_values() {
        let (props, _, _) = counting();
        assert!(matches!(
            props.gpu_driver(),
            Err(SysError::FieldNotFound { .. })
        ));
        assert!(props.gpu_driver().is_err());
    }

    #[test]
    fn test_default_unit_is_gb_unless_configured() {
        let (props, _, _) = counting();
        assert_eq!(props.ram_total(None).unwrap(), "8GB");

        let props = props.with_default_unit(Unit::Mb);
        assert_eq!(props.ram_total(None).unwrap(), "8192MB");
        assert_eq!(props.ram_total(Unit::Bytes).unwrap(), "8589934592 bytes");
    }

    #[test]
    fn test_architecture_is_normalized_string() {
        let (props, _, _) = counting();
        assert_eq!(props.cpu_architecture().unwrap(), "64");
    }

    #[test]
    fn test_cpu_model_end_to_end_from_cpuinfo() {
        let cpuinfo = fixture("model name\t: Example CPU X1\n");
        let config = LinuxConfig {
            cpuinfo_path: cpuinfo.path().to_path_buf(),
            ..LinuxConfig::default()
        };
        let source = FlatFileSource::with_identity(&config, FakeRunner::default(), fixed_identity);
        let props = SystemProperties::new(
            Box::new(source),
            Box::new(FixedVolume {
                calls: Rc::new(Cell::new(0)),
            }),
        );
        assert_eq!(props.cpu_model().unwrap(), "Example CPU X1");
    }

    #[test]
    fn test_ram_total_end_to_end_from_memory_modules() {
        let provider = FakeProvider::default().with(
            "CIM_PhysicalMemory",
            "Capacity",
            vec![
                ProviderValue::Text("4294967296".to_string()),
                ProviderValue::Text("4294967296".to_string()),
            ],
        );
        let props = SystemProperties::new(
            Box::new(ManagementSource::new(provider)),
            Box::new(FixedVolume {
                calls: Rc::new(Cell::new(0)),
            }),
        );
        assert_eq!(props.ram_total(Unit::Gb).unwrap(), "8GB");
    }

    #[test]
    fn test_report_keeps_errors_per_fact() {
        let (props, _, _) = counting();
        let report = props.report(None);
        assert_eq!(report.cpu_model, Fact::Value("Example CPU X1".to_string()));
        assert_eq!(report.ram_total, Fact::Value("8GB".to_string()));
        assert!(!report.gpu_driver.is_value());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["cpu_model"]["value"], "Example CPU X1");
        assert!(json["gpu_driver"]["error"]
            .as_str()
            .unwrap()
            .contains("firmware"));
    }

    #[test]
    fn test_report_display_lists_every_fact() {
        let (props, _, _) = counting();
        let text = props.report(Unit::Gb).display();
        assert!(text.contains("SYSTEM PROPERTIES"));
        for (label, _) in props.report(Unit::Gb).entries() {
            assert!(text.contains(label), "missing {}", label);
        }
        assert!(text.contains("error: Could not find firmware"));
    }
}
