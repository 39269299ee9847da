//! Primary-drive space
//!
//! Uses the same volume listing on every platform. The reported volume is
//! the one whose mount point is the longest prefix of the configured root;
//! other volumes are never summed in.

use serde::Serialize;
use std::path::{Path, PathBuf};
use sysinfo::Disks;
use tracing::debug;

use crate::error::{SysError, SysResult};

/// Capacity and free space of one mounted volume, in bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeSpace {
    pub mount_point: PathBuf,
    pub total_bytes: u64,
    pub available_bytes: u64,
}

/// Space query keyed by a root path
pub trait VolumeSpaceSource {
    fn space(&self, root: &Path) -> SysResult<VolumeSpace>;
}

/// Volume listing via sysinfo
#[derive(Debug, Clone, Copy, Default)]
pub struct SysinfoVolumes;

impl VolumeSpaceSource for SysinfoVolumes {
    fn space(&self, root: &Path) -> SysResult<VolumeSpace> {
        let disks = Disks::new_with_refreshed_list();
        let volumes: Vec<VolumeSpace> = disks
            .list()
            .iter()
            .map(|disk| VolumeSpace {
                mount_point: disk.mount_point().to_path_buf(),
                total_bytes: disk.total_space(),
                available_bytes: disk.available_space(),
            })
            .collect();

        debug!(count = volumes.len(), root = %root.display(), "listed volumes");

        select_volume(&volumes, root).cloned().ok_or_else(|| {
            SysError::not_found(
                format!("volume containing {}", root.display()),
                "mounted volumes",
            )
        })
    }
}

/// Pick the volume that holds `root`
pub fn select_volume<'a>(volumes: &'a [VolumeSpace], root: &Path) -> Option<&'a VolumeSpace> {
    volumes
        .iter()
        .filter(|volume| root.starts_with(&volume.mount_point))
        .max_by_key(|volume| volume.mount_point.components().count())
}

/// Default root for the primary drive
pub fn default_root() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from("C:\\")
    } else {
        PathBuf::from("/")
    }
}
