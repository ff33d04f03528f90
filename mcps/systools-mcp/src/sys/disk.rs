//! Disk usage collection

use std::path::Path;

use sysinfo::{Disk, Disks};

use crate::types::{DiskEntry, SysError, SysResult};

/// Get usage for all mounted partitions, or for the partition containing a
/// specific path.
pub fn get_disk_usage(path: Option<&str>) -> SysResult<Vec<DiskEntry>> {
    let disks = Disks::new_with_refreshed_list();

    let Some(path) = path else {
        let mut entries: Vec<DiskEntry> = disks.iter().map(to_entry).collect();
        entries.sort_by(|a, b| a.mount_point.cmp(&b.mount_point));
        return Ok(entries);
    };

    let target = Path::new(path)
        .canonicalize()
        .map_err(|_| SysError::NotFound(format!("Path '{}' not found", path)))?;

    let best = best_mount(&target, disks.iter().map(|d| d.mount_point()));
    best.and_then(|mount| disks.iter().find(|d| d.mount_point() == mount))
        .map(|disk| vec![to_entry(disk)])
        .ok_or_else(|| SysError::NotFound(format!("No mounted filesystem contains '{}'", path)))
}

/// The mount point covering `target` is the longest one that prefixes it.
fn best_mount<'a>(
    target: &Path,
    mounts: impl IntoIterator<Item = &'a Path>,
) -> Option<&'a Path> {
    mounts
        .into_iter()
        .filter(|mount| target.starts_with(mount))
        .max_by_key(|mount| mount.as_os_str().len())
}

fn to_entry(disk: &Disk) -> DiskEntry {
    let total = disk.total_space();
    let free = disk.available_space();
    let used = total.saturating_sub(free);

    DiskEntry {
        device: disk.name().to_string_lossy().to_string(),
        mount_point: disk.mount_point().to_string_lossy().to_string(),
        filesystem: disk.file_system().to_string_lossy().to_string(),
        total_bytes: total,
        used_bytes: used,
        free_bytes: free,
        usage_percent: if total > 0 {
            (used as f64 / total as f64) * 100.0
        } else {
            0.0
        },
    }
}
