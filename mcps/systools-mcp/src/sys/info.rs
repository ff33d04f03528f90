//! System information collection

use chrono::DateTime;
use sysinfo::System;

use crate::types::SystemInfo;

/// Collect the combined OS / CPU / memory / uptime snapshot.
///
/// The caller is responsible for refreshing CPU and memory state on `sys`
/// before calling.
pub fn get_system_info(sys: &System) -> SystemInfo {
    let cpus = sys.cpus();
    let first_cpu = cpus.first();

    let memory_total = sys.total_memory();
    let memory_used = sys.used_memory();
    let swap_total = sys.total_swap();
    let swap_used = sys.used_swap();
    let uptime = System::uptime();

    SystemInfo {
        os_name: System::name(),
        os_version: System::os_version(),
        kernel_version: System::kernel_version(),
        hostname: System::host_name(),
        architecture: std::env::consts::ARCH.to_string(),
        cpu_brand: first_cpu.map(|c| c.brand().to_string()).unwrap_or_default(),
        cpu_count_logical: cpus.len(),
        cpu_count_physical: sys.physical_core_count(),
        cpu_frequency_mhz: first_cpu.map(|c| c.frequency()).unwrap_or(0),
        memory_total_bytes: memory_total,
        memory_used_bytes: memory_used,
        memory_available_bytes: sys.available_memory(),
        memory_usage_percent: percent(memory_used, memory_total),
        swap_total_bytes: swap_total,
        swap_used_bytes: swap_used,
        swap_usage_percent: percent(swap_used, swap_total),
        boot_time: DateTime::from_timestamp(System::boot_time() as i64, 0),
        uptime_seconds: uptime,
        uptime_human: format_uptime(uptime),
    }
}

fn percent(used: u64, total: u64) -> f64 {
    if total > 0 {
        (used as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

/// Format uptime seconds into a human-readable string.
fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86400;
    let hours = (seconds % 86400) / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{} day{}", days, if days == 1 { "" } else { "s" }));
    }
    if hours > 0 {
        parts.push(format!("{} hour{}", hours, if hours == 1 { "" } else { "s" }));
    }
    if minutes > 0 {
        parts.push(format!(
            "{} minute{}",
            minutes,
            if minutes == 1 { "" } else { "s" }
        ));
    }
    if secs > 0 || parts.is_empty() {
        parts.push(format!("{} second{}", secs, if secs == 1 { "" } else { "s" }));
    }

    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(0), "0 seconds");
        assert_eq!(format_uptime(61), "1 minute, 1 second");
        assert_eq!(format_uptime(90061), "1 day, 1 hour, 1 minute, 1 second");
    }

    #[test]
    fn test_system_info_snapshot() {
        let mut sys = System::new_all();
        sys.refresh_memory();
        let info = get_system_info(&sys);

        assert!(!info.architecture.is_empty());
        assert!(info.cpu_count_logical > 0);
        assert!(info.memory_total_bytes > 0);
        assert!(info.memory_usage_percent >= 0.0 && info.memory_usage_percent <= 100.0);
        assert!(!info.uptime_human.is_empty());
    }
}
