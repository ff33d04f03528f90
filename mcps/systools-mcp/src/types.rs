//! Type definitions for the systools MCP server

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Result Record
// ============================================================================

/// Uniform outcome record returned by every action-performing tool.
///
/// Documented failures (missing process, permission refusal, timeout, spawn
/// failure) are reported here with `success = false` rather than as errors;
/// `success == (return_code == 0)` except for the synthetic timeout code 124.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResult {
    pub command: String,
    pub return_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// Wall-clock seconds from start of the operation to completion
    pub execution_time: f64,
    pub success: bool,
}

impl CommandResult {
    pub fn succeeded(command: impl Into<String>, stdout: impl Into<String>, elapsed: f64) -> Self {
        Self {
            command: command.into(),
            return_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
            execution_time: elapsed,
            success: true,
        }
    }

    pub fn failed(command: impl Into<String>, stderr: impl Into<String>, elapsed: f64) -> Self {
        Self {
            command: command.into(),
            return_code: 1,
            stdout: String::new(),
            stderr: stderr.into(),
            execution_time: elapsed,
            success: false,
        }
    }

    /// Conventional `timeout(1)` exit code, empty stdout, reason in stderr.
    pub fn timed_out(command: impl Into<String>, timeout_secs: f64, elapsed: f64) -> Self {
        Self {
            command: command.into(),
            return_code: 124,
            stdout: String::new(),
            stderr: format!("Command timed out after {} seconds", timeout_secs),
            execution_time: elapsed,
            success: false,
        }
    }
}

// ============================================================================
// Process Types
// ============================================================================

/// Snapshot of one process at enumeration time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
    pub status: String,
    pub username: String,
    pub cpu_percent: f32,
    pub memory_percent: f64,
    /// Resident set size in bytes
    pub memory_rss_bytes: u64,
    /// Virtual memory size in bytes
    pub memory_vms_bytes: u64,
    pub create_time: Option<DateTime<Utc>>,
    pub cmdline: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exe: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_threads: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessListResponse {
    pub processes: Vec<ProcessEntry>,
    pub count: usize,
}

// ============================================================================
// System Information
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os_name: Option<String>,
    pub os_version: Option<String>,
    pub kernel_version: Option<String>,
    pub hostname: Option<String>,
    pub architecture: String,
    pub cpu_brand: String,
    pub cpu_count_logical: usize,
    pub cpu_count_physical: Option<usize>,
    pub cpu_frequency_mhz: u64,
    pub memory_total_bytes: u64,
    pub memory_used_bytes: u64,
    pub memory_available_bytes: u64,
    pub memory_usage_percent: f64,
    pub swap_total_bytes: u64,
    pub swap_used_bytes: u64,
    pub swap_usage_percent: f64,
    pub boot_time: Option<DateTime<Utc>>,
    pub uptime_seconds: u64,
    /// e.g. "2 days, 5 hours, 30 minutes"
    pub uptime_human: String,
}

// ============================================================================
// Disk Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskEntry {
    pub device: String,
    pub mount_point: String,
    pub filesystem: String,
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
    pub usage_percent: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DiskUsageResponse {
    pub disks: Vec<DiskEntry>,
    pub count: usize,
}

// ============================================================================
// Network Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkInterfaceEntry {
    pub name: String,
    pub mac_address: String,
    pub ip_addresses: Vec<String>,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub packets_sent: u64,
    pub packets_received: u64,
    pub errors_in: u64,
    pub errors_out: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NetworkInfoResponse {
    pub interfaces: Vec<NetworkInterfaceEntry>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortEntry {
    pub port: u16,
    pub protocol: String,
    pub status: String,
    pub local_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListeningPortsResponse {
    pub ports: Vec<PortEntry>,
    pub count: usize,
}

// ============================================================================
// File Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub name: String,
    pub size_bytes: u64,
    pub is_file: bool,
    pub is_dir: bool,
    pub is_symlink: bool,
    /// Octal permission string on Unix, e.g. "644"
    pub permissions: String,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    pub accessed: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListFilesResponse {
    pub directory: String,
    pub files: Vec<FileEntry>,
    pub count: usize,
}

/// Response for read_file; read failures are reported in-band with
/// `success = false` rather than as a protocol error.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadFileResponse {
    pub filepath: String,
    pub content: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Environment Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EnvVarsResponse {
    pub variables: Vec<EnvVar>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EnvVarResponse {
    pub name: String,
    pub value: Option<String>,
    pub exists: bool,
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum SysError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SysResult<T> = Result<T, SysError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_flag_tracks_return_code() {
        let ok = CommandResult::succeeded("echo hi", "hi\n", 0.01);
        assert_eq!(ok.return_code, 0);
        assert!(ok.success);

        let bad = CommandResult::failed("kill 1", "denied", 0.01);
        assert_eq!(bad.return_code, 1);
        assert!(!bad.success);
    }

    #[test]
    fn test_timeout_result_shape() {
        let result = CommandResult::timed_out("sleep 60", 1.0, 1.02);
        assert_eq!(result.return_code, 124);
        assert!(!result.success);
        assert!(result.stdout.is_empty());
        assert!(result.stderr.contains("timed out after 1 seconds"));
    }
}
