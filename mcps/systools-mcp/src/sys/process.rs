//! Process enumeration and termination

use std::time::{Duration, Instant};

use chrono::DateTime;
use sysinfo::{Pid, ProcessStatus, ProcessesToUpdate, Signal, System, Users};

use crate::types::{CommandResult, ProcessEntry};

/// How long a signaled process is given to exit before the graceful path
/// escalates to a force kill.
const EXIT_WAIT: Duration = Duration::from_secs(5);
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Enumerate running processes with optional name/user filters.
///
/// Detail fields are best-effort: a process that exits mid-enumeration or
/// refuses access simply loses those fields, never the whole call.
pub async fn list_processes(
    sys: &mut System,
    filter_name: Option<&str>,
    filter_user: Option<&str>,
    include_details: bool,
) -> Vec<ProcessEntry> {
    sys.refresh_memory();
    sys.refresh_processes(ProcessesToUpdate::All, true);
    if include_details {
        // CPU usage is a delta between two refreshes
        tokio::time::sleep(Duration::from_millis(200)).await;
        sys.refresh_processes(ProcessesToUpdate::All, true);
    }

    let users = Users::new_with_refreshed_list();
    let total_memory = sys.total_memory();
    let name_filter = filter_name.map(|f| f.to_lowercase());

    let mut processes = Vec::new();
    for (pid, process) in sys.processes() {
        let name = process.name().to_string_lossy().to_string();
        if let Some(filter) = &name_filter {
            if !name.to_lowercase().contains(filter) {
                continue;
            }
        }

        let username = process
            .user_id()
            .and_then(|uid| users.get_user_by_id(uid))
            .map(|user| user.name().to_string())
            .unwrap_or_else(|| "Unknown".to_string());
        if let Some(filter) = filter_user {
            if username != filter {
                continue;
            }
        }

        let mut entry = ProcessEntry {
            pid: pid.as_u32(),
            name,
            status: process.status().to_string(),
            username,
            cpu_percent: 0.0,
            memory_percent: 0.0,
            memory_rss_bytes: 0,
            memory_vms_bytes: 0,
            create_time: DateTime::from_timestamp(process.start_time() as i64, 0),
            cmdline: Vec::new(),
            exe: None,
            cwd: None,
            num_threads: None,
        };

        if include_details {
            entry.cpu_percent = process.cpu_usage();
            entry.memory_rss_bytes = process.memory();
            entry.memory_vms_bytes = process.virtual_memory();
            if total_memory > 0 {
                entry.memory_percent =
                    (entry.memory_rss_bytes as f64 / total_memory as f64) * 100.0;
            }
            entry.cmdline = process
                .cmd()
                .iter()
                .map(|arg| arg.to_string_lossy().to_string())
                .collect();
            entry.exe = process.exe().map(|p| p.display().to_string());
            entry.cwd = process.cwd().map(|p| p.display().to_string());
            entry.num_threads = process.tasks().map(|tasks| tasks.len());
        }

        processes.push(entry);
    }

    processes.sort_by_key(|p| p.pid);
    processes
}

/// Terminate a process by pid.
///
/// Sends SIGTERM (or SIGKILL when `force`), waits up to [`EXIT_WAIT`] for the
/// process to exit, and escalates a graceful request to a force kill if the
/// wait expires. Missing processes and permission refusals are reported as
/// unsuccessful results, not errors.
///
/// Uses a call-local `System` refreshed for the one target pid, so calls are
/// independent of each other and of the enumeration tools; nothing is held
/// across the exit wait.
pub async fn kill_process(pid: u32, force: bool) -> CommandResult {
    let start = Instant::now();
    let command = format!("kill {}{}", if force { "--force " } else { "" }, pid);
    let target = Pid::from_u32(pid);

    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::Some(&[target]), true);

    let (name, signaled) = match sys.process(target) {
        Some(process) => (
            process.name().to_string_lossy().to_string(),
            send_signal(process, force),
        ),
        None => {
            return CommandResult::failed(
                command,
                format!("Process with PID {} not found", pid),
                start.elapsed().as_secs_f64(),
            );
        }
    };

    if !signaled {
        return CommandResult::failed(
            command,
            format!("Access denied to kill process {}", pid),
            start.elapsed().as_secs_f64(),
        );
    }

    let mut action = if force { "force killed" } else { "terminated" };

    if !wait_for_exit(&mut sys, target).await && !force {
        if let Some(process) = sys.process(target) {
            process.kill();
        }
        action = "force killed after timeout";
    }

    tracing::info!(pid, action, "signaled process");

    CommandResult::succeeded(
        command,
        format!("Process {} (PID: {}) {} successfully", name, pid, action),
        start.elapsed().as_secs_f64(),
    )
}

/// Terminate every process whose name matches `name` case-insensitively.
///
/// Each match gets exactly one signal; unlike [`kill_process`] there is no
/// exit wait and no escalation. Killed pids are aggregated into stdout and
/// per-process refusals into stderr; success means at least one process was
/// signaled.
pub fn kill_processes_by_name(sys: &mut System, name: &str, force: bool) -> CommandResult {
    let start = Instant::now();
    let command = format!("killall {}{}", if force { "--force " } else { "" }, name);

    sys.refresh_processes(ProcessesToUpdate::All, true);

    let mut killed = Vec::new();
    let mut errors = Vec::new();
    for (pid, process) in sys.processes() {
        if !name_matches(&process.name().to_string_lossy(), name) {
            continue;
        }
        if send_signal(process, force) {
            killed.push(pid.as_u32());
        } else {
            errors.push(format!("PID {}: access denied", pid));
        }
    }
    killed.sort_unstable();

    if killed.is_empty() {
        return CommandResult::failed(
            command,
            format!("No processes found with name '{}'", name),
            start.elapsed().as_secs_f64(),
        );
    }

    tracing::info!(name, count = killed.len(), "signaled processes by name");

    CommandResult {
        command,
        return_code: 0,
        stdout: format!("Killed processes: {:?}", killed),
        stderr: errors.join("\n"),
        execution_time: start.elapsed().as_secs_f64(),
        success: true,
    }
}

/// Case-insensitive exact name comparison, Unicode-aware to match the
/// substring filter in [`list_processes`].
fn name_matches(process_name: &str, wanted: &str) -> bool {
    process_name.to_lowercase() == wanted.to_lowercase()
}

fn send_signal(process: &sysinfo::Process, force: bool) -> bool {
    if force {
        process.kill()
    } else {
        // platforms without SIGTERM fall back to the unconditional kill
        process.kill_with(Signal::Term).unwrap_or_else(|| process.kill())
    }
}

/// Wait for `pid` to exit, bounded by [`EXIT_WAIT`].
///
/// Arbitrary pids have no waitable handle, so this polls the process table
/// the way `sysinfo` consumers do. A zombie counts as exited: the process
/// has terminated and only its unreaped table entry remains, which no
/// further signal can remove.
async fn wait_for_exit(sys: &mut System, pid: Pid) -> bool {
    let deadline = Instant::now() + EXIT_WAIT;
    loop {
        tokio::time::sleep(EXIT_POLL_INTERVAL).await;
        sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        match sys.process(pid) {
            None => return true,
            Some(process) if process.status() == ProcessStatus::Zombie => return true,
            Some(_) => {}
        }
        if Instant::now() >= deadline {
            return false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Far above any real pid; Linux pid_max tops out at 2^22.
    const ABSENT_PID: u32 = 4_294_000_000;

    #[tokio::test]
    async fn test_list_processes_returns_entries() {
        let mut sys = System::new_all();
        let processes = list_processes(&mut sys, None, None, false).await;
        assert!(!processes.is_empty());
        for entry in processes.iter().take(5) {
            assert!(!entry.name.is_empty() || entry.pid > 0);
        }
    }

    #[tokio::test]
    async fn test_list_processes_name_filter() {
        let mut sys = System::new_all();
        let processes = list_processes(&mut sys, Some("definitely-no-such-proc"), None, false).await;
        assert!(processes.is_empty());
    }

    #[tokio::test]
    async fn test_kill_absent_pid_is_idempotent() {
        let first = kill_process(ABSENT_PID, false).await;
        assert!(!first.success);
        assert_eq!(first.return_code, 1);
        assert!(first.stderr.contains("not found"));

        let second = kill_process(ABSENT_PID, true).await;
        assert!(!second.success);
        assert_eq!(second.return_code, 1);
        assert!(second.stderr.contains("not found"));
    }

    #[test]
    fn test_name_matches_is_unicode_aware() {
        assert!(name_matches("Sleep", "sleep"));
        assert!(name_matches("sleep", "SLEEP"));
        assert!(name_matches("Büro-Daemon", "büro-daemon"));
        assert!(!name_matches("sleepd", "sleep"));
    }

    #[tokio::test]
    async fn test_kill_by_name_no_match() {
        let mut sys = System::new();
        let result = kill_processes_by_name(&mut sys, "no_such_process_xyz_123", false);
        assert!(!result.success);
        assert_eq!(result.return_code, 1);
        assert!(result.stderr.contains("No processes found"));
    }

    /// Spawn a detached sleeper and return its pid. With `ignore_term` the
    /// sleeper inherits an ignored SIGTERM, so only SIGKILL removes it.
    #[cfg(unix)]
    fn spawn_sleeper(ignore_term: bool) -> u32 {
        let script = if ignore_term {
            "trap '' TERM; sleep 300 >/dev/null 2>&1 & echo $!"
        } else {
            "sleep 300 >/dev/null 2>&1 & echo $!"
        };
        let output = std::process::Command::new("sh")
            .arg("-c")
            .arg(script)
            .output()
            .unwrap();
        String::from_utf8_lossy(&output.stdout).trim().parse().unwrap()
    }

    /// The pid is either gone from the table or a zombie; orphans stay as
    /// zombies on hosts whose pid 1 does not reap.
    #[cfg(unix)]
    fn assert_exited(pid: u32) {
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]), true);
        if let Some(process) = sys.process(Pid::from_u32(pid)) {
            assert_eq!(process.status(), ProcessStatus::Zombie);
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_terminate_running_process() {
        let pid = spawn_sleeper(false);

        let result = kill_process(pid, false).await;
        assert!(result.success, "stderr: {}", result.stderr);
        assert_eq!(result.return_code, 0);
        assert!(result.stdout.contains(&format!("PID: {}", pid)));

        assert_exited(pid);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_graceful_kill_escalates_when_sigterm_ignored() {
        let pid = spawn_sleeper(true);

        let result = kill_process(pid, false).await;
        assert!(result.success, "stderr: {}", result.stderr);
        assert_eq!(result.return_code, 0);
        assert!(
            result.stdout.contains("force killed after timeout"),
            "stdout: {}",
            result.stdout
        );

        // the escalated SIGKILL is sent just before returning
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_exited(pid);
    }
}
