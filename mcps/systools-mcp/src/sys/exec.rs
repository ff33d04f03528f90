//! Command execution with timeout enforcement
//!
//! Commands run through the platform shell by default; the command text is
//! passed to the shell verbatim, which is a documented capability of this
//! server rather than something it tries to sanitize. Exec mode splits on
//! whitespace and supports no quoting.

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;

use crate::types::CommandResult;

/// Run a command and capture its output.
///
/// Every documented failure mode (spawn failure, non-zero exit, timeout)
/// comes back as a [`CommandResult`]; the wall-clock `execution_time` is
/// populated regardless of outcome. On timeout the child and, on Unix, its
/// whole process group are killed and the conventional exit code 124 is
/// reported.
pub async fn execute_command(
    command_text: &str,
    cwd: Option<&str>,
    timeout: Option<f64>,
    shell: bool,
    extra_env: &[(String, String)],
) -> CommandResult {
    let start = Instant::now();

    let mut cmd = if shell {
        shell_command(command_text)
    } else {
        let mut parts = command_text.split_whitespace();
        let Some(program) = parts.next() else {
            return CommandResult::failed(
                command_text,
                "Error executing command: empty command",
                start.elapsed().as_secs_f64(),
            );
        };
        let mut cmd = Command::new(program);
        cmd.args(parts);
        cmd
    };

    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    for (key, value) in extra_env {
        cmd.env(key, value);
    }
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    cmd.process_group(0);

    let child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            return CommandResult::failed(
                command_text,
                format!("Error executing command: {}", e),
                start.elapsed().as_secs_f64(),
            );
        }
    };
    let child_pid = child.id();

    let timeout = timeout.filter(|t| t.is_finite() && *t > 0.0);
    let waited = match timeout {
        Some(secs) => {
            match tokio::time::timeout(Duration::from_secs_f64(secs), child.wait_with_output())
                .await
            {
                Ok(result) => result,
                Err(_elapsed) => {
                    // dropping the wait future killed the direct child; take
                    // out the rest of its process group as well
                    if let Some(pid) = child_pid {
                        kill_process_group(pid);
                    }
                    tracing::warn!(command = command_text, timeout_secs = secs, "command timed out");
                    return CommandResult::timed_out(
                        command_text,
                        secs,
                        start.elapsed().as_secs_f64(),
                    );
                }
            }
        }
        None => child.wait_with_output().await,
    };

    match waited {
        Ok(output) => CommandResult {
            command: command_text.to_string(),
            return_code: output.status.code().unwrap_or(1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            execution_time: start.elapsed().as_secs_f64(),
            success: output.status.success(),
        },
        Err(e) => CommandResult::failed(
            command_text,
            format!("Error executing command: {}", e),
            start.elapsed().as_secs_f64(),
        ),
    }
}

/// Ping a host with the platform-appropriate flag and delegate to
/// [`execute_command`].
pub async fn ping_host(host: &str, count: u32, extra_env: &[(String, String)]) -> CommandResult {
    let command = if cfg!(windows) {
        format!("ping -n {} {}", count, host)
    } else {
        format!("ping -c {} {}", count, host)
    };
    execute_command(&command, None, None, true, extra_env).await
}

#[cfg(unix)]
fn shell_command(command_text: &str) -> Command {
    let mut cmd = Command::new("/bin/sh");
    cmd.arg("-c").arg(command_text);
    cmd
}

#[cfg(windows)]
fn shell_command(command_text: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", command_text]);
    cmd
}

/// The child is spawned as its own process group leader, so a negative pid
/// addresses the whole group, descendants included.
#[cfg(unix)]
fn kill_process_group(pid: u32) {
    unsafe {
        libc::kill(-(pid as i32), libc::SIGKILL);
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: u32) {}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_hello() {
        let result = execute_command("echo hello", None, None, true, &[]).await;
        assert!(result.success);
        assert_eq!(result.return_code, 0);
        assert!(result.stdout.contains("hello"));
        assert!(result.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_nonzero_exit() {
        let result = execute_command("exit 3", None, None, true, &[]).await;
        assert!(!result.success);
        assert_eq!(result.return_code, 3);
    }

    #[tokio::test]
    async fn test_timeout_kills_child() {
        let result = execute_command("sleep 30", None, Some(1.0), true, &[]).await;
        assert!(!result.success);
        assert_eq!(result.return_code, 124);
        assert!(result.stdout.is_empty());
        assert!(result.stderr.contains("timed out"));
        // the call returned at the timeout bound, not after the full sleep
        assert!(result.execution_time < 5.0);
    }

    #[tokio::test]
    async fn test_spawn_failure() {
        let result =
            execute_command("nonexistent_binary_xyz_12345", None, None, false, &[]).await;
        assert!(!result.success);
        assert_eq!(result.return_code, 1);
        assert!(!result.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_empty_command_exec_mode() {
        let result = execute_command("   ", None, None, false, &[]).await;
        assert!(!result.success);
        assert!(result.stderr.contains("empty command"));
    }

    #[tokio::test]
    async fn test_exec_mode_splits_whitespace() {
        let result = execute_command("echo one two", None, None, false, &[]).await;
        assert!(result.success);
        assert!(result.stdout.contains("one two"));
    }

    #[tokio::test]
    async fn test_extra_env_applied() {
        let env = vec![("SYSTOOLS_TEST_VAR".to_string(), "overlay-value".to_string())];
        let result = execute_command("echo $SYSTOOLS_TEST_VAR", None, None, true, &env).await;
        assert!(result.success);
        assert!(result.stdout.contains("overlay-value"));
    }

    #[tokio::test]
    async fn test_cwd_respected() {
        let dir = tempfile::tempdir().unwrap();
        let result =
            execute_command("pwd", Some(dir.path().to_str().unwrap()), None, true, &[]).await;
        assert!(result.success);
        let expected = dir.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(result.stdout.contains(&expected));
    }
}
