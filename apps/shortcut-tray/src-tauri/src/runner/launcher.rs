//! Shell command launching

use std::process::{Child, Command, Stdio};

use super::ExecutionFailure;

/// Starts shell command lines.
pub trait ProcessLauncher: Send + Sync {
    /// Start `command_line` and return as soon as the process is running.
    /// Does not wait for the process to exit.
    fn launch(&self, command_line: &str) -> Result<(), ExecutionFailure>;
}

/// Launches through `cmd /C` on Windows and `sh -c` elsewhere.
///
/// The child runs detached from the caller; a reaper thread waits for it so
/// it does not linger as a zombie, and logs a non-zero exit status.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemShell;

impl SystemShell {
    /// Name of the shell used, for diagnostics
    pub fn shell_name() -> &'static str {
        if cfg!(target_os = "windows") {
            "cmd /C"
        } else {
            "sh -c"
        }
    }

    #[cfg(target_os = "windows")]
    fn command(command_line: &str) -> Command {
        use std::os::windows::process::CommandExt;

        // cmd does its own parsing, so the line is passed through unquoted
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").raw_arg(command_line);
        cmd
    }

    #[cfg(not(target_os = "windows"))]
    fn command(command_line: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", command_line]);
        cmd
    }
}

impl ProcessLauncher for SystemShell {
    fn launch(&self, command_line: &str) -> Result<(), ExecutionFailure> {
        let child = Self::command(command_line)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                ExecutionFailure::new(
                    format!("Failed to start command: {}", e),
                    Some(format!(
                        "command: {}\nshell: {}\nerror: {:?}",
                        command_line,
                        Self::shell_name(),
                        e
                    )),
                )
            })?;

        tracing::debug!(pid = child.id(), "Command started");
        reap_in_background(child, command_line.to_string());
        Ok(())
    }
}

fn reap_in_background(mut child: Child, command_line: String) {
    let pid = child.id();
    let spawned = std::thread::Builder::new()
        .name(format!("reap-{}", pid))
        .spawn(move || match child.wait() {
            Ok(status) if status.success() => {
                tracing::debug!(pid, "Command exited successfully");
            }
            Ok(status) => {
                tracing::warn!(pid, %status, command = %command_line, "Command exited with failure");
            }
            Err(e) => {
                tracing::warn!(pid, error = %e, "Could not wait for command");
            }
        });

    if let Err(e) = spawned {
        tracing::warn!(pid, error = %e, "Could not start reaper thread");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_launch_returns_while_command_still_runs() {
        let started = std::time::Instant::now();
        SystemShell.launch("sleep 2").unwrap();
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
    }

    #[cfg(unix)]
    #[test]
    fn test_launch_runs_the_command_line_through_the_shell() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("ran");
        let line = format!("echo ok > '{}'", marker.display());

        SystemShell.launch(&line).unwrap();

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while !marker.exists() && std::time::Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(20));
        }
        assert!(marker.exists());
    }

    #[test]
    fn test_shell_name() {
        assert!(!SystemShell::shell_name().is_empty());
    }
}
