//! Code snippet execution
//!
//! Snippets are arbitrary code supplied by the user, so they never run inside
//! this process. Each run gets a fresh interpreter child process with a
//! cleared environment (only allowlisted variables are passed through) and
//! the system temp directory as its working directory.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use super::ExecutionFailure;
use crate::config::AppConfig;

/// Runs code snippets to completion.
pub trait SnippetInterpreter: Send + Sync {
    /// Execute `code`, blocking until it finishes.
    fn run(&self, code: &str) -> Result<(), ExecutionFailure>;
}

/// Interpreter programs tried when none is configured
const DEFAULT_CANDIDATES: &[&str] = if cfg!(target_os = "windows") {
    &["python", "py"]
} else {
    &["python3", "python"]
};

/// Runs each snippet in a separate interpreter process.
#[derive(Debug, Clone)]
pub struct SandboxedInterpreter {
    /// Program names or paths, first one found on PATH wins
    candidates: Vec<String>,
    /// Arguments placed before the snippet, e.g. `-c`
    args: Vec<String>,
    env_allowlist: Vec<String>,
    working_dir: PathBuf,
}

impl SandboxedInterpreter {
    pub fn new(candidates: Vec<String>, args: Vec<String>, env_allowlist: Vec<String>) -> Self {
        Self {
            candidates,
            args,
            env_allowlist,
            working_dir: std::env::temp_dir(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let candidates = match &config.interpreter {
            Some(program) => vec![program.clone()],
            None => DEFAULT_CANDIDATES.iter().map(|s| s.to_string()).collect(),
        };
        Self::new(
            candidates,
            config.interpreter_args.clone(),
            config.snippet_env_allowlist.clone(),
        )
    }

    /// Resolve the interpreter program on PATH
    pub fn resolve_program(&self) -> Result<PathBuf, ExecutionFailure> {
        self.candidates
            .iter()
            .find_map(|candidate| which::which(candidate).ok())
            .ok_or_else(|| {
                ExecutionFailure::new(
                    format!(
                        "No snippet interpreter found (tried {})",
                        self.candidates.join(", ")
                    ),
                    None,
                )
            })
    }

    /// The environment handed to the interpreter
    fn allowed_env(&self) -> Vec<(String, OsString)> {
        self.env_allowlist
            .iter()
            .filter_map(|key| std::env::var_os(key).map(|value| (key.clone(), value)))
            .collect()
    }
}

impl SnippetInterpreter for SandboxedInterpreter {
    fn run(&self, code: &str) -> Result<(), ExecutionFailure> {
        let program = self.resolve_program()?;
        tracing::debug!(interpreter = %program.display(), "Running snippet");

        let output = Command::new(&program)
            .args(&self.args)
            .arg(code)
            .env_clear()
            .envs(self.allowed_env())
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                ExecutionFailure::new(
                    format!("Failed to start {}: {}", program.display(), e),
                    Some(format!("{:?}", e)),
                )
            })?;

        if !output.stdout.is_empty() {
            tracing::debug!(stdout = %String::from_utf8_lossy(&output.stdout), "Snippet output");
        }

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();
        // The last line of a traceback names the exception
        let message = stderr
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .map(|line| line.trim().to_string())
            .unwrap_or_else(|| format!("Snippet exited with {}", output.status));
        let trace = (!stderr.is_empty()).then_some(stderr);

        Err(ExecutionFailure::new(message, trace))
    }
}
