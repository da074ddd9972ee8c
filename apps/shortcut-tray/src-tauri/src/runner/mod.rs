//! Asynchronous shortcut execution
//!
//! [`ShortcutRunner::dispatch`] hands a shortcut to a blocking worker and
//! returns at once. Shell commands go to a [`ProcessLauncher`], code snippets
//! to a [`SnippetInterpreter`]. The outcome of every run is published on the
//! event bus as `ShortcutSucceeded` or `ShortcutFailed`; callers that want to
//! await it can also use the returned [`ExecutionHandle`].

pub mod interpreter;
pub mod launcher;

pub use interpreter::{SandboxedInterpreter, SnippetInterpreter};
pub use launcher::{ProcessLauncher, SystemShell};

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tauri::async_runtime::{self, JoinHandle};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::ShortcutError;
use crate::events::{AppEvent, EventBus};
use crate::registry::{Shortcut, ShortcutKind};

/// Why a shortcut run failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionFailure {
    pub message: String,
    /// Detailed diagnostic output, shown in the expandable part of the error window
    pub trace: Option<String>,
}

impl ExecutionFailure {
    pub fn new(message: impl Into<String>, trace: Option<String>) -> Self {
        Self {
            message: message.into(),
            trace,
        }
    }
}

impl From<ExecutionFailure> for ShortcutError {
    fn from(failure: ExecutionFailure) -> Self {
        ShortcutError::Execution {
            message: failure.message,
            trace: failure.trace,
        }
    }
}

/// Result of one shortcut run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Succeeded,
    Failed(ExecutionFailure),
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Handle to a dispatched run. Dropping it does not cancel the run.
pub struct ExecutionHandle {
    run_id: Uuid,
    name: String,
    task: JoinHandle<ExecutionOutcome>,
}

impl ExecutionHandle {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wait for the run to finish.
    pub async fn outcome(self) -> ExecutionOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => ExecutionOutcome::Failed(ExecutionFailure::new(
                format!("Worker for '{}' stopped unexpectedly", self.name),
                Some(e.to_string()),
            )),
        }
    }
}

/// Dispatches shortcuts to worker threads and reports their outcome.
#[derive(Clone)]
pub struct ShortcutRunner {
    launcher: Arc<dyn ProcessLauncher>,
    interpreter: Arc<dyn SnippetInterpreter>,
    events: Arc<EventBus>,
}

impl ShortcutRunner {
    pub fn new(
        events: Arc<EventBus>,
        launcher: Arc<dyn ProcessLauncher>,
        interpreter: Arc<dyn SnippetInterpreter>,
    ) -> Self {
        Self {
            launcher,
            interpreter,
            events,
        }
    }

    /// Runner backed by the platform shell and the configured interpreter
    pub fn system(events: Arc<EventBus>, config: &AppConfig) -> Self {
        Self::new(
            events,
            Arc::new(SystemShell),
            Arc::new(SandboxedInterpreter::from_config(config)),
        )
    }

    /// The bus that run outcomes are published on
    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Start running `shortcut` on a worker and return immediately.
    pub fn dispatch(&self, shortcut: Shortcut) -> ExecutionHandle {
        let run_id = Uuid::new_v4();
        let name = shortcut.name.clone();

        tracing::info!(%run_id, name = %name, kind = ?shortcut.kind, "Dispatching shortcut");
        self.events.emit(AppEvent::ShortcutStarted {
            run_id,
            name: name.clone(),
        });

        let launcher = Arc::clone(&self.launcher);
        let interpreter = Arc::clone(&self.interpreter);
        let events = Arc::clone(&self.events);

        let task = async_runtime::spawn_blocking(move || {
            let span = tracing::info_span!("shortcut_run", %run_id, name = %shortcut.name);
            let _guard = span.enter();

            let outcome = run_isolated(launcher.as_ref(), interpreter.as_ref(), &shortcut);
            publish(&events, run_id, shortcut.name, &outcome);
            outcome
        });

        ExecutionHandle { run_id, name, task }
    }
}

/// Run one shortcut, turning a panic in the collaborator into a failure so it
/// stays confined to this run.
fn run_isolated(
    launcher: &dyn ProcessLauncher,
    interpreter: &dyn SnippetInterpreter,
    shortcut: &Shortcut,
) -> ExecutionOutcome {
    let result = catch_unwind(AssertUnwindSafe(|| match shortcut.kind {
        ShortcutKind::ShellCommand => launcher.launch(&shortcut.command),
        ShortcutKind::CodeSnippet => interpreter.run(&shortcut.command),
    }));

    match result {
        Ok(Ok(())) => ExecutionOutcome::Succeeded,
        Ok(Err(failure)) => ExecutionOutcome::Failed(failure),
        Err(panic) => {
            let detail = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned());
            ExecutionOutcome::Failed(ExecutionFailure::new("Shortcut runner panicked", detail))
        }
    }
}

fn publish(events: &EventBus, run_id: Uuid, name: String, outcome: &ExecutionOutcome) {
    match outcome {
        ExecutionOutcome::Succeeded => {
            tracing::info!("Shortcut finished");
            events.emit(AppEvent::ShortcutSucceeded { run_id, name });
        }
        ExecutionOutcome::Failed(failure) => {
            tracing::error!(message = %failure.message, "Shortcut failed");
            events.emit(AppEvent::ShortcutFailed {
                run_id,
                name,
                message: failure.message.clone(),
                trace: failure.trace.clone(),
            });
        }
    }
}

/// Scriptable launcher and interpreter for tests
#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;

    /// Records what it was asked to run and answers with a fixed result
    #[derive(Default)]
    pub struct FakeCollaborator {
        pub calls: Mutex<Vec<String>>,
        pub failure: Option<ExecutionFailure>,
        pub delay: Option<Duration>,
        pub panic: bool,
    }

    impl FakeCollaborator {
        pub fn failing(message: &str, trace: &str) -> Self {
            Self {
                failure: Some(ExecutionFailure::new(message, Some(trace.to_string()))),
                ..Self::default()
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn answer(&self, input: &str) -> Result<(), ExecutionFailure> {
            if let Some(delay) = self.delay {
                std::thread::sleep(delay);
            }
            self.calls.lock().unwrap().push(input.to_string());
            if self.panic {
                panic!("collaborator exploded");
            }
            match &self.failure {
                Some(failure) => Err(failure.clone()),
                None => Ok(()),
            }
        }
    }

    impl ProcessLauncher for FakeCollaborator {
        fn launch(&self, command_line: &str) -> Result<(), ExecutionFailure> {
            self.answer(command_line)
        }
    }

    impl SnippetInterpreter for FakeCollaborator {
        fn run(&self, code: &str) -> Result<(), ExecutionFailure> {
            self.answer(code)
        }
    }

    /// Runner whose shell and interpreter both succeed
    pub fn quiet_runner(events: Arc<EventBus>) -> ShortcutRunner {
        ShortcutRunner::new(
            events,
            Arc::new(FakeCollaborator::default()),
            Arc::new(FakeCollaborator::default()),
        )
    }
}
