//! Shortcut registry commands
//!
//! Thin wrappers over [`ShortcutRegistry`](crate::registry::ShortcutRegistry).
//! Validation errors come back to the calling dialog as strings and are shown
//! inline; the dialog stays open.

use tauri::State;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::{Result, ShortcutError};
use crate::registry::{Shortcut, ShortcutKind};
use crate::runner::ExecutionHandle;

/// List all shortcuts in display order
#[tauri::command]
pub fn list_shortcuts(state: State<'_, AppState>) -> Result<Vec<Shortcut>> {
    Ok(state.registry()?.shortcuts().to_vec())
}

/// Get one shortcut by name
#[tauri::command]
pub fn get_shortcut(state: State<'_, AppState>, name: String) -> Result<Shortcut> {
    state
        .registry()?
        .get(&name)
        .cloned()
        .ok_or_else(|| ShortcutError::not_found(name))
}

#[tauri::command]
pub fn add_shortcut(
    state: State<'_, AppState>,
    name: String,
    command: String,
    kind: ShortcutKind,
    is_default: bool,
) -> Result<()> {
    logged("add", state.registry()?.add(&name, &command, kind, is_default))
}

#[tauri::command]
pub fn edit_shortcut(
    state: State<'_, AppState>,
    name: String,
    command: String,
    kind: ShortcutKind,
    is_default: bool,
) -> Result<()> {
    logged("edit", state.registry()?.edit(&name, &command, kind, is_default))
}

#[tauri::command]
pub fn delete_shortcut(state: State<'_, AppState>, name: String) -> Result<()> {
    logged("delete", state.registry()?.delete(&name))
}

#[tauri::command]
pub fn set_default_shortcut(state: State<'_, AppState>, name: String) -> Result<()> {
    logged("set default", state.registry()?.set_default(&name))
}

/// Name of the default shortcut, or `null` when none is set
#[tauri::command]
pub fn get_default_shortcut(state: State<'_, AppState>) -> Result<Option<String>> {
    Ok(state.registry()?.get_default().map(str::to_string))
}

/// Start a shortcut and return its run ID. Failures are reported later
/// through an error window, not through this result.
#[tauri::command]
pub fn run_shortcut(state: State<'_, AppState>, name: String) -> Result<Uuid> {
    Ok(run_by_name(&state, &name)?.run_id())
}

/// Dispatch a run of `name`
pub fn run_by_name(state: &AppState, name: &str) -> Result<ExecutionHandle> {
    let handle = state.registry()?.execute(name)?;
    tracing::debug!(run_id = %handle.run_id(), name = name, "Dispatched shortcut");
    Ok(handle)
}

/// Log a failed mutation. Rejected input is logged at debug level only.
fn logged(action: &str, result: Result<()>) -> Result<()> {
    if let Err(e) = &result {
        if e.is_validation() {
            tracing::debug!("Rejected {}: {}", action, e);
        } else {
            tracing::error!("Failed to {} shortcut: {}", action, e);
        }
    }
    result
}
