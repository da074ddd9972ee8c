//! Application event types for the event bus system.
//!
//! Registry mutations and shortcut runs are announced here so the tray menu,
//! the open dialogs and the failure notifier can react without the registry
//! knowing about any of them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What kind of mutation produced a `ShortcutsChanged` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortcutChange {
    Added,
    Edited,
    Deleted,
    DefaultChanged,
}

/// Application events that flow through the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum AppEvent {
    // =========================================================================
    // Registry Events
    // =========================================================================
    /// The shortcut collection changed and was persisted
    ShortcutsChanged { change: ShortcutChange, name: String },

    // =========================================================================
    // Execution Events
    // =========================================================================
    /// A shortcut run was dispatched to a worker
    ShortcutStarted { run_id: Uuid, name: String },

    /// A shortcut run finished without error
    ShortcutSucceeded { run_id: Uuid, name: String },

    /// A shortcut run failed
    ShortcutFailed {
        run_id: Uuid,
        name: String,
        message: String,
        trace: Option<String>,
    },
}

impl AppEvent {
    /// Get the shortcut name this event is about.
    pub fn shortcut_name(&self) -> &str {
        match self {
            AppEvent::ShortcutsChanged { name, .. }
            | AppEvent::ShortcutStarted { name, .. }
            | AppEvent::ShortcutSucceeded { name, .. }
            | AppEvent::ShortcutFailed { name, .. } => name,
        }
    }

    /// Get the run ID associated with this event, if any.
    pub fn run_id(&self) -> Option<Uuid> {
        match self {
            AppEvent::ShortcutStarted { run_id, .. }
            | AppEvent::ShortcutSucceeded { run_id, .. }
            | AppEvent::ShortcutFailed { run_id, .. } => Some(*run_id),
            AppEvent::ShortcutsChanged { .. } => None,
        }
    }

    /// Whether the tray menu must be rebuilt in response to this event.
    pub fn refreshes_menu(&self) -> bool {
        matches!(self, AppEvent::ShortcutsChanged { .. })
    }

    /// Get a short description of the event for logging.
    pub fn description(&self) -> String {
        match self {
            AppEvent::ShortcutsChanged { change, name } => {
                format!("Shortcut '{}' {:?}", name, change)
            }
            AppEvent::ShortcutStarted { run_id, name } => {
                format!("Run {} of '{}' started", run_id, name)
            }
            AppEvent::ShortcutSucceeded { run_id, name } => {
                format!("Run {} of '{}' succeeded", run_id, name)
            }
            AppEvent::ShortcutFailed {
                run_id,
                name,
                message,
                ..
            } => {
                format!("Run {} of '{}' failed: {}", run_id, name, message)
            }
        }
    }
}
