//! Application lifecycle event handling

use tauri::{AppHandle, RunEvent};

/// Handle application run events
///
/// Closing the last dialog must not quit a tray application. Only an exit
/// with an explicit code (the tray's "Exit" item) is let through.
pub fn handle_run_event(_app: &AppHandle, event: RunEvent) {
    match event {
        RunEvent::ExitRequested { code: None, api, .. } => {
            api.prevent_exit();
        }
        RunEvent::Exit => {
            tracing::info!("Shortcut Tray exiting");
        }
        _ => {}
    }
}
