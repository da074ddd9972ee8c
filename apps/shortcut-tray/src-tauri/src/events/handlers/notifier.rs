//! Failure notifier.
//!
//! Every failed run gets its own error window with the message and, when
//! available, the traceback. A failure never stops the application.

use crate::commands::dialogs::show_error_window;
use crate::events::AppEvent;
use tauri::AppHandle;
use tokio::sync::broadcast;

/// Start the failure notifier.
pub fn start_handler(app_handle: AppHandle, mut receiver: broadcast::Receiver<AppEvent>) {
    tracing::debug!("Starting failure notifier");

    tauri::async_runtime::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => handle_event(&app_handle, event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Failure notifier lagged {} events, some failures were not shown", n);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, stopping failure notifier");
                    break;
                }
            }
        }
    });
}

fn handle_event(app: &AppHandle, event: AppEvent) {
    match event {
        AppEvent::ShortcutFailed {
            run_id,
            name,
            message,
            trace,
        } => {
            tracing::warn!(%run_id, name = %name, "Shortcut failed: {}", message);
            let text = failure_text(&name, &message);
            if let Err(e) = show_error_window(app, &text, trace.as_deref()) {
                tracing::error!("Could not show error window for run {}: {}", run_id, e);
            }
        }
        AppEvent::ShortcutSucceeded { run_id, name } => {
            tracing::debug!(%run_id, name = %name, "Run succeeded");
        }
        _ => {}
    }
}

/// The headline shown in the error window
pub fn failure_text(name: &str, message: &str) -> String {
    format!("Error executing shortcut '{}':\n{}", name, message)
}
