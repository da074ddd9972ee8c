//! Frontend event forwarder.
//!
//! Open dialogs listen to these events; the "Edit Shortcuts" list reloads
//! itself whenever the collection changes.

use crate::events::AppEvent;
use tauri::{AppHandle, Emitter};
use tokio::sync::broadcast;

/// The event name used for forwarding events to the frontend.
pub const FRONTEND_EVENT_NAME: &str = "app-event";

/// Start the frontend event forwarder.
pub fn start_handler(app_handle: AppHandle, mut receiver: broadcast::Receiver<AppEvent>) {
    tracing::debug!("Starting frontend event forwarder");

    tauri::async_runtime::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = app_handle.emit(FRONTEND_EVENT_NAME, &event) {
                        tracing::warn!("Failed to emit event to frontend: {}", e);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Frontend event forwarder lagged {} events", n);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, stopping frontend forwarder");
                    break;
                }
            }
        }
    });
}
