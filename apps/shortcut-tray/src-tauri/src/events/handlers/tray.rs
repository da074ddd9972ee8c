//! Keeps the tray menu in step with the registry.

use crate::events::AppEvent;
use crate::platform::tray::refresh_tray_menu;
use tauri::AppHandle;
use tokio::sync::broadcast;

/// Start the tray refresh handler.
pub fn start_handler(app_handle: AppHandle, mut receiver: broadcast::Receiver<AppEvent>) {
    tracing::debug!("Starting tray menu handler");

    tauri::async_runtime::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) if event.refreshes_menu() => {
                    if let Err(e) = refresh_tray_menu(&app_handle) {
                        tracing::error!("Tray handler error: {}", e);
                    }
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    // Missed changes are covered by rebuilding from the current state
                    tracing::warn!("Tray handler lagged {} events", n);
                    if let Err(e) = refresh_tray_menu(&app_handle) {
                        tracing::error!("Tray handler error: {}", e);
                    }
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, stopping tray handler");
                    break;
                }
            }
        }
    });
}
