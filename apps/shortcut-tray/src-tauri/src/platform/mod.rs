//! Platform integration
//!
//! The tray icon is the whole user interface; dialogs are opened from it on
//! demand. On macOS the app runs as an accessory so it has no Dock icon.

pub mod hotkey;
pub mod tray;

use tauri::{App, Manager};

use crate::app::AppState;

/// Unified platform setup function
///
/// Call this from lib.rs during app setup, after the managed state exists.
pub fn setup(app: &mut App) -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(target_os = "macos")]
    app.set_activation_policy(tauri::ActivationPolicy::Accessory);

    tray::setup_tray(app)?;

    let hotkey = app.state::<AppState>().config.hotkey.clone();
    if let Some(accelerator) = hotkey.filter(|h| !h.trim().is_empty()) {
        // A bad hotkey should not keep the tray from starting
        if let Err(e) = hotkey::setup_global_shortcut(app, &accelerator) {
            tracing::warn!("{}", e);
        }
    }

    Ok(())
}
