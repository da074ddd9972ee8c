//! Optional global hotkey that runs the default shortcut
//!
//! Off unless `hotkey` is set in the config file. Works on X11, Wayland
//! compositors that support the portal, macOS and Windows.

use tauri::App;
use tauri_plugin_global_shortcut::{GlobalShortcutExt, Shortcut, ShortcutState};

use crate::error::{Result, ShortcutError};
use crate::platform::tray::run_default;

/// Parse an accelerator such as `CommandOrControl+Shift+Space`
pub fn parse_accelerator(accelerator: &str) -> Result<Shortcut> {
    accelerator
        .trim()
        .parse()
        .map_err(|e| ShortcutError::config(format!("Invalid hotkey '{}': {}", accelerator, e)))
}

/// Register `accelerator` so pressing it runs the default shortcut
pub fn setup_global_shortcut(app: &App, accelerator: &str) -> Result<()> {
    let shortcut = parse_accelerator(accelerator)?;

    app.global_shortcut()
        .on_shortcut(shortcut, |app, _shortcut, event| {
            if event.state() == ShortcutState::Pressed {
                run_default(app);
            }
        })
        .map_err(|e| ShortcutError::platform(format!("Cannot register hotkey '{}': {}", accelerator, e)))?;

    tracing::info!(hotkey = accelerator, "Global hotkey registered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_accelerator() {
        assert!(parse_accelerator("CommandOrControl+Shift+Space").is_ok());
        assert!(parse_accelerator(" Alt+F9 ").is_ok());
    }

    #[test]
    fn test_parse_invalid_accelerator() {
        let err = parse_accelerator("Shift+NotAKey").unwrap_err();
        assert!(matches!(err, ShortcutError::Config(_)));
        assert!(err.to_string().contains("Shift+NotAKey"));
    }
}
