//! Shortcut Tray - run named commands and code snippets from the system tray
//!
//! This is the main library entry point that sets up and runs the Tauri application.

mod app;
mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
mod platform;
pub mod registry;
pub mod runner;
pub mod utils;

use std::path::PathBuf;

use app::{handle_run_event, register_plugins};

/// Overrides taken from the command line
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Use this shortcuts file instead of the configured one
    pub shortcuts_file: Option<PathBuf>,
    /// Use this config file instead of the default location
    pub config_file: Option<PathBuf>,
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run(options: LaunchOptions) {
    logging::init();
    tracing::info!("Starting Shortcut Tray");

    register_plugins(tauri::Builder::default())
        .setup(move |app| {
            // Load config and shortcuts
            app::init_state(app, &options)?;

            // Tray refresh, failure windows, dialog updates
            app::start_background_services(app);

            // Tray icon, hotkey, activation policy
            platform::setup(app)?;

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Registry
            commands::shortcuts::list_shortcuts,
            commands::shortcuts::get_shortcut,
            commands::shortcuts::add_shortcut,
            commands::shortcuts::edit_shortcut,
            commands::shortcuts::delete_shortcut,
            commands::shortcuts::set_default_shortcut,
            commands::shortcuts::get_default_shortcut,
            commands::shortcuts::run_shortcut,
            // Dialogs
            commands::dialogs::open_edit_shortcut_dialog,
            commands::dialogs::close_dialog,
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(handle_run_event);
}
