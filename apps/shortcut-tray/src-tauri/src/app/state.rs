//! Application state initialization
//!
//! Builds the registry once at startup and hands it to Tauri as managed
//! state. Everything else reaches it through [`AppState`].

use std::sync::{Arc, Mutex, MutexGuard};

use tauri::{App, Manager};
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

use crate::config::{self, AppConfig, SHORTCUTS_FILE_ENV};
use crate::error::{Result, ShortcutError};
use crate::events::EventBus;
use crate::registry::{ShortcutRegistry, ShortcutStore};
use crate::runner::ShortcutRunner;
use crate::LaunchOptions;

/// State shared by commands, the tray and event handlers
pub struct AppState {
    registry: Mutex<ShortcutRegistry>,
    pub config: AppConfig,
    pub events: Arc<EventBus>,
}

impl AppState {
    pub fn new(registry: ShortcutRegistry, config: AppConfig, events: Arc<EventBus>) -> Self {
        Self {
            registry: Mutex::new(registry),
            config,
            events,
        }
    }

    /// Lock the registry for reading or mutation
    pub fn registry(&self) -> Result<MutexGuard<'_, ShortcutRegistry>> {
        self.registry
            .lock()
            .map_err(|e| ShortcutError::lock(e.to_string()))
    }
}

/// Initialize all managed state for the application
pub fn init_state(app: &App, options: &LaunchOptions) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config_path = match &options.config_file {
        Some(path) => path.clone(),
        None => config::default_config_path()?,
    };
    let config = AppConfig::load_or_default(&config_path);

    let shortcuts_path = config.shortcuts_path(
        options.shortcuts_file.as_deref(),
        std::env::var(SHORTCUTS_FILE_ENV).ok(),
    )?;
    tracing::info!(config = %config_path.display(), shortcuts = %shortcuts_path.display(), "Resolved file locations");

    let events = Arc::new(EventBus::new());
    let runner = ShortcutRunner::system(Arc::clone(&events), &config);
    let (registry, warning) = ShortcutRegistry::load_or_seed(ShortcutStore::new(&shortcuts_path), runner);

    if let Some(err) = warning {
        app.dialog()
            .message(fallback_message(&err, &registry))
            .kind(MessageDialogKind::Warning)
            .title("Shortcut Tray")
            .show(|_| {});
    }

    app.manage(AppState::new(registry, config, events));
    Ok(())
}

/// Text of the warning shown when the shortcuts file could not be loaded
fn fallback_message(err: &ShortcutError, registry: &ShortcutRegistry) -> String {
    let mut message = format!("{}\n\nThe built-in shortcuts are being used instead.", err);
    if !registry.is_writable() {
        message.push_str(&format!(
            " Changes cannot be saved until {} is fixed or removed.",
            registry.store().path().display()
        ));
    }
    message
}

/// Start background services
pub fn start_background_services(app: &App) {
    let state = app.state::<AppState>();
    crate::events::start_event_handlers(app.handle().clone(), &state.events);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ShortcutKind;
    use crate::runner::testing::quiet_runner;

    #[test]
    fn test_registry_lock_allows_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let events = Arc::new(EventBus::new());
        let registry = ShortcutRegistry::load(
            ShortcutStore::new(dir.path().join("shortcuts.json")),
            quiet_runner(Arc::clone(&events)),
        )
        .unwrap();
        let state = AppState::new(registry, AppConfig::default(), events);

        state
            .registry()
            .unwrap()
            .add("Lock", "lock", ShortcutKind::ShellCommand, false)
            .unwrap();

        assert_eq!(state.registry().unwrap().len(), 3);
    }

    #[test]
    fn test_fallback_message_names_locked_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shortcuts.json");
        std::fs::create_dir(&path).unwrap();
        let events = Arc::new(EventBus::new());

        let (registry, warning) = ShortcutRegistry::load_or_seed(ShortcutStore::new(&path), quiet_runner(events));
        let message = fallback_message(&warning.unwrap(), &registry);

        assert!(message.contains("built-in shortcuts"));
        assert!(message.contains("cannot be saved"));
        assert!(message.contains(&path.display().to_string()));
    }

    #[test]
    fn test_fallback_message_after_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shortcuts.json");
        std::fs::write(&path, "not json").unwrap();
        let events = Arc::new(EventBus::new());

        let (registry, warning) = ShortcutRegistry::load_or_seed(ShortcutStore::new(&path), quiet_runner(events));
        let message = fallback_message(&warning.unwrap(), &registry);

        assert!(message.contains("built-in shortcuts"));
        assert!(!message.contains("cannot be saved"));
    }
}
