//! System tray icon and menu
//!
//! The menu lists one check item per shortcut (checked = default), then
//! "Add Shortcut", "Edit Shortcuts" and "Exit". It is rebuilt from a
//! snapshot of the registry whenever the shortcuts change.
//!
//! Note: Linux tray hosts do not deliver icon click events, so there the
//! default shortcut is reachable through the menu or the global hotkey only.

use tauri::{
    menu::{CheckMenuItem, Menu, MenuItem, PredefinedMenuItem},
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    App, AppHandle, Manager, Runtime,
};

use crate::app::AppState;
use crate::commands::{dialogs, shortcuts::run_by_name};
use crate::error::Result;
use crate::registry::Shortcut;

/// Identifier of the one tray icon this app creates
pub const TRAY_ID: &str = "main";

const RUN_PREFIX: &str = "run:";
const ADD_ID: &str = "add-shortcut";
const EDIT_ID: &str = "edit-shortcuts";
const EXIT_ID: &str = "exit";

/// What a tray menu item does when clicked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayAction {
    Run(String),
    AddShortcut,
    EditShortcuts,
    Exit,
}

impl TrayAction {
    pub fn from_menu_id(id: &str) -> Option<Self> {
        match id {
            ADD_ID => Some(Self::AddShortcut),
            EDIT_ID => Some(Self::EditShortcuts),
            EXIT_ID => Some(Self::Exit),
            _ => id
                .strip_prefix(RUN_PREFIX)
                .map(|name| Self::Run(name.to_string())),
        }
    }

    pub fn menu_id(&self) -> String {
        match self {
            Self::Run(name) => format!("{}{}", RUN_PREFIX, name),
            Self::AddShortcut => ADD_ID.to_string(),
            Self::EditShortcuts => EDIT_ID.to_string(),
            Self::Exit => EXIT_ID.to_string(),
        }
    }
}

/// Build the tray menu for `shortcuts`
pub fn build_tray_menu<R: Runtime, M: Manager<R>>(
    manager: &M,
    shortcuts: &[Shortcut],
) -> tauri::Result<Menu<R>> {
    let menu = Menu::new(manager)?;

    for shortcut in shortcuts {
        let item = CheckMenuItem::with_id(
            manager,
            TrayAction::Run(shortcut.name.clone()).menu_id(),
            &shortcut.name,
            true,
            shortcut.is_default,
            None::<&str>,
        )?;
        menu.append(&item)?;
    }

    menu.append(&PredefinedMenuItem::separator(manager)?)?;
    menu.append(&MenuItem::with_id(manager, ADD_ID, "Add Shortcut", true, None::<&str>)?)?;
    menu.append(&MenuItem::with_id(manager, EDIT_ID, "Edit Shortcuts", true, None::<&str>)?)?;
    menu.append(&PredefinedMenuItem::separator(manager)?)?;
    menu.append(&MenuItem::with_id(manager, EXIT_ID, "Exit", true, None::<&str>)?)?;

    Ok(menu)
}

/// Create the tray icon
pub fn setup_tray(app: &App) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let shortcuts = snapshot(app.handle())?;
    let menu = build_tray_menu(app, &shortcuts)?;

    let mut builder = TrayIconBuilder::with_id(TRAY_ID)
        .menu(&menu)
        .tooltip("Shortcut Tray")
        .show_menu_on_left_click(false)
        .on_tray_icon_event(|tray, event| {
            if is_left_click(&event) {
                run_default(tray.app_handle());
            }
        })
        .on_menu_event(|app, event| {
            handle_menu_event(app, event.id.as_ref());
        });

    if let Some(icon) = app.default_window_icon() {
        builder = builder.icon(icon.clone());
    }

    builder.build(app)?;
    Ok(())
}

/// Rebuild the tray menu from the current registry contents
pub fn refresh_tray_menu(app: &AppHandle) -> Result<()> {
    let Some(tray) = app.tray_by_id(TRAY_ID) else {
        return Ok(());
    };
    // Snapshot first so the registry lock is not held while the menu is built
    let shortcuts = snapshot(app)?;
    let menu = build_tray_menu(app, &shortcuts)?;
    tray.set_menu(Some(menu))?;
    tracing::debug!(count = shortcuts.len(), "Tray menu rebuilt");
    Ok(())
}

/// Check if a tray event is a left click release
pub fn is_left_click(event: &TrayIconEvent) -> bool {
    matches!(
        event,
        TrayIconEvent::Click {
            button: MouseButton::Left,
            button_state: MouseButtonState::Up,
            ..
        }
    )
}

/// Run the default shortcut, if one is set
pub fn run_default(app: &AppHandle) {
    let state = app.state::<AppState>();
    let handle = match state.registry() {
        Ok(registry) => registry.execute_default(),
        Err(e) => {
            tracing::error!("Cannot run default shortcut: {}", e);
            return;
        }
    };

    match handle {
        Some(handle) => tracing::debug!(run_id = %handle.run_id(), name = handle.name(), "Ran default shortcut"),
        None => tracing::info!("No default shortcut set"),
    }
}

/// Handle tray menu clicks
pub fn handle_menu_event(app: &AppHandle, event_id: &str) {
    let Some(action) = TrayAction::from_menu_id(event_id) else {
        tracing::warn!(id = event_id, "Unknown tray menu item");
        return;
    };

    let result = match action {
        TrayAction::Run(name) => {
            let run = run_by_name(&app.state::<AppState>(), &name).map(|_| ());
            // Clicking a check item flips its mark; restore it from the registry
            if let Err(e) = refresh_tray_menu(app) {
                tracing::warn!("Failed to refresh tray menu: {}", e);
            }
            run
        }
        TrayAction::AddShortcut => dialogs::open_add_dialog(app),
        TrayAction::EditShortcuts => dialogs::open_edit_dialog(app),
        TrayAction::Exit => {
            app.exit(0);
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!("Tray action failed: {}", e);
        if let Err(e) = dialogs::show_error_window(app, &e.to_string(), None) {
            tracing::error!("Could not show error window: {}", e);
        }
    }
}

fn snapshot(app: &AppHandle) -> Result<Vec<Shortcut>> {
    let state = app.state::<AppState>();
    let registry = state.registry()?;
    Ok(registry.shortcuts().to_vec())
}
