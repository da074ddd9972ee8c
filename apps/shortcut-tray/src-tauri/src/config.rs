//! Application configuration
//!
//! Settings live in `config.json` in the platform config directory. Every
//! field is optional in the file; anything missing takes its default.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShortcutError};
use crate::utils::paths::expand_tilde;

/// Environment variable that overrides the shortcuts file location
pub const SHORTCUTS_FILE_ENV: &str = "SHORTCUT_TRAY_SHORTCUTS";

const CONFIG_FILE_NAME: &str = "config.json";
const SHORTCUTS_FILE_NAME: &str = "shortcuts.json";

/// Variables passed through to snippet interpreters when not configured
const DEFAULT_ENV_ALLOWLIST: &[&str] = &[
    "PATH",
    "HOME",
    "USER",
    "LANG",
    "LC_ALL",
    "DISPLAY",
    "WAYLAND_DISPLAY",
    "XAUTHORITY",
    "XDG_RUNTIME_DIR",
    "DBUS_SESSION_BUS_ADDRESS",
    "SYSTEMROOT",
    "WINDIR",
    "USERPROFILE",
    "APPDATA",
    "LOCALAPPDATA",
    "TEMP",
    "TMP",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Location of the shortcuts file; `~` is expanded
    pub shortcuts_file: Option<String>,
    /// Global accelerator that runs the default shortcut, e.g. `CommandOrControl+Shift+Space`
    pub hotkey: Option<String>,
    /// Snippet interpreter program; `python3`/`python` are tried when unset
    pub interpreter: Option<String>,
    /// Arguments placed before the snippet source
    pub interpreter_args: Vec<String>,
    /// Environment variables snippets may see
    pub snippet_env_allowlist: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            shortcuts_file: None,
            hotkey: None,
            interpreter: None,
            interpreter_args: vec!["-c".to_string()],
            snippet_env_allowlist: DEFAULT_ENV_ALLOWLIST.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AppConfig {
    /// Read the config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ShortcutError::Io(e)),
        };

        serde_json::from_str(&text)
            .map_err(|e| ShortcutError::config(format!("{}: {}", path.display(), e)))
    }

    /// Read the config file, logging and falling back to defaults on error
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("Ignoring config file: {}", e);
                Self::default()
            }
        }
    }

    /// Decide where the shortcuts file lives.
    ///
    /// Precedence: command-line flag, then `SHORTCUT_TRAY_SHORTCUTS`, then
    /// the config file, then the platform data directory.
    pub fn shortcuts_path(&self, cli: Option<&Path>, env: Option<String>) -> Result<PathBuf> {
        if let Some(path) = cli {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = env.filter(|p| !p.trim().is_empty()) {
            return Ok(expand_tilde(&path));
        }
        if let Some(path) = &self.shortcuts_file {
            return Ok(expand_tilde(path));
        }
        Ok(project_dirs()?.data_dir().join(SHORTCUTS_FILE_NAME))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "shortcut-tray", "shortcut-tray")
        .ok_or_else(|| ShortcutError::config("Failed to determine project directories"))
}

/// Default location of `config.json`
pub fn default_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.interpreter_args, vec!["-c".to_string()]);
        assert!(config.snippet_env_allowlist.contains(&"PATH".to_string()));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"hotkey": "CommandOrControl+Shift+Space"}"#).unwrap();

        let config = AppConfig::load(&path).unwrap();

        assert_eq!(config.hotkey.as_deref(), Some("CommandOrControl+Shift+Space"));
        assert_eq!(config.interpreter_args, vec!["-c".to_string()]);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ hotkey: ").unwrap();

        assert!(matches!(AppConfig::load(&path), Err(ShortcutError::Config(_))));
        assert_eq!(AppConfig::load_or_default(&path), AppConfig::default());
    }

    #[test]
    fn test_shortcuts_path_precedence() {
        let config = AppConfig {
            shortcuts_file: Some("/from/config.json".to_string()),
            ..AppConfig::default()
        };

        let cli = PathBuf::from("/from/cli.json");
        assert_eq!(
            config
                .shortcuts_path(Some(&cli), Some("/from/env.json".to_string()))
                .unwrap(),
            cli
        );
        assert_eq!(
            config
                .shortcuts_path(None, Some("/from/env.json".to_string()))
                .unwrap(),
            PathBuf::from("/from/env.json")
        );
        assert_eq!(
            config.shortcuts_path(None, Some("  ".to_string())).unwrap(),
            PathBuf::from("/from/config.json")
        );
    }

    #[test]
    fn test_shortcuts_path_defaults_to_data_dir() {
        let path = AppConfig::default().shortcuts_path(None, None).unwrap();
        assert!(path.ends_with(SHORTCUTS_FILE_NAME));
    }
}
