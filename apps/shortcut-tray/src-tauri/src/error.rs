//! Error types for Shortcut Tray
//!
//! One error type is shared by the registry, the runner and the Tauri
//! commands. Command handlers return it directly; it serializes to its
//! display string so the dialogs can show it verbatim.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for Shortcut Tray operations
#[derive(Error, Debug)]
pub enum ShortcutError {
    /// The shortcuts file exists but is not a well-formed shortcut record
    #[error("Shortcuts file {path} is unreadable: {reason}")]
    StorageCorrupt { path: PathBuf, reason: String },

    /// Writing the shortcuts file failed; the change was not persisted
    #[error("Could not save shortcuts to {path}: {source}")]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The shortcuts file could not be loaded and is still in place, so
    /// saving would overwrite it
    #[error("Changes are disabled: {path} could not be loaded. Fix or remove it, then restart")]
    StorageUnavailable { path: PathBuf },

    /// A shortcut with this name already exists
    #[error("A shortcut named \"{0}\" already exists")]
    DuplicateName(String),

    /// A required field was blank
    #[error("{0} is required")]
    EmptyField(&'static str),

    /// No shortcut with this name exists
    #[error("Shortcut not found: {0}")]
    NotFound(String),

    /// Running a shortcut failed
    #[error("{message}")]
    Execution {
        message: String,
        trace: Option<String>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Platform-specific errors (tray, windows, hotkeys)
    #[error("Platform error: {0}")]
    Platform(String),

    /// Mutex lock errors
    #[error("Lock error: {0}")]
    Lock(String),

    /// IO-related errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ShortcutError {
    /// Create a not found error
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a duplicate name error
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateName(name.into())
    }

    /// Create a blank field error
    pub fn empty_field(field: &'static str) -> Self {
        Self::EmptyField(field)
    }

    /// Create a corrupt storage error
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::StorageCorrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a storage write error
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StorageWrite {
            path: path.into(),
            source,
        }
    }

    /// Create an unavailable storage error
    pub fn unavailable(path: impl Into<PathBuf>) -> Self {
        Self::StorageUnavailable { path: path.into() }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a platform error
    pub fn platform(msg: impl Into<String>) -> Self {
        Self::Platform(msg.into())
    }

    /// Create a lock error
    pub fn lock(msg: impl Into<String>) -> Self {
        Self::Lock(msg.into())
    }

    /// True for errors the user can fix by correcting dialog input
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::DuplicateName(_) | Self::EmptyField(_) | Self::NotFound(_)
        )
    }
}

impl From<tauri::Error> for ShortcutError {
    fn from(err: tauri::Error) -> Self {
        Self::Platform(err.to_string())
    }
}

/// Convert ShortcutError to String for Tauri command compatibility
impl From<ShortcutError> for String {
    fn from(err: ShortcutError) -> Self {
        err.to_string()
    }
}

/// Result type alias using ShortcutError
pub type Result<T> = std::result::Result<T, ShortcutError>;

/// Serialize ShortcutError for Tauri
impl serde::Serialize for ShortcutError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = ShortcutError::not_found("Lock");
        assert_eq!(err.to_string(), "Shortcut not found: Lock");
    }

    #[test]
    fn test_empty_field_error() {
        let err = ShortcutError::EmptyField("Name");
        assert_eq!(err.to_string(), "Name is required");
        assert!(err.is_validation());
    }

    #[test]
    fn test_storage_errors_are_not_validation() {
        let err = ShortcutError::corrupt("/tmp/shortcuts.json", "expected a JSON object");
        assert!(!err.is_validation());
        assert!(err.to_string().contains("expected a JSON object"));

        let err = ShortcutError::unavailable("/tmp/shortcuts.json");
        assert!(!err.is_validation());
        assert!(err.to_string().contains("/tmp/shortcuts.json"));
    }

    #[test]
    fn test_error_to_string_conversion() {
        let err = ShortcutError::duplicate("Open Notepad");
        let s: String = err.into();
        assert_eq!(s, "A shortcut named \"Open Notepad\" already exists");
    }

    #[test]
    fn test_serializes_as_display_string() {
        let err = ShortcutError::config("bad hotkey");
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"Configuration error: bad hotkey\"");
    }
}
