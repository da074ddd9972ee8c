//! JSON persistence for the shortcut collection

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};

use super::model::{Shortcut, ShortcutRecord};
use crate::error::{Result, ShortcutError};
use crate::utils::fs::{move_aside, write_atomic};

/// Reads and writes the shortcuts file.
///
/// The file is a JSON object mapping each shortcut name to its record. Key
/// order is the display order.
#[derive(Debug, Clone)]
pub struct ShortcutStore {
    path: PathBuf,
}

impl ShortcutStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored shortcuts.
    ///
    /// Returns `Ok(None)` when there is nothing stored yet: the file is
    /// missing or contains only whitespace.
    pub fn read(&self) -> Result<Option<Vec<Shortcut>>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                return Err(ShortcutError::corrupt(&self.path, "file is not valid UTF-8"));
            }
            Err(e) => return Err(ShortcutError::Io(e)),
        };

        if text.trim().is_empty() {
            return Ok(None);
        }

        parse_shortcuts(&self.path, &text).map(Some)
    }

    /// Write all shortcuts, replacing the file atomically.
    pub fn write(&self, shortcuts: &[Shortcut]) -> Result<()> {
        let contents = render_shortcuts(shortcuts)?;
        write_atomic(&self.path, &contents).map_err(|e| ShortcutError::write(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), count = shortcuts.len(), "Saved shortcuts");
        Ok(())
    }

    /// Move an unreadable shortcuts file out of the way so it is not lost
    /// when the seed set is written in its place.
    pub fn quarantine(&self) -> Result<PathBuf> {
        let suffix = format!("corrupt-{}", Utc::now().format("%Y%m%dT%H%M%SZ"));
        let moved = move_aside(&self.path, &suffix)?;
        tracing::warn!(from = %self.path.display(), to = %moved.display(), "Moved unreadable shortcuts file aside");
        Ok(moved)
    }
}

fn parse_shortcuts(path: &Path, text: &str) -> Result<Vec<Shortcut>> {
    let entries: Map<String, Value> = serde_json::from_str(text)
        .map_err(|e| ShortcutError::corrupt(path, e.to_string()))?;

    entries
        .into_iter()
        .map(|(name, value)| {
            let record: ShortcutRecord = serde_json::from_value(value).map_err(|e| {
                ShortcutError::corrupt(path, format!("entry \"{}\": {}", name, e))
            })?;
            Ok(Shortcut::from_record(name, record))
        })
        .collect()
}

/// Pretty-print with four-space indentation
fn render_shortcuts(shortcuts: &[Shortcut]) -> Result<Vec<u8>> {
    let mut entries = Map::new();
    for shortcut in shortcuts {
        entries.insert(
            shortcut.name.clone(),
            serde_json::to_value(shortcut.to_record())?,
        );
    }

    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    entries.serialize(&mut serializer)?;
    out.push(b'\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::model::{seed_shortcuts, ShortcutKind};

    fn store_in(dir: &tempfile::TempDir) -> ShortcutStore {
        ShortcutStore::new(dir.path().join("shortcuts.json"))
    }

    #[test]
    fn test_missing_file_reads_as_nothing_stored() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(&dir).read().unwrap().is_none());
    }

    #[test]
    fn test_blank_file_reads_as_nothing_stored() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "  \n").unwrap();
        assert!(store.read().unwrap().is_none());
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let shortcuts = seed_shortcuts();

        store.write(&shortcuts).unwrap();

        assert_eq!(store.read().unwrap().unwrap(), shortcuts);
    }

    #[test]
    fn test_reads_stored_file_format_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"{
                "Zeta": {"command": "echo z", "is_python": false, "is_default": false},
                "Alpha": {"command": "print(1)", "is_python": true, "is_default": true}
            }"#,
        )
        .unwrap();

        let shortcuts = store.read().unwrap().unwrap();

        let names: Vec<_> = shortcuts.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Zeta", "Alpha"]);
        assert_eq!(shortcuts[1].kind, ShortcutKind::CodeSnippet);
        assert!(shortcuts[1].is_default);
    }

    #[test]
    fn test_written_file_uses_stored_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.write(&seed_shortcuts()).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["Take Screenshot"]["is_python"], true);
        assert_eq!(value["Take Screenshot"]["is_default"], true);
        assert!(text.contains("\n    \"Open Notepad\""));
    }

    #[test]
    fn test_unknown_fields_survive_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"{"Lock": {"command": "lock", "is_python": false, "is_default": false, "icon": "padlock"}}"#,
        )
        .unwrap();

        let shortcuts = store.read().unwrap().unwrap();
        store.write(&shortcuts).unwrap();

        let value: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(value["Lock"]["icon"], "padlock");
    }

    #[test]
    fn test_malformed_json_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(store.read(), Err(ShortcutError::StorageCorrupt { .. })));
    }

    #[test]
    fn test_wrong_shape_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        fs::write(store.path(), "[1, 2, 3]").unwrap();
        assert!(matches!(store.read(), Err(ShortcutError::StorageCorrupt { .. })));

        fs::write(store.path(), r#"{"Lock": "lock"}"#).unwrap();
        assert!(matches!(store.read(), Err(ShortcutError::StorageCorrupt { .. })));

        fs::write(store.path(), r#"{"Lock": {"is_python": false}}"#).unwrap();
        let err = store.read().unwrap_err();
        assert!(err.to_string().contains("entry \"Lock\""));
    }

    #[test]
    fn test_hand_edited_flags_are_not_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"{"Lock": {"command": "lock", "is_python": null, "is_default": 1}}"#,
        )
        .unwrap();

        let shortcuts = store.read().unwrap().unwrap();

        assert_eq!(shortcuts[0].kind, ShortcutKind::ShellCommand);
        assert!(shortcuts[0].is_default);
    }

    #[test]
    fn test_quarantine_moves_file_aside() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "garbage").unwrap();

        let moved = store.quarantine().unwrap();

        assert!(!store.path().exists());
        assert_eq!(fs::read_to_string(&moved).unwrap(), "garbage");
        assert!(moved
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("shortcuts.json.corrupt-"));
    }

    #[test]
    fn test_write_failure_is_storage_write_error() {
        let dir = tempfile::tempdir().unwrap();
        // The target path is an existing directory, so the rename cannot succeed
        let taken = dir.path().join("taken");
        fs::create_dir(&taken).unwrap();
        fs::write(taken.join("inner"), "x").unwrap();
        let store = ShortcutStore::new(&taken);

        assert!(matches!(
            store.write(&seed_shortcuts()),
            Err(ShortcutError::StorageWrite { .. })
        ));
    }
}
