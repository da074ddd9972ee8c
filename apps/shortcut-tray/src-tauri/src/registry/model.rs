//! Shortcut types and their on-disk representation

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// How a shortcut's command body is run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShortcutKind {
    /// A command line handed to the platform shell
    ShellCommand,
    /// Source code handed to the snippet interpreter
    CodeSnippet,
}

impl ShortcutKind {
    /// Map the stored `is_python` flag to a kind
    pub fn from_is_python(is_python: bool) -> Self {
        if is_python {
            Self::CodeSnippet
        } else {
            Self::ShellCommand
        }
    }

    pub fn is_python(self) -> bool {
        matches!(self, Self::CodeSnippet)
    }
}

/// One named, user-defined action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortcut {
    pub name: String,
    pub command: String,
    pub kind: ShortcutKind,
    pub is_default: bool,
    /// Fields found in the stored record that this version does not know.
    /// Written back unchanged on save.
    #[serde(skip)]
    pub extra: Map<String, Value>,
}

impl Shortcut {
    pub fn new(
        name: impl Into<String>,
        command: impl Into<String>,
        kind: ShortcutKind,
        is_default: bool,
    ) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            kind,
            is_default,
            extra: Map::new(),
        }
    }

    pub(crate) fn from_record(name: String, record: ShortcutRecord) -> Self {
        Self {
            name,
            command: record.command,
            kind: ShortcutKind::from_is_python(record.is_python),
            is_default: record.is_default,
            extra: record.extra,
        }
    }

    pub(crate) fn to_record(&self) -> ShortcutRecord {
        ShortcutRecord {
            command: self.command.clone(),
            is_python: self.kind.is_python(),
            is_default: self.is_default,
            extra: self.extra.clone(),
        }
    }
}

/// Shape of one entry in the shortcuts file, keyed by shortcut name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ShortcutRecord {
    pub command: String,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_python: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_default: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Read a flag from a hand-edited file: `null`, `0`, `""` and empty
/// collections are false, any other value is true.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    })
}

/// Command that opens the platform's plain text editor
fn text_editor_command() -> &'static str {
    if cfg!(target_os = "windows") {
        "notepad.exe"
    } else if cfg!(target_os = "macos") {
        "open -a TextEdit"
    } else {
        "gedit"
    }
}

/// Shortcuts written on first start, when no shortcuts file exists yet
pub fn seed_shortcuts() -> Vec<Shortcut> {
    vec![
        Shortcut::new(
            "Open Notepad",
            text_editor_command(),
            ShortcutKind::ShellCommand,
            false,
        ),
        Shortcut::new(
            "Take Screenshot",
            "import pyautogui\npyautogui.hotkey('win', 'shift', 's')",
            ShortcutKind::CodeSnippet,
            true,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_maps_is_python_flag() {
        assert_eq!(ShortcutKind::from_is_python(true), ShortcutKind::CodeSnippet);
        assert_eq!(ShortcutKind::from_is_python(false), ShortcutKind::ShellCommand);
        assert!(ShortcutKind::CodeSnippet.is_python());
        assert!(!ShortcutKind::ShellCommand.is_python());
    }

    #[test]
    fn test_seed_set() {
        let seeds = seed_shortcuts();
        assert_eq!(seeds.len(), 2);
        assert_eq!(seeds[0].name, "Open Notepad");
        assert_eq!(seeds[0].kind, ShortcutKind::ShellCommand);
        assert!(!seeds[0].is_default);
        assert_eq!(seeds[1].name, "Take Screenshot");
        assert_eq!(seeds[1].kind, ShortcutKind::CodeSnippet);
        assert!(seeds[1].is_default);
    }

    #[test]
    fn test_record_keeps_unknown_fields() {
        let record: ShortcutRecord = serde_json::from_value(serde_json::json!({
            "command": "echo hi",
            "is_python": false,
            "is_default": true,
            "hotkey": "Ctrl+1"
        }))
        .unwrap();

        let shortcut = Shortcut::from_record("Hi".to_string(), record);
        assert_eq!(shortcut.extra.get("hotkey"), Some(&Value::from("Ctrl+1")));

        let back = serde_json::to_value(shortcut.to_record()).unwrap();
        assert_eq!(back["hotkey"], "Ctrl+1");
        assert_eq!(back["is_default"], true);
    }

    #[test]
    fn test_missing_flags_default_to_false() {
        let record: ShortcutRecord =
            serde_json::from_value(serde_json::json!({ "command": "ls" })).unwrap();
        assert!(!record.is_python);
        assert!(!record.is_default);
    }

    #[test]
    fn test_loose_flag_values() {
        let read = |flag: Value| -> ShortcutRecord {
            serde_json::from_value(serde_json::json!({
                "command": "ls",
                "is_python": flag.clone(),
                "is_default": flag,
            }))
            .unwrap()
        };

        for falsy in [Value::Null, Value::from(0), Value::from(""), serde_json::json!([])] {
            let record = read(falsy.clone());
            assert!(!record.is_default, "{} should be false", falsy);
            assert!(!record.is_python, "{} should be false", falsy);
        }
        for truthy in [Value::from(1), Value::from("yes"), Value::from(true)] {
            let record = read(truthy.clone());
            assert!(record.is_default, "{} should be true", truthy);
            assert!(record.is_python, "{} should be true", truthy);
        }
    }

    #[test]
    fn test_frontend_view_hides_extra() {
        let mut shortcut = Shortcut::new("Lock", "loginctl lock-session", ShortcutKind::ShellCommand, true);
        shortcut.extra.insert("note".to_string(), Value::from("x"));

        let view = serde_json::to_value(&shortcut).unwrap();
        assert_eq!(view["kind"], "shellCommand");
        assert_eq!(view["isDefault"], true);
        assert!(view.get("extra").is_none());
        assert!(view.get("note").is_none());
    }
}
