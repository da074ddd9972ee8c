//! The shortcut registry
//!
//! [`ShortcutRegistry`] owns the ordered collection of shortcuts. It keeps
//! at most one shortcut marked as default, writes every change to its
//! [`ShortcutStore`] before the change becomes visible, and announces each
//! change on the event bus so the tray menu can be rebuilt.

pub mod model;
pub mod storage;

pub use model::{seed_shortcuts, Shortcut, ShortcutKind};
pub use storage::ShortcutStore;

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{Result, ShortcutError};
use crate::events::{AppEvent, EventBus, ShortcutChange};
use crate::runner::{ExecutionHandle, ShortcutRunner};

pub struct ShortcutRegistry {
    store: ShortcutStore,
    shortcuts: Vec<Shortcut>,
    /// False while an unreadable file is still at the store path
    writable: bool,
    runner: ShortcutRunner,
    events: Arc<EventBus>,
}

impl ShortcutRegistry {
    /// Load the registry from `store`.
    ///
    /// With nothing stored yet, the seed shortcuts are written and returned.
    /// Stored data with several defaults is repaired: the first default in
    /// stored order is kept.
    pub fn load(store: ShortcutStore, runner: ShortcutRunner) -> Result<Self> {
        let mut repaired = false;
        let shortcuts = match store.read()? {
            Some(mut shortcuts) => {
                for name in keep_first_default(&mut shortcuts) {
                    tracing::warn!(name = %name, "Cleared extra default flag from stored shortcut");
                    repaired = true;
                }
                tracing::info!(path = %store.path().display(), count = shortcuts.len(), "Loaded shortcuts");
                shortcuts
            }
            None => {
                let seeds = seed_shortcuts();
                store.write(&seeds)?;
                tracing::info!(path = %store.path().display(), "No shortcuts stored, wrote built-in set");
                seeds
            }
        };

        let registry = Self::with_shortcuts(store, runner, shortcuts);
        if repaired {
            // The repaired set is still usable if it cannot be written back
            if let Err(e) = registry.save() {
                tracing::warn!("Could not save repaired shortcuts: {}", e);
            }
        }
        Ok(registry)
    }

    /// Load the registry, recovering from a bad shortcuts file.
    ///
    /// A corrupt file is moved aside and replaced by the seed set. Any other
    /// read error leaves the file alone and the seed set is used in memory
    /// only; such a registry refuses every change with `StorageUnavailable`
    /// so the file is never overwritten. The error that triggered the
    /// fallback is returned so the UI can tell the user.
    pub fn load_or_seed(store: ShortcutStore, runner: ShortcutRunner) -> (Self, Option<ShortcutError>) {
        let err = match Self::load(store.clone(), runner.clone()) {
            Ok(registry) => return (registry, None),
            Err(err) => err,
        };

        tracing::error!("Could not load shortcuts: {}", err);
        let moved_aside = if matches!(err, ShortcutError::StorageCorrupt { .. }) {
            store.quarantine().map(Some)
        } else {
            Ok(None)
        };

        (Self::recover(store, runner, moved_aside), Some(err))
    }

    /// Build the seed registry after a failed load. Writing is only enabled
    /// once the unreadable file has been moved out of the way.
    fn recover(store: ShortcutStore, runner: ShortcutRunner, moved_aside: Result<Option<PathBuf>>) -> Self {
        let writable = match moved_aside {
            Ok(Some(_)) => {
                if let Err(e) = store.write(&seed_shortcuts()) {
                    tracing::error!("Could not write built-in shortcuts: {}", e);
                }
                true
            }
            Ok(None) => false,
            Err(e) => {
                tracing::error!("Could not move unreadable shortcuts file aside: {}", e);
                false
            }
        };
        if !writable {
            tracing::warn!(path = %store.path().display(), "Using built-in shortcuts in memory only, changes are disabled");
        }

        let mut registry = Self::with_shortcuts(store, runner, seed_shortcuts());
        registry.writable = writable;
        registry
    }

    fn with_shortcuts(store: ShortcutStore, runner: ShortcutRunner, shortcuts: Vec<Shortcut>) -> Self {
        let events = Arc::clone(runner.event_bus());
        Self {
            store,
            shortcuts,
            writable: true,
            runner,
            events,
        }
    }

    /// Whether changes can be saved
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Write the current collection to storage.
    pub fn save(&self) -> Result<()> {
        self.write(&self.shortcuts)
    }

    fn write(&self, shortcuts: &[Shortcut]) -> Result<()> {
        if !self.writable {
            return Err(ShortcutError::unavailable(self.store.path()));
        }
        self.store.write(shortcuts)
    }

    /// Shortcuts in display order
    pub fn shortcuts(&self) -> &[Shortcut] {
        &self.shortcuts
    }

    pub fn get(&self, name: &str) -> Option<&Shortcut> {
        self.shortcuts.iter().find(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.shortcuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shortcuts.is_empty()
    }

    pub fn store(&self) -> &ShortcutStore {
        &self.store
    }

    /// Name of the default shortcut, if one is set
    pub fn get_default(&self) -> Option<&str> {
        self.shortcuts
            .iter()
            .find(|s| s.is_default)
            .map(|s| s.name.as_str())
    }

    /// Add a new shortcut at the end of the list.
    pub fn add(&mut self, name: &str, command: &str, kind: ShortcutKind, is_default: bool) -> Result<()> {
        let name = required("Name", name)?;
        let command = required("Command", command)?;
        if self.position(name).is_some() {
            return Err(ShortcutError::duplicate(name));
        }

        let mut next = self.shortcuts.clone();
        if is_default {
            clear_defaults(&mut next);
        }
        next.push(Shortcut::new(name, command, kind, is_default));

        self.commit(next, ShortcutChange::Added, name)?;
        tracing::info!(name = %name, ?kind, is_default, "Added shortcut");
        Ok(())
    }

    /// Replace the command, kind and default flag of an existing shortcut.
    ///
    /// The shortcut keeps its position and any unknown stored fields.
    pub fn edit(&mut self, name: &str, command: &str, kind: ShortcutKind, is_default: bool) -> Result<()> {
        let index = self.position(name).ok_or_else(|| ShortcutError::not_found(name))?;
        let command = required("Command", command)?;

        let mut next = self.shortcuts.clone();
        if is_default {
            clear_defaults(&mut next);
        }
        let entry = &mut next[index];
        entry.command = command.to_string();
        entry.kind = kind;
        entry.is_default = is_default;

        self.commit(next, ShortcutChange::Edited, name)?;
        tracing::info!(name = %name, ?kind, is_default, "Edited shortcut");
        Ok(())
    }

    /// Remove a shortcut. Removing the default leaves no default set.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        let index = self.position(name).ok_or_else(|| ShortcutError::not_found(name))?;

        let mut next = self.shortcuts.clone();
        let removed = next.remove(index);

        self.commit(next, ShortcutChange::Deleted, name)?;
        tracing::info!(name = %name, was_default = removed.is_default, "Deleted shortcut");
        Ok(())
    }

    /// Make `name` the only default shortcut.
    pub fn set_default(&mut self, name: &str) -> Result<()> {
        let index = self.position(name).ok_or_else(|| ShortcutError::not_found(name))?;

        let mut next = self.shortcuts.clone();
        clear_defaults(&mut next);
        next[index].is_default = true;

        self.commit(next, ShortcutChange::DefaultChanged, name)?;
        tracing::info!(name = %name, "Set default shortcut");
        Ok(())
    }

    /// Start running a shortcut. Returns as soon as the run is dispatched;
    /// the outcome arrives on the event bus.
    pub fn execute(&self, name: &str) -> Result<ExecutionHandle> {
        let shortcut = self.get(name).ok_or_else(|| ShortcutError::not_found(name))?;
        Ok(self.runner.dispatch(shortcut.clone()))
    }

    /// Run the default shortcut, if there is one.
    pub fn execute_default(&self) -> Option<ExecutionHandle> {
        let name = self.get_default()?;
        self.execute(name).ok()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.shortcuts.iter().position(|s| s.name == name)
    }

    /// Persist `next`, then make it current. On a failed write nothing changes.
    fn commit(&mut self, next: Vec<Shortcut>, change: ShortcutChange, name: &str) -> Result<()> {
        self.write(&next)?;
        self.shortcuts = next;
        self.events.emit(AppEvent::ShortcutsChanged {
            change,
            name: name.to_string(),
        });
        Ok(())
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ShortcutError::empty_field(field))
    } else {
        Ok(trimmed)
    }
}

fn clear_defaults(shortcuts: &mut [Shortcut]) {
    for shortcut in shortcuts {
        shortcut.is_default = false;
    }
}

/// Keep only the first default; return the names whose flag was cleared
fn keep_first_default(shortcuts: &mut [Shortcut]) -> Vec<String> {
    let mut seen = false;
    let mut cleared = Vec::new();
    for shortcut in shortcuts.iter_mut().filter(|s| s.is_default) {
        if seen {
            shortcut.is_default = false;
            cleared.push(shortcut.name.clone());
        }
        seen = true;
    }
    cleared
}
