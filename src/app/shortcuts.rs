//! Global single-key shortcuts that write a literal value into a field.

use std::sync::{PoisonError, RwLock};

use rustc_hash::FxHashMap;

use crate::error::DispatchError;
use crate::tab::TabSection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutEntry {
    pub key: char,
    pub description: String,
    pub tab_index: usize,
    pub field_index: usize,
    /// Handler that owned the target field when the shortcut was registered.
    pub handler_name: String,
    pub value: String,
}

impl ShortcutEntry {
    /// Checks that the target slot still holds the handler this entry was registered for.
    pub fn validate(&self, tabs: &[TabSection]) -> Result<(), DispatchError> {
        let tab = tabs.get(self.tab_index).ok_or(DispatchError::StaleTab {
            tab: self.tab_index,
        })?;
        let field = tab
            .field(self.field_index)
            .ok_or(DispatchError::StaleField {
                tab: self.tab_index,
                field: self.field_index,
            })?;
        if field.name() != self.handler_name {
            return Err(DispatchError::HandlerMismatch {
                tab: self.tab_index,
                field: self.field_index,
                expected: self.handler_name.clone(),
                found: field.name().to_string(),
            });
        }
        Ok(())
    }
}

/// Thread-safe key → entry map.
#[derive(Debug, Default)]
pub struct ShortcutRegistry {
    entries: RwLock<FxHashMap<char, ShortcutEntry>>,
}

impl ShortcutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `entry`, returning the one it replaced.
    pub fn register(&self, entry: ShortcutEntry) -> Option<ShortcutEntry> {
        let key = entry.key;
        let previous = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, entry);
        if let Some(old) = &previous {
            tracing::warn!(
                key = %key,
                replaced = %old.handler_name,
                "shortcut key registered twice, keeping the newest"
            );
        }
        previous
    }

    pub fn get(&self, key: char) -> Option<ShortcutEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }

    pub fn remove(&self, key: char) -> Option<ShortcutEntry> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&key)
    }

    /// All entries ordered by key.
    pub fn entries(&self) -> Vec<ShortcutEntry> {
        let mut out: Vec<ShortcutEntry> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        out.sort_by_key(|e| e.key);
        out
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/shortcuts.rs"]
mod tests;
