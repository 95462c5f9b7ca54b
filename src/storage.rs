//! Flat string key-value persistence.
//!
//! The browser's `localStorage` in production, an in-memory map in tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

/// Persisted key names.
pub mod keys {
    pub const COUNT: &str = "count";
    pub const SRAN_MODE_ENABLED: &str = "sranModeEnabled";
    pub const LEVEL_TEXT: &str = "levelAdv";
    pub const LEVEL_MIN: &str = "levelMin";
    pub const LEVEL_MAX: &str = "levelMax";
    pub const SRAN_LEVEL_TEXT: &str = "sranLevelAdv";
    pub const SRAN_LEVEL_MIN: &str = "sranLevelMin";
    pub const SRAN_LEVEL_MAX: &str = "sranLevelMax";
    pub const INCLUDE_DIFFS_RADIO: &str = "includeDiffsRadio";
    pub const INCLUDE_DIFFS: &str = "includeDiffs";
    pub const ONLY_INCLUDE_HARDEST: &str = "onlyIncludeHardest";
    pub const FOLDER: &str = "folder";
    pub const BUGGED_BPMS: &str = "buggedBpms";
    pub const HOLD_NOTES: &str = "holdNotes";
    pub const EEMALL: &str = "eemall";
    pub const FLOOR_INFECTION: &str = "floorInfection";
    pub const OMNIMIX: &str = "omnimix";
    pub const LIVELY: &str = "lively";
    pub const GAME_VERSION: &str = "gameVersion";
    pub const DRAWN_CHART_SETS: &str = "drawnChartSets";
    pub const SCHEMA_VERSION: &str = "optionsSchemaVersion";

    /// Keys only read by migrations.
    pub mod legacy {
        pub const LEVEL: &str = "level";
        pub const SRAN_LEVEL: &str = "sranLevel";
        pub const HARDEST_DIFF: &str = "hardestDiff";
        pub const VERSION_FOLDERS_RADIO: &str = "versionFoldersRadio";
        pub const VERSION_FOLDERS: &str = "versionFolders";
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    Unavailable,
    WriteRejected(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable => write!(f, "Browser storage is unavailable"),
            StorageError::WriteRejected(key) => write!(f, "Storage rejected write to '{}'", key),
        }
    }
}

impl std::error::Error for StorageError {}

/// String-valued persistent store. Implementations use interior mutability
/// so that readers and the single writer can share one handle.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).map(|value| value == "true")
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), StorageError> {
        self.set(key, if value { "true" } else { "false" })
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from `(key, value)` pairs.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        store.entries.borrow_mut().extend(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        store
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// `window.localStorage`.
#[derive(Clone)]
pub struct LocalStore {
    storage: web_sys::Storage,
}

impl LocalStore {
    pub fn open() -> Result<Self, StorageError> {
        gloo_utils::window()
            .local_storage()
            .ok()
            .flatten()
            .map(|storage| Self { storage })
            .ok_or(StorageError::Unavailable)
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|_| StorageError::WriteRejected(key.to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|_| StorageError::WriteRejected(key.to_string()))
    }
}
