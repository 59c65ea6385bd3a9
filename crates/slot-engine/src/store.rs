//! Persisted "suggested hours" choice, behind an injected store.
//!
//! The filter itself is stateless; callers read the last-chosen preset through a
//! [`PreferenceStore`] and pass the resolved window explicitly.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::warn;

use crate::error::StoreError;
use crate::preference::ALL_HOURS_PRESET;

/// Key under which the last-chosen preset name is stored.
pub const SUGGESTED_HOURS_KEY: &str = "suggested_hours_preset";

/// Preset used when nothing is stored or the store cannot be read.
pub const DEFAULT_PRESET: &str = ALL_HOURS_PRESET;

/// Minimal keyed string storage.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-process store, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self
            .values
            .lock()
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The stored preset name, or [`DEFAULT_PRESET`] when absent or unreadable.
pub fn load_preferred_preset(store: &dyn PreferenceStore) -> String {
    load_preferred_preset_or(store, DEFAULT_PRESET)
}

/// Like [`load_preferred_preset`] with a caller-chosen default.
pub fn load_preferred_preset_or(store: &dyn PreferenceStore, default: &str) -> String {
    match store.get(SUGGESTED_HOURS_KEY) {
        Ok(Some(name)) if !name.trim().is_empty() => name,
        Ok(_) => default.to_string(),
        Err(err) => {
            warn!(error = %err, "could not read suggested hours preference, using default");
            default.to_string()
        }
    }
}

/// Remember `preset` as the user's suggested-hours choice.
pub fn save_preferred_preset(store: &dyn PreferenceStore, preset: &str) -> Result<(), StoreError> {
    store.set(SUGGESTED_HOURS_KEY, preset)
}
