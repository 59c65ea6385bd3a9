use slot_engine::{PreferenceStore, StoreError};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Preferences kept as a flat JSON object in a single file.
pub struct JsonFilePreferenceStore {
    path: PathBuf,
}

impl JsonFilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&contents).map_err(|e| StoreError::Corrupt(e.to_string()))
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        // A corrupt file is replaced rather than blocking the write.
        let mut values = self.read_all().unwrap_or_default();
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents =
            serde_json::to_string_pretty(&values).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slot_engine::{load_preferred_preset, save_preferred_preset};

    #[test]
    fn roundtrips_through_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFilePreferenceStore::new(dir.path().join("nested/prefs.json"));

        assert_eq!(load_preferred_preset(&store), "all");
        save_preferred_preset(&store, "evening").unwrap();
        assert_eq!(load_preferred_preset(&store), "evening");

        let reopened = JsonFilePreferenceStore::new(dir.path().join("nested/prefs.json"));
        assert_eq!(load_preferred_preset(&reopened), "evening");
    }

    #[test]
    fn corrupt_file_reads_as_default_and_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();
        let store = JsonFilePreferenceStore::new(&path);

        assert!(store.get("suggested_hours_preset").is_err());
        assert_eq!(load_preferred_preset(&store), "all");

        save_preferred_preset(&store, "morning").unwrap();
        assert_eq!(load_preferred_preset(&store), "morning");
    }
}
