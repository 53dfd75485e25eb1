//! Named configuration objects shared by every partial date field.
//!
//! The host owns where these live; the field type only needs to load, save
//! and delete them by name, so it talks to an injected [`ConfigStore`].

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde_json::Value;
use tracing::debug;

use crate::error::{PartialDateError, Result};

/// Module-wide settings object.
pub const SETTINGS_CONFIG: &str = "partial_date.settings";
/// Display format object.
pub const FORMAT_CONFIG: &str = "partial_date.format";

/// Storage for named configuration objects.
pub trait ConfigStore {
    fn load(&self, name: &str) -> Result<Option<Value>>;

    fn save(&self, name: &str, value: &Value) -> Result<()>;

    /// Delete an object. Deleting a missing object succeeds and returns false.
    fn delete(&self, name: &str) -> Result<bool>;
}

/// In-process store, mostly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    objects: Mutex<BTreeMap<String, Value>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.objects
            .lock()
            .map(|objects| objects.contains_key(name))
            .unwrap_or(false)
    }

    fn objects(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, Value>>> {
        self.objects.lock().map_err(|e| PartialDateError::Store {
            message: e.to_string(),
        })
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self, name: &str) -> Result<Option<Value>> {
        Ok(self.objects()?.get(name).cloned())
    }

    fn save(&self, name: &str, value: &Value) -> Result<()> {
        self.objects()?.insert(name.to_string(), value.clone());
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<bool> {
        let existed = self.objects()?.remove(name).is_some();
        debug!(config = name, existed, "config object deleted");
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn save_load_delete() {
        let store = MemoryConfigStore::new();
        assert_eq!(store.load(SETTINGS_CONFIG).unwrap(), None);

        store.save(SETTINGS_CONFIG, &json!({"a": 1})).unwrap();
        assert_eq!(store.load(SETTINGS_CONFIG).unwrap(), Some(json!({"a": 1})));
        assert!(store.contains(SETTINGS_CONFIG));

        assert!(store.delete(SETTINGS_CONFIG).unwrap());
        assert!(!store.delete(SETTINGS_CONFIG).unwrap());
        assert!(!store.contains(SETTINGS_CONFIG));
    }
}
