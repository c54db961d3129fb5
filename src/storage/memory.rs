// src/storage/memory.rs — In-process key/value store

use std::collections::HashMap;
use std::sync::Mutex;

use super::KeyValueStore;
use crate::infra::errors::WayrankError;

/// HashMap-backed store. Used for tests and for sessions that opt out of
/// durable storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, WayrankError> {
        self.entries
            .lock()
            .map_err(|_| WayrankError::Storage("memory store lock poisoned".into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, WayrankError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), WayrankError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), WayrankError> {
        self.lock()?.remove(key);
        Ok(())
    }
}
