//! Key-value persistence behind the auth service.

use std::collections::HashMap;

/// Opaque string-keyed storage for session state.
///
/// The auth service only ever uses two keys, so the interface stays
/// minimal. Swap in a persistent implementation (browser local storage,
/// a file, a database) without touching the service.
pub trait KeyValueStore {
    /// Read a value, if present.
    fn get(&self, key: &str) -> Option<String>;
    /// Write or overwrite a value.
    fn set(&mut self, key: &str, value: &str);
    /// Delete a value. Deleting an absent key is a no-op.
    fn remove(&mut self, key: &str);
}

/// In-memory store used by tests and the demo binary.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}
