//! Durable client storage boundary
//!
//! The stores persist through a narrow string-keyed capability instead of
//! reaching for ambient storage. A browser shell implements this trait over
//! localStorage; tests and server-side rendering use [`MemoryStorage`].

use std::collections::HashMap;

/// String-keyed slot storage surviving page reloads on one client.
///
/// No cross-process locking: another tab may rewrite a slot between our
/// reads, so every payload read back is treated as untrusted input.
pub trait StorageBackend {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory backend with the same semantics.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.slots.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) {
        self.slots.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.slots.remove(key);
    }
}
