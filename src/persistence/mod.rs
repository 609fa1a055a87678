//! Namespaced key/value persistence
//!
//! Games keep small string blobs (a JSON save, a high score) under
//! `namespace/key`. On the web the backing store is LocalStorage; natively
//! and in tests it is an in-memory map. Reads never fail: anything missing
//! or unparseable comes back as the caller's default.

use std::collections::HashMap;

/// Raw string storage
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str);
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) {
        (**self).set_item(key, value);
    }
}

/// In-memory store for native runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    /// `None` when storage is unavailable (private mode, sandboxed frame)
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()?;
        Some(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        if let Err(e) = self.storage.set_item(key, value) {
            log::warn!("Failed to store {}: {:?}", key, e);
        }
    }
}

/// Keys scoped under one game's namespace
#[derive(Debug, Clone)]
pub struct Storage<S> {
    namespace: String,
    backend: S,
}

impl<S: KeyValueStore> Storage<S> {
    pub fn new(namespace: &str, backend: S) -> Self {
        Self {
            namespace: namespace.to_string(),
            backend,
        }
    }

    pub fn key(&self, key: &str) -> String {
        format!("{}/{}", self.namespace, key)
    }

    pub fn store(&mut self, key: &str, value: &str) {
        let key = self.key(key);
        self.backend.set_item(&key, value);
    }

    /// Missing or empty values read as `default`
    pub fn read(&self, key: &str, default: &str) -> String {
        match self.backend.get_item(&self.key(key)) {
            Some(value) if !value.is_empty() => value,
            _ => default.to_string(),
        }
    }

    /// Missing, unparseable, zero or non-finite values read as `default`
    pub fn read_numeric(&self, key: &str, default: f64) -> f64 {
        self.read(key, "")
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v != 0.0)
            .unwrap_or(default)
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> Storage<MemoryStore> {
        Storage::new("tetrish", MemoryStore::new())
    }

    #[test]
    fn test_keys_are_namespaced() {
        let mut s = storage();
        s.store("highscore", "12");
        assert_eq!(s.backend().get_item("tetrish/highscore").as_deref(), Some("12"));
        assert_eq!(s.backend().get_item("highscore"), None);
    }

    #[test]
    fn test_read_falls_back_on_missing_or_empty() {
        let mut s = storage();
        assert_eq!(s.read("gamestate", "none"), "none");
        s.store("gamestate", "");
        assert_eq!(s.read("gamestate", "none"), "none");
        s.store("gamestate", "{}");
        assert_eq!(s.read("gamestate", "none"), "{}");
    }

    #[test]
    fn test_read_numeric_fallbacks() {
        let mut s = storage();
        assert_eq!(s.read_numeric("n", 7.0), 7.0);

        s.store("n", "not a number");
        assert_eq!(s.read_numeric("n", 7.0), 7.0);

        s.store("n", "0");
        assert_eq!(s.read_numeric("n", 7.0), 7.0);

        s.store("n", "NaN");
        assert_eq!(s.read_numeric("n", 7.0), 7.0);

        s.store("n", " 42.5 ");
        assert_eq!(s.read_numeric("n", 7.0), 42.5);
    }

    #[test]
    fn test_boxed_backend() {
        let backend: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        let mut s = Storage::new("tetrish", backend);
        s.store("score", "3");
        assert_eq!(s.read_numeric("score", 0.0), 3.0);
        assert_eq!(s.backend().get_item("tetrish/score").as_deref(), Some("3"));
    }
}
