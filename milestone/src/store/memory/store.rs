use crate::errors::MilestoneResult;
use crate::store::PreferenceStoreProvider;
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory preference store.
///
/// # Characteristics
/// - **Thread-Safe**: backed by a concurrent map
/// - **Shared**: clones see the same entries
/// - **No Persistence**: everything is lost when the last clone is dropped
///
/// # Usage
/// ```rust
/// use milestone::store::{InMemoryStore, PreferenceStoreProvider};
///
/// let store = InMemoryStore::new();
/// store.set("app.lastMigratedVersion", "1.2").unwrap();
/// assert_eq!(store.get("app.lastMigratedVersion").unwrap().as_deref(), Some("1.2"));
/// ```
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<DashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> InMemoryStore {
        InMemoryStore {
            inner: Arc::new(DashMap::new()),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl PreferenceStoreProvider for InMemoryStore {
    fn get(&self, key: &str) -> MilestoneResult<Option<String>> {
        Ok(self.inner.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> MilestoneResult<()> {
        self.inner.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> MilestoneResult<()> {
        self.inner.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_get_missing_key() {
        let store = InMemoryStore::new();
        assert!(store.get("missing").unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_overwrites() {
        let store = InMemoryStore::new();
        store.set("key", "1.0").unwrap();
        store.set("key", "2.0").unwrap();
        assert_eq!(store.get("key").unwrap().as_deref(), Some("2.0"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove() {
        let store = InMemoryStore::new();
        store.set("key", "1.0").unwrap();
        store.remove("key").unwrap();
        assert!(store.get("key").unwrap().is_none());
        // removing again is fine
        store.remove("key").unwrap();
    }

    #[test]
    fn test_concurrent_writers() {
        let store = InMemoryStore::new();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                thread::spawn(move || {
                    store.set(&format!("ns{}", i), &format!("{}.0", i)).unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len(), 8);
        assert_eq!(store.get("ns3").unwrap().as_deref(), Some("3.0"));
    }
}
