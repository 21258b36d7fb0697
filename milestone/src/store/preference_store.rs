use crate::errors::MilestoneResult;
use std::fmt::{Debug, Formatter};
use std::ops::Deref;
use std::sync::Arc;

/// Contract for the key/value store holding watermarks.
///
/// Values are opaque strings; the manager decides what they mean. Keys are
/// derived from the migration namespace, so one store can serve any number of
/// independent managers.
///
/// # Thread Safety
/// Implementers must be `Send + Sync`. Each call must be atomic on its own;
/// the manager serializes read-then-write sequences per namespace itself.
pub trait PreferenceStoreProvider: Send + Sync {
    /// Returns the value stored under `key`, or `None` if nothing is stored.
    fn get(&self, key: &str) -> MilestoneResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> MilestoneResult<()>;

    /// Deletes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> MilestoneResult<()>;

    /// Makes previous writes durable. A no-op for volatile stores.
    fn flush(&self) -> MilestoneResult<()> {
        Ok(())
    }
}

/// Shared handle to a `PreferenceStoreProvider`.
///
/// Cloning only increments a reference count, so the same store can back
/// several managers.
#[derive(Clone)]
pub struct PreferenceStore {
    inner: Arc<dyn PreferenceStoreProvider>,
}

impl PreferenceStore {
    pub fn new<T: PreferenceStoreProvider + 'static>(inner: T) -> Self {
        PreferenceStore {
            inner: Arc::new(inner),
        }
    }
}

impl Default for PreferenceStore {
    fn default() -> Self {
        PreferenceStore::new(crate::store::InMemoryStore::new())
    }
}

impl Deref for PreferenceStore {
    type Target = Arc<dyn PreferenceStoreProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Debug for PreferenceStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ErrorKind, MilestoneError};

    struct ReadOnlyStore;

    impl PreferenceStoreProvider for ReadOnlyStore {
        fn get(&self, key: &str) -> MilestoneResult<Option<String>> {
            Ok(Some(format!("value-of-{}", key)))
        }

        fn set(&self, _key: &str, _value: &str) -> MilestoneResult<()> {
            Err(MilestoneError::new("read only", ErrorKind::BackendError))
        }

        fn remove(&self, _key: &str) -> MilestoneResult<()> {
            Err(MilestoneError::new("read only", ErrorKind::BackendError))
        }
    }

    #[test]
    fn test_wrapper_delegates() {
        let store = PreferenceStore::new(ReadOnlyStore);
        assert_eq!(store.get("a").unwrap().as_deref(), Some("value-of-a"));
        assert!(store.set("a", "1").is_err());
        assert!(store.remove("a").is_err());
    }

    #[test]
    fn test_default_flush_is_noop() {
        let store = PreferenceStore::new(ReadOnlyStore);
        assert!(store.flush().is_ok());
    }

    #[test]
    fn test_clones_share_provider() {
        let store = PreferenceStore::default();
        let clone = store.clone();
        store.set("k", "v").unwrap();
        assert_eq!(clone.get("k").unwrap().as_deref(), Some("v"));
    }
}
