use parking_lot::{ReentrantMutex, ReentrantMutexGuard, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// A handle to a namespace lock that can be stored and reused
#[derive(Clone)]
pub struct LockHandle {
    lock: Arc<ReentrantMutex<()>>,
}

impl LockHandle {
    /// Acquires the lock, blocking other threads until the guard is dropped.
    ///
    /// The owning thread may acquire it again, so an action that declares
    /// further migrations on its own namespace does not deadlock.
    pub fn lock(&self) -> ReentrantMutexGuard<'_, ()> {
        self.lock.lock()
    }

    /// Attempts to acquire the lock without blocking.
    pub fn try_lock(&self) -> Option<ReentrantMutexGuard<'_, ()>> {
        self.lock.try_lock()
    }
}

/// Registry of named locks, one per migration namespace.
///
/// Managers sharing a namespace in the same process obtain the same lock, which
/// turns the read-decide-execute-write sequence into one critical section.
/// Nothing here coordinates separate processes.
///
/// # Examples
///
/// ```
/// use milestone::common::LockRegistry;
/// let registry = LockRegistry::new();
/// let handle = registry.get_lock("app");
/// {
///     let _guard = handle.lock();
/// } // released here
/// assert_eq!(registry.lock_count(), 1);
/// ```
#[derive(Clone)]
pub struct LockRegistry {
    locks: Arc<RwLock<HashMap<String, Arc<ReentrantMutex<()>>>>>,
}

impl LockRegistry {
    /// Creates a new empty lock registry.
    pub fn new() -> Self {
        LockRegistry {
            locks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Gets the lock for the given name, creating it on first use.
    pub fn get_lock(&self, name: &str) -> LockHandle {
        if let Some(lock) = self.locks.read().get(name) {
            return LockHandle { lock: lock.clone() };
        }

        let lock = {
            let mut locks = self.locks.write();
            locks
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(ReentrantMutex::new(())))
                .clone()
        };
        LockHandle { lock }
    }

    /// Returns the number of locks currently registered.
    pub fn lock_count(&self) -> usize {
        self.locks.read().len()
    }
}

impl Default for LockRegistry {
    fn default() -> Self {
        Self::new()
    }
}
