use std::fmt::Debug;
use std::sync::Arc;

/// Receives a notification for every migration that actually ran.
///
/// `on_migrated` is called once per executed migration, after the watermark
/// has been written, with the namespace and the target version exactly as the
/// host passed it to `run_migration`. Skipped migrations and resets are never
/// reported.
///
/// Any closure `Fn(&str, &str)` that is `Send + Sync` is an observer.
pub trait MigrationObserver: Send + Sync {
    fn on_migrated(&self, namespace: &str, version: &str);
}

impl<F> MigrationObserver for F
where
    F: Send + Sync + Fn(&str, &str),
{
    fn on_migrated(&self, namespace: &str, version: &str) {
        self(namespace, version)
    }
}

/// Cloneable handle to an observer registered with a manager.
///
/// # Usage
/// ```rust
/// use milestone::migration::MigrationListener;
///
/// let listener = MigrationListener::new(|namespace: &str, version: &str| {
///     println!("{} migrated to {}", namespace, version);
/// });
/// listener.notify("app", "1.2");
/// ```
#[derive(Clone)]
pub struct MigrationListener {
    on_migrated: Arc<dyn MigrationObserver>,
}

impl MigrationListener {
    pub fn new(on_migrated: impl MigrationObserver + 'static) -> Self {
        MigrationListener {
            on_migrated: Arc::new(on_migrated),
        }
    }

    pub fn notify(&self, namespace: &str, version: &str) {
        self.on_migrated.on_migrated(namespace, version)
    }
}

impl Debug for MigrationListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationListener").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct Recorder {
        seen: Mutex<Vec<(String, String)>>,
    }

    impl MigrationObserver for Recorder {
        fn on_migrated(&self, namespace: &str, version: &str) {
            self.seen.lock().push((namespace.to_string(), version.to_string()));
        }
    }

    #[test]
    fn test_struct_observer() {
        let recorder = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
        });
        let shared = recorder.clone();
        let listener = MigrationListener::new(move |ns: &str, v: &str| shared.on_migrated(ns, v));

        listener.notify("app", "1.0");
        listener.notify("app", "1.1");

        let seen = recorder.seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], ("app".to_string(), "1.1".to_string()));
    }

    #[test]
    fn test_closure_observer_clone_shares_callback() {
        let count = Arc::new(Mutex::new(0));
        let counter = count.clone();
        let listener = MigrationListener::new(move |_: &str, _: &str| *counter.lock() += 1);
        let clone = listener.clone();

        listener.notify("app", "1.0");
        clone.notify("app", "2.0");
        assert_eq!(*count.lock(), 2);
    }
}
