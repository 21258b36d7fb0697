use super::MigrationListener;
use crate::common::DEFAULT_NAMESPACE;
use crate::errors::{ErrorKind, MilestoneError, MilestoneResult};
use crate::store::PreferenceStore;
use crate::version::VersionSource;

/// Settings a `MigrationManager` is created from.
///
/// Defaults: namespace `"default"`, versions read by `EnvVersionProvider`, no
/// observer, and a fresh `InMemoryStore`. The default provider has no
/// fallback, so binaries started outside cargo should set a provider, for
/// instance `host_version!()`, or use `migration_manager!`.
#[derive(Clone, Debug)]
pub struct MigrationConfig {
    namespace: String,
    version_source: VersionSource,
    observer: Option<MigrationListener>,
    store: PreferenceStore,
}

impl MigrationConfig {
    pub fn new() -> Self {
        MigrationConfig {
            namespace: DEFAULT_NAMESPACE.to_string(),
            version_source: VersionSource::default(),
            observer: None,
            store: PreferenceStore::default(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn version_source(&self) -> &VersionSource {
        &self.version_source
    }

    pub fn observer(&self) -> Option<&MigrationListener> {
        self.observer.as_ref()
    }

    pub fn store(&self) -> &PreferenceStore {
        &self.store
    }

    /// Sets the namespace; it must not be empty or blank.
    pub fn set_namespace(&mut self, namespace: &str) -> MilestoneResult<()> {
        if namespace.trim().is_empty() {
            return Err(MilestoneError::new(
                "Migration namespace must not be empty",
                ErrorKind::ValidationError,
            ));
        }
        self.namespace = namespace.to_string();
        Ok(())
    }

    pub fn set_version_source(&mut self, version_source: VersionSource) {
        self.version_source = version_source;
    }

    pub fn set_observer(&mut self, observer: MigrationListener) {
        self.observer = Some(observer);
    }

    pub fn set_store(&mut self, store: PreferenceStore) {
        self.store = store;
    }
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MigrationConfig::new();
        assert_eq!(config.namespace(), "default");
        assert!(config.observer().is_none());
    }

    #[test]
    fn test_set_namespace_rejects_blank() {
        let mut config = MigrationConfig::new();
        assert_eq!(
            config.set_namespace("").unwrap_err().kind(),
            &ErrorKind::ValidationError
        );
        assert!(config.set_namespace("   ").is_err());
        assert_eq!(config.namespace(), "default");

        config.set_namespace("plugins").unwrap();
        assert_eq!(config.namespace(), "plugins");
    }

    #[test]
    fn test_set_observer() {
        let mut config = MigrationConfig::new();
        config.set_observer(MigrationListener::new(|_: &str, _: &str| {}));
        assert!(config.observer().is_some());
    }
}
