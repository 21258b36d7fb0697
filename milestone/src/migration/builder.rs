use super::{MigrationConfig, MigrationListener, MigrationManager, MigrationObserver};
use crate::errors::{MilestoneError, MilestoneResult};
use crate::store::{PreferenceStore, PreferenceStoreProvider};
use crate::version::{FixedVersionProvider, VersionProvider, VersionSource};

/// Builder for a `MigrationManager`.
///
/// The first configuration error is remembered and returned by `build()`, so
/// the chain itself never fails halfway.
///
/// # Examples
///
/// ```rust
/// use milestone::migration::MigrationManager;
/// use milestone::store::InMemoryStore;
///
/// # fn main() -> milestone::errors::MilestoneResult<()> {
/// let manager = MigrationManager::builder()
///     .namespace("app")
///     .current_version("2.3")
///     .store(InMemoryStore::new())
///     .observer(|namespace: &str, version: &str| println!("{namespace} -> {version}"))
///     .build()?;
///
/// assert!(manager.run_migration("2.0", || Ok(()))?);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct MigrationManagerBuilder {
    error: Option<MilestoneError>,
    config: MigrationConfig,
}

impl MigrationManagerBuilder {
    pub fn new() -> Self {
        MigrationManagerBuilder {
            error: None,
            config: MigrationConfig::new(),
        }
    }

    /// Sets the namespace scoping the watermark. Must not be blank.
    pub fn namespace(mut self, namespace: &str) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_namespace(namespace) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Uses `provider` to learn the current application version.
    pub fn version_provider<T: VersionProvider + 'static>(mut self, provider: T) -> Self {
        self.config.set_version_source(VersionSource::new(provider));
        self
    }

    /// Pins the current application version to a fixed value.
    pub fn current_version(mut self, version: &str) -> Self {
        if self.error.is_none() {
            match FixedVersionProvider::new(version) {
                Ok(provider) => self.config.set_version_source(VersionSource::new(provider)),
                Err(e) => self.error = Some(e),
            }
        }
        self
    }

    /// Registers the observer told about every executed migration.
    pub fn observer<T: MigrationObserver + 'static>(mut self, observer: T) -> Self {
        self.config.set_observer(MigrationListener::new(observer));
        self
    }

    pub fn listener(mut self, listener: MigrationListener) -> Self {
        self.config.set_observer(listener);
        self
    }

    /// Persists the watermark in `store`.
    pub fn store<T: PreferenceStoreProvider + 'static>(mut self, store: T) -> Self {
        self.config.set_store(PreferenceStore::new(store));
        self
    }

    /// Persists the watermark in an already shared store handle.
    pub fn preference_store(mut self, store: PreferenceStore) -> Self {
        self.config.set_store(store);
        self
    }

    pub fn build(self) -> MilestoneResult<MigrationManager> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Ok(MigrationManager::from_config(self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_build_with_defaults() {
        let manager = MigrationManagerBuilder::new().build().unwrap();
        assert_eq!(manager.namespace(), "default");
    }

    #[test]
    fn test_blank_namespace_fails_build() {
        let result = MigrationManagerBuilder::new().namespace(" ").build();
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::ValidationError);
    }

    #[test]
    fn test_invalid_fixed_version_fails_build() {
        let result = MigrationManagerBuilder::new().current_version("1.0-rc1").build();
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::InvalidVersionFormat);
    }

    #[test]
    fn test_first_error_wins() {
        let result = MigrationManagerBuilder::new()
            .namespace("")
            .current_version("nope")
            .build();
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::ValidationError);
    }

    #[test]
    fn test_version_provider_closure() {
        let manager = MigrationManagerBuilder::new()
            .version_provider(|| -> MilestoneResult<String> { Ok("7.1".to_string()) })
            .build()
            .unwrap();
        assert_eq!(manager.current_version().unwrap().as_str(), "7.1");
    }

    #[test]
    fn test_shared_preference_store() {
        let store = PreferenceStore::default();
        let first = MigrationManagerBuilder::new()
            .namespace("shared")
            .current_version("1.0")
            .preference_store(store.clone())
            .build()
            .unwrap();
        first.run_migration("1.0", || Ok(())).unwrap();

        let second = MigrationManagerBuilder::new()
            .namespace("shared")
            .current_version("1.0")
            .preference_store(store)
            .build()
            .unwrap();
        assert_eq!(
            second.last_migrated_version().unwrap().map(|v| v.to_string()),
            Some("1.0".to_string())
        );
    }
}
