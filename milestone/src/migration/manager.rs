use super::watermark::Watermark;
use super::{MigrationConfig, MigrationManagerBuilder};
use crate::errors::{ErrorKind, MilestoneError, MilestoneResult};
use crate::version::{compare_watermark, Version};
use crate::NAMESPACE_LOCKS;
use std::cmp::Ordering;
use std::sync::Arc;

/// Runs version-gated, one-time migration actions for a namespace.
///
/// A migration declared for version `V` runs the first time the application is
/// at `V` or later and the namespace's watermark is still below `V`. After it
/// succeeds the watermark moves up to `V`, so later launches skip it.
///
/// Managers sharing a namespace within one process are serialized through a
/// process-wide lock held for the whole read-decide-execute-write-notify
/// sequence. Nothing coordinates separate processes writing the same store;
/// run migrations once at startup, before concurrent work begins.
///
/// # Examples
///
/// ```rust
/// use milestone::migration::MigrationManager;
///
/// # fn main() -> milestone::errors::MilestoneResult<()> {
/// let manager = MigrationManager::builder()
///     .namespace("app")
///     .current_version("3.0")
///     .build()?;
///
/// assert!(manager.run_migration("1.0", || Ok(()))?);
/// assert!(manager.run_migration("3.0", || Ok(()))?);
/// // below the watermark now
/// assert!(!manager.run_migration("2.0", || Ok(()))?);
/// // not reached yet
/// assert!(!manager.run_migration("4.0", || Ok(()))?);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct MigrationManager {
    inner: Arc<MigrationManagerInner>,
}

impl MigrationManager {
    pub fn builder() -> MigrationManagerBuilder {
        MigrationManagerBuilder::new()
    }

    pub(crate) fn from_config(config: MigrationConfig) -> Self {
        MigrationManager {
            inner: Arc::new(MigrationManagerInner::new(config)),
        }
    }

    pub fn namespace(&self) -> &str {
        self.inner.config.namespace()
    }

    pub fn config(&self) -> &MigrationConfig {
        &self.inner.config
    }

    /// Runs `action` if this is the first time the application reached
    /// `target_version`.
    ///
    /// The action runs iff the stored watermark is below `target_version` and
    /// `target_version` is at most the current application version. On success
    /// the watermark advances to `target_version` and the observer is notified.
    ///
    /// Returns `Ok(true)` if the action ran, `Ok(false)` if it was skipped.
    ///
    /// # Errors
    /// - `InvalidVersionFormat` if the target, the current version or the
    ///   stored watermark cannot be parsed. Nothing runs.
    /// - `ActionFailure` if the action fails. The watermark is untouched, so
    ///   the migration is retried on the next qualifying call.
    /// - `PersistenceFailure` if the store cannot be read or written. When the
    ///   write fails after the action succeeded, the action is not undone and
    ///   the watermark keeps its previous value, so the next qualifying call
    ///   runs the action again and notifies the observer then.
    pub fn run_migration<F>(&self, target_version: &str, action: F) -> MilestoneResult<bool>
    where
        F: FnOnce() -> MilestoneResult<()>,
    {
        self.inner.run_migration(target_version, action)
    }

    /// Forgets every executed migration of this namespace.
    ///
    /// The next qualifying `run_migration` calls execute again. No observer
    /// notification is sent.
    pub fn reset(&self) -> MilestoneResult<()> {
        self.inner.reset()
    }

    /// The highest version migrated so far, or `None` if nothing ran yet.
    pub fn last_migrated_version(&self) -> MilestoneResult<Option<Version>> {
        self.inner.last_migrated_version()
    }

    /// Asks the configured provider for the current application version.
    pub fn current_version(&self) -> MilestoneResult<Version> {
        self.inner.current_version()
    }
}

/// Creates a `MigrationManager` whose current version is the calling crate's
/// version.
///
/// The version is read from `MILESTONE_APP_VERSION` or `CARGO_PKG_VERSION` at
/// runtime when set, otherwise it is the `CARGO_PKG_VERSION` the host crate was
/// compiled with, so a deployed binary always knows its version. Storage is
/// in-memory. Expands to a `MilestoneResult<MigrationManager>`.
///
/// ```rust
/// # fn main() -> milestone::errors::MilestoneResult<()> {
/// let manager = milestone::migration_manager!("plugins")?;
/// assert_eq!(manager.namespace(), "plugins");
///
/// let manager = milestone::migration_manager!()?;
/// assert_eq!(manager.namespace(), "default");
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! migration_manager {
    () => {
        $crate::migration_manager!($crate::common::DEFAULT_NAMESPACE)
    };
    ($namespace:expr) => {
        $crate::migration::MigrationManager::builder()
            .namespace($namespace)
            .version_provider(
                $crate::version::EnvVersionProvider::default()
                    .with_fallback(env!("CARGO_PKG_VERSION")),
            )
            .build()
    };
}

#[derive(Debug)]
struct MigrationManagerInner {
    config: MigrationConfig,
    watermark: Watermark,
}

impl MigrationManagerInner {
    fn new(config: MigrationConfig) -> Self {
        let watermark = Watermark::new(config.namespace(), config.store().clone());
        MigrationManagerInner { config, watermark }
    }

    fn run_migration<F>(&self, target_version: &str, action: F) -> MilestoneResult<bool>
    where
        F: FnOnce() -> MilestoneResult<()>,
    {
        let namespace = self.config.namespace();
        let target = Version::parse(target_version)?;

        let lock = NAMESPACE_LOCKS.get_lock(namespace);
        let _guard = lock.lock();

        let watermark = self.watermark.read()?;
        let current = self.current_version()?;

        if !Self::should_run(watermark.as_ref(), &target, &current) {
            log::debug!(
                "Skipping migration {}:{} (watermark {}, current {})",
                namespace,
                target,
                watermark.as_ref().map_or("<none>", |v| v.as_str()),
                current
            );
            return Ok(false);
        }

        log::debug!("Running migration {}:{}", namespace, target);
        action().map_err(|e| {
            MilestoneError::new_with_cause(
                &format!("Migration {}:{} failed", namespace, target),
                ErrorKind::ActionFailure,
                e,
            )
        })?;

        // the action may itself have advanced this namespace further
        self.watermark.advance(&target)?;

        if let Some(observer) = self.config.observer() {
            observer.notify(namespace, target.as_str());
        }
        Ok(true)
    }

    fn should_run(watermark: Option<&Version>, target: &Version, current: &Version) -> bool {
        compare_watermark(watermark, target) == Ordering::Less && target <= current
    }

    fn reset(&self) -> MilestoneResult<()> {
        let lock = NAMESPACE_LOCKS.get_lock(self.config.namespace());
        let _guard = lock.lock();
        self.watermark.clear()
    }

    fn last_migrated_version(&self) -> MilestoneResult<Option<Version>> {
        let lock = NAMESPACE_LOCKS.get_lock(self.config.namespace());
        let _guard = lock.lock();
        self.watermark.read()
    }

    fn current_version(&self) -> MilestoneResult<Version> {
        let text = self.config.version_source().current_version()?;
        Version::parse(&text).map_err(|e| {
            MilestoneError::new_with_cause(
                &format!("Current application version '{}' is invalid", text),
                ErrorKind::InvalidVersionFormat,
                e,
            )
        })
    }
}
