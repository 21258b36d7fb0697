use crate::config::FjallConfig;
use crate::version::fjall_version;
use crate::wrapper::{decode_value, to_milestone_error};
use crate::FjallStoreBuilder;
use fjall::{Keyspace, PartitionHandle, PersistMode};
use milestone::errors::{ErrorKind, MilestoneError, MilestoneResult};
use milestone::store::PreferenceStoreProvider;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Clone)]
/// Fjall-based preference store.
///
/// A persistent, thread-safe key/value store for watermarks backed by the
/// fjall LSM engine. All namespaces share one partition; keys are the
/// namespace-derived watermark keys.
///
/// Clones share the open keyspace. The keyspace is released when the last
/// clone is dropped, after which the same directory can be opened again.
///
/// # Examples
///
/// ```rust,ignore
/// use milestone::migration::MigrationManager;
/// use milestone_fjall_adapter::FjallPreferenceStore;
///
/// let store = FjallPreferenceStore::with_config()
///     .db_path("/var/lib/my-app/milestone")
///     .build()?;
///
/// let manager = MigrationManager::builder()
///     .namespace("my-app")
///     .store(store)
///     .build()?;
/// ```
pub struct FjallPreferenceStore {
    inner: Arc<FjallStoreInner>,
}

impl FjallPreferenceStore {
    /// Creates a builder for configuring and opening a store.
    #[inline]
    pub fn with_config() -> FjallStoreBuilder {
        FjallStoreBuilder::new()
    }

    /// Opens, or creates, the store described by `config`.
    pub fn open(config: FjallConfig) -> MilestoneResult<FjallPreferenceStore> {
        let inner = FjallStoreInner::open(config)?;
        Ok(FjallPreferenceStore {
            inner: Arc::new(inner),
        })
    }

    pub fn config(&self) -> &FjallConfig {
        &self.inner.config
    }

    /// Syncs the journal to disk and rejects further operations.
    pub fn close(&self) -> MilestoneResult<()> {
        self.inner.close()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Relaxed)
    }

    /// Fjall version this adapter was built against.
    pub fn store_version(&self) -> MilestoneResult<String> {
        fjall_version()
            .map(|v| format!("Fjall/{}", v))
            .map_err(|e| MilestoneError::new(&e, ErrorKind::InternalError))
    }
}

impl PreferenceStoreProvider for FjallPreferenceStore {
    fn get(&self, key: &str) -> MilestoneResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> MilestoneResult<()> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> MilestoneResult<()> {
        self.inner.remove(key)
    }

    fn flush(&self) -> MilestoneResult<()> {
        self.inner.flush()
    }
}

struct FjallStoreInner {
    config: FjallConfig,
    keyspace: Keyspace,
    partition: PartitionHandle,
    closed: AtomicBool,
}

impl FjallStoreInner {
    fn open(config: FjallConfig) -> MilestoneResult<FjallStoreInner> {
        if config.db_path().is_empty() {
            return Err(MilestoneError::new(
                "Fjall store requires a database path",
                ErrorKind::ValidationError,
            ));
        }

        let keyspace = Keyspace::open(config.keyspace_config()).map_err(|err| {
            log::error!("Failed to open or create keyspace at {}: {}", config.db_path(), err);
            to_milestone_error(err)
        })?;

        let partition = keyspace
            .open_partition(config.partition_name(), config.partition_config())
            .map_err(|err| {
                log::error!("Failed to open partition {}: {}", config.partition_name(), err);
                to_milestone_error(err)
            })?;

        log::debug!(
            "Opened fjall preference store at {} (partition {}, fjall {})",
            config.db_path(),
            config.partition_name(),
            fjall_version().unwrap_or_else(|_| "unknown".to_string())
        );

        Ok(FjallStoreInner {
            config,
            keyspace,
            partition,
            closed: AtomicBool::new(false),
        })
    }

    #[inline]
    fn check_opened(&self) -> MilestoneResult<()> {
        if self.closed.load(Ordering::Relaxed) {
            return Err(MilestoneError::new(
                "Fjall preference store is closed",
                ErrorKind::BackendError,
            ));
        }
        Ok(())
    }

    fn get(&self, key: &str) -> MilestoneResult<Option<String>> {
        self.check_opened()?;
        match self.partition.get(key.as_bytes()) {
            Ok(Some(bytes)) => Ok(Some(decode_value(key, &bytes)?)),
            Ok(None) => Ok(None),
            Err(err) => {
                log::error!("Failed to get value from fjall store: {}", err);
                Err(to_milestone_error(err))
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> MilestoneResult<()> {
        self.check_opened()?;
        if let Err(err) = self.partition.insert(key.as_bytes(), value.as_bytes()) {
            log::error!("Failed to put value in fjall store: {}", err);
            return Err(to_milestone_error(err));
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> MilestoneResult<()> {
        self.check_opened()?;
        if let Err(err) = self.partition.remove(key.as_bytes()) {
            log::error!("Failed to remove value from fjall store: {}", err);
            return Err(to_milestone_error(err));
        }
        Ok(())
    }

    fn flush(&self) -> MilestoneResult<()> {
        self.check_opened()?;
        self.persist()
    }

    fn persist(&self) -> MilestoneResult<()> {
        self.keyspace.persist(PersistMode::SyncAll).map_err(|err| {
            log::error!("Failed to persist keyspace: {}", err);
            to_milestone_error(err)
        })
    }

    fn close(&self) -> MilestoneResult<()> {
        if self.closed.swap(true, Ordering::Relaxed) {
            return Ok(());
        }
        self.persist()
    }
}
