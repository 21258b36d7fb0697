use crate::config::FjallConfig;
use crate::store::FjallPreferenceStore;
use milestone::errors::{ErrorKind, MilestoneError, MilestoneResult};

/// Builder for a `FjallPreferenceStore`.
///
/// Settings are collected into a `FjallConfig`; the keyspace is only touched
/// by `build()`, which also validates the path and the partition name.
pub struct FjallStoreBuilder {
    store_config: FjallConfig,
}

impl FjallStoreBuilder {
    #[inline]
    pub fn new() -> FjallStoreBuilder {
        FjallStoreBuilder {
            store_config: FjallConfig::new(),
        }
    }

    /// Smallest footprint fjall accepts: one worker each and minimal buffers.
    #[inline]
    pub fn low_memory_preset(self) -> Self {
        self.cache_size(16 * 1024 * 1024)
            .max_write_buffer_size(32 * 1024 * 1024)
            .max_journaling_size(64 * 1024 * 1024)
            .flush_workers(1)
            .compaction_workers(1)
    }

    /// Syncs the journal every 100ms in the background.
    #[inline]
    pub fn durable_preset(self) -> Self {
        self.fsync_frequency(100)
    }

    #[inline]
    pub fn db_path(self, db_path: &str) -> Self {
        self.store_config.set_db_path(db_path);
        self
    }

    /// Partition holding the watermarks. Allowed characters are
    /// `a-z A-Z 0-9 _ - . # $`.
    #[inline]
    pub fn partition_name(self, partition_name: &str) -> Self {
        self.store_config.set_partition_name(partition_name);
        self
    }

    #[inline]
    pub fn manual_journal_persist(self, manual_journal_persist: bool) -> Self {
        self.store_config
            .set_manual_journal_persist(manual_journal_persist);
        self
    }

    #[inline]
    pub fn flush_workers(self, flush_workers_count: usize) -> Self {
        self.store_config.set_flush_workers(flush_workers_count);
        self
    }

    #[inline]
    pub fn compaction_workers(self, compaction_workers_count: usize) -> Self {
        self.store_config.set_compaction_workers(compaction_workers_count);
        self
    }

    #[inline]
    pub fn cache_size(self, cache_size: u64) -> Self {
        self.store_config.set_cache_size(cache_size);
        self
    }

    #[inline]
    pub fn max_journaling_size(self, max_journaling_size: u64) -> Self {
        self.store_config.set_max_journaling_size(max_journaling_size);
        self
    }

    #[inline]
    pub fn max_write_buffer_size(self, max_write_buffer_size: u64) -> Self {
        self.store_config
            .set_max_write_buffer_size(max_write_buffer_size);
        self
    }

    #[inline]
    pub fn fsync_frequency(self, fsync_frequency: u16) -> Self {
        self.store_config.set_fsync_frequency(fsync_frequency);
        self
    }

    /// Validates the settings and opens the store.
    pub fn build(self) -> MilestoneResult<FjallPreferenceStore> {
        validate_partition_name(self.store_config.partition_name())?;
        FjallPreferenceStore::open(self.store_config)
    }
}

impl Default for FjallStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_partition_name(name: &str) -> MilestoneResult<()> {
    if name.is_empty() {
        return Err(MilestoneError::new(
            "Partition name must not be empty",
            ErrorKind::ValidationError,
        ));
    }

    let valid = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '#' | '$'));
    if !valid {
        return Err(MilestoneError::new(
            &format!("Invalid partition name '{}'", name),
            ErrorKind::ValidationError,
        ));
    }
    Ok(())
}
