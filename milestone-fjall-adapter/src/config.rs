use fjall::{Config, PartitionCreateOptions};
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

/// Default partition holding the watermarks of every namespace.
pub const DEFAULT_PARTITION_NAME: &str = "milestone_watermarks";

#[derive(Clone)]
/// Fjall store configuration.
///
/// A cloneable, thread-safe settings holder shared between the builder and the
/// opened store. Watermark traffic is a handful of tiny writes per launch, so
/// the defaults favor a small footprint over throughput:
/// - Cache: 16 MB
/// - Write buffer: 32 MB
/// - Max journaling size: 64 MB
/// - One flush worker and one compaction worker
/// - Journal persisted by fjall automatically; `flush` forces a sync
pub struct FjallConfig {
    inner: Arc<FjallConfigInner>,
}

impl FjallConfig {
    #[inline]
    pub fn new() -> FjallConfig {
        FjallConfig {
            inner: Arc::new(FjallConfigInner::new()),
        }
    }

    /// Builds the fjall keyspace configuration from this config.
    #[inline]
    pub(crate) fn keyspace_config(&self) -> Config {
        let mut config = Config::new(self.db_path());
        config = config
            .manual_journal_persist(self.manual_journal_persist())
            .flush_workers(self.flush_workers())
            .compaction_workers(self.compaction_workers())
            .cache_size(self.cache_size())
            .max_journaling_size(self.max_journaling_size())
            .max_write_buffer_size(self.max_write_buffer_size());

        if self.fsync_frequency() > 0 {
            config = config.fsync_ms(Some(self.fsync_frequency()));
        }
        config
    }

    #[inline]
    pub(crate) fn partition_config(&self) -> PartitionCreateOptions {
        PartitionCreateOptions::default()
    }

    #[inline]
    pub fn db_path(&self) -> &str {
        self.inner.db_path.get().map_or("", |p| p.as_str())
    }

    /// Sets the database directory. Only the first call takes effect.
    #[inline]
    pub(crate) fn set_db_path(&self, db_path: &str) {
        let _ = self.inner.db_path.set(db_path.to_string());
    }

    #[inline]
    pub fn partition_name(&self) -> &str {
        self.inner
            .partition_name
            .get()
            .map_or(DEFAULT_PARTITION_NAME, |p| p.as_str())
    }

    #[inline]
    pub(crate) fn set_partition_name(&self, name: &str) {
        let _ = self.inner.partition_name.set(name.to_string());
    }

    #[inline]
    pub fn manual_journal_persist(&self) -> bool {
        self.inner.manual_journal_persist.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_manual_journal_persist(&self, v: bool) {
        self.inner.manual_journal_persist.store(v, Ordering::Relaxed)
    }

    #[inline]
    pub fn flush_workers(&self) -> usize {
        self.inner.flush_workers_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_flush_workers(&self, c: usize) {
        self.inner.flush_workers_count.store(c, Ordering::Relaxed)
    }

    #[inline]
    pub fn compaction_workers(&self) -> usize {
        self.inner.compaction_workers_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_compaction_workers(&self, c: usize) {
        self.inner.compaction_workers_count.store(c, Ordering::Relaxed)
    }

    #[inline]
    pub fn cache_size(&self) -> u64 {
        self.inner.cache_size.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_cache_size(&self, s: u64) {
        self.inner.cache_size.store(s, Ordering::Relaxed)
    }

    #[inline]
    pub fn max_journaling_size(&self) -> u64 {
        self.inner.max_journaling_size.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_max_journaling_size(&self, s: u64) {
        self.inner.max_journaling_size.store(s, Ordering::Relaxed)
    }

    #[inline]
    pub fn max_write_buffer_size(&self) -> u64 {
        self.inner.max_write_buffer_size.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_max_write_buffer_size(&self, s: u64) {
        self.inner.max_write_buffer_size.store(s, Ordering::Relaxed)
    }

    /// Background fsync interval in milliseconds, 0 when disabled.
    #[inline]
    pub fn fsync_frequency(&self) -> u16 {
        self.inner.fsync_frequency.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_fsync_frequency(&self, f: u16) {
        self.inner.fsync_frequency.store(f, Ordering::Relaxed)
    }
}

impl Default for FjallConfig {
    fn default() -> Self {
        Self::new()
    }
}

struct FjallConfigInner {
    db_path: OnceLock<String>,
    partition_name: OnceLock<String>,
    manual_journal_persist: AtomicBool,
    flush_workers_count: AtomicUsize,
    compaction_workers_count: AtomicUsize,
    cache_size: AtomicU64,
    max_journaling_size: AtomicU64,
    max_write_buffer_size: AtomicU64,
    fsync_frequency: AtomicU16,
}

impl FjallConfigInner {
    const DEFAULT_CACHE_MB: u64 = 16;
    const DEFAULT_WRITE_BUFFER_MB: u64 = 32;
    const DEFAULT_MAX_JOURNALING_MB: u64 = 64;

    fn new() -> FjallConfigInner {
        FjallConfigInner {
            db_path: OnceLock::new(),
            partition_name: OnceLock::new(),
            manual_journal_persist: AtomicBool::new(false),
            flush_workers_count: AtomicUsize::new(1),
            compaction_workers_count: AtomicUsize::new(1),
            cache_size: AtomicU64::new(Self::DEFAULT_CACHE_MB * 1_024 * 1_024),
            max_journaling_size: AtomicU64::new(Self::DEFAULT_MAX_JOURNALING_MB * 1_024 * 1_024),
            max_write_buffer_size: AtomicU64::new(Self::DEFAULT_WRITE_BUFFER_MB * 1_024 * 1_024),
            fsync_frequency: AtomicU16::new(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FjallConfig::new();
        assert_eq!(config.db_path(), "");
        assert_eq!(config.partition_name(), DEFAULT_PARTITION_NAME);
        assert!(!config.manual_journal_persist());
        assert_eq!(config.flush_workers(), 1);
        assert_eq!(config.cache_size(), 16 * 1_024 * 1_024);
        assert_eq!(config.fsync_frequency(), 0);
    }

    #[test]
    fn test_db_path_set_once() {
        let config = FjallConfig::new();
        config.set_db_path("/tmp/first");
        config.set_db_path("/tmp/second");
        assert_eq!(config.db_path(), "/tmp/first");
    }

    #[test]
    fn test_clones_share_settings() {
        let config = FjallConfig::new();
        let clone = config.clone();
        config.set_fsync_frequency(100);
        config.set_partition_name("custom");
        assert_eq!(clone.fsync_frequency(), 100);
        assert_eq!(clone.partition_name(), "custom");
    }
}
