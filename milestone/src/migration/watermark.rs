use crate::common::{KEY_SEPARATOR, WATERMARK_KEY_SUFFIX};
use crate::errors::{ErrorKind, MilestoneError, MilestoneResult};
use crate::store::PreferenceStore;
use crate::version::{compare_watermark, Version};
use std::cmp::Ordering;

/// Derives the store key holding the watermark of `namespace`.
///
/// ```rust
/// use milestone::migration::watermark_key;
/// assert_eq!(watermark_key("app"), "app.lastMigratedVersion");
/// ```
pub fn watermark_key(namespace: &str) -> String {
    format!("{}{}{}", namespace, KEY_SEPARATOR, WATERMARK_KEY_SUFFIX)
}

/// The persisted "last migrated version" of one namespace.
///
/// Only moves forward through `advance`, or back to absent through `clear`.
#[derive(Debug)]
pub(crate) struct Watermark {
    key: String,
    store: PreferenceStore,
}

impl Watermark {
    pub(crate) fn new(namespace: &str, store: PreferenceStore) -> Self {
        Watermark {
            key: watermark_key(namespace),
            store,
        }
    }

    #[cfg(test)]
    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    /// Reads and parses the stored watermark.
    ///
    /// A stored value the comparator cannot parse is reported as
    /// `InvalidVersionFormat`, never silently treated as absent.
    pub(crate) fn read(&self) -> MilestoneResult<Option<Version>> {
        let stored = self.store.get(&self.key).map_err(|e| {
            log::error!("Failed to read watermark {}: {}", self.key, e);
            MilestoneError::new_with_cause(
                &format!("Failed to read watermark {}", self.key),
                ErrorKind::PersistenceFailure,
                e,
            )
        })?;

        match stored {
            None => Ok(None),
            Some(text) => Version::parse(&text).map(Some).map_err(|e| {
                MilestoneError::new_with_cause(
                    &format!("Stored watermark {} holds an invalid version '{}'", self.key, text),
                    ErrorKind::InvalidVersionFormat,
                    e,
                )
            }),
        }
    }

    /// Writes `target` if it is above the currently stored watermark.
    ///
    /// Returns whether the stored value changed. If the write is accepted but
    /// the flush fails, the previous value is put back so the store never
    /// holds a watermark the caller was told was not persisted.
    pub(crate) fn advance(&self, target: &Version) -> MilestoneResult<bool> {
        let current = self.read()?;
        if compare_watermark(current.as_ref(), target) != Ordering::Less {
            return Ok(false);
        }

        self.store
            .set(&self.key, target.as_str())
            .map_err(|e| self.write_error(e))?;
        if let Err(e) = self.store.flush() {
            self.restore(current.as_ref());
            return Err(self.write_error(e));
        }

        log::info!(
            "Watermark {} advanced from {} to {}",
            self.key,
            current.as_ref().map_or("<none>", |v| v.as_str()),
            target
        );
        Ok(true)
    }

    /// Removes the stored watermark.
    pub(crate) fn clear(&self) -> MilestoneResult<()> {
        self.store
            .remove(&self.key)
            .and_then(|_| self.store.flush())
            .map_err(|e| self.write_error(e))?;
        log::info!("Watermark {} cleared", self.key);
        Ok(())
    }

    fn restore(&self, previous: Option<&Version>) {
        let restored = match previous {
            Some(version) => self.store.set(&self.key, version.as_str()),
            None => self.store.remove(&self.key),
        };
        if let Err(e) = restored {
            log::error!("Failed to restore watermark {}: {}", self.key, e);
        }
    }

    fn write_error(&self, cause: MilestoneError) -> MilestoneError {
        log::error!("Failed to write watermark {}: {}", self.key, cause);
        MilestoneError::new_with_cause(
            &format!("Failed to write watermark {}", self.key),
            ErrorKind::PersistenceFailure,
            cause,
        )
    }
}
