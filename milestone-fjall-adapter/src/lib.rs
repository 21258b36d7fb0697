//! Durable watermark storage for `milestone` on top of the fjall LSM engine.
//!
//! ```rust,ignore
//! use milestone::migration::MigrationManager;
//! use milestone_fjall_adapter::FjallPreferenceStore;
//!
//! let manager = MigrationManager::builder()
//!     .namespace("my-app")
//!     .store(FjallPreferenceStore::with_config().db_path("/var/lib/my-app").build()?)
//!     .build()?;
//! ```

mod builder;
mod config;
mod store;
mod version;
mod wrapper;

pub use builder::*;
pub use config::*;
pub use store::*;
pub use wrapper::FjallValueError;

#[cfg(test)]
#[ctor::ctor]
fn init() {
    colog::init();
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use uuid::Uuid;

    pub fn random_path() -> String {
        let mut path = std::env::temp_dir();
        path.push(format!("milestone-fjall-{}", Uuid::new_v4()));
        path.to_string_lossy().into_owned()
    }
}
