//! Version-gated, run-once migration actions.
//!
//! A host declares migrations as (target version, action) pairs at startup:
//!
//! ```rust
//! use milestone::migration::MigrationManager;
//!
//! # fn main() -> milestone::errors::MilestoneResult<()> {
//! let manager = MigrationManager::builder()
//!     .namespace("app")
//!     .current_version("1.4.2")
//!     .build()?;
//!
//! manager.run_migration("1.2", || {
//!     // convert the settings file
//!     Ok(())
//! })?;
//! manager.run_migration("1.4", || {
//!     // show the "what's new" dialog once
//!     Ok(())
//! })?;
//! # Ok(())
//! # }
//! ```
//!
//! Each namespace keeps one watermark, the highest version migrated so far.
//! A migration runs when its target is above the watermark and not above the
//! current application version, after which the watermark moves up to it.
//! Declaration order is execution order; nothing is sorted or planned.

mod builder;
mod config;
mod manager;
mod observer;
mod watermark;

pub use builder::MigrationManagerBuilder;
pub use config::MigrationConfig;
pub use manager::MigrationManager;
pub use observer::{MigrationListener, MigrationObserver};
pub use watermark::watermark_key;
