//! # Milestone - Version-Gated One-Time Migrations
//!
//! Milestone lets an application declare upgrade actions tied to a version and
//! guarantees each one runs once per installation: the first time the running
//! version reaches the declared version, and never again unless reset.
//!
//! ## Key Features
//!
//! - **Numeric Versions**: `1.9 < 1.10`, `1.4 == 1.4.0`, malformed input rejected
//! - **Persisted Watermark**: one "last migrated version" per namespace
//! - **Pluggable Storage**: in-memory store built in, durable storage through
//!   the `milestone-fjall-adapter` crate
//! - **Pluggable Version Source**: environment, Cargo manifest, fixed value or
//!   any closure
//! - **Observer**: notification after every executed migration
//!
//! ## Quick Start
//!
//! ```rust
//! use milestone::migration::MigrationManager;
//!
//! # fn main() -> milestone::errors::MilestoneResult<()> {
//! let manager = MigrationManager::builder()
//!     .namespace("app")
//!     .current_version("2.0")
//!     .observer(|namespace: &str, version: &str| {
//!         println!("{} migrated to {}", namespace, version);
//!     })
//!     .build()?;
//!
//! manager.run_migration("1.5", || {
//!     // rewrite old settings
//!     Ok(())
//! })?;
//!
//! // runs nothing, 1.5 is already done
//! manager.run_migration("1.5", || Ok(()))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`common`] - Constants, shared-state helpers and namespace locks
//! - [`errors`] - Error types and result definitions
//! - [`migration`] - Migration manager, builder, configuration and observer
//! - [`store`] - Preference store abstraction and in-memory store
//! - [`version`] - Version identifiers, comparison and version providers

use crate::common::LockRegistry;
use std::sync::LazyLock;

pub mod common;
pub mod errors;
pub mod migration;
pub mod store;
pub mod version;

pub(crate) static NAMESPACE_LOCKS: LazyLock<LockRegistry> = LazyLock::new(LockRegistry::new);

#[cfg(test)]
#[ctor::ctor]
fn init() {
    colog::init();
}
