//! Storage abstraction for persisted watermarks.
//!
//! The engine only needs a string key/value store. Implementations plug in
//! through `PreferenceStoreProvider`:
//! - **In-Memory Store**: `InMemoryStore`, the default, for tests and
//!   short-lived processes
//! - **Fjall Store**: `milestone-fjall-adapter` for durable, on-disk storage

pub mod memory;
mod preference_store;

pub use memory::InMemoryStore;
pub use preference_store::*;
