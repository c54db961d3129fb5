// src/storage/mod.rs — Key/value persistence for the journal and the plan cache
//
// The optimizer only ever needs two opaque blobs (the usage journal and the
// cached plan), so the backend contract is a string key/value store.

pub mod memory;
pub mod schema;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::infra::errors::WayrankError;

/// Key holding the pruned usage journal.
pub const USAGE_LOGS_KEY: &str = "usage_logs";
/// Key holding the cached optimization plan.
pub const OPTIMIZATION_CACHE_KEY: &str = "optimization_cache";

/// Minimal key/value contract. Implementations guard their own state so the
/// store can be shared behind an `Arc`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, WayrankError>;
    fn set(&self, key: &str, value: &str) -> Result<(), WayrankError>;
    fn remove(&self, key: &str) -> Result<(), WayrankError>;
}
