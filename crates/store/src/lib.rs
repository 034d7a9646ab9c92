//! JSON snapshot storage for Bursar.
//!
//! Loads schedules and budget plans from a single JSON file and serves them
//! through the repository traits of `bursar-core`.

pub mod error;
pub mod memory;
pub mod snapshot;

pub use error::StoreError;
pub use memory::InMemoryStore;
pub use snapshot::Snapshot;
