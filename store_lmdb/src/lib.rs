//! LMDB storage backend for the overlay lookup service.
//!
//! Implements the traits from `overlay-store` using the `heed` LMDB bindings.
//! One environment holds two databases: `records` (the outpoint index) and
//! `meta` (schema version).

pub mod environment;
pub mod error;
pub mod meta;
pub mod migration;
pub mod record;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use meta::LmdbMetaStore;
pub use migration::{Migrator, CURRENT_SCHEMA_VERSION};
pub use record::LmdbRecordStore;
