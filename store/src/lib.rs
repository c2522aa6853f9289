//! Abstract storage traits for the overlay lookup service.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The lookup service depends only on the traits.

pub mod error;
pub mod meta;
pub mod record;

pub use error::StoreError;
pub use meta::MetaStore;
pub use record::RecordStore;
