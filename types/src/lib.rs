//! Shared types for the overlay topic manager and lookup service templates.
//!
//! Everything that crosses a crate boundary lives here: transaction ids,
//! outpoints, indexed records, timestamps, and the admission/lookup
//! contract types exchanged with the overlay host.

pub mod admission;
pub mod error;
pub mod metadata;
pub mod outpoint;
pub mod record;
pub mod time;
pub mod txid;

pub use admission::{AdmissionMode, AdmittanceInstructions, SpendNotificationMode};
pub use error::TypesError;
pub use metadata::ServiceMetadata;
pub use outpoint::Outpoint;
pub use record::{IndexedRecord, UtxoReference};
pub use time::{Clock, SystemClock, Timestamp};
pub use txid::TxId;
