//! Record index storage trait.

use crate::StoreError;
use overlay_types::{IndexedRecord, Outpoint, UtxoReference};

/// Storage for the lookup service's `(txid, output_index) -> record` index.
///
/// Single-record operations are atomic. Nothing spans more than one record,
/// so no transaction handle is exposed.
pub trait RecordStore: Send + Sync {
    /// Store a newly admitted output. Storing a key that is already present
    /// leaves exactly one record for it.
    fn insert_record(&self, record: &IndexedRecord) -> Result<(), StoreError>;

    /// Remove the record for `outpoint`. Returns whether one was present;
    /// removing an absent key is not an error.
    fn delete_record(&self, outpoint: &Outpoint) -> Result<bool, StoreError>;

    /// Every record, projected for lookup answers, in the backend's own order.
    fn find_all(&self) -> Result<Vec<UtxoReference>, StoreError>;

    /// Number of records currently indexed.
    fn record_count(&self) -> Result<u64, StoreError>;

    fn contains(&self, outpoint: &Outpoint) -> Result<bool, StoreError> {
        Ok(self
            .find_all()?
            .iter()
            .any(|reference| reference.outpoint() == *outpoint))
    }
}
