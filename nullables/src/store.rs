//! Nullable record stores: in-memory and always-failing.

use overlay_store::{RecordStore, StoreError};
use overlay_types::{IndexedRecord, Outpoint, UtxoReference};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// An in-memory record store for testing.
///
/// Records are kept in insertion order, like a document collection without
/// an index. Thread-safe so it can be shared the way a real backend is.
pub struct NullRecordStore {
    records: Mutex<Vec<IndexedRecord>>,
}

impl NullRecordStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of every stored record, including creation times.
    pub fn records(&self) -> Vec<IndexedRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl Default for NullRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for NullRecordStore {
    fn insert_record(&self, record: &IndexedRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        let outpoint = record.outpoint();
        records.retain(|r| r.outpoint() != outpoint);
        records.push(record.clone());
        Ok(())
    }

    fn delete_record(&self, outpoint: &Outpoint) -> Result<bool, StoreError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.outpoint() != *outpoint);
        Ok(records.len() != before)
    }

    fn find_all(&self) -> Result<Vec<UtxoReference>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .map(IndexedRecord::to_reference)
            .collect())
    }

    fn record_count(&self) -> Result<u64, StoreError> {
        Ok(self.records.lock().unwrap().len() as u64)
    }
}

/// A record store whose backend is always down.
///
/// Counts calls so tests can assert that validation failed before the
/// store was reached.
#[derive(Default)]
pub struct FailingRecordStore {
    calls: AtomicU64,
}

impl FailingRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> Result<T, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Backend("backend unavailable".to_string()))
    }
}

impl RecordStore for FailingRecordStore {
    fn insert_record(&self, _record: &IndexedRecord) -> Result<(), StoreError> {
        self.fail()
    }

    fn delete_record(&self, _outpoint: &Outpoint) -> Result<bool, StoreError> {
        self.fail()
    }

    fn find_all(&self) -> Result<Vec<UtxoReference>, StoreError> {
        self.fail()
    }

    fn record_count(&self) -> Result<u64, StoreError> {
        self.fail()
    }
}
