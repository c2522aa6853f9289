//! LMDB implementation of RecordStore.
//!
//! Key format: `txid(32) ++ output_index(u32 big-endian)`, so the outputs of
//! one transaction sit next to each other. Values are bincode `IndexedRecord`s.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use overlay_store::{RecordStore, StoreError};
use overlay_types::{IndexedRecord, Outpoint, UtxoReference};

use crate::LmdbError;

pub struct LmdbRecordStore {
    pub(crate) env: Arc<Env>,
    pub(crate) records_db: Database<Bytes, Bytes>,
}

impl RecordStore for LmdbRecordStore {
    fn insert_record(&self, record: &IndexedRecord) -> Result<(), StoreError> {
        let key = record.outpoint().to_key();
        let bytes = bincode::serialize(record).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.records_db
            .put(&mut wtxn, key.as_slice(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn delete_record(&self, outpoint: &Outpoint) -> Result<bool, StoreError> {
        let key = outpoint.to_key();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let existed = self
            .records_db
            .delete(&mut wtxn, key.as_slice())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(existed)
    }

    fn find_all(&self) -> Result<Vec<UtxoReference>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.records_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in iter {
            let (_key, val) = entry.map_err(LmdbError::from)?;
            let record: IndexedRecord = bincode::deserialize(val).map_err(LmdbError::from)?;
            results.push(UtxoReference::from(record));
        }
        Ok(results)
    }

    fn record_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let count = self.records_db.len(&rtxn).map_err(LmdbError::from)?;
        Ok(count)
    }

    fn contains(&self, outpoint: &Outpoint) -> Result<bool, StoreError> {
        let key = outpoint.to_key();
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let found = self
            .records_db
            .get(&rtxn, key.as_slice())
            .map_err(LmdbError::from)?;
        Ok(found.is_some())
    }
}
