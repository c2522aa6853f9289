//! Records held by the lookup service's index.

use serde::{Deserialize, Serialize};

use crate::{Outpoint, Timestamp, TxId};

/// One admitted output as persisted by a record store.
///
/// A projection of on-chain state, never authoritative: spend and eviction
/// notifications always remove it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedRecord {
    pub txid: TxId,
    pub output_index: u32,
    /// The raw envelope the output arrived in. Empty when the host only
    /// supplied a transaction id.
    pub beef: Vec<u8>,
    pub created_at: Timestamp,
}

impl IndexedRecord {
    pub fn new(outpoint: Outpoint, beef: Vec<u8>, created_at: Timestamp) -> Self {
        Self {
            txid: outpoint.txid,
            output_index: outpoint.output_index,
            beef,
            created_at,
        }
    }

    pub fn outpoint(&self) -> Outpoint {
        Outpoint::new(self.txid, self.output_index)
    }

    /// Project to the shape returned by lookup queries.
    pub fn to_reference(&self) -> UtxoReference {
        UtxoReference {
            txid: self.txid,
            output_index: self.output_index,
            beef: self.beef.clone(),
        }
    }
}

/// A UTXO as returned to the host by a lookup query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtxoReference {
    pub txid: TxId,
    pub output_index: u32,
    #[serde(default)]
    pub beef: Vec<u8>,
}

impl UtxoReference {
    pub fn outpoint(&self) -> Outpoint {
        Outpoint::new(self.txid, self.output_index)
    }
}

impl From<IndexedRecord> for UtxoReference {
    fn from(record: IndexedRecord) -> Self {
        Self {
            txid: record.txid,
            output_index: record.output_index,
            beef: record.beef,
        }
    }
}
