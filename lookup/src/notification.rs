//! Notifications the overlay host sends when topic membership changes.

use serde::{Deserialize, Serialize};

use overlay_types::{Outpoint, TxId};

/// How the admitted output is identified.
///
/// On the wire the host sends either `{txid, outputIndex}` or
/// `{atomicBEEF, outputIndex}`; the shape alone tells them apart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdmissionPayload {
    /// Only the outpoint is known. The record is stored with an empty payload.
    #[serde(rename_all = "camelCase")]
    DirectId { txid: TxId, output_index: u32 },
    /// The whole transaction; the txid is derived from it.
    #[serde(rename_all = "camelCase")]
    Envelope {
        #[serde(rename = "atomicBEEF")]
        atomic_beef: Vec<u8>,
        output_index: u32,
    },
}

impl AdmissionPayload {
    pub fn output_index(&self) -> u32 {
        match self {
            Self::DirectId { output_index, .. } | Self::Envelope { output_index, .. } => {
                *output_index
            }
        }
    }
}

/// An output was admitted into a topic this service indexes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputAdmittedByTopic {
    pub topic: String,
    #[serde(flatten)]
    pub payload: AdmissionPayload,
}

/// A previously admitted output was spent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputSpent {
    pub topic: String,
    pub txid: TxId,
    pub output_index: u32,
}

impl OutputSpent {
    pub fn outpoint(&self) -> Outpoint {
        Outpoint::new(self.txid, self.output_index)
    }
}
