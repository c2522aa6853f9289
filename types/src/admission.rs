//! Admission contract between the overlay host and a topic manager.

use serde::{Deserialize, Serialize};

/// Which outputs of a submitted transaction a topic admits, and which
/// previously admitted coins it keeps tracking.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmittanceInstructions {
    /// Output indices to admit, ascending.
    pub outputs_to_admit: Vec<u32>,
    /// Indices into the previous-coins list that the topic retains.
    pub coins_to_retain: Vec<u32>,
}

impl AdmittanceInstructions {
    pub fn is_empty(&self) -> bool {
        self.outputs_to_admit.is_empty() && self.coins_to_retain.is_empty()
    }
}

/// What the host hands a lookup service when an output is admitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdmissionMode {
    /// Only the locking script and its outpoint.
    LockingScript,
    /// The whole transaction as an Atomic BEEF envelope.
    WholeTx,
}

/// What the host hands a lookup service when an output is spent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpendNotificationMode {
    /// Only the spent outpoint.
    None,
    /// The spent outpoint plus the spending txid.
    Txid,
    /// The spent outpoint plus the unlocking script.
    Script,
    /// The spent outpoint plus the whole spending transaction.
    WholeTx,
}
