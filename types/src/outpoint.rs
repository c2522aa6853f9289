//! Output references.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{TxId, TypesError};

/// Identifies a single transaction output: `(txid, output_index)`.
///
/// This is the natural key of every indexed record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outpoint {
    pub txid: TxId,
    pub output_index: u32,
}

impl Outpoint {
    pub fn new(txid: TxId, output_index: u32) -> Self {
        Self { txid, output_index }
    }

    /// Binary key: `txid(32) ++ output_index(u32 big-endian)`.
    ///
    /// Big-endian keeps outputs of one transaction adjacent and ordered.
    pub fn to_key(&self) -> [u8; 36] {
        let mut key = [0u8; 36];
        key[..32].copy_from_slice(self.txid.as_bytes());
        key[32..].copy_from_slice(&self.output_index.to_be_bytes());
        key
    }
}

impl fmt::Display for Outpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.txid, self.output_index)
    }
}

impl FromStr for Outpoint {
    type Err = TypesError;

    /// Parse the `<txid>.<index>` form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (txid, index) = s
            .split_once('.')
            .ok_or_else(|| TypesError::InvalidOutpoint(s.to_string()))?;
        let output_index = index
            .parse()
            .map_err(|_| TypesError::InvalidOutpoint(s.to_string()))?;
        Ok(Self::new(TxId::from_hex(txid)?, output_index))
    }
}
