//! Merkle paths in BUMP format.
//!
//! Paths are parsed and bounds-checked so that an envelope can be walked
//! to its end; they are not verified against block headers.

use overlay_types::TxId;

use crate::codec::{write_varint, Reader};
use crate::EnvelopeError;

const FLAG_DUPLICATE: u8 = 0x01;
const FLAG_TXID: u8 = 0x02;
const MAX_TREE_HEIGHT: u8 = 64;

/// One node of a merkle path level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathLeaf {
    pub offset: u64,
    /// Node hash in wire order; `None` when the node duplicates its sibling.
    pub hash: Option<[u8; 32]>,
    /// Set on level-0 leaves that are transactions the envelope is about.
    pub txid: bool,
}

impl PathLeaf {
    pub fn duplicate(&self) -> bool {
        self.hash.is_none()
    }
}

/// A merkle path from one or more transactions to a block's merkle root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerklePath {
    pub block_height: u64,
    /// `path[0]` holds the leaves, `path[n]` the nodes at height `n`.
    pub path: Vec<Vec<PathLeaf>>,
}

impl MerklePath {
    pub fn read(reader: &mut Reader<'_>) -> Result<Self, EnvelopeError> {
        let block_height = reader.read_varint()?;
        let tree_height = reader.read_u8()?;
        if tree_height == 0 || tree_height > MAX_TREE_HEIGHT {
            return Err(EnvelopeError::InvalidBump(format!(
                "tree height {tree_height}"
            )));
        }

        let mut path = Vec::with_capacity(usize::from(tree_height));
        for level in 0..tree_height {
            let leaf_count = reader.read_length()?;
            let mut leaves = Vec::with_capacity(leaf_count);
            for _ in 0..leaf_count {
                let offset = reader.read_varint()?;
                let flags = reader.read_u8()?;
                if flags & !(FLAG_DUPLICATE | FLAG_TXID) != 0 {
                    return Err(EnvelopeError::InvalidBump(format!("leaf flags {flags:#04x}")));
                }
                let hash = if flags & FLAG_DUPLICATE != 0 {
                    if flags & FLAG_TXID != 0 {
                        return Err(EnvelopeError::InvalidBump(
                            "duplicate leaf marked as txid".to_string(),
                        ));
                    }
                    None
                } else {
                    Some(reader.read_array()?)
                };
                leaves.push(PathLeaf {
                    offset,
                    hash,
                    txid: flags & FLAG_TXID != 0,
                });
            }
            if level == 0 && leaves.is_empty() {
                return Err(EnvelopeError::InvalidBump("no leaves".to_string()));
            }
            path.push(leaves);
        }

        Ok(Self { block_height, path })
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        write_varint(out, self.block_height);
        out.push(self.path.len() as u8);
        for level in &self.path {
            write_varint(out, level.len() as u64);
            for leaf in level {
                write_varint(out, leaf.offset);
                match &leaf.hash {
                    None => out.push(FLAG_DUPLICATE),
                    Some(hash) => {
                        out.push(if leaf.txid { FLAG_TXID } else { 0 });
                        out.extend_from_slice(hash);
                    }
                }
            }
        }
    }

    /// Whether `txid` is one of the path's flagged leaves.
    pub fn contains(&self, txid: &TxId) -> bool {
        let wire = txid.to_wire_hash();
        self.path
            .first()
            .map(|leaves| {
                leaves
                    .iter()
                    .any(|leaf| leaf.txid && leaf.hash.as_ref() == Some(&wire))
            })
            .unwrap_or(false)
    }
}
