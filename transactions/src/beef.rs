//! BEEF transaction envelopes.
//!
//! Layout (all integers little-endian, counts are compact-size):
//!
//! ```text
//! [0x01010101 subject_txid(32)]   Atomic BEEF prefix, optional (txid in wire order)
//! version u32                     0xEFBE0001 (V1) or 0xEFBE0002 (V2)
//! bump_count, bumps...
//! tx_count, txs...                ancestors first, subject last
//! ```
//!
//! V1 entries are `raw_tx has_bump(u8) [bump_index]`. V2 entries start with a
//! format byte: 0 raw tx, 1 bump index then raw tx, 2 txid only.

use overlay_types::TxId;

use crate::codec::{write_varint, Reader};
use crate::{EnvelopeError, MerklePath, Transaction};

pub const BEEF_V1: u32 = 0xEFBE_0001;
pub const BEEF_V2: u32 = 0xEFBE_0002;
pub const ATOMIC_BEEF: u32 = 0x0101_0101;

const FORMAT_RAW_TX: u8 = 0;
const FORMAT_RAW_TX_AND_BUMP: u8 = 1;
const FORMAT_TXID_ONLY: u8 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BeefVersion {
    V1,
    V2,
}

impl BeefVersion {
    fn magic(self) -> u32 {
        match self {
            Self::V1 => BEEF_V1,
            Self::V2 => BEEF_V2,
        }
    }
}

/// One transaction entry of an envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BeefTx {
    Full {
        txid: TxId,
        tx: Transaction,
        bump_index: Option<usize>,
    },
    /// A transaction the receiver is assumed to already know (V2 only).
    TxidOnly(TxId),
}

impl BeefTx {
    pub fn full(tx: Transaction, bump_index: Option<usize>) -> Self {
        Self::Full {
            txid: tx.id(),
            tx,
            bump_index,
        }
    }

    pub fn txid(&self) -> TxId {
        match self {
            Self::Full { txid, .. } => *txid,
            Self::TxidOnly(txid) => *txid,
        }
    }
}

/// A decoded BEEF or Atomic BEEF envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Beef {
    pub version: BeefVersion,
    pub bumps: Vec<MerklePath>,
    pub txs: Vec<BeefTx>,
    /// Set for Atomic BEEF: the transaction the envelope is about.
    pub atomic_txid: Option<TxId>,
}

impl Beef {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        let mut reader = Reader::new(bytes);

        let mut magic = reader.read_u32_le()?;
        let atomic_txid = if magic == ATOMIC_BEEF {
            let txid = TxId::from_wire_hash(reader.read_array()?);
            magic = reader.read_u32_le()?;
            Some(txid)
        } else {
            None
        };
        let version = match magic {
            BEEF_V1 => BeefVersion::V1,
            BEEF_V2 => BeefVersion::V2,
            other => return Err(EnvelopeError::UnknownVersion(other)),
        };

        let bump_count = reader.read_length()?;
        let mut bumps = Vec::with_capacity(bump_count);
        for _ in 0..bump_count {
            bumps.push(MerklePath::read(&mut reader)?);
        }

        let tx_count = reader.read_length()?;
        let mut txs = Vec::with_capacity(tx_count);
        for _ in 0..tx_count {
            let entry = match version {
                BeefVersion::V1 => {
                    let (txid, tx) = read_raw_tx(&mut reader)?;
                    let bump_index = match reader.read_u8()? {
                        0 => None,
                        1 => Some(read_bump_index(&mut reader, bumps.len())?),
                        flag => return Err(EnvelopeError::InvalidTxFormat(flag)),
                    };
                    BeefTx::Full {
                        txid,
                        tx,
                        bump_index,
                    }
                }
                BeefVersion::V2 => match reader.read_u8()? {
                    FORMAT_RAW_TX => {
                        let (txid, tx) = read_raw_tx(&mut reader)?;
                        BeefTx::Full {
                            txid,
                            tx,
                            bump_index: None,
                        }
                    }
                    FORMAT_RAW_TX_AND_BUMP => {
                        let bump_index = read_bump_index(&mut reader, bumps.len())?;
                        let (txid, tx) = read_raw_tx(&mut reader)?;
                        BeefTx::Full {
                            txid,
                            tx,
                            bump_index: Some(bump_index),
                        }
                    }
                    FORMAT_TXID_ONLY => BeefTx::TxidOnly(TxId::from_wire_hash(reader.read_array()?)),
                    format => return Err(EnvelopeError::InvalidTxFormat(format)),
                },
            };
            if let BeefTx::Full {
                txid,
                bump_index: Some(index),
                ..
            } = &entry
            {
                if !bumps[*index].contains(txid) {
                    return Err(EnvelopeError::BumpMissingTxid {
                        txid: *txid,
                        index: *index,
                    });
                }
            }
            txs.push(entry);
        }

        if !reader.is_finished() {
            return Err(EnvelopeError::TrailingData(reader.remaining()));
        }

        Ok(Self {
            version,
            bumps,
            txs,
            atomic_txid,
        })
    }

    /// Serialize the envelope, with the Atomic BEEF prefix when `atomic_txid` is set.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EnvelopeError> {
        let mut out = Vec::new();
        if let Some(txid) = &self.atomic_txid {
            out.extend_from_slice(&ATOMIC_BEEF.to_le_bytes());
            out.extend_from_slice(&txid.to_wire_hash());
        }
        out.extend_from_slice(&self.version.magic().to_le_bytes());

        write_varint(&mut out, self.bumps.len() as u64);
        for bump in &self.bumps {
            bump.write(&mut out);
        }

        write_varint(&mut out, self.txs.len() as u64);
        for entry in &self.txs {
            match (self.version, entry) {
                (BeefVersion::V1, BeefTx::Full { tx, bump_index, .. }) => {
                    tx.write(&mut out);
                    match bump_index {
                        Some(index) => {
                            out.push(1);
                            write_varint(&mut out, *index as u64);
                        }
                        None => out.push(0),
                    }
                }
                (BeefVersion::V1, BeefTx::TxidOnly(_)) => {
                    return Err(EnvelopeError::TxidOnlyInV1);
                }
                (BeefVersion::V2, BeefTx::Full { tx, bump_index, .. }) => {
                    match bump_index {
                        Some(index) => {
                            out.push(FORMAT_RAW_TX_AND_BUMP);
                            write_varint(&mut out, *index as u64);
                        }
                        None => out.push(FORMAT_RAW_TX),
                    }
                    tx.write(&mut out);
                }
                (BeefVersion::V2, BeefTx::TxidOnly(txid)) => {
                    out.push(FORMAT_TXID_ONLY);
                    out.extend_from_slice(&txid.to_wire_hash());
                }
            }
        }
        Ok(out)
    }

    /// The id of the transaction this envelope is about.
    pub fn subject_txid(&self) -> Result<TxId, EnvelopeError> {
        match self.atomic_txid {
            Some(txid) => Ok(txid),
            None => self
                .txs
                .last()
                .map(BeefTx::txid)
                .ok_or(EnvelopeError::NoTransactions),
        }
    }

    /// Consume the envelope and return its subject transaction.
    ///
    /// For Atomic BEEF that is the transaction named in the prefix; otherwise
    /// the last entry.
    pub fn into_subject(self) -> Result<Transaction, EnvelopeError> {
        let subject = self.subject_txid()?;
        let entry = match self.atomic_txid {
            Some(txid) => self
                .txs
                .into_iter()
                .rev()
                .find(|entry| entry.txid() == txid)
                .ok_or(EnvelopeError::SubjectMissing(txid))?,
            None => self
                .txs
                .into_iter()
                .last()
                .ok_or(EnvelopeError::NoTransactions)?,
        };
        match entry {
            BeefTx::Full { tx, .. } => Ok(tx),
            BeefTx::TxidOnly(_) => Err(EnvelopeError::SubjectIsTxidOnly(subject)),
        }
    }
}

fn read_raw_tx(reader: &mut Reader<'_>) -> Result<(TxId, Transaction), EnvelopeError> {
    let start = reader.position();
    let tx = Transaction::read(reader)?;
    let txid = overlay_crypto::txid_of(reader.consumed_since(start));
    Ok((txid, tx))
}

fn read_bump_index(reader: &mut Reader<'_>, bump_count: usize) -> Result<usize, EnvelopeError> {
    let index = reader.read_varint()?;
    match usize::try_from(index) {
        Ok(i) if i < bump_count => Ok(i),
        _ => Err(EnvelopeError::BumpIndexOutOfRange {
            index,
            count: bump_count,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PathLeaf, TxInput, TxOutput};

    fn tx(seed: u8, outputs: usize) -> Transaction {
        Transaction {
            version: 1,
            inputs: vec![TxInput {
                source_txid: TxId::new([seed; 32]),
                source_output_index: 0,
                unlocking_script: vec![seed],
                sequence: 0xffff_ffff,
            }],
            outputs: (0..outputs)
                .map(|i| TxOutput {
                    satoshis: 1 + i as u64,
                    locking_script: vec![0x51],
                })
                .collect(),
            lock_time: 0,
        }
    }

    fn bump_for(txid: &TxId) -> MerklePath {
        MerklePath {
            block_height: 100,
            path: vec![vec![
                PathLeaf {
                    offset: 0,
                    hash: Some(txid.to_wire_hash()),
                    txid: true,
                },
                PathLeaf {
                    offset: 1,
                    hash: None,
                    txid: false,
                },
            ]],
        }
    }

    fn envelope(version: BeefVersion) -> (Beef, Transaction) {
        let parent = tx(1, 1);
        let child = tx(2, 3);
        let beef = Beef {
            version,
            bumps: vec![bump_for(&parent.id())],
            txs: vec![BeefTx::full(parent, Some(0)), BeefTx::full(child.clone(), None)],
            atomic_txid: None,
        };
        (beef, child)
    }

    #[test]
    fn v1_subject_is_last_transaction() {
        let (beef, child) = envelope(BeefVersion::V1);
        let bytes = beef.to_bytes().unwrap();
        assert_eq!(&bytes[..4], &[0x01, 0x00, 0xbe, 0xef]);
        let decoded = Beef::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, beef);
        assert_eq!(decoded.into_subject().unwrap(), child);
    }

    #[test]
    fn v2_subject_is_last_transaction() {
        let (beef, child) = envelope(BeefVersion::V2);
        let bytes = beef.to_bytes().unwrap();
        assert_eq!(&bytes[..4], &[0x02, 0x00, 0xbe, 0xef]);
        assert_eq!(crate::transaction_from_beef(&bytes).unwrap(), child);
    }

    #[test]
    fn atomic_prefix_selects_subject() {
        let (mut beef, child) = envelope(BeefVersion::V1);
        // Put the subject first so "last entry" would pick the wrong one.
        beef.txs.reverse();
        beef.atomic_txid = Some(child.id());
        let bytes = beef.to_bytes().unwrap();
        assert_eq!(&bytes[..4], &[0x01, 0x01, 0x01, 0x01]);
        assert_eq!(&bytes[4..36], &child.id().to_wire_hash());
        assert_eq!(crate::transaction_from_beef(&bytes).unwrap(), child);
    }

    #[test]
    fn atomic_prefix_is_wire_order() {
        let (mut beef, child) = envelope(BeefVersion::V2);
        beef.bumps.clear();
        beef.txs = vec![BeefTx::full(child.clone(), None)];

        let mut bytes = ATOMIC_BEEF.to_le_bytes().to_vec();
        bytes.extend_from_slice(&child.id().to_wire_hash());
        bytes.extend_from_slice(&beef.to_bytes().unwrap());

        assert_eq!(crate::transaction_from_beef(&bytes).unwrap(), child);
    }

    #[test]
    fn bump_must_contain_its_transaction() {
        let (mut beef, _) = envelope(BeefVersion::V1);
        let stranger = TxId::new([0x77; 32]);
        beef.bumps = vec![bump_for(&stranger)];
        let parent = beef.txs[0].txid();
        let bytes = beef.to_bytes().unwrap();
        assert_eq!(
            Beef::from_bytes(&bytes),
            Err(EnvelopeError::BumpMissingTxid {
                txid: parent,
                index: 0
            })
        );
    }

    #[test]
    fn atomic_subject_missing() {
        let (mut beef, _) = envelope(BeefVersion::V1);
        let stranger = TxId::new([0x99; 32]);
        beef.atomic_txid = Some(stranger);
        let bytes = beef.to_bytes().unwrap();
        assert_eq!(
            crate::transaction_from_beef(&bytes),
            Err(EnvelopeError::SubjectMissing(stranger))
        );
    }

    #[test]
    fn txid_only_subject_rejected() {
        let (mut beef, _) = envelope(BeefVersion::V2);
        let known = TxId::new([0x42; 32]);
        beef.txs.push(BeefTx::TxidOnly(known));
        let bytes = beef.to_bytes().unwrap();
        let decoded = Beef::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.subject_txid().unwrap(), known);
        assert_eq!(
            decoded.into_subject(),
            Err(EnvelopeError::SubjectIsTxidOnly(known))
        );
    }

    #[test]
    fn txid_only_cannot_be_written_as_v1() {
        let (mut beef, _) = envelope(BeefVersion::V1);
        beef.txs.push(BeefTx::TxidOnly(TxId::ZERO));
        assert_eq!(beef.to_bytes(), Err(EnvelopeError::TxidOnlyInV1));
    }

    #[test]
    fn bump_index_out_of_range() {
        let (mut beef, _) = envelope(BeefVersion::V1);
        beef.bumps.clear();
        let bytes = beef.to_bytes().unwrap();
        assert_eq!(
            Beef::from_bytes(&bytes),
            Err(EnvelopeError::BumpIndexOutOfRange { index: 0, count: 0 })
        );
    }

    #[test]
    fn unknown_version() {
        let bytes = 0xdead_beefu32.to_le_bytes();
        assert_eq!(
            Beef::from_bytes(&bytes),
            Err(EnvelopeError::UnknownVersion(0xdead_beef))
        );
    }

    #[test]
    fn empty_envelope_has_no_subject() {
        let beef = Beef {
            version: BeefVersion::V1,
            bumps: Vec::new(),
            txs: Vec::new(),
            atomic_txid: None,
        };
        let bytes = beef.to_bytes().unwrap();
        assert_eq!(
            crate::transaction_from_beef(&bytes),
            Err(EnvelopeError::NoTransactions)
        );
    }

    #[test]
    fn trailing_bytes_rejected() {
        let (beef, _) = envelope(BeefVersion::V2);
        let mut bytes = beef.to_bytes().unwrap();
        bytes.extend_from_slice(&[0, 0]);
        assert_eq!(Beef::from_bytes(&bytes), Err(EnvelopeError::TrailingData(2)));
    }

    #[test]
    fn truncated_envelope_rejected() {
        let (beef, _) = envelope(BeefVersion::V1);
        let bytes = beef.to_bytes().unwrap();
        assert!(matches!(
            Beef::from_bytes(&bytes[..bytes.len() - 3]),
            Err(EnvelopeError::UnexpectedEnd(_))
        ));
    }

    #[test]
    fn parsed_txid_matches_transaction_id() {
        let (beef, child) = envelope(BeefVersion::V2);
        let decoded = Beef::from_bytes(&beef.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded.subject_txid().unwrap(), child.id());
    }
}
