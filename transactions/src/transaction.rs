//! Raw transaction wire format.

use overlay_types::TxId;

use crate::codec::{write_var_bytes, write_varint, Reader};
use crate::EnvelopeError;

/// A transaction input. Only the fields needed to re-serialize are kept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxInput {
    pub source_txid: TxId,
    pub source_output_index: u32,
    pub unlocking_script: Vec<u8>,
    pub sequence: u32,
}

/// A transaction output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxOutput {
    pub satoshis: u64,
    pub locking_script: Vec<u8>,
}

/// A decoded raw transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    pub lock_time: u32,
}

impl Transaction {
    /// Decode a raw transaction that must span the whole buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        let mut reader = Reader::new(bytes);
        let tx = Self::read(&mut reader)?;
        if !reader.is_finished() {
            return Err(EnvelopeError::TrailingData(reader.remaining()));
        }
        Ok(tx)
    }

    /// Decode a raw transaction from the reader's current position.
    pub fn read(reader: &mut Reader<'_>) -> Result<Self, EnvelopeError> {
        let version = reader.read_u32_le()?;

        let input_count = reader.read_length()?;
        let mut inputs = Vec::with_capacity(input_count);
        for _ in 0..input_count {
            let source_txid = TxId::from_wire_hash(reader.read_array()?);
            let source_output_index = reader.read_u32_le()?;
            let unlocking_script = reader.read_var_bytes()?.to_vec();
            let sequence = reader.read_u32_le()?;
            inputs.push(TxInput {
                source_txid,
                source_output_index,
                unlocking_script,
                sequence,
            });
        }

        let output_count = reader.read_length()?;
        let mut outputs = Vec::with_capacity(output_count);
        for _ in 0..output_count {
            let satoshis = reader.read_u64_le()?;
            let locking_script = reader.read_var_bytes()?.to_vec();
            outputs.push(TxOutput {
                satoshis,
                locking_script,
            });
        }

        let lock_time = reader.read_u32_le()?;
        Ok(Self {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    /// Serialize to the raw wire format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write(&mut out);
        out
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.version.to_le_bytes());
        write_varint(out, self.inputs.len() as u64);
        for input in &self.inputs {
            out.extend_from_slice(&input.source_txid.to_wire_hash());
            out.extend_from_slice(&input.source_output_index.to_le_bytes());
            write_var_bytes(out, &input.unlocking_script);
            out.extend_from_slice(&input.sequence.to_le_bytes());
        }
        write_varint(out, self.outputs.len() as u64);
        for output in &self.outputs {
            out.extend_from_slice(&output.satoshis.to_le_bytes());
            write_var_bytes(out, &output.locking_script);
        }
        out.extend_from_slice(&self.lock_time.to_le_bytes());
    }

    /// The transaction id: reversed double SHA-256 of the raw bytes.
    pub fn id(&self) -> TxId {
        overlay_crypto::txid_of(&self.to_bytes())
    }
}
