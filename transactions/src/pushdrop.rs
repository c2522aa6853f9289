//! PushDrop locking scripts.
//!
//! A PushDrop output locks coins to a public key and carries data fields
//! that are dropped from the stack before the signature check:
//!
//! ```text
//! <pubkey> OP_CHECKSIG <field 0> <field 1> ... <field n> OP_2DROP ... [OP_DROP]
//! ```
//!
//! Decoding only looks at the key and the fields; the second chunk is the
//! lock opcode and is not inspected.

use crate::script::{parse_chunks, push_data, Opcode};
use crate::ScriptError;

/// The decoded parts of a PushDrop locking script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PushDrop {
    pub locking_public_key: Vec<u8>,
    pub fields: Vec<Vec<u8>>,
}

impl PushDrop {
    /// Decode a PushDrop locking script.
    ///
    /// Fields are read from the third chunk until the chunk after a field is
    /// OP_DROP or OP_2DROP. A script with a key and no drops decodes to zero
    /// fields.
    pub fn decode(script: &[u8]) -> Result<Self, ScriptError> {
        let chunks = parse_chunks(script)?;
        if chunks.is_empty() {
            return Err(ScriptError::Empty);
        }

        let locking_public_key = match &chunks[0].data {
            Some(key) if chunks[0].op.is_push() && is_public_key(key) => key.clone(),
            _ => return Err(ScriptError::MissingPublicKey),
        };

        let mut fields = Vec::new();
        for (i, chunk) in chunks.iter().enumerate().skip(2) {
            let value = chunk.field_value().ok_or(ScriptError::NonPushField {
                index: fields.len(),
                opcode: chunk.op.0,
            })?;
            fields.push(value);

            let next = chunks.get(i + 1).map(|c| c.op);
            if next == Some(Opcode::OP_DROP) || next == Some(Opcode::OP_2DROP) {
                break;
            }
        }

        Ok(Self {
            locking_public_key,
            fields,
        })
    }

    /// Build the lock-before PushDrop script for `fields`.
    pub fn lock(locking_public_key: &[u8], fields: &[Vec<u8>]) -> Vec<u8> {
        let mut script = Vec::new();
        push_data(&mut script, locking_public_key);
        script.push(Opcode::OP_CHECKSIG.0);
        for field in fields {
            push_data(&mut script, field);
        }
        let mut remaining = fields.len();
        while remaining > 1 {
            script.push(Opcode::OP_2DROP.0);
            remaining -= 2;
        }
        if remaining == 1 {
            script.push(Opcode::OP_DROP.0);
        }
        script
    }
}

/// A compressed (33 bytes, 02/03 prefix) or uncompressed (65 bytes, 04
/// prefix) SEC1 public key. The point itself is not checked.
fn is_public_key(bytes: &[u8]) -> bool {
    matches!(
        (bytes.len(), bytes.first()),
        (33, Some(0x02 | 0x03)) | (65, Some(0x04))
    )
}
