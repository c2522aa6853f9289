//! Per-output admission predicate.

use overlay_transactions::{PushDrop, ScriptError, Transaction};
use overlay_types::AdmittanceInstructions;

/// An output needs at least this many decoded fields to be admitted.
pub const MIN_ADMISSIBLE_FIELDS: usize = 2;

/// Extracts the data fields of a locking script.
pub trait FieldDecoder {
    fn decode_fields(&self, locking_script: &[u8]) -> Result<Vec<Vec<u8>>, ScriptError>;
}

impl<F> FieldDecoder for F
where
    F: Fn(&[u8]) -> Result<Vec<Vec<u8>>, ScriptError>,
{
    fn decode_fields(&self, locking_script: &[u8]) -> Result<Vec<Vec<u8>>, ScriptError> {
        self(locking_script)
    }
}

/// Reads fields from PushDrop locking scripts.
#[derive(Clone, Copy, Debug, Default)]
pub struct PushDropDecoder;

impl FieldDecoder for PushDropDecoder {
    fn decode_fields(&self, locking_script: &[u8]) -> Result<Vec<Vec<u8>>, ScriptError> {
        PushDrop::decode(locking_script).map(|pushdrop| pushdrop.fields)
    }
}

/// Applies the field-count predicate to every output of a transaction.
#[derive(Clone, Debug, Default)]
pub struct AdmissionClassifier<D = PushDropDecoder> {
    decoder: D,
}

impl AdmissionClassifier<PushDropDecoder> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: FieldDecoder> AdmissionClassifier<D> {
    pub fn with_decoder(decoder: D) -> Self {
        Self { decoder }
    }

    /// Whether a single locking script qualifies. Decode failures count as
    /// "not admissible".
    pub fn is_admissible(&self, locking_script: &[u8]) -> bool {
        match self.decoder.decode_fields(locking_script) {
            Ok(fields) => fields.len() >= MIN_ADMISSIBLE_FIELDS,
            Err(_) => false,
        }
    }

    /// Admission instructions for `tx`.
    ///
    /// `previous_coins` is accepted for the host contract; this topic keeps
    /// no cross-transaction state, so nothing is ever retained.
    pub fn classify(&self, tx: &Transaction, previous_coins: &[u32]) -> AdmittanceInstructions {
        let mut outputs_to_admit = Vec::new();

        for (index, output) in (0u32..).zip(&tx.outputs) {
            match self.decoder.decode_fields(&output.locking_script) {
                Ok(fields) if fields.len() >= MIN_ADMISSIBLE_FIELDS => {
                    outputs_to_admit.push(index);
                }
                Ok(fields) => {
                    tracing::trace!(output_index = index, fields = fields.len(), "too few fields, skipping output");
                }
                Err(e) => {
                    tracing::trace!(output_index = index, error = %e, "not a PushDrop output, skipping");
                }
            }
        }

        tracing::trace!(
            outputs = tx.outputs.len(),
            admitted = outputs_to_admit.len(),
            previous_coins = previous_coins.len(),
            "classified transaction"
        );

        AdmittanceInstructions {
            outputs_to_admit,
            coins_to_retain: Vec::new(),
        }
    }
}
