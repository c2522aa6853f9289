//! Topic manager contract and the template implementation.

use overlay_transactions::transaction_from_beef;
use overlay_types::{AdmittanceInstructions, ServiceMetadata};

use crate::classifier::AdmissionClassifier;
use crate::TopicError;

const DOCUMENTATION: &str = include_str!("../docs/topic.md");

/// What an overlay host calls to decide topic membership.
pub trait TopicManager {
    /// Identify which outputs of the transaction in `beef` are admissible.
    ///
    /// `previous_coins` are indices of inputs spending coins this topic
    /// admitted earlier.
    fn identify_admissible_outputs(
        &self,
        beef: &[u8],
        previous_coins: &[u32],
    ) -> Result<AdmittanceInstructions, TopicError>;

    /// Markdown documentation shown by hosts.
    fn documentation(&self) -> &str;

    fn metadata(&self) -> ServiceMetadata;
}

/// Admits PushDrop outputs with more than one field.
#[derive(Clone, Debug, Default)]
pub struct TemplateTopicManager {
    classifier: AdmissionClassifier,
}

impl TemplateTopicManager {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TopicManager for TemplateTopicManager {
    fn identify_admissible_outputs(
        &self,
        beef: &[u8],
        previous_coins: &[u32],
    ) -> Result<AdmittanceInstructions, TopicError> {
        let tx = transaction_from_beef(beef)?;
        let instructions = self.classifier.classify(&tx, previous_coins);
        tracing::debug!(
            txid = %tx.id(),
            outputs = tx.outputs.len(),
            admitted = ?instructions.outputs_to_admit,
            "identified admissible outputs"
        );
        Ok(instructions)
    }

    fn documentation(&self) -> &str {
        DOCUMENTATION
    }

    fn metadata(&self) -> ServiceMetadata {
        ServiceMetadata::new(
            "Adventure Topic Manager",
            "Admit all adventure outputs (record, GPX, and photos) into the topic",
        )
    }
}
