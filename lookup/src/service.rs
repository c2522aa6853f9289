//! The lookup service interface and the template implementation.

use tracing::{debug, info};

use overlay_store::RecordStore;
use overlay_transactions::transaction_from_beef;
use overlay_types::{
    AdmissionMode, Clock, IndexedRecord, Outpoint, ServiceMetadata, SpendNotificationMode,
    SystemClock, TxId,
};

use crate::notification::{AdmissionPayload, OutputAdmittedByTopic, OutputSpent};
use crate::query::{LookupAnswer, LookupQuestion, TemplateQuery};
use crate::LookupError;

/// Markdown documentation served to overlay hosts.
pub const DOCUMENTATION: &str = include_str!("../docs/lookup.md");

/// Metadata served to overlay hosts.
pub fn service_metadata() -> ServiceMetadata {
    ServiceMetadata::new("Template Lookup Service", "Find messages on-chain")
}

/// What the overlay host calls on a lookup service.
///
/// Notifications keep the service's index in step with topic membership;
/// `lookup` answers queries from that index.
pub trait LookupService {
    fn output_admitted_by_topic(&self, admitted: OutputAdmittedByTopic)
        -> Result<(), LookupError>;

    fn output_spent(&self, spent: &OutputSpent) -> Result<(), LookupError>;

    /// The output left the topic without being spent.
    fn output_evicted(&self, txid: &TxId, output_index: u32) -> Result<(), LookupError>;

    fn lookup(&self, question: &LookupQuestion) -> Result<LookupAnswer, LookupError>;

    fn documentation(&self) -> &str;

    fn metadata(&self) -> ServiceMetadata;

    /// What the host must send with an admission.
    fn admission_mode(&self) -> AdmissionMode;

    /// What the host must send with a spend.
    fn spend_notification_mode(&self) -> SpendNotificationMode;
}

/// Indexes every admitted output and answers `findAll`.
pub struct TemplateLookupService<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: RecordStore> TemplateLookupService<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: RecordStore, C: Clock> TemplateLookupService<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn remove(&self, outpoint: Outpoint, reason: &str) -> Result<(), LookupError> {
        let removed = self.store.delete_record(&outpoint)?;
        debug!(%outpoint, removed, reason, "record removed");
        Ok(())
    }
}

impl<S: RecordStore, C: Clock> LookupService for TemplateLookupService<S, C> {
    fn output_admitted_by_topic(
        &self,
        admitted: OutputAdmittedByTopic,
    ) -> Result<(), LookupError> {
        let (outpoint, beef) = match admitted.payload {
            AdmissionPayload::DirectId { txid, output_index } => {
                debug!(%txid, output_index, "admitted without envelope, storing empty payload");
                (Outpoint::new(txid, output_index), Vec::new())
            }
            AdmissionPayload::Envelope {
                atomic_beef,
                output_index,
            } => {
                let tx = transaction_from_beef(&atomic_beef)?;
                let outpoint = Outpoint::new(tx.id(), output_index);
                if output_index as usize >= tx.outputs.len() {
                    return Err(LookupError::OutputOutOfRange {
                        outpoint,
                        outputs: tx.outputs.len(),
                    });
                }
                (outpoint, atomic_beef)
            }
        };

        let record = IndexedRecord::new(outpoint, beef, self.clock.now());
        self.store.insert_record(&record)?;
        info!(topic = %admitted.topic, %outpoint, "output indexed");
        Ok(())
    }

    fn output_spent(&self, spent: &OutputSpent) -> Result<(), LookupError> {
        self.remove(spent.outpoint(), "spent")
    }

    fn output_evicted(&self, txid: &TxId, output_index: u32) -> Result<(), LookupError> {
        self.remove(Outpoint::new(*txid, output_index), "evicted")
    }

    fn lookup(&self, question: &LookupQuestion) -> Result<LookupAnswer, LookupError> {
        match TemplateQuery::parse(question)? {
            TemplateQuery::FindAll => {
                let outputs = self.store.find_all()?;
                debug!(count = outputs.len(), "findAll answered");
                Ok(LookupAnswer::OutputList { outputs })
            }
        }
    }

    fn documentation(&self) -> &str {
        DOCUMENTATION
    }

    fn metadata(&self) -> ServiceMetadata {
        service_metadata()
    }

    fn admission_mode(&self) -> AdmissionMode {
        AdmissionMode::WholeTx
    }

    fn spend_notification_mode(&self) -> SpendNotificationMode {
        SpendNotificationMode::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SERVICE_NAME;
    use overlay_nullables::{FailingRecordStore, NullClock, NullRecordStore};
    use overlay_transactions::{Beef, BeefTx, BeefVersion, Transaction, TxInput, TxOutput};
    use overlay_types::Timestamp;
    use serde_json::json;

    fn service() -> TemplateLookupService<NullRecordStore, NullClock> {
        TemplateLookupService::with_clock(NullRecordStore::new(), NullClock::new(1_700_000_000))
    }

    fn direct(txid: TxId, output_index: u32) -> OutputAdmittedByTopic {
        OutputAdmittedByTopic {
            topic: "tm_template".to_string(),
            payload: AdmissionPayload::DirectId { txid, output_index },
        }
    }

    fn find_all() -> LookupQuestion {
        LookupQuestion::new(SERVICE_NAME, json!("findAll"))
    }

    fn single_tx(outputs: usize) -> Transaction {
        Transaction {
            version: 1,
            inputs: vec![TxInput {
                source_txid: TxId::new([7; 32]),
                source_output_index: 0,
                unlocking_script: vec![0x51],
                sequence: u32::MAX,
            }],
            outputs: (0..outputs)
                .map(|i| TxOutput {
                    satoshis: 1,
                    locking_script: vec![0x51 + i as u8],
                })
                .collect(),
            lock_time: 0,
        }
    }

    fn single_tx_envelope(outputs: usize) -> (TxId, Vec<u8>) {
        let tx = single_tx(outputs);
        let txid = tx.id();
        let beef = Beef {
            version: BeefVersion::V2,
            bumps: vec![],
            txs: vec![BeefTx::full(tx, None)],
            atomic_txid: Some(txid),
        };
        (txid, beef.to_bytes().unwrap())
    }

    #[test]
    fn admit_then_find() {
        let svc = service();
        let txid = TxId::new([0x11; 32]);
        svc.output_admitted_by_topic(direct(txid, 0)).unwrap();

        let LookupAnswer::OutputList { outputs } = svc.lookup(&find_all()).unwrap() else {
            panic!("expected output list");
        };
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].outpoint(), Outpoint::new(txid, 0));
        assert!(outputs[0].beef.is_empty());
        assert_eq!(svc.store().records()[0].created_at, Timestamp::new(1_700_000_000));
    }

    #[test]
    fn spend_removes_record() {
        let svc = service();
        let txid = TxId::new([0x11; 32]);
        svc.output_admitted_by_topic(direct(txid, 0)).unwrap();
        svc.output_admitted_by_topic(direct(txid, 1)).unwrap();
        svc.output_spent(&OutputSpent {
            topic: "tm_template".to_string(),
            txid,
            output_index: 0,
        })
        .unwrap();

        let LookupAnswer::OutputList { outputs } = svc.lookup(&find_all()).unwrap() else {
            panic!("expected output list");
        };
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].output_index, 1);
    }

    #[test]
    fn evicting_unknown_outpoint_is_a_no_op() {
        let svc = service();
        svc.output_evicted(&TxId::new([9; 32]), 3).unwrap();
        assert!(svc.store().records().is_empty());
    }

    #[test]
    fn readmission_keeps_one_record() {
        let svc = service();
        let txid = TxId::new([0x22; 32]);
        svc.output_admitted_by_topic(direct(txid, 0)).unwrap();
        svc.output_admitted_by_topic(direct(txid, 0)).unwrap();
        assert_eq!(svc.store().records().len(), 1);
    }

    #[test]
    fn envelope_derives_txid_and_keeps_bytes() {
        let svc = service();
        let (txid, beef) = single_tx_envelope(2);
        svc.output_admitted_by_topic(OutputAdmittedByTopic {
            topic: "tm_template".to_string(),
            payload: AdmissionPayload::Envelope {
                atomic_beef: beef.clone(),
                output_index: 1,
            },
        })
        .unwrap();

        let records = svc.store().records();
        assert_eq!(records[0].outpoint(), Outpoint::new(txid, 1));
        assert_eq!(records[0].beef, beef);
    }

    #[test]
    fn envelope_with_hand_built_atomic_prefix() {
        let svc = service();
        let tx = single_tx(1);
        let txid = tx.id();
        let body = Beef {
            version: BeefVersion::V2,
            bumps: vec![],
            txs: vec![BeefTx::full(tx, None)],
            atomic_txid: None,
        };
        let mut atomic_beef = vec![0x01, 0x01, 0x01, 0x01];
        atomic_beef.extend_from_slice(&txid.to_wire_hash());
        atomic_beef.extend_from_slice(&body.to_bytes().unwrap());

        svc.output_admitted_by_topic(OutputAdmittedByTopic {
            topic: "tm_template".to_string(),
            payload: AdmissionPayload::Envelope {
                atomic_beef,
                output_index: 0,
            },
        })
        .unwrap();
        assert_eq!(svc.store().records()[0].outpoint(), Outpoint::new(txid, 0));
    }

    #[test]
    fn envelope_output_index_must_exist() {
        let svc = service();
        let (_, beef) = single_tx_envelope(1);
        let err = svc
            .output_admitted_by_topic(OutputAdmittedByTopic {
                topic: "tm_template".to_string(),
                payload: AdmissionPayload::Envelope {
                    atomic_beef: beef,
                    output_index: 1,
                },
            })
            .unwrap_err();
        assert!(matches!(err, LookupError::OutputOutOfRange { outputs: 1, .. }));
        assert!(svc.store().records().is_empty());
    }

    #[test]
    fn garbage_envelope_is_rejected() {
        let svc = service();
        let err = svc
            .output_admitted_by_topic(OutputAdmittedByTopic {
                topic: "tm_template".to_string(),
                payload: AdmissionPayload::Envelope {
                    atomic_beef: vec![0xde, 0xad],
                    output_index: 0,
                },
            })
            .unwrap_err();
        assert!(matches!(err, LookupError::Envelope(_)));
    }

    #[test]
    fn invalid_questions_never_reach_the_store() {
        let svc = TemplateLookupService::with_clock(FailingRecordStore::new(), NullClock::new(0));
        assert!(matches!(
            svc.lookup(&LookupQuestion::new(SERVICE_NAME, json!(null))),
            Err(LookupError::InvalidQuery)
        ));
        assert!(matches!(
            svc.lookup(&LookupQuestion::new("ls_other", json!("findAll"))),
            Err(LookupError::UnsupportedService(_))
        ));
        assert!(matches!(
            svc.lookup(&LookupQuestion::new(SERVICE_NAME, json!("findOne"))),
            Err(LookupError::UnsupportedQuery(_))
        ));
        assert_eq!(svc.store().calls(), 0);
    }

    #[test]
    fn store_failures_propagate() {
        let svc = TemplateLookupService::with_clock(FailingRecordStore::new(), NullClock::new(0));
        let txid = TxId::new([1; 32]);
        assert!(matches!(
            svc.output_admitted_by_topic(direct(txid, 0)),
            Err(LookupError::Store(_))
        ));
        assert!(matches!(
            svc.output_evicted(&txid, 0),
            Err(LookupError::Store(_))
        ));
        assert!(matches!(svc.lookup(&find_all()), Err(LookupError::Store(_))));
        assert_eq!(svc.store().calls(), 3);
    }

    #[test]
    fn advertised_modes_and_metadata() {
        let svc = service();
        assert_eq!(svc.admission_mode(), AdmissionMode::WholeTx);
        assert_eq!(svc.spend_notification_mode(), SpendNotificationMode::None);
        assert_eq!(svc.metadata().name, "Template Lookup Service");
        assert!(svc.documentation().contains("findAll"));
    }
}
