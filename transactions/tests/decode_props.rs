//! Property tests for the decoders that face untrusted input.
//!
//! Envelopes and locking scripts arrive from the network, so decoding
//! arbitrary bytes must fail cleanly rather than panic, and well-formed
//! inputs must decode to exactly what was encoded.

use proptest::prelude::*;

use overlay_transactions::{
    transaction_from_beef, Beef, BeefTx, BeefVersion, PushDrop, Transaction, TxInput, TxOutput,
};
use overlay_types::TxId;

fn arb_pubkey() -> impl Strategy<Value = Vec<u8>> {
    (prop_oneof![Just(0x02u8), Just(0x03u8)], any::<[u8; 32]>()).prop_map(|(prefix, body)| {
        let mut key = vec![prefix];
        key.extend_from_slice(&body);
        key
    })
}

fn arb_field() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..300)
}

fn arb_transaction() -> impl Strategy<Value = Transaction> {
    (
        any::<u32>(),
        prop::collection::vec(
            (any::<[u8; 32]>(), any::<u32>(), prop::collection::vec(any::<u8>(), 0..80)),
            0..3,
        ),
        prop::collection::vec((any::<u64>(), prop::collection::vec(any::<u8>(), 0..80)), 0..4),
        any::<u32>(),
    )
        .prop_map(|(version, inputs, outputs, lock_time)| Transaction {
            version,
            inputs: inputs
                .into_iter()
                .map(|(txid, index, script)| TxInput {
                    source_txid: TxId::new(txid),
                    source_output_index: index,
                    unlocking_script: script,
                    sequence: 0xffff_ffff,
                })
                .collect(),
            outputs: outputs
                .into_iter()
                .map(|(satoshis, script)| TxOutput {
                    satoshis,
                    locking_script: script,
                })
                .collect(),
            lock_time,
        })
}

proptest! {
    /// Arbitrary bytes never panic the envelope decoder.
    #[test]
    fn beef_decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = Beef::from_bytes(&bytes);
    }

    /// Arbitrary bytes behind a valid magic never panic the envelope decoder.
    #[test]
    fn beef_body_decode_never_panics(
        v2 in any::<bool>(),
        body in prop::collection::vec(any::<u8>(), 0..512),
    ) {
        let magic: u32 = if v2 { 0xEFBE_0002 } else { 0xEFBE_0001 };
        let mut bytes = magic.to_le_bytes().to_vec();
        bytes.extend_from_slice(&body);
        let _ = Beef::from_bytes(&bytes);
    }

    /// Arbitrary bytes never panic the PushDrop decoder.
    #[test]
    fn pushdrop_decode_never_panics(script in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = PushDrop::decode(&script);
    }

    /// Any key and field list decodes back to itself.
    #[test]
    fn pushdrop_fields_survive(
        key in arb_pubkey(),
        fields in prop::collection::vec(arb_field(), 0..8),
    ) {
        let script = PushDrop::lock(&key, &fields);
        let decoded = PushDrop::decode(&script).unwrap();
        prop_assert_eq!(decoded.locking_public_key, key);
        prop_assert_eq!(decoded.fields, fields);
    }

    /// The subject of a single-transaction envelope is that transaction,
    /// in every envelope flavour.
    #[test]
    fn single_tx_envelope_subject(tx in arb_transaction(), v2 in any::<bool>(), atomic in any::<bool>()) {
        let beef = Beef {
            version: if v2 { BeefVersion::V2 } else { BeefVersion::V1 },
            bumps: Vec::new(),
            txs: vec![BeefTx::full(tx.clone(), None)],
            atomic_txid: if atomic { Some(tx.id()) } else { None },
        };
        let bytes = beef.to_bytes().unwrap();
        prop_assert_eq!(transaction_from_beef(&bytes).unwrap(), tx);
    }
}
