#![no_main]

use libfuzzer_sys::fuzz_target;
use overlay_topic::AdmissionClassifier;
use overlay_transactions::PushDrop;

fuzz_target!(|data: &[u8]| {
    let decoded = PushDrop::decode(data);
    let admissible = AdmissionClassifier::new().is_admissible(data);

    // The classifier admits exactly the multi-field PushDrops.
    let expected = matches!(&decoded, Ok(pd) if pd.fields.len() >= 2);
    assert_eq!(admissible, expected);
});
