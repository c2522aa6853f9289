#![no_main]

use libfuzzer_sys::fuzz_target;
use overlay_topic::{TemplateTopicManager, TopicManager};
use overlay_transactions::{transaction_from_beef, Beef};

// Arbitrary bytes must never panic the envelope decoder or the classifier.
fuzz_target!(|data: &[u8]| {
    if let Ok(beef) = Beef::from_bytes(data) {
        let _ = beef.subject_txid();
        if let Ok(encoded) = beef.to_bytes() {
            let _ = Beef::from_bytes(&encoded);
        }
    }

    let _ = transaction_from_beef(data);
    let _ = TemplateTopicManager::new().identify_admissible_outputs(data, &[]);
});
