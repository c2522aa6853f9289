//! SHA-256 hashing for transaction ids.

use overlay_types::TxId;
use sha2::{Digest, Sha256};

/// Compute a single SHA-256 of arbitrary data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut output = [0u8; 32];
    output.copy_from_slice(&Sha256::digest(data));
    output
}

/// Compute SHA-256(SHA-256(data)).
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Transaction id of a serialized raw transaction.
pub fn txid_of(raw_tx: &[u8]) -> TxId {
    TxId::from_wire_hash(sha256d(raw_tx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_abc_vector() {
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn sha256d_empty_vector() {
        assert_eq!(
            hex::encode(sha256d(b"")),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
    }

    #[test]
    fn txid_is_reversed_hash() {
        let raw = b"not really a transaction";
        let hash = sha256d(raw);
        let txid = txid_of(raw);
        assert_eq!(txid.to_wire_hash(), hash);
        assert_eq!(txid.as_bytes()[0], hash[31]);
    }
}
