//! Hashing primitives for overlay transaction ids.
//!
//! - **SHA-256** and **double SHA-256** over arbitrary bytes
//! - Transaction id derivation from a serialized raw transaction

pub mod hash;

pub use hash::{sha256, sha256d, txid_of};
