//! Transaction decoding for overlay services.
//!
//! - **Raw transactions**: the standard wire serialization
//! - **BEEF envelopes** (V1, V2 and Atomic BEEF): a subject transaction
//!   bundled with its ancestors and merkle paths
//! - **Merkle paths** (BUMP): parsed and bounds-checked, not verified
//! - **Scripts**: chunk parsing and PushDrop field extraction
//!
//! Decoding here is purely structural. Script execution, signature checks
//! and SPV verification are the overlay host's job.

pub mod beef;
pub mod bump;
pub mod codec;
pub mod error;
pub mod pushdrop;
pub mod script;
pub mod transaction;

pub use beef::{Beef, BeefTx, BeefVersion};
pub use bump::{MerklePath, PathLeaf};
pub use error::{EnvelopeError, ScriptError};
pub use pushdrop::PushDrop;
pub use script::{Chunk, Opcode};
pub use transaction::{Transaction, TxInput, TxOutput};

/// Decode a BEEF or Atomic BEEF envelope and return its subject transaction.
pub fn transaction_from_beef(bytes: &[u8]) -> Result<Transaction, EnvelopeError> {
    let beef = Beef::from_bytes(bytes)?;
    beef.into_subject()
}
