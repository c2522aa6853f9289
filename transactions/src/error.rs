use overlay_types::TxId;
use thiserror::Error;

/// Failure to decode a transaction or a BEEF envelope.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("unexpected end of data at byte {0}")]
    UnexpectedEnd(usize),

    #[error("{0} trailing bytes after envelope")]
    TrailingData(usize),

    #[error("unknown BEEF version 0x{0:08x}")]
    UnknownVersion(u32),

    #[error("unknown transaction format byte {0}")]
    InvalidTxFormat(u8),

    #[error("bump index {index} out of range ({count} bumps)")]
    BumpIndexOutOfRange { index: u64, count: usize },

    #[error("invalid merkle path: {0}")]
    InvalidBump(String),

    #[error("merkle path {index} does not contain transaction {txid}")]
    BumpMissingTxid { txid: TxId, index: usize },

    #[error("envelope contains no transactions")]
    NoTransactions,

    #[error("subject transaction {0} is not in the envelope")]
    SubjectMissing(TxId),

    #[error("subject transaction {0} is present only as a txid")]
    SubjectIsTxidOnly(TxId),

    #[error("BEEF V1 cannot carry txid-only entries")]
    TxidOnlyInV1,

    #[error("length {0} does not fit in memory")]
    LengthOverflow(u64),
}

/// Failure to decode a locking script.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("push at byte {position} runs past the end of the script")]
    TruncatedPush { position: usize },

    #[error("script is empty")]
    Empty,

    #[error("first chunk is not a public key")]
    MissingPublicKey,

    #[error("field {index} is opcode 0x{opcode:02x}, not a push")]
    NonPushField { index: usize, opcode: u8 },
}
