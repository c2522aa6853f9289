//! Lookup service error types.

use overlay_store::StoreError;
use overlay_transactions::EnvelopeError;
use overlay_types::Outpoint;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("a valid query must be provided")]
    InvalidQuery,

    #[error("lookup service not supported: {0}")]
    UnsupportedService(String),

    #[error("unknown query type: {0}")]
    UnsupportedQuery(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("cannot decode admitted transaction: {0}")]
    Envelope(#[from] EnvelopeError),

    #[error("{outpoint} does not exist: transaction has {outputs} outputs")]
    OutputOutOfRange { outpoint: Outpoint, outputs: usize },
}
