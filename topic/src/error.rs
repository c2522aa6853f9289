use overlay_transactions::EnvelopeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopicError {
    #[error("cannot decode submitted transaction: {0}")]
    Envelope(#[from] EnvelopeError),
}
