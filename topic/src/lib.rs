//! Template topic manager.
//!
//! Decides which outputs of a submitted transaction belong in the topic.
//! This template admits every output whose locking script is a PushDrop
//! carrying more than one field (an adventure record, GPX track or photo)
//! and skips everything else, such as change outputs.

pub mod classifier;
pub mod error;
pub mod manager;

pub use classifier::{AdmissionClassifier, FieldDecoder, PushDropDecoder, MIN_ADMISSIBLE_FIELDS};
pub use error::TopicError;
pub use manager::{TemplateTopicManager, TopicManager};
