//! Template lookup service.
//!
//! Keeps an index of the outputs a topic admitted, keyed by outpoint, and
//! answers the host's lookup queries from it. The index is a projection of
//! ledger state: admission adds a record, spend and eviction remove it.

pub mod error;
pub mod notification;
pub mod query;
pub mod service;

pub use error::LookupError;
pub use notification::{AdmissionPayload, OutputAdmittedByTopic, OutputSpent};
pub use query::{LookupAnswer, LookupQuestion, TemplateQuery, SERVICE_NAME};
pub use service::{service_metadata, LookupService, TemplateLookupService, DOCUMENTATION};
