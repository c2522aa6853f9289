//! The host's generic lookup protocol and this service's queries.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use overlay_types::{Outpoint, UtxoReference};

use crate::LookupError;

/// The service selector this lookup service answers to.
pub const SERVICE_NAME: &str = "ls_template";

/// A lookup request routed by the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LookupQuestion {
    pub service: String,
    #[serde(default)]
    pub query: Value,
}

impl LookupQuestion {
    pub fn new(service: impl Into<String>, query: Value) -> Self {
        Self {
            service: service.into(),
            query,
        }
    }
}

/// A lookup result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum LookupAnswer {
    /// The matching outputs, ready to return.
    OutputList { outputs: Vec<UtxoReference> },
    /// Outpoints the host should resolve itself.
    Formula { outpoints: Vec<Outpoint> },
}

/// Queries understood by the template service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateQuery {
    FindAll,
}

impl TemplateQuery {
    /// Validate `question` and pick the query it asks for.
    ///
    /// The query body is checked first, then the service selector, then the
    /// query name. Accepts `"findAll"` or `{"type": "findAll"}`.
    pub fn parse(question: &LookupQuestion) -> Result<Self, LookupError> {
        if is_empty_query(&question.query) {
            return Err(LookupError::InvalidQuery);
        }
        if question.service != SERVICE_NAME {
            return Err(LookupError::UnsupportedService(question.service.clone()));
        }
        let name = match &question.query {
            Value::String(name) => Some(name.as_str()),
            Value::Object(map) => map.get("type").and_then(Value::as_str),
            _ => None,
        };
        match name {
            Some("findAll") => Ok(Self::FindAll),
            _ => Err(LookupError::UnsupportedQuery(question.query.to_string())),
        }
    }
}

fn is_empty_query(query: &Value) -> bool {
    match query {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
    }
}
