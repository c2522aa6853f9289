//! Descriptive metadata that services expose to overlay hosts.

use serde::{Deserialize, Serialize};

/// Metadata shown by hosts when listing topic managers and lookup services.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMetadata {
    pub name: String,
    pub short_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "iconURL")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "informationURL")]
    pub information_url: Option<String>,
}

impl ServiceMetadata {
    pub fn new(name: impl Into<String>, short_description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_description: short_description.into(),
            icon_url: None,
            version: None,
            information_url: None,
        }
    }
}
