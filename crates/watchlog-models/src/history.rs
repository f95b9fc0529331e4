use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Timestamp as the hosting provider emits it.
///
/// Current API versions send ISO-8601 strings; older exports carry Unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RawTimestamp {
    Text(String),
    Epoch(i64),
}

/// One download event from the hosting provider's history.
///
/// Fields the generator does not need are kept in `extra` so that a record
/// serializes back to the payload it was read from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default, alias = "bytes", skip_serializing_if = "Option::is_none")]
    pub filesize: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated: Option<RawTimestamp>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HistoryRecord {
    pub fn new(id: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            filename: filename.into(),
            filesize: None,
            status: None,
            generated: None,
            extra: Map::new(),
        }
    }

    pub fn with_generated(mut self, generated: impl Into<String>) -> Self {
        self.generated = Some(RawTimestamp::Text(generated.into()));
        self
    }

    /// Size in bytes, zero when the provider omitted it.
    pub fn size_bytes(&self) -> u64 {
        self.filesize.unwrap_or(0)
    }

    pub fn status_or_unknown(&self) -> &str {
        self.status.as_deref().unwrap_or("Unknown")
    }
}
