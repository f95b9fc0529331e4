use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the tracking service's bulk import file.
///
/// Exactly two fields; `watched_at` is always UTC with a `Z` suffix and
/// whole seconds, e.g. `2024-01-02T03:04:05Z`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportEntry {
    pub imdb_id: String,
    #[serde(with = "utc_seconds")]
    pub watched_at: DateTime<Utc>,
}

impl ImportEntry {
    pub fn new(imdb_id: impl Into<String>, watched_at: DateTime<Utc>) -> Self {
        Self {
            imdb_id: imdb_id.into(),
            watched_at,
        }
    }
}

mod utc_seconds {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
