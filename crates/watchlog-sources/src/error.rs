use thiserror::Error;

/// Failure of a single provider call. Callers decide whether it is fatal.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl SourceError {
    /// Short label used when grouping failures in run summaries.
    pub fn category(&self) -> &'static str {
        match self {
            SourceError::Transport { .. } => "transport",
            SourceError::Status { status: 401 | 403, .. } => "unauthorized",
            SourceError::Status { status: 429, .. } => "rate_limited",
            SourceError::Status { .. } => "http_status",
            SourceError::Decode { .. } => "decode",
            SourceError::Client(_) => "client",
        }
    }
}
