use crate::error::SourceError;
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

const USER_AGENT: &str = concat!("watchlog/", env!("CARGO_PKG_VERSION"));

/// Longest slice of an error body kept in a [`SourceError::Status`].
const MAX_ERROR_BODY: usize = 200;

pub fn build_client(timeout: Duration) -> Result<Client, SourceError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(SourceError::Client)
}

/// Reads a response body, turning non-success statuses into errors.
///
/// Returns `None` for `204 No Content` and for empty bodies.
pub fn read_body(response: Response, endpoint: &str) -> Result<Option<String>, SourceError> {
    let status = response.status();
    let body = response.text().map_err(|source| SourceError::Transport {
        endpoint: endpoint.to_string(),
        source,
    })?;

    if !status.is_success() {
        let mut body = body.trim().to_string();
        if body.len() > MAX_ERROR_BODY {
            let cut = (0..=MAX_ERROR_BODY).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
            body.truncate(cut);
        }
        return Err(SourceError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    if status == reqwest::StatusCode::NO_CONTENT || body.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(body))
}

pub fn decode<T: DeserializeOwned>(body: &str, endpoint: &str) -> Result<T, SourceError> {
    serde_json::from_str(body).map_err(|source| SourceError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

pub fn transport(endpoint: &str) -> impl FnOnce(reqwest::Error) -> SourceError + '_ {
    move |source| SourceError::Transport {
        endpoint: endpoint.to_string(),
        source,
    }
}
