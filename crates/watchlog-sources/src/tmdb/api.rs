use crate::error::SourceError;
use crate::http::{decode, read_body, transport};
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use watchlog_models::{MediaType, SearchCandidate};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: u64,
    #[serde(alias = "name")]
    title: Option<String>,
    #[serde(alias = "first_air_date")]
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExternalIds {
    imdb_id: Option<String>,
}

/// TMDB accepts either a v3 API key (query parameter) or a v4 read access
/// token (bearer header). Access tokens are JWTs and start with `eyJ`.
#[derive(Clone)]
pub enum TmdbAuth {
    ApiKey(String),
    AccessToken(String),
}

impl TmdbAuth {
    pub fn from_credential(credential: &str) -> Self {
        if credential.starts_with("eyJ") {
            TmdbAuth::AccessToken(credential.to_string())
        } else {
            TmdbAuth::ApiKey(credential.to_string())
        }
    }

    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            TmdbAuth::ApiKey(key) => request.query(&[("api_key", key.as_str())]),
            TmdbAuth::AccessToken(token) => request.bearer_auth(token),
        }
    }
}

pub fn search_endpoint(media_type: MediaType) -> &'static str {
    match media_type {
        MediaType::Movie => "/search/movie",
        MediaType::Show => "/search/tv",
    }
}

pub fn external_ids_endpoint(media_type: MediaType, tmdb_id: u64) -> String {
    match media_type {
        MediaType::Movie => format!("/movie/{}/external_ids", tmdb_id),
        MediaType::Show => format!("/tv/{}/external_ids", tmdb_id),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn search(
    client: &Client,
    base_url: &str,
    auth: &TmdbAuth,
    media_type: MediaType,
    title: &str,
    year: Option<u32>,
    language: &str,
    include_adult: bool,
) -> Result<Vec<SearchCandidate>, SourceError> {
    let endpoint = search_endpoint(media_type);
    let url = format!("{}{}", base_url.trim_end_matches('/'), endpoint);

    let mut params: Vec<(&str, String)> = vec![
        ("query", title.to_string()),
        ("include_adult", include_adult.to_string()),
        ("language", language.to_string()),
    ];
    // Show searches match on title only.
    if let (MediaType::Movie, Some(year)) = (media_type, year) {
        params.push(("year", year.to_string()));
    }

    let request = auth.apply(client.get(&url).query(&params));
    let response = request.send().map_err(transport(endpoint))?;
    match read_body(response, endpoint)? {
        Some(body) => parse_search(&body, media_type),
        None => Ok(Vec::new()),
    }
}

pub fn external_imdb_id(
    client: &Client,
    base_url: &str,
    auth: &TmdbAuth,
    media_type: MediaType,
    tmdb_id: u64,
) -> Result<Option<String>, SourceError> {
    let endpoint = external_ids_endpoint(media_type, tmdb_id);
    let url = format!("{}{}", base_url.trim_end_matches('/'), endpoint);

    let response = auth.apply(client.get(&url)).send().map_err(transport(&endpoint))?;
    match read_body(response, &endpoint)? {
        Some(body) => parse_external_ids(&body, &endpoint),
        None => Ok(None),
    }
}

pub fn parse_search(body: &str, media_type: MediaType) -> Result<Vec<SearchCandidate>, SourceError> {
    let response: SearchResponse = decode(body, search_endpoint(media_type))?;
    Ok(response
        .results
        .into_iter()
        .map(|item| SearchCandidate {
            tmdb_id: item.id,
            title: item.title.unwrap_or_default(),
            year: item.release_date.as_deref().and_then(year_from_date),
            media_type,
        })
        .collect())
}

pub fn parse_external_ids(body: &str, endpoint: &str) -> Result<Option<String>, SourceError> {
    let ids: ExternalIds = decode(body, endpoint)?;
    Ok(normalize_imdb_id(ids.imdb_id))
}

/// Blank ids count as absent; ids missing the `tt` prefix get it.
pub fn normalize_imdb_id(raw: Option<String>) -> Option<String> {
    let raw = raw?;
    let id = raw.trim();
    if id.is_empty() {
        None
    } else if id.starts_with("tt") {
        Some(id.to_string())
    } else {
        Some(format!("tt{}", id))
    }
}

fn year_from_date(date: &str) -> Option<u32> {
    date.get(..4)?.parse().ok()
}
