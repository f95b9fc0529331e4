use crate::error::SourceError;
use crate::http::build_client;
use crate::tmdb::api::{self, TmdbAuth};
use crate::traits::{MetadataProvider, SearchQuery};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;
use watchlog_models::{MediaType, SearchCandidate};

#[derive(Debug, Clone)]
pub struct TmdbSettings {
    pub base_url: String,
    pub language: String,
    pub include_adult: bool,
    pub timeout: Duration,
}

pub struct TmdbClient {
    client: Client,
    auth: TmdbAuth,
    settings: TmdbSettings,
}

impl TmdbClient {
    pub fn new(credential: &str, settings: TmdbSettings) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(settings.timeout)?,
            auth: TmdbAuth::from_credential(credential),
            settings,
        })
    }
}

impl MetadataProvider for TmdbClient {
    fn provider_name(&self) -> &str {
        "tmdb"
    }

    fn search(&self, query: &SearchQuery) -> Result<Vec<SearchCandidate>, SourceError> {
        let candidates = api::search(
            &self.client,
            &self.settings.base_url,
            &self.auth,
            query.media_type,
            &query.title,
            query.year,
            &self.settings.language,
            self.settings.include_adult,
        )?;
        debug!(
            "TMDB {} search for '{}' ({:?}): {} results",
            query.media_type,
            query.title,
            query.year,
            candidates.len()
        );
        Ok(candidates)
    }

    fn imdb_id(&self, media_type: MediaType, tmdb_id: u64) -> Result<Option<String>, SourceError> {
        api::external_imdb_id(&self.client, &self.settings.base_url, &self.auth, media_type, tmdb_id)
    }
}
