use crate::error::SourceError;
use crate::http::build_client;
use crate::realdebrid::api;
use crate::traits::HistoryProvider;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::info;
use watchlog_models::HistoryRecord;

pub struct RealDebridClient {
    client: Client,
    base_url: String,
    token: String,
}

impl RealDebridClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into(),
            token: token.into(),
        })
    }
}

impl HistoryProvider for RealDebridClient {
    fn provider_name(&self) -> &str {
        "realdebrid"
    }

    fn fetch_history(&self, limit: usize) -> Result<Vec<HistoryRecord>, SourceError> {
        let records = api::get_downloads(&self.client, &self.base_url, &self.token, limit)?;
        info!("Fetched {} download records from Real-Debrid", records.len());
        Ok(records)
    }
}
