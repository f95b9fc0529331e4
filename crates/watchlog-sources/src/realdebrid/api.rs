use crate::error::SourceError;
use crate::http::{decode, read_body, transport};
use reqwest::blocking::Client;
use tracing::debug;
use watchlog_models::HistoryRecord;

pub const DOWNLOADS_ENDPOINT: &str = "/downloads";

/// `GET {base}/downloads?limit=N` with the account's bearer token.
pub fn get_downloads(
    client: &Client,
    base_url: &str,
    token: &str,
    limit: usize,
) -> Result<Vec<HistoryRecord>, SourceError> {
    let url = format!("{}{}", base_url.trim_end_matches('/'), DOWNLOADS_ENDPOINT);
    debug!("Requesting {} with limit {}", url, limit);

    let response = client
        .get(&url)
        .bearer_auth(token)
        .query(&[("limit", limit)])
        .send()
        .map_err(transport(DOWNLOADS_ENDPOINT))?;

    match read_body(response, DOWNLOADS_ENDPOINT)? {
        Some(body) => parse_downloads(&body),
        None => Ok(Vec::new()),
    }
}

pub fn parse_downloads(body: &str) -> Result<Vec<HistoryRecord>, SourceError> {
    decode(body, DOWNLOADS_ENDPOINT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use watchlog_models::RawTimestamp;

    const FIXTURE: &str = r#"[
        {
            "id": "QWERTY1",
            "filename": "Love.Island.US.S05E22.1080p.WEB.h264-EDITH[eztv.re].mkv",
            "mimeType": "video/x-matroska",
            "filesize": 1503238553,
            "link": "https://real-debrid.com/d/QWERTY1",
            "host": "real-debrid.com",
            "chunks": 16,
            "download": "https://sgp1.download.real-debrid.com/d/QWERTY1/file.mkv",
            "streamable": 1,
            "generated": "2023-08-10T21:15:02.000Z"
        },
        {
            "id": "QWERTY2",
            "filename": "The.Matrix.1999.1080p.BluRay.x264-GROUP.mkv",
            "filesize": 8589934592,
            "generated": "2024-01-02T03:04:05.000Z"
        }
    ]"#;

    #[test]
    fn test_parse_downloads_fixture() {
        let records = parse_downloads(FIXTURE).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "QWERTY1");
        assert_eq!(records[0].filesize, Some(1_503_238_553));
        assert_eq!(records[0].extra.get("streamable"), Some(&serde_json::json!(1)));
        assert_eq!(
            records[1].generated,
            Some(RawTimestamp::Text("2024-01-02T03:04:05.000Z".into()))
        );
    }

    #[test]
    fn test_parse_downloads_rejects_object() {
        let err = parse_downloads(r#"{"error":"bad_token","error_code":8}"#).unwrap_err();
        assert!(matches!(err, SourceError::Decode { .. }));
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_downloads("[]").unwrap().is_empty());
    }
}
