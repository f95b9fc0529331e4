use crate::MediaType;
use serde::{Deserialize, Serialize};

/// Titles shorter than this are too ambiguous to search for.
pub const MIN_TITLE_LEN: usize = 2;

/// Search string derived from a download filename.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NormalizedTitle {
    pub title: String,
    pub year: Option<u32>,
    pub is_episodic: bool,
}

impl NormalizedTitle {
    pub fn is_searchable(&self) -> bool {
        self.title.chars().count() >= MIN_TITLE_LEN
    }

    pub fn media_type(&self) -> MediaType {
        MediaType::from_episodic(self.is_episodic)
    }
}
