use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of title being resolved. Episodic filenames resolve as shows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MediaType {
    Movie,
    Show,
}

impl MediaType {
    pub fn from_episodic(is_episodic: bool) -> Self {
        if is_episodic {
            MediaType::Show
        } else {
            MediaType::Movie
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Show => "show",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A search hit from the metadata provider, in the provider's ranking order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchCandidate {
    pub tmdb_id: u64,
    pub title: String,
    pub year: Option<u32>,
    pub media_type: MediaType,
}

/// A title matched to its canonical external identifier.
///
/// Stored in the lookup cache, so every field is always serialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedMedia {
    pub imdb_id: String,
    pub tmdb_id: u64,
    pub title: String,
    pub year: Option<u32>,
    pub media_type: MediaType,
}
