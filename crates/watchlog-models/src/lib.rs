pub mod history;
pub mod import;
pub mod media;
pub mod title;

pub use history::{HistoryRecord, RawTimestamp};
pub use import::ImportEntry;
pub use media::{MediaType, ResolvedMedia, SearchCandidate};
pub use title::{NormalizedTitle, MIN_TITLE_LEN};
