pub mod error;
pub mod http;
pub mod realdebrid;
pub mod tmdb;
pub mod traits;

pub use error::SourceError;
pub use realdebrid::RealDebridClient;
pub use tmdb::{TmdbClient, TmdbSettings};
pub use traits::{HistoryProvider, MetadataProvider, SearchQuery};
