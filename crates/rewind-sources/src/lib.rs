pub mod traits;
pub mod backend;
pub mod tmdb;
pub mod cache;
pub mod file;
pub mod error;

pub use traits::{DiaryRepository, MetadataProvider};
pub use backend::BackendClient;
pub use tmdb::TmdbClient;
pub use cache::{MetadataCache, MetadataCacheConfig};
pub use file::FileDiaryRepository;
pub use error::SourceError;
