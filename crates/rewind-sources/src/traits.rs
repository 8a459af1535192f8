use async_trait::async_trait;
use rewind_config::UserSession;
use rewind_models::{DateRange, DiaryEntry, MediaDetails, MediaRef};

use crate::error::SourceError;

/// Read side of the diary store: "rows for user X within date range Y"
#[async_trait]
pub trait DiaryRepository: Send + Sync {
    fn source_name(&self) -> &str;

    /// All movie and TV entries for the session's user whose watched date falls
    /// inside `range`, ordered by watched date then id.
    async fn fetch_entries(
        &self,
        session: &UserSession,
        range: DateRange,
    ) -> Result<Vec<DiaryEntry>, SourceError>;
}

/// Read-only title lookups by numeric media id
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn details(&self, media: MediaRef) -> Result<MediaDetails, SourceError>;
}
