use async_trait::async_trait;
use rewind_config::UserSession;
use rewind_models::{sort_chronologically, DateRange, DiaryEntry};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::SourceError;
use crate::traits::DiaryRepository;

/// Diary rows read from a JSON export (an array of entries).
///
/// Used for offline summaries; rows belonging to other users are skipped when
/// the session names a user.
pub struct FileDiaryRepository {
    path: PathBuf,
}

impl FileDiaryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl DiaryRepository for FileDiaryRepository {
    fn source_name(&self) -> &str {
        "file"
    }

    async fn fetch_entries(
        &self,
        session: &UserSession,
        range: DateRange,
    ) -> Result<Vec<DiaryEntry>, SourceError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let all: Vec<DiaryEntry> = serde_json::from_str(&content)
            .map_err(|e| SourceError::decode(self.path.display().to_string(), e))?;
        debug!("Loaded {} diary entries from {}", all.len(), self.path.display());

        let user = session.user_id.trim();
        let mut entries: Vec<DiaryEntry> = all
            .into_iter()
            .filter(|entry| user.is_empty() || entry.user_id == user)
            .filter(|entry| range.contains(entry.watched_date))
            .collect();
        sort_chronologically(&mut entries);

        info!("{} entries in range from {}", entries.len(), self.path.display());
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rewind_models::EntryKind;

    fn entry(id: &str, user: &str, date: (i32, u32, u32)) -> DiaryEntry {
        DiaryEntry {
            id: id.to_string(),
            user_id: user.to_string(),
            media_id: 1,
            media_title: format!("Movie {}", id),
            poster: None,
            watched_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            rating: None,
            notes: None,
            runtime_minutes: None,
            kind: EntryKind::Movie,
            genres: Vec::new(),
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_file_repository_filters_user_and_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diary.json");
        let entries = vec![
            entry("3", "me", (2024, 3, 20)),
            entry("1", "me", (2024, 3, 2)),
            entry("2", "someone-else", (2024, 3, 5)),
            entry("4", "me", (2024, 2, 27)),
        ];
        std::fs::write(&path, serde_json::to_string(&entries).unwrap()).unwrap();

        let repo = FileDiaryRepository::new(path);
        let range = DateRange {
            from: NaiveDate::from_ymd_opt(2024, 3, 1),
            to: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        };
        let fetched = repo
            .fetch_entries(&UserSession::new("me", ""), range)
            .await
            .unwrap();
        let ids: Vec<&str> = fetched.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let repo = FileDiaryRepository::new(PathBuf::from("/definitely/not/here.json"));
        let range = DateRange {
            from: None,
            to: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        };
        let err = repo
            .fetch_entries(&UserSession::new("", ""), range)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }
}
