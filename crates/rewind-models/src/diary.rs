use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::media::{MediaKind, MediaRef};

/// A single "I watched this on that day" record from a user's diary.
///
/// Movie and TV entries share one shape; the TV-only season/episode numbers
/// live in [`EntryKind::Episode`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiaryEntry {
    pub id: String,
    pub user_id: String,
    pub media_id: u32, // Metadata provider id (show id for episodes)
    pub media_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    pub watched_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>, // 0-10
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_minutes: Option<u32>,
    pub kind: EntryKind,
    /// Genre names cached on the row when the entry was logged
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    /// When the row was written; drives the time-of-day histogram
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Movie,
    Episode { season: u32, episode: u32 },
}

impl DiaryEntry {
    pub fn is_movie(&self) -> bool {
        matches!(self.kind, EntryKind::Movie)
    }

    pub fn is_episode(&self) -> bool {
        matches!(self.kind, EntryKind::Episode { .. })
    }

    /// Reference used for metadata lookups (episodes resolve to their show)
    pub fn media_ref(&self) -> MediaRef {
        let kind = match self.kind {
            EntryKind::Movie => MediaKind::Movie,
            EntryKind::Episode { .. } => MediaKind::Tv,
        };
        MediaRef { media_id: self.media_id, kind }
    }

    /// Rating clamped into the 0-10 scale, if the entry was rated
    pub fn normalized_rating(&self) -> Option<f32> {
        self.rating
            .filter(|r| r.is_finite())
            .map(|r| r.clamp(0.0, 10.0))
    }
}

/// Order entries by watched date, then id (numeric ids compare numerically).
///
/// Aggregation breaks ties by first occurrence, so every fetch path sorts with
/// this before handing rows over.
pub fn sort_chronologically(entries: &mut [DiaryEntry]) {
    entries.sort_by(|a, b| {
        a.watched_date
            .cmp(&b.watched_date)
            .then_with(|| match (a.id.parse::<u64>(), b.id.parse::<u64>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => a.id.cmp(&b.id),
            })
    });
}
