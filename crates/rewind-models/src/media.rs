use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Movie,
    Tv,
}

/// Key for metadata lookups: provider id plus whether it names a movie or a show
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MediaRef {
    pub media_id: u32,
    pub kind: MediaKind,
}

impl MediaRef {
    pub fn movie(media_id: u32) -> Self {
        Self { media_id, kind: MediaKind::Movie }
    }

    pub fn tv(media_id: u32) -> Self {
        Self { media_id, kind: MediaKind::Tv }
    }
}

/// Title metadata returned by the metadata provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaDetails {
    pub media: MediaRef,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_minutes: Option<u32>,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Cast names in billing order
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub directors: Vec<String>,
}
