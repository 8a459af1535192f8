use reqwest::Client;
use rewind_models::{MediaDetails, MediaKind, MediaRef};
use serde::Deserialize;
use tracing::debug;

use crate::error::SourceError;

#[derive(Debug, Deserialize)]
struct Genre {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CastMember {
    name: String,
    #[serde(default)]
    order: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CrewMember {
    name: String,
    #[serde(default)]
    job: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct Credits {
    #[serde(default)]
    cast: Vec<CastMember>,
    #[serde(default)]
    crew: Vec<CrewMember>,
}

#[derive(Debug, Deserialize)]
struct Creator {
    name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MovieResponse {
    title: String,
    poster_path: Option<String>,
    runtime: Option<u32>,
    #[serde(default)]
    genres: Vec<Genre>,
    #[serde(default)]
    credits: Option<Credits>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TvResponse {
    name: String,
    poster_path: Option<String>,
    #[serde(default)]
    episode_run_time: Vec<u32>,
    #[serde(default)]
    genres: Vec<Genre>,
    #[serde(default)]
    created_by: Vec<Creator>,
    #[serde(default)]
    credits: Option<Credits>,
}

fn cast_in_billing_order(credits: &Credits) -> Vec<String> {
    let mut cast: Vec<&CastMember> = credits.cast.iter().collect();
    // Stable sort keeps response order for members without a billing slot
    cast.sort_by_key(|member| member.order.unwrap_or(u32::MAX));
    cast.into_iter().map(|member| member.name.clone()).collect()
}

fn directors(credits: &Credits) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for member in &credits.crew {
        if member.job.as_deref() == Some("Director") && !names.contains(&member.name) {
            names.push(member.name.clone());
        }
    }
    names
}

impl MovieResponse {
    pub(crate) fn into_details(self, media_id: u32) -> MediaDetails {
        let credits = self.credits.unwrap_or_default();
        MediaDetails {
            media: MediaRef::movie(media_id),
            title: self.title,
            poster_path: self.poster_path,
            runtime_minutes: self.runtime.filter(|m| *m > 0),
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            cast: cast_in_billing_order(&credits),
            directors: directors(&credits),
        }
    }
}

impl TvResponse {
    pub(crate) fn into_details(self, media_id: u32) -> MediaDetails {
        let credits = self.credits.unwrap_or_default();
        // Shows rarely credit a single director; creators stand in for them
        let mut directors = directors(&credits);
        if directors.is_empty() {
            directors = self.created_by.into_iter().map(|c| c.name).collect();
        }
        MediaDetails {
            media: MediaRef::tv(media_id),
            title: self.name,
            poster_path: self.poster_path,
            runtime_minutes: self.episode_run_time.first().copied().filter(|m| *m > 0),
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            cast: cast_in_billing_order(&credits),
            directors,
        }
    }
}

pub(crate) async fn get_details(
    client: &Client,
    base_url: &str,
    token: &str,
    media: MediaRef,
) -> Result<MediaDetails, SourceError> {
    let segment = match media.kind {
        MediaKind::Movie => "movie",
        MediaKind::Tv => "tv",
    };
    let url = format!("{}/{}/{}", base_url.trim_end_matches('/'), segment, media.media_id);
    let context = format!("{} {}", segment, media.media_id);
    debug!("Looking up metadata for {}", context);

    let response = client
        .get(&url)
        .query(&[("append_to_response", "credits")])
        .header("Authorization", format!("Bearer {}", token))
        .header("Accept", "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(SourceError::from_status(context, response.status()));
    }

    let body = response.text().await?;
    match media.kind {
        MediaKind::Movie => serde_json::from_str::<MovieResponse>(&body)
            .map(|r| r.into_details(media.media_id))
            .map_err(|e| SourceError::decode(context, e)),
        MediaKind::Tv => serde_json::from_str::<TvResponse>(&body)
            .map(|r| r.into_details(media.media_id))
            .map_err(|e| SourceError::decode(context, e)),
    }
}
