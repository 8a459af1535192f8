use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use rewind_models::{DateRange, DiaryEntry, EntryKind};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::error::SourceError;

/// Row of the movie diary table
#[derive(Debug, Deserialize)]
pub(crate) struct MovieDiaryRow {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    user_id: String,
    movie_id: u32,
    #[serde(alias = "title")]
    movie_title: String,
    poster_path: Option<String>,
    watched_date: NaiveDate,
    rating: Option<f32>,
    notes: Option<String>,
    #[serde(alias = "runtime_minutes")]
    runtime: Option<u32>,
    #[serde(default)]
    genres: Option<Vec<String>>,
    created_at: Option<DateTime<Utc>>,
}

/// Row of the TV diary table; one row per watched episode
#[derive(Debug, Deserialize)]
pub(crate) struct TvDiaryRow {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    user_id: String,
    #[serde(alias = "show_id")]
    tv_id: u32,
    #[serde(alias = "show_name")]
    tv_name: String,
    poster_path: Option<String>,
    season_number: Option<u32>,
    episode_number: Option<u32>,
    watched_date: NaiveDate,
    rating: Option<f32>,
    notes: Option<String>,
    #[serde(alias = "runtime_minutes")]
    runtime: Option<u32>,
    #[serde(default)]
    genres: Option<Vec<String>>,
    created_at: Option<DateTime<Utc>>,
}

impl From<MovieDiaryRow> for DiaryEntry {
    fn from(row: MovieDiaryRow) -> Self {
        DiaryEntry {
            id: row.id,
            user_id: row.user_id,
            media_id: row.movie_id,
            media_title: row.movie_title,
            poster: row.poster_path,
            watched_date: row.watched_date,
            rating: row.rating,
            notes: row.notes,
            runtime_minutes: row.runtime.filter(|m| *m > 0),
            kind: EntryKind::Movie,
            genres: row.genres.unwrap_or_default(),
            created_at: row.created_at,
        }
    }
}

impl From<TvDiaryRow> for DiaryEntry {
    fn from(row: TvDiaryRow) -> Self {
        DiaryEntry {
            id: row.id,
            user_id: row.user_id,
            media_id: row.tv_id,
            media_title: row.tv_name,
            poster: row.poster_path,
            watched_date: row.watched_date,
            rating: row.rating,
            notes: row.notes,
            runtime_minutes: row.runtime.filter(|m| *m > 0),
            kind: EntryKind::Episode {
                season: row.season_number.unwrap_or(0),
                episode: row.episode_number.unwrap_or(0),
            },
            genres: row.genres.unwrap_or_default(),
            created_at: row.created_at,
        }
    }
}

/// Ids come back as bigint or uuid depending on the table
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

/// PostgREST filter parameters for one user's rows within `range`.
///
/// All-time ranges omit the lower bound entirely.
pub(crate) fn diary_query(user_id: &str, range: &DateRange) -> Vec<(String, String)> {
    let mut params = vec![
        ("select".to_string(), "*".to_string()),
        ("user_id".to_string(), format!("eq.{}", user_id)),
    ];
    if let Some(from) = range.from {
        params.push(("watched_date".to_string(), format!("gte.{}", from.format("%Y-%m-%d"))));
    }
    params.push(("watched_date".to_string(), format!("lte.{}", range.to.format("%Y-%m-%d"))));
    params.push(("order".to_string(), "watched_date.asc,id.asc".to_string()));
    params
}

/// Rows requested per page; hosted backends cap responses at this size
pub(crate) const PAGE_SIZE: usize = 1000;

/// Total row count from a `Content-Range` header such as `0-999/2345` or `*/0`
pub(crate) fn content_range_total(value: &str) -> Option<usize> {
    let (_, total) = value.rsplit_once('/')?;
    total.trim().parse().ok()
}

/// GET one table page by page and decode every row
pub(crate) async fn fetch_table<T: DeserializeOwned>(
    client: &Client,
    base_url: &str,
    table: &str,
    anon_key: &str,
    access_token: &str,
    params: &[(String, String)],
) -> Result<Vec<T>, SourceError> {
    let url = format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table);
    let mut all_rows = Vec::new();
    let mut offset = 0usize;

    loop {
        debug!("Fetching {} rows from {} at offset {}", table, url, offset);

        let response = client
            .get(&url)
            .query(params)
            .query(&[("limit", PAGE_SIZE.to_string()), ("offset", offset.to_string())])
            .header("apikey", anon_key)
            .header("Authorization", format!("Bearer {}", access_token))
            .header("Accept", "application/json")
            .header("Prefer", "count=exact")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::from_status(table, response.status()));
        }

        let total = response
            .headers()
            .get("Content-Range")
            .and_then(|h| h.to_str().ok())
            .and_then(content_range_total);

        let body = response.text().await?;
        let rows = serde_json::from_str::<Vec<T>>(&body).map_err(|e| SourceError::decode(table, e))?;
        let page_len = rows.len();
        offset += page_len;
        all_rows.extend(rows);

        let done = match total {
            Some(total) => offset >= total,
            None => page_len < PAGE_SIZE,
        };
        if page_len == 0 || done {
            break;
        }
    }

    debug!("Fetched {} rows from {}", all_rows.len(), table);
    Ok(all_rows)
}
