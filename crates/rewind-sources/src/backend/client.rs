use async_trait::async_trait;
use reqwest::Client;
use rewind_config::{BackendConfig, UserSession};
use rewind_models::{sort_chronologically, DateRange, DiaryEntry};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::backend::api::{self, MovieDiaryRow, TvDiaryRow};
use crate::error::SourceError;
use crate::traits::DiaryRepository;

/// Diary reads against the hosted backend's REST interface
#[derive(Clone)]
pub struct BackendClient {
    client: Arc<Client>,
    base_url: String,
    anon_key: String,
    movie_table: String,
    tv_table: String,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(concat!("rewind/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: config.url.clone(),
            anon_key: config.anon_key.clone(),
            movie_table: config.movie_table.clone(),
            tv_table: config.tv_table.clone(),
        })
    }
}

#[async_trait]
impl DiaryRepository for BackendClient {
    fn source_name(&self) -> &str {
        "backend"
    }

    async fn fetch_entries(
        &self,
        session: &UserSession,
        range: DateRange,
    ) -> Result<Vec<DiaryEntry>, SourceError> {
        if !session.is_complete() {
            return Err(SourceError::Unauthenticated(
                "session has no user id or access token".to_string(),
            ));
        }

        let params = api::diary_query(&session.user_id, &range);

        // Both tables or nothing: a failure on either side fails the fetch
        let (movies, episodes) = futures::try_join!(
            api::fetch_table::<MovieDiaryRow>(
                &self.client,
                &self.base_url,
                &self.movie_table,
                &self.anon_key,
                &session.access_token,
                &params,
            ),
            api::fetch_table::<TvDiaryRow>(
                &self.client,
                &self.base_url,
                &self.tv_table,
                &self.anon_key,
                &session.access_token,
                &params,
            ),
        )?;

        info!(
            "Fetched {} movie and {} episode diary entries",
            movies.len(),
            episodes.len()
        );

        let mut entries: Vec<DiaryEntry> = movies
            .into_iter()
            .map(DiaryEntry::from)
            .chain(episodes.into_iter().map(DiaryEntry::from))
            .filter(|entry| range.contains(entry.watched_date))
            .collect();
        sort_chronologically(&mut entries);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> BackendClient {
        let config = BackendConfig {
            url: server.uri(),
            anon_key: "anon-key".to_string(),
            ..BackendConfig::default()
        };
        BackendClient::new(&config).unwrap()
    }

    fn march() -> DateRange {
        DateRange {
            from: NaiveDate::from_ymd_opt(2024, 3, 1),
            to: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_fetch_entries_merges_tables_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/movie_diary"))
            .and(query_param("user_id", "eq.user-1"))
            .and(query_param("watched_date", "gte.2024-03-01"))
            .and(header("apikey", "anon-key"))
            .and(header("Authorization", "Bearer token-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "id": 2, "user_id": "user-1", "movie_id": 603,
                    "movie_title": "The Matrix", "watched_date": "2024-03-05",
                    "rating": 9, "runtime": 136
                }
            ])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/tv_diary"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "id": 1, "user_id": "user-1", "tv_id": 1396,
                    "tv_name": "Breaking Bad", "season_number": 1,
                    "episode_number": 1, "watched_date": "2024-03-02"
                }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let session = UserSession::new("user-1", "token-1");
        let entries = client.fetch_entries(&session, march()).await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].media_title, "Breaking Bad");
        assert_eq!(entries[1].media_title, "The Matrix");
    }

    #[tokio::test]
    async fn test_fetch_entries_follows_pages_until_last_row() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/movie_diary"))
            .and(query_param("offset", "0"))
            .and(header("Prefer", "count=exact"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Range", "0-1/3")
                    .set_body_json(serde_json::json!([
                        {
                            "id": 1, "user_id": "user-1", "movie_id": 603,
                            "movie_title": "The Matrix", "watched_date": "2024-03-01"
                        },
                        {
                            "id": 2, "user_id": "user-1", "movie_id": 604,
                            "movie_title": "The Matrix Reloaded", "watched_date": "2024-03-02"
                        }
                    ])),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/movie_diary"))
            .and(query_param("offset", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Range", "2-2/3")
                    .set_body_json(serde_json::json!([
                        {
                            "id": 3, "user_id": "user-1", "movie_id": 605,
                            "movie_title": "The Matrix Revolutions", "watched_date": "2024-03-03"
                        }
                    ])),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/tv_diary"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Range", "*/0")
                    .set_body_json(serde_json::json!([])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let session = UserSession::new("user-1", "token-1");
        let entries = client.fetch_entries(&session, march()).await.unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2].media_title, "The Matrix Revolutions");
    }

    #[tokio::test]
    async fn test_fetch_entries_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let session = UserSession::new("user-1", "expired");
        let err = client.fetch_entries(&session, march()).await.unwrap_err();
        assert!(err.is_auth_error());
    }

    #[tokio::test]
    async fn test_one_failing_table_fails_the_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/movie_diary"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/tv_diary"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let session = UserSession::new("user-1", "token-1");
        let err = client.fetch_entries(&session, march()).await.unwrap_err();
        assert!(matches!(err, SourceError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_incomplete_session_sends_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let session = UserSession::new("", "token");
        let err = client.fetch_entries(&session, march()).await.unwrap_err();
        assert!(matches!(err, SourceError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let session = UserSession::new("user-1", "token-1");
        let err = client.fetch_entries(&session, march()).await.unwrap_err();
        assert!(matches!(err, SourceError::Decode { .. }));
    }
}
