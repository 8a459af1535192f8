use async_trait::async_trait;
use reqwest::Client;
use rewind_config::MetadataConfig;
use rewind_models::{MediaDetails, MediaRef};
use std::sync::Arc;

use crate::error::SourceError;
use crate::tmdb::api;
use crate::traits::MetadataProvider;

/// Metadata provider client (TMDB v3 endpoints, v4 read token)
#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    base_url: String,
    token: String,
}

impl TmdbClient {
    pub fn new(config: &MetadataConfig, token: String) -> Result<Self, SourceError> {
        if token.trim().is_empty() {
            return Err(SourceError::Unauthenticated("metadata token is empty".to_string()));
        }
        let client = Client::builder()
            .user_agent(concat!("rewind/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client: Arc::new(client),
            base_url: config.base_url.clone(),
            token,
        })
    }
}

#[async_trait]
impl MetadataProvider for TmdbClient {
    async fn details(&self, media: MediaRef) -> Result<MediaDetails, SourceError> {
        api::get_details(&self.client, &self.base_url, &self.token, media).await
    }
}
