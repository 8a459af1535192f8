//! TTL cache in front of a metadata provider.
//!
//! Lookups are keyed by [`MediaRef`]; successful results live for `ttl` and the
//! cache holds at most `max_capacity` entries (moka evicts by frequency/recency
//! once full). Errors are never cached, so a transient failure is retried on the
//! next lookup.

use async_trait::async_trait;
use moka::sync::Cache;
use rewind_config::MetadataConfig;
use rewind_models::{MediaDetails, MediaRef};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::SourceError;
use crate::traits::MetadataProvider;

pub const DEFAULT_METADATA_CACHE_TTL_SECONDS: u64 = 86_400;
pub const DEFAULT_METADATA_CACHE_MAX_CAPACITY: u64 = 1000;

#[derive(Debug, Clone)]
pub struct MetadataCacheConfig {
    pub ttl: Duration,
    pub max_capacity: u64,
}

impl Default for MetadataCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_METADATA_CACHE_TTL_SECONDS),
            max_capacity: DEFAULT_METADATA_CACHE_MAX_CAPACITY,
        }
    }
}

impl From<&MetadataConfig> for MetadataCacheConfig {
    fn from(config: &MetadataConfig) -> Self {
        Self {
            ttl: Duration::from_secs(config.cache_ttl_seconds),
            max_capacity: config.cache_max_capacity,
        }
    }
}

pub struct MetadataCache<P> {
    inner: P,
    entries: Cache<MediaRef, MediaDetails>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<P: MetadataProvider> MetadataCache<P> {
    pub fn new(inner: P, config: MetadataCacheConfig) -> Self {
        info!(
            "Metadata cache: ttl={}s max_capacity={}",
            config.ttl.as_secs(),
            config.max_capacity
        );
        let entries = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.ttl)
            .build();
        Self {
            inner,
            entries,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl<P: MetadataProvider> MetadataProvider for MetadataCache<P> {
    async fn details(&self, media: MediaRef) -> Result<MediaDetails, SourceError> {
        if let Some(details) = self.entries.get(&media) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("Metadata cache hit: {:?} {}", media.kind, media.media_id);
            return Ok(details);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let details = self.inner.details(media).await?;
        self.entries.insert(media, details.clone());
        Ok(details)
    }
}
