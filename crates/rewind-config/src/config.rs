use rewind_models::Period;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub wrapped: WrappedConfig,
}

/// Hosted backend (PostgREST-style) that owns the diary tables
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
    #[serde(default = "default_movie_table")]
    pub movie_table: String,
    #[serde(default = "default_tv_table")]
    pub tv_table: String,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MetadataConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_metadata_base_url")]
    pub base_url: String,
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,
    #[serde(default = "default_cache_max_capacity")]
    pub cache_max_capacity: u64,
}

/// Knobs for the statistics slides
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WrappedConfig {
    #[serde(default = "default_auto_advance_seconds")]
    pub auto_advance_seconds: u64,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_cast_depth")]
    pub cast_depth: usize,
    #[serde(default)]
    pub default_period: Period,
}

fn default_true() -> bool {
    true
}

fn default_movie_table() -> String {
    "movie_diary".to_string()
}

fn default_tv_table() -> String {
    "tv_diary".to_string()
}

fn default_request_timeout_seconds() -> u64 {
    30
}

pub fn default_metadata_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_cache_ttl_seconds() -> u64 {
    86_400 // 24 hours
}

fn default_cache_max_capacity() -> u64 {
    1000
}

fn default_auto_advance_seconds() -> u64 {
    5
}

fn default_top_n() -> usize {
    5
}

fn default_cast_depth() -> usize {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            movie_table: default_movie_table(),
            tv_table: default_tv_table(),
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            base_url: default_metadata_base_url(),
            cache_ttl_seconds: default_cache_ttl_seconds(),
            cache_max_capacity: default_cache_max_capacity(),
        }
    }
}

impl Default for WrappedConfig {
    fn default() -> Self {
        Self {
            auto_advance_seconds: default_auto_advance_seconds(),
            top_n: default_top_n(),
            cast_depth: default_cast_depth(),
            default_period: Period::default(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.is_backend_configured() {
            return Err(anyhow::anyhow!(
                "Backend is not configured. Run `rewind config backend --url <URL> --anon-key <KEY>`"
            ));
        }
        if !is_http_url(&self.backend.url) {
            return Err(anyhow::anyhow!("backend.url must start with http:// or https://"));
        }
        if self.backend.movie_table.trim().is_empty() || self.backend.tv_table.trim().is_empty() {
            return Err(anyhow::anyhow!("backend table names cannot be empty"));
        }
        if self.backend.request_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("backend.request_timeout_seconds must be positive"));
        }

        if self.metadata.enabled {
            if !is_http_url(&self.metadata.base_url) {
                return Err(anyhow::anyhow!("metadata.base_url must start with http:// or https://"));
            }
            if self.metadata.cache_ttl_seconds == 0 {
                return Err(anyhow::anyhow!("metadata.cache_ttl_seconds must be positive"));
            }
            if self.metadata.cache_max_capacity == 0 {
                return Err(anyhow::anyhow!("metadata.cache_max_capacity must be positive"));
            }
        }

        if self.wrapped.auto_advance_seconds == 0 {
            return Err(anyhow::anyhow!("wrapped.auto_advance_seconds must be positive"));
        }
        if self.wrapped.top_n == 0 {
            return Err(anyhow::anyhow!("wrapped.top_n must be at least 1"));
        }

        Ok(())
    }

    pub fn is_backend_configured(&self) -> bool {
        !self.backend.url.trim().is_empty()
            && self.backend.url != "YOUR_BACKEND_URL"
            && !self.backend.anon_key.trim().is_empty()
            && self.backend.anon_key != "YOUR_ANON_KEY"
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
