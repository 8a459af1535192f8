use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Default)]
struct CredentialsData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

/// Authenticated backend session: whose diary to read and the bearer token to read it with
#[derive(Clone, PartialEq, Eq)]
pub struct UserSession {
    pub user_id: String,
    pub access_token: String,
}

impl UserSession {
    pub fn new(user_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            access_token: access_token.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.user_id.trim().is_empty() && !self.access_token.trim().is_empty()
    }
}

impl fmt::Debug for UserSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserSession")
            .field("user_id", &self.user_id)
            .field("access_token", &"***")
            .finish()
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SessionError {
    #[error("Not logged in. Run `rewind login` first")]
    NotLoggedIn,
    #[error("Session expired at {0}. Run `rewind login` again")]
    Expired(DateTime<Utc>),
}

pub struct CredentialStore {
    path: PathBuf,
    credentials: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let creds_data: CredentialsData = toml::from_str(&content)?;
            self.credentials = creds_data.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let creds_data = CredentialsData {
            data: self.credentials.clone(),
        };
        let content = toml::to_string_pretty(&creds_data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.credentials.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.credentials.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        self.credentials.remove(key);
    }

    // Backend session
    pub fn get_user_id(&self) -> Option<&String> {
        self.get("user_id")
    }

    pub fn set_user_id(&mut self, user_id: String) {
        self.set("user_id".to_string(), user_id);
    }

    pub fn get_access_token(&self) -> Option<&String> {
        self.get("access_token")
    }

    pub fn set_access_token(&mut self, token: String) {
        self.set("access_token".to_string(), token);
    }

    pub fn get_token_expires(&self) -> Option<DateTime<Utc>> {
        self.get("token_expires")
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn set_token_expires(&mut self, expires: DateTime<Utc>) {
        self.set("token_expires".to_string(), expires.to_rfc3339());
    }

    // Metadata provider
    pub fn get_metadata_token(&self) -> Option<&String> {
        self.get("metadata_token")
    }

    pub fn set_metadata_token(&mut self, token: String) {
        self.set("metadata_token".to_string(), token);
    }

    /// Build the backend session from stored credentials
    pub fn session(&self) -> Result<UserSession, SessionError> {
        self.session_at(Utc::now())
    }

    pub fn session_at(&self, now: DateTime<Utc>) -> Result<UserSession, SessionError> {
        let (user_id, token) = match (self.get_user_id(), self.get_access_token()) {
            (Some(user_id), Some(token)) => (user_id, token),
            _ => return Err(SessionError::NotLoggedIn),
        };

        if let Some(expires_at) = self.get_token_expires() {
            if expires_at <= now {
                return Err(SessionError::Expired(expires_at));
            }
        }

        let session = UserSession::new(user_id.clone(), token.clone());
        if !session.is_complete() {
            return Err(SessionError::NotLoggedIn);
        }
        Ok(session)
    }

    /// Forget the backend session (metadata token is kept)
    pub fn clear_session(&mut self) {
        self.remove("user_id");
        self.remove("access_token");
        self.remove("token_expires");
    }
}
