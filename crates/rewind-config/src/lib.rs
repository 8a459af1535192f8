pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{BackendConfig, Config, MetadataConfig, WrappedConfig, default_metadata_base_url};
pub use credentials::{CredentialStore, SessionError, UserSession};
pub use paths::{PathManager, container_base_path};
