pub mod config;
pub mod loading;
pub mod login;
pub mod play;
pub mod prompts;
pub mod share;
pub mod summary;

use crate::output::Output;
use crate::SummaryArgs;
use chrono::Local;
use color_eyre::Result;
use rewind_config::{Config, CredentialStore, PathManager, SessionError, UserSession};
use rewind_core::{Aggregator, PipelineOutcome, SummaryPipeline};
use rewind_models::Period;
use rewind_sources::{
    BackendClient, DiaryRepository, FileDiaryRepository, MetadataCache, MetadataCacheConfig,
    MetadataProvider, SourceError, TmdbClient,
};
use std::sync::Arc;

use loading::LoadingSpinner;

/// Everything a summary-producing command needs, resolved from flags,
/// config.toml and credentials.toml.
pub struct SummaryContext {
    pub config: Config,
    pub pipeline: SummaryPipeline,
    pub session: UserSession,
    pub period: Period,
}

pub fn load_config(path_manager: &PathManager) -> Result<Config> {
    let config_file = path_manager.config_file();
    Config::load_or_default(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))
}

pub fn load_credentials(path_manager: &PathManager) -> Result<CredentialStore> {
    let credentials_file = path_manager.credentials_file();
    let mut cred_store = CredentialStore::new(credentials_file.clone());
    cred_store
        .load()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;
    Ok(cred_store)
}

pub fn prepare(args: &SummaryArgs, output: &Output) -> Result<SummaryContext> {
    let path_manager = PathManager::new().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    let config = load_config(&path_manager)?;
    let cred_store = load_credentials(&path_manager)?;

    let (diary, session): (Arc<dyn DiaryRepository>, UserSession) = match &args.from_file {
        Some(path) => {
            // Offline: a stored session only narrows rows to that user
            let session = cred_store
                .session()
                .unwrap_or_else(|_| UserSession::new("", ""));
            (Arc::new(FileDiaryRepository::new(path.clone())), session)
        }
        None => {
            config
                .validate()
                .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration: {}", e))?;
            let session = cred_store.session().map_err(|e| match e {
                SessionError::NotLoggedIn => color_eyre::eyre::eyre!("Not logged in. Run 'rewind login' first."),
                SessionError::Expired(at) => color_eyre::eyre::eyre!(
                    "Session expired at {}. Run 'rewind login' again.",
                    at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                ),
            })?;
            let client = BackendClient::new(&config.backend)
                .map_err(|e| color_eyre::eyre::eyre!("Failed to create backend client: {}", e))?;
            (Arc::new(client), session)
        }
    };

    let aggregator = Aggregator::from_config(&config.wrapped).with_utc_offset(*Local::now().offset());
    let mut pipeline = SummaryPipeline::new(diary, aggregator);
    if let Some(metadata) = metadata_provider(&config, &cred_store, args.no_metadata, output) {
        pipeline = pipeline.with_metadata(metadata);
    }

    Ok(SummaryContext {
        period: args.period.unwrap_or(config.wrapped.default_period),
        config,
        pipeline,
        session,
    })
}

fn metadata_provider(
    config: &Config,
    cred_store: &CredentialStore,
    disabled_by_flag: bool,
    output: &Output,
) -> Option<Arc<dyn MetadataProvider>> {
    if disabled_by_flag || !config.metadata.enabled {
        tracing::debug!("Metadata enrichment disabled");
        return None;
    }

    let Some(token) = cred_store.get_metadata_token() else {
        output.warn("No metadata token stored; actors and directors will be empty. Run 'rewind config metadata --token'.");
        return None;
    };

    match TmdbClient::new(&config.metadata, token.clone()) {
        Ok(client) => {
            let cache = MetadataCache::new(client, MetadataCacheConfig::from(&config.metadata));
            Some(Arc::new(cache))
        }
        Err(e) => {
            output.warn(format!("Metadata lookups disabled: {}", e));
            None
        }
    }
}

/// Run the pipeline behind a spinner and report a failed fetch
pub async fn fetch_summary(ctx: &SummaryContext, output: &Output) -> PipelineOutcome {
    let spinner = LoadingSpinner::start(
        &format!("Loading your {} diary...", ctx.period.label().to_lowercase()),
        output.is_human() && !output.is_quiet(),
    );
    let outcome = ctx
        .pipeline
        .run(&ctx.session, ctx.period, rewind_core::today_local())
        .await;
    spinner.finish();

    if let Some(e) = &outcome.error {
        report_fetch_error(e, output);
    }
    outcome
}

pub fn report_fetch_error(e: &SourceError, output: &Output) {
    if e.is_auth_error() {
        output.error(format!("Couldn't load your diary: {}. Try 'rewind login'.", e));
    } else {
        output.error(format!("Couldn't load your diary: {}", e));
    }
}
