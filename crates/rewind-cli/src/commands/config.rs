use super::{load_config, load_credentials, prompts};
use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use rewind_config::{Config, PathManager};
use rewind_models::Period;
use serde_json::json;

pub async fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    let path_manager = PathManager::new().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    match cmd {
        ConfigCommands::Show { full } => show_config(&path_manager, full, output),
        ConfigCommands::Backend { url, anon_key } => configure_backend(&path_manager, url, anon_key, output),
        ConfigCommands::Metadata {
            enabled,
            base_url,
            token,
            cache_ttl_seconds,
            cache_max_capacity,
        } => configure_metadata(
            &path_manager,
            MetadataUpdate {
                enabled,
                base_url,
                token,
                cache_ttl_seconds,
                cache_max_capacity,
            },
            output,
        ),
        ConfigCommands::Wrapped {
            auto_advance_seconds,
            top_n,
            cast_depth,
            default_period,
        } => configure_wrapped(
            &path_manager,
            WrappedUpdate {
                auto_advance_seconds,
                top_n,
                cast_depth,
                default_period,
            },
            output,
        ),
    }
}

fn show_config(path_manager: &PathManager, full: bool, output: &Output) -> Result<()> {
    let config_file = path_manager.config_file();
    if !config_file.exists() {
        output.warn(format!("Configuration file not found at: {}", config_file.display()));
        output.info("Run 'rewind config backend' to create one. Defaults are shown below.");
    }

    let config = load_config(path_manager)?;
    let cred_store = load_credentials(path_manager)?;
    let secret = |value: Option<&String>| match value {
        Some(v) if full => v.clone(),
        Some(v) => mask_string(v),
        None => "<not set>".to_string(),
    };

    match output.format() {
        crate::output::OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            println!("\n{}", "Configuration".bright_cyan().bold());
            println!("{}\n", config_file.display().to_string().dimmed());

            let backend_key = if full {
                config.backend.anon_key.clone()
            } else {
                mask_string(&config.backend.anon_key)
            };
            print_table(
                "Backend",
                &[
                    ("URL", or_not_set(&config.backend.url)),
                    ("Anon Key", backend_key),
                    ("Movie Table", config.backend.movie_table.clone()),
                    ("TV Table", config.backend.tv_table.clone()),
                    ("Timeout", format!("{}s", config.backend.request_timeout_seconds)),
                ],
            );
            print_table(
                "Session",
                &[
                    ("User ID", or_not_set(cred_store.get_user_id().map(String::as_str).unwrap_or(""))),
                    ("Access Token", secret(cred_store.get_access_token())),
                    (
                        "Expires",
                        cred_store
                            .get_token_expires()
                            .map(|t| t.to_rfc3339())
                            .unwrap_or_else(|| "never".to_string()),
                    ),
                ],
            );
            print_table(
                "Metadata",
                &[
                    ("Enabled", config.metadata.enabled.to_string()),
                    ("Base URL", config.metadata.base_url.clone()),
                    ("Token", secret(cred_store.get_metadata_token())),
                    ("Cache TTL", format!("{}s", config.metadata.cache_ttl_seconds)),
                    ("Cache Capacity", config.metadata.cache_max_capacity.to_string()),
                ],
            );
            print_table(
                "Wrapped",
                &[
                    ("Auto Advance", format!("{}s", config.wrapped.auto_advance_seconds)),
                    ("Top N", config.wrapped.top_n.to_string()),
                    ("Cast Depth", config.wrapped.cast_depth.to_string()),
                    ("Default Period", config.wrapped.default_period.to_string()),
                ],
            );
        }
        crate::output::OutputFormat::Json | crate::output::OutputFormat::JsonPretty => {
            let mut value = serde_json::to_value(&config)
                .map_err(|e| color_eyre::eyre::eyre!("Failed to serialize config: {}", e))?;
            if !full {
                value["backend"]["anon_key"] = json!(mask_string(&config.backend.anon_key));
            }
            output.json(&json!({
                "config_file": config_file.display().to_string(),
                "config": value,
                "logged_in": cred_store.session().is_ok(),
            }));
        }
    }

    Ok(())
}

fn configure_backend(
    path_manager: &PathManager,
    url_arg: Option<String>,
    anon_key_arg: Option<String>,
    output: &Output,
) -> Result<()> {
    let mut config = load_config(path_manager)?;

    let url = match url_arg {
        Some(url) => url,
        None => {
            let existing = Some(config.backend.url.as_str()).filter(|u| !u.is_empty());
            prompts::prompt_string("Backend URL", existing)?
        }
    };
    let url = url.trim().trim_end_matches('/').to_string();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(color_eyre::eyre::eyre!("Backend URL must start with http:// or https://"));
    }

    let anon_key = match anon_key_arg {
        Some(key) => key,
        None => prompts::prompt_secret("Anon key")?,
    };
    if anon_key.trim().is_empty() {
        return Err(color_eyre::eyre::eyre!("Anon key cannot be empty"));
    }

    config.backend.url = url;
    config.backend.anon_key = anon_key.trim().to_string();
    save(path_manager, &config)?;

    output.success("Backend configuration saved!");
    output.println(format!("  URL: {}", config.backend.url));
    output.println("Next: run 'rewind login' to store your session.");
    Ok(())
}

struct MetadataUpdate {
    enabled: Option<bool>,
    base_url: Option<String>,
    token: bool,
    cache_ttl_seconds: Option<u64>,
    cache_max_capacity: Option<u64>,
}

fn configure_metadata(path_manager: &PathManager, update: MetadataUpdate, output: &Output) -> Result<()> {
    let mut config = load_config(path_manager)?;

    if let Some(enabled) = update.enabled {
        config.metadata.enabled = enabled;
    }
    if let Some(base_url) = update.base_url {
        config.metadata.base_url = base_url.trim().trim_end_matches('/').to_string();
    }
    if let Some(ttl) = update.cache_ttl_seconds {
        config.metadata.cache_ttl_seconds = ttl;
    }
    if let Some(capacity) = update.cache_max_capacity {
        config.metadata.cache_max_capacity = capacity;
    }
    save(path_manager, &config)?;

    if update.token {
        let token = prompts::prompt_secret("Metadata API token")?;
        if token.is_empty() {
            return Err(color_eyre::eyre::eyre!("Token cannot be empty"));
        }
        let mut cred_store = load_credentials(path_manager)?;
        cred_store.set_metadata_token(token);
        cred_store
            .save()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to save credentials: {}", e))?;
        output.success("Metadata token saved");
    }

    output.success("Metadata configuration saved!");
    output.println(format!("  Enabled: {}", config.metadata.enabled));
    output.println(format!("  Cache: {}s TTL, {} titles", config.metadata.cache_ttl_seconds, config.metadata.cache_max_capacity));
    Ok(())
}

struct WrappedUpdate {
    auto_advance_seconds: Option<u64>,
    top_n: Option<usize>,
    cast_depth: Option<usize>,
    default_period: Option<Period>,
}

fn configure_wrapped(path_manager: &PathManager, update: WrappedUpdate, output: &Output) -> Result<()> {
    let mut config = load_config(path_manager)?;

    if let Some(seconds) = update.auto_advance_seconds {
        config.wrapped.auto_advance_seconds = seconds;
    }
    if let Some(top_n) = update.top_n {
        config.wrapped.top_n = top_n;
    }
    if let Some(depth) = update.cast_depth {
        config.wrapped.cast_depth = depth;
    }
    if let Some(period) = update.default_period {
        config.wrapped.default_period = period;
    }
    save(path_manager, &config)?;

    output.success("Slide options saved!");
    output.println(format!("  Auto advance: {}s", config.wrapped.auto_advance_seconds));
    output.println(format!("  Default period: {}", config.wrapped.default_period.label()));
    Ok(())
}

/// Validates what can be validated yet, then writes config.toml
fn save(path_manager: &PathManager, config: &Config) -> Result<()> {
    if config.is_backend_configured() {
        config
            .validate()
            .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration: {}", e))?;
    }
    path_manager
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create configuration directories: {}", e))?;

    let config_file = path_manager.config_file();
    config
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config to {}: {}", config_file.display(), e))?;
    tracing::debug!("Saved config to {}", config_file.display());
    Ok(())
}

fn print_table(title: &str, rows: &[(&str, String)]) {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new(title).fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    for (key, value) in rows {
        table.add_row(vec![Cell::new(key), Cell::new(value)]);
    }
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    println!("{}\n", table);
}

fn or_not_set(value: &str) -> String {
    if value.trim().is_empty() {
        "<not set>".to_string()
    } else {
        value.to_string()
    }
}

fn mask_string(s: &str) -> String {
    if s.is_empty() || s == "YOUR_ANON_KEY" {
        return "<not set>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}
