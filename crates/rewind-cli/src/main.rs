use clap::{ArgAction, Args, Parser, Subcommand};
use commands::{config, login, play, share, summary};
use rewind_models::Period;
use std::path::PathBuf;

mod clipboard;
mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "rewind")]
#[command(about = "Rewind - your watch diary, wrapped")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Also write logs to the daily rolling log file
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where the summary comes from
#[derive(Args, Debug, Clone)]
pub struct SummaryArgs {
    /// Period to summarize: today, week, month, all-time (defaults to config)
    #[arg(long, short)]
    pub period: Option<Period>,

    /// Read diary entries from a JSON export instead of the backend
    #[arg(long, value_name = "FILE")]
    pub from_file: Option<PathBuf>,

    /// Skip metadata enrichment (no cast, crew, or runtime lookups)
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_metadata: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the statistics for a period
    #[command(long_about = "Fetch your diary for the period, aggregate it, and print every statistic at once.")]
    Summary {
        #[command(flatten)]
        args: SummaryArgs,
    },
    /// Step through the slides in the terminal
    #[command(long_about = "Play the slide sequence. Slides advance automatically; press Enter for next, 'b' for back, 'p' to pause or resume, 'q' to close.")]
    Play {
        #[command(flatten)]
        args: SummaryArgs,

        /// Seconds before a slide advances on its own (defaults to config)
        #[arg(long, value_name = "SECONDS")]
        interval: Option<u64>,
    },
    /// Share a plain-text summary
    #[command(long_about = "Format the summary as plain text and copy it to the clipboard. With --output-file or --export the text is written to a file instead.")]
    Share {
        #[command(flatten)]
        args: SummaryArgs,

        /// Write the text to this file instead of the clipboard
        #[arg(long, value_name = "FILE", conflicts_with = "export")]
        output_file: Option<PathBuf>,

        /// Write the text into the exports directory
        #[arg(long, action = ArgAction::SetTrue)]
        export: bool,
    },
    /// View or change settings
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
    /// Store the session used to read your diary
    #[command(long_about = "Save the user id and access token for the diary backend. The token is read from a hidden prompt.")]
    Login {
        /// Backend user id (if not provided, will prompt)
        #[arg(long)]
        user_id: Option<String>,

        /// Hours until the token expires
        #[arg(long, value_name = "HOURS")]
        expires_in: Option<i64>,
    },
    /// Forget the stored session
    Logout,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks sensitive data)
    Show {
        /// Show secrets unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },

    /// Configure the diary backend
    Backend {
        /// Backend base URL (if not provided, will prompt)
        #[arg(long)]
        url: Option<String>,

        /// Public API key (if not provided, will prompt)
        #[arg(long)]
        anon_key: Option<String>,
    },

    /// Configure the metadata provider and its cache
    Metadata {
        /// Enable cast/crew/runtime lookups
        #[arg(long)]
        enabled: Option<bool>,

        /// Provider base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Ask for the provider API token
        #[arg(long, action = ArgAction::SetTrue)]
        token: bool,

        /// Cache time-to-live in seconds
        #[arg(long)]
        cache_ttl_seconds: Option<u64>,

        /// Maximum number of cached titles
        #[arg(long)]
        cache_max_capacity: Option<u64>,
    },

    /// Configure slide behavior
    Wrapped {
        #[arg(long)]
        auto_advance_seconds: Option<u64>,

        /// How many actors/directors to rank
        #[arg(long)]
        top_n: Option<usize>,

        /// Billed cast members counted per title
        #[arg(long)]
        cast_depth: Option<usize>,

        #[arg(long)]
        default_period: Option<Period>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = if cli.log_file {
        let path_manager = rewind_config::PathManager::new()
            .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
        Some(path_manager.log_file())
    } else {
        None
    };
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Summary { args } => summary::run_summary(args, &output).await,
        Commands::Play { args, interval } => play::run_play(args, interval, &output).await,
        Commands::Share { args, output_file, export } => {
            share::run_share(args, output_file, export, &output).await
        }
        Commands::Config { cmd } => config::run_config(cmd, &output).await,
        Commands::Login { user_id, expires_in } => login::run_login(user_id, expires_in, &output),
        Commands::Logout => login::run_logout(&output),
    }
}
