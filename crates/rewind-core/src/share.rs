//! Plain-text share card plus the native-share / clipboard fallback.

use rewind_models::AggregatedPeriodSummary;
use thiserror::Error;
use tracing::{info, warn};

const HASHTAG: &str = "#Rewind";

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("sharing is not available: {0}")]
    Unavailable(String),

    #[error("share cancelled")]
    Cancelled,

    #[error("clipboard write failed: {0}")]
    Clipboard(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Platform share sheet, where one exists
pub trait NativeShare: Send + Sync {
    fn share(&self, text: &str) -> Result<(), ShareError>;
}

pub trait Clipboard: Send + Sync {
    fn copy(&self, text: &str) -> Result<(), ShareError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Copied,
    /// `notice` is meant for the user
    Failed { notice: String },
}

/// Tries native share, else the clipboard. One attempt, no retries.
pub struct Sharer {
    native: Option<Box<dyn NativeShare>>,
    clipboard: Box<dyn Clipboard>,
}

impl Sharer {
    pub fn new(clipboard: Box<dyn Clipboard>) -> Self {
        Self {
            native: None,
            clipboard,
        }
    }

    pub fn with_native(mut self, native: Box<dyn NativeShare>) -> Self {
        self.native = Some(native);
        self
    }

    pub fn share(&self, text: &str) -> ShareOutcome {
        match &self.native {
            Some(native) => match native.share(text) {
                Ok(()) => {
                    info!("Shared summary via native share");
                    ShareOutcome::Shared
                }
                Err(e) => {
                    warn!("Native share failed: {}", e);
                    ShareOutcome::Failed {
                        notice: format!("Couldn't share: {}", e),
                    }
                }
            },
            None => match self.clipboard.copy(text) {
                Ok(()) => {
                    info!("Copied summary to clipboard");
                    ShareOutcome::Copied
                }
                Err(e) => {
                    warn!("Clipboard copy failed: {}", e);
                    ShareOutcome::Failed {
                        notice: format!("Couldn't copy to clipboard: {}", e),
                    }
                }
            },
        }
    }
}

pub fn format_share_text(summary: &AggregatedPeriodSummary) -> String {
    let mut lines = vec![format!("My Rewind: {}", summary.period.label())];

    if summary.is_empty() {
        lines.push("Nothing logged yet. Ask me again soon!".to_string());
        lines.push(String::new());
        lines.push(HASHTAG.to_string());
        return lines.join("\n");
    }

    lines.push(format!(
        "{} movies, {} episodes, {} hours",
        summary.total_movies, summary.total_episodes, summary.total_hours
    ));
    if let Some(movie) = &summary.top_movie {
        lines.push(format!("Top movie: {}", movie.title));
    }
    if let Some(show) = &summary.top_tv_show {
        lines.push(format!("Top show: {}", show.title));
    }
    if let Some(genre) = &summary.top_genre {
        lines.push(format!("Top genre: {}", genre.name));
    }
    if let Some(actor) = summary.top_actors.first() {
        lines.push(format!("Most watched actor: {}", actor.name));
    }
    if let Some(avg) = summary.average_rating {
        lines.push(format!("Average rating: {:.1}/10", avg));
    }
    let streak = summary.viewing_patterns.longest_streak;
    if streak >= 2 {
        lines.push(format!("Longest streak: {} days", streak));
    }

    lines.push(String::new());
    lines.push(HASHTAG.to_string());
    lines.join("\n")
}
