use super::{fetch_summary, prepare};
use crate::clipboard::Osc52Clipboard;
use crate::output::Output;
use crate::SummaryArgs;
use color_eyre::Result;
use chrono::NaiveDate;
use rewind_config::PathManager;
use rewind_core::{format_share_text, today_local, ShareOutcome, Sharer};
use rewind_models::Period;
use serde_json::json;
use std::path::PathBuf;

pub async fn run_share(
    args: SummaryArgs,
    output_file: Option<PathBuf>,
    export: bool,
    output: &Output,
) -> Result<()> {
    let ctx = prepare(&args, output)?;
    let outcome = fetch_summary(&ctx, output).await;
    let text = format_share_text(&outcome.summary);

    let target = match output_file {
        Some(path) => Some(path),
        None if export => {
            let path_manager = PathManager::new().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
            Some(path_manager.export_dir().join(export_file_name(ctx.period, today_local())))
        }
        None => None,
    };

    if let Some(path) = target {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| color_eyre::eyre::eyre!("Failed to create {}: {}", parent.display(), e))?;
        }
        std::fs::write(&path, format!("{}\n", text))
            .map_err(|e| color_eyre::eyre::eyre!("Failed to write {}: {}", path.display(), e))?;
        tracing::info!("Exported share text to {}", path.display());
        output.success(format!("Summary written to {}", path.display()));
        return Ok(());
    }

    if !output.is_human() {
        output.json(&json!({
            "period": outcome.summary.period,
            "text": text,
        }));
        return Ok(());
    }

    // No share sheet in a terminal; the clipboard is the only target
    let sharer = Sharer::new(Box::new(Osc52Clipboard));
    output.println(&text);
    output.println("");
    match sharer.share(&text) {
        ShareOutcome::Shared => output.success("Shared!"),
        ShareOutcome::Copied => output.success("Copied to clipboard"),
        ShareOutcome::Failed { notice } => output.warn(notice),
    }
    Ok(())
}

fn export_file_name(period: Period, today: NaiveDate) -> String {
    format!("rewind-{}-{}.txt", period.as_str(), today.format("%Y-%m-%d"))
}
