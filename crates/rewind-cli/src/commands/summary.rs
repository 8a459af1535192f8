use super::{fetch_summary, prepare};
use crate::output::Output;
use crate::SummaryArgs;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use rewind_core::{render, Slide};
use rewind_models::AggregatedPeriodSummary;

pub async fn run_summary(args: SummaryArgs, output: &Output) -> Result<()> {
    let ctx = prepare(&args, output)?;
    let outcome = fetch_summary(&ctx, output).await;
    let summary = outcome.summary;

    if !output.is_human() {
        let value = serde_json::to_value(&summary)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to serialize summary: {}", e))?;
        output.json(&value);
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &AggregatedPeriodSummary) {
    println!();
    println!("{} {}", "Rewind".bright_cyan().bold(), summary.period.label().bright_white());
    println!();

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec![
        Cell::new("Slide").add_attribute(Attribute::Bold),
        Cell::new("").add_attribute(Attribute::Bold),
    ]);

    // Intro and Share are interactive-only
    for slide in Slide::ALL.iter().filter(|s| !matches!(s, Slide::Intro | Slide::Share)) {
        let view = render(*slide, summary);
        let body = Cell::new(view.lines.join("\n"));
        let body = if view.empty { body.fg(Color::DarkGrey) } else { body };
        table.add_row(vec![Cell::new(&view.title).fg(Color::Cyan), body]);
    }
    println!("{}", table);
}
