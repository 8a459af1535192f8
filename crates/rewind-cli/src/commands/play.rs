use super::loading::LoadingSpinner;
use super::{prepare, report_fetch_error};
use crate::output::Output;
use crate::SummaryArgs;
use color_eyre::Result;
use owo_colors::OwoColorize;
use rewind_core::{today_local, SequencerEvent, Slide, WrappedSession};
use serde_json::json;
use std::io::{BufRead, IsTerminal};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

const FRAME: Duration = Duration::from_millis(100);
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Next,
    Back,
    TogglePause,
    Quit,
}

fn parse_key(line: &str) -> Option<Key> {
    match line.trim().to_lowercase().as_str() {
        "" | "n" | "next" => Some(Key::Next),
        "b" | "back" => Some(Key::Back),
        "p" | "pause" => Some(Key::TogglePause),
        "q" | "quit" | "exit" => Some(Key::Quit),
        _ => None,
    }
}

fn key_event(key: Key, paused: bool) -> SequencerEvent {
    match key {
        Key::Next => SequencerEvent::Forward,
        Key::Back => SequencerEvent::Back,
        Key::TogglePause if paused => SequencerEvent::PressEnd,
        Key::TogglePause => SequencerEvent::PressStart,
        Key::Quit => SequencerEvent::Close,
    }
}

/// Forward parsed keys until the input ends or the receiver goes away.
///
/// End of input means "close" only for a terminal; piped or redirected
/// input just stops sending and the slides keep auto-advancing.
fn read_keys<R: BufRead>(reader: R, quit_on_eof: bool, tx: &mpsc::UnboundedSender<Key>) {
    for line in reader.lines() {
        let Ok(line) = line else { break };
        if let Some(key) = parse_key(&line) {
            if tx.send(key).is_err() {
                return;
            }
        }
    }
    if quit_on_eof {
        let _ = tx.send(Key::Quit);
    }
}

/// Stdin lines on a plain thread; a pending read must not hold up runtime shutdown
fn spawn_key_reader() -> mpsc::UnboundedReceiver<Key> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        let interactive = stdin.is_terminal();
        read_keys(stdin.lock(), interactive, &tx);
    });
    rx
}

pub async fn run_play(args: SummaryArgs, interval: Option<u64>, output: &Output) -> Result<()> {
    let ctx = prepare(&args, output)?;
    let seconds = interval.unwrap_or(ctx.config.wrapped.auto_advance_seconds).max(1);
    let auto_advance = Duration::from_secs(seconds);

    let spinner = LoadingSpinner::start("Building your Rewind...", output.is_human() && !output.is_quiet());
    let (mut wrapped, error) =
        WrappedSession::open(&ctx.pipeline, &ctx.session, ctx.period, today_local(), auto_advance).await;
    spinner.finish();
    if let Some(e) = &error {
        report_fetch_error(e, output);
    }

    let mut keys = spawn_key_reader();
    let mut ticker = tokio::time::interval(FRAME);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_tick = Instant::now();
    let mut drawn: Option<(Slide, usize, bool)> = None;

    loop {
        let frame = wrapped
            .current_view()
            .map(|view| (view.slide, wrapped.visible_lines().len(), wrapped.is_paused()));
        if frame != drawn {
            draw(&wrapped, output, drawn.map(|(slide, _, _)| slide) != frame.map(|(slide, _, _)| slide))?;
            drawn = frame;
        }

        let event = tokio::select! {
            now = ticker.tick() => {
                let dt = now.duration_since(last_tick);
                last_tick = now;
                SequencerEvent::Tick(dt)
            }
            Some(key) = keys.recv() => key_event(key, wrapped.is_paused()),
        };

        wrapped.handle(event);
        if wrapped.is_finished() {
            break;
        }
    }

    wrapped.close();
    output.println("");
    output.success("Thanks for watching. Run 'rewind share' to share your Rewind.");
    Ok(())
}

fn draw(wrapped: &WrappedSession, output: &Output, entered: bool) -> Result<()> {
    let Some(view) = wrapped.current_view() else {
        return Ok(());
    };

    if !output.is_human() {
        // One record per slide, fully revealed
        if entered {
            output.json(&json!({
                "slide": view.slide.index() + 1,
                "title": view.title,
                "lines": view.lines,
                "empty": view.empty,
            }));
        }
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    let mut screen = String::from(CLEAR_SCREEN);
    screen.push_str(&format!(
        "{}  {}\n\n",
        view.title.bright_cyan().bold(),
        format!("{}/{}", view.slide.index() + 1, Slide::ALL.len()).dimmed()
    ));
    for line in wrapped.visible_lines() {
        if view.empty {
            screen.push_str(&format!("  {}\n", line.dimmed()));
        } else {
            screen.push_str(&format!("  {}\n", line.bright_white()));
        }
    }
    screen.push('\n');
    if wrapped.is_paused() {
        screen.push_str(&format!("{}\n", "paused".yellow()));
    }
    screen.push_str(&format!(
        "{}\n",
        "[enter] next  [b] back  [p] pause  [q] quit".dimmed()
    ));
    output.print(screen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key() {
        assert_eq!(parse_key(""), Some(Key::Next));
        assert_eq!(parse_key(" B "), Some(Key::Back));
        assert_eq!(parse_key("p"), Some(Key::TogglePause));
        assert_eq!(parse_key("quit"), Some(Key::Quit));
        assert_eq!(parse_key("x"), None);
    }

    #[test]
    fn test_piped_input_end_does_not_quit() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        read_keys(std::io::Cursor::new("b\nwhat\n"), false, &tx);
        assert_eq!(rx.try_recv().unwrap(), Key::Back);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_terminal_input_end_quits() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        read_keys(std::io::Cursor::new(""), true, &tx);
        assert_eq!(rx.try_recv().unwrap(), Key::Quit);
    }

    #[test]
    fn test_pause_toggles() {
        assert_eq!(key_event(Key::TogglePause, false), SequencerEvent::PressStart);
        assert_eq!(key_event(Key::TogglePause, true), SequencerEvent::PressEnd);
        assert_eq!(key_event(Key::Quit, true), SequencerEvent::Close);
    }
}
