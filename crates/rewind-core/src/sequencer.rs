//! Slide state machine.
//!
//! Pure and synchronous: callers feed [`SequencerEvent`]s (key presses,
//! timer ticks) and get back the [`Transition`] that happened, if any.

use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::slides::Slide;
use crate::timeline::{Timeline, TimelineCursor};

pub const DEFAULT_AUTO_ADVANCE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    Showing(Slide),
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerEvent {
    Forward,
    Back,
    Tick(Duration),
    /// Long-press began; holds the timer and the reveal
    PressStart,
    PressEnd,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Stay,
    Moved { from: Slide, to: Slide },
    Finished,
}

#[derive(Debug, Clone)]
pub struct SlideSequencer {
    state: SequencerState,
    auto_advance: Duration,
    elapsed: Duration,
    paused: bool,
    timelines: HashMap<Slide, Timeline>,
    reveal: TimelineCursor,
}

impl SlideSequencer {
    pub fn new(auto_advance: Duration) -> Self {
        Self {
            state: SequencerState::Showing(Slide::Intro),
            auto_advance,
            elapsed: Duration::ZERO,
            paused: false,
            timelines: HashMap::new(),
            reveal: TimelineCursor::default(),
        }
    }

    /// Reveal timelines per slide; slides without one reveal nothing
    pub fn with_timelines(mut self, timelines: HashMap<Slide, Timeline>) -> Self {
        self.timelines = timelines;
        self.restart_reveal();
        self
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn current_slide(&self) -> Option<Slide> {
        match self.state {
            SequencerState::Showing(slide) => Some(slide),
            SequencerState::Finished => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state == SequencerState::Finished
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Time spent on the current slide, excluding paused time
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn visible_fields(&self) -> usize {
        self.reveal.visible_fields()
    }

    pub fn handle(&mut self, event: SequencerEvent) -> Transition {
        let SequencerState::Showing(current) = self.state else {
            return Transition::Stay;
        };

        match event {
            SequencerEvent::Forward => self.forward(current),
            SequencerEvent::Back => match current.previous() {
                Some(previous) => self.move_to(current, previous),
                None => Transition::Stay,
            },
            SequencerEvent::Tick(dt) => {
                if self.paused {
                    return Transition::Stay;
                }
                self.elapsed = self.elapsed.saturating_add(dt);
                self.reveal.advance(dt);
                if current != Slide::Share && self.elapsed >= self.auto_advance {
                    self.forward(current)
                } else {
                    Transition::Stay
                }
            }
            SequencerEvent::PressStart => {
                self.paused = true;
                Transition::Stay
            }
            SequencerEvent::PressEnd => {
                self.paused = false;
                Transition::Stay
            }
            SequencerEvent::Close => self.finish(),
        }
    }

    fn forward(&mut self, current: Slide) -> Transition {
        match current.next() {
            Some(next) => self.move_to(current, next),
            None => self.finish(),
        }
    }

    fn move_to(&mut self, from: Slide, to: Slide) -> Transition {
        debug!("Slide {} -> {}", from, to);
        self.state = SequencerState::Showing(to);
        self.elapsed = Duration::ZERO;
        self.paused = false;
        self.restart_reveal();
        Transition::Moved { from, to }
    }

    fn finish(&mut self) -> Transition {
        self.state = SequencerState::Finished;
        self.elapsed = Duration::ZERO;
        self.paused = false;
        self.reveal = TimelineCursor::default();
        Transition::Finished
    }

    fn restart_reveal(&mut self) {
        let timeline = self
            .current_slide()
            .and_then(|slide| self.timelines.get(&slide).cloned())
            .unwrap_or_default();
        self.reveal.restart(timeline);
    }
}

impl Default for SlideSequencer {
    fn default() -> Self {
        Self::new(DEFAULT_AUTO_ADVANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_starts_at_intro() {
        let seq = SlideSequencer::default();
        assert_eq!(seq.state(), SequencerState::Showing(Slide::Intro));
        assert!(!seq.is_paused());
    }

    #[test]
    fn test_forward_walks_every_slide_then_finishes() {
        let mut seq = SlideSequencer::default();
        for window in Slide::ALL.windows(2) {
            assert_eq!(
                seq.handle(SequencerEvent::Forward),
                Transition::Moved {
                    from: window[0],
                    to: window[1]
                }
            );
        }
        assert_eq!(seq.state(), SequencerState::Showing(Slide::Share));
        assert_eq!(seq.handle(SequencerEvent::Forward), Transition::Finished);
        assert!(seq.is_finished());
        assert_eq!(seq.handle(SequencerEvent::Forward), Transition::Stay);
        assert_eq!(seq.handle(SequencerEvent::Back), Transition::Stay);
    }

    #[test]
    fn test_back_from_intro_is_noop() {
        let mut seq = SlideSequencer::default();
        assert_eq!(seq.handle(SequencerEvent::Back), Transition::Stay);
        seq.handle(SequencerEvent::Forward);
        assert_eq!(
            seq.handle(SequencerEvent::Back),
            Transition::Moved {
                from: Slide::TotalWatched,
                to: Slide::Intro
            }
        );
    }

    #[test]
    fn test_auto_advance_after_interval() {
        let mut seq = SlideSequencer::new(secs(5));
        assert_eq!(seq.handle(SequencerEvent::Tick(secs(4))), Transition::Stay);
        assert_eq!(
            seq.handle(SequencerEvent::Tick(secs(1))),
            Transition::Moved {
                from: Slide::Intro,
                to: Slide::TotalWatched
            }
        );
        assert_eq!(seq.elapsed(), Duration::ZERO);

        // One huge tick still moves only one slide
        seq.handle(SequencerEvent::Tick(secs(60)));
        assert_eq!(seq.state(), SequencerState::Showing(Slide::TopGenre));
    }

    #[test]
    fn test_auto_advance_never_leaves_share() {
        let mut seq = SlideSequencer::new(secs(1));
        for _ in 0..50 {
            seq.handle(SequencerEvent::Tick(secs(1)));
        }
        assert_eq!(seq.state(), SequencerState::Showing(Slide::Share));
    }

    #[test]
    fn test_long_press_holds_timer() {
        let mut seq = SlideSequencer::new(secs(5));
        seq.handle(SequencerEvent::Tick(secs(3)));
        seq.handle(SequencerEvent::PressStart);
        assert!(seq.is_paused());
        assert_eq!(seq.handle(SequencerEvent::Tick(secs(30))), Transition::Stay);
        assert_eq!(seq.state(), SequencerState::Showing(Slide::Intro));
        assert_eq!(seq.elapsed(), secs(3));

        seq.handle(SequencerEvent::PressEnd);
        assert!(matches!(
            seq.handle(SequencerEvent::Tick(secs(2))),
            Transition::Moved { .. }
        ));
    }

    #[test]
    fn test_manual_move_clears_pause() {
        let mut seq = SlideSequencer::default();
        seq.handle(SequencerEvent::PressStart);
        seq.handle(SequencerEvent::Forward);
        assert!(!seq.is_paused());
    }

    #[test]
    fn test_close_from_anywhere() {
        let mut seq = SlideSequencer::default();
        seq.handle(SequencerEvent::Forward);
        seq.handle(SequencerEvent::Forward);
        assert_eq!(seq.handle(SequencerEvent::Close), Transition::Finished);
        assert!(seq.is_finished());
        assert_eq!(seq.current_slide(), None);
    }

    #[test]
    fn test_reveal_follows_slide_timeline() {
        let ms = Duration::from_millis;
        let mut timelines = HashMap::new();
        timelines.insert(Slide::Intro, Timeline::staggered(2, ms(0), ms(500)));
        timelines.insert(Slide::TotalWatched, Timeline::instant(3));

        let mut seq = SlideSequencer::new(secs(5)).with_timelines(timelines);
        assert_eq!(seq.visible_fields(), 1);
        seq.handle(SequencerEvent::Tick(ms(500)));
        assert_eq!(seq.visible_fields(), 2);

        seq.handle(SequencerEvent::Forward);
        assert_eq!(seq.visible_fields(), 3);

        // No timeline registered
        seq.handle(SequencerEvent::Forward);
        assert_eq!(seq.visible_fields(), 0);

        seq.handle(SequencerEvent::Back);
        assert_eq!(seq.visible_fields(), 3);
    }
}
