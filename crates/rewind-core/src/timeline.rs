//! Declarative staggered reveals.
//!
//! A [`Timeline`] is a list of steps, each saying "after `delay`, show
//! `visible_fields_delta` more fields". Delays are relative to the previous
//! step. [`TimelineCursor`] plays one timeline against elapsed time.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealStep {
    pub delay: Duration,
    pub visible_fields_delta: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Timeline {
    steps: Vec<RevealStep>,
}

impl Timeline {
    pub fn new(steps: Vec<RevealStep>) -> Self {
        Self { steps }
    }

    /// Everything visible at once
    pub fn instant(fields: usize) -> Self {
        Self::new(vec![RevealStep {
            delay: Duration::ZERO,
            visible_fields_delta: fields,
        }])
    }

    /// First field after `initial`, then one more every `stagger`
    pub fn staggered(fields: usize, initial: Duration, stagger: Duration) -> Self {
        let steps = (0..fields)
            .map(|i| RevealStep {
                delay: if i == 0 { initial } else { stagger },
                visible_fields_delta: 1,
            })
            .collect();
        Self::new(steps)
    }

    pub fn total_fields(&self) -> usize {
        self.steps.iter().map(|s| s.visible_fields_delta).sum()
    }

    pub fn visible_at(&self, elapsed: Duration) -> usize {
        let mut at = Duration::ZERO;
        let mut visible = 0;
        for step in &self.steps {
            at += step.delay;
            if at > elapsed {
                break;
            }
            visible += step.visible_fields_delta;
        }
        visible
    }
}

/// Plays a timeline; time only moves through [`advance`](Self::advance)
#[derive(Debug, Clone, Default)]
pub struct TimelineCursor {
    timeline: Timeline,
    elapsed: Duration,
}

impl TimelineCursor {
    pub fn new(timeline: Timeline) -> Self {
        Self {
            timeline,
            elapsed: Duration::ZERO,
        }
    }

    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    pub fn restart(&mut self, timeline: Timeline) {
        self.timeline = timeline;
        self.elapsed = Duration::ZERO;
    }

    pub fn visible_fields(&self) -> usize {
        self.timeline.visible_at(self.elapsed)
    }

    pub fn is_complete(&self) -> bool {
        self.visible_fields() >= self.timeline.total_fields()
    }
}
