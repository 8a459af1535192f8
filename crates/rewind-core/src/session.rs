use chrono::NaiveDate;
use rewind_config::UserSession;
use rewind_models::{AggregatedPeriodSummary, Period};
use rewind_sources::SourceError;
use std::collections::HashMap;
use std::time::Duration;
use tracing::info;

use crate::pipeline::SummaryPipeline;
use crate::sequencer::{SequencerEvent, SequencerState, SlideSequencer, Transition};
use crate::slides::{render, Slide, SlideView};

/// One open Wrapped run: the summary it was built from and where the user is.
///
/// Opening always re-runs the pipeline; closing drops everything.
#[derive(Debug)]
pub struct WrappedSession {
    summary: AggregatedPeriodSummary,
    views: HashMap<Slide, SlideView>,
    sequencer: SlideSequencer,
}

impl WrappedSession {
    /// Fetch and aggregate afresh, then start at Intro.
    ///
    /// Returns the fetch error alongside the session; the session itself
    /// still opens (on the empty summary) so the error slide can be shown.
    pub async fn open(
        pipeline: &SummaryPipeline,
        session: &UserSession,
        period: Period,
        today: NaiveDate,
        auto_advance: Duration,
    ) -> (Self, Option<SourceError>) {
        let outcome = pipeline.run(session, period, today).await;
        (Self::from_summary(outcome.summary, auto_advance), outcome.error)
    }

    pub fn from_summary(summary: AggregatedPeriodSummary, auto_advance: Duration) -> Self {
        let views: HashMap<Slide, SlideView> = Slide::ALL
            .iter()
            .map(|&slide| (slide, render(slide, &summary)))
            .collect();
        let timelines = views
            .iter()
            .map(|(slide, view)| (*slide, view.reveal_timeline()))
            .collect();
        let sequencer = SlideSequencer::new(auto_advance).with_timelines(timelines);

        info!(
            "Opened {} Rewind with {} entries",
            summary.period, summary.total_entries
        );
        Self {
            summary,
            views,
            sequencer,
        }
    }

    pub fn handle(&mut self, event: SequencerEvent) -> Transition {
        self.sequencer.handle(event)
    }

    pub fn state(&self) -> SequencerState {
        self.sequencer.state()
    }

    pub fn is_finished(&self) -> bool {
        self.sequencer.is_finished()
    }

    pub fn is_paused(&self) -> bool {
        self.sequencer.is_paused()
    }

    pub fn summary(&self) -> &AggregatedPeriodSummary {
        &self.summary
    }

    pub fn current_view(&self) -> Option<&SlideView> {
        self.sequencer
            .current_slide()
            .and_then(|slide| self.views.get(&slide))
    }

    /// Lines revealed so far on the current slide (title excluded)
    pub fn visible_lines(&self) -> &[String] {
        match self.current_view() {
            Some(view) => {
                let shown = self.sequencer.visible_fields().saturating_sub(1);
                &view.lines[..shown.min(view.lines.len())]
            }
            None => &[],
        }
    }

    pub fn close(mut self) {
        self.sequencer.handle(SequencerEvent::Close);
        info!("Closed {} Rewind", self.summary.period);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::Aggregator;
    use async_trait::async_trait;
    use rewind_models::{DateRange, DiaryEntry, EntryKind};
    use rewind_sources::DiaryRepository;
    use std::sync::Arc;

    struct Diary(Vec<DiaryEntry>);

    #[async_trait]
    impl DiaryRepository for Diary {
        fn source_name(&self) -> &str {
            "memory"
        }

        async fn fetch_entries(
            &self,
            _session: &UserSession,
            range: DateRange,
        ) -> Result<Vec<DiaryEntry>, SourceError> {
            Ok(self
                .0
                .iter()
                .filter(|e| range.contains(e.watched_date))
                .cloned()
                .collect())
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
    }

    fn session() -> UserSession {
        UserSession::new("user-1", "token")
    }

    fn entry(id: &str, day: u32) -> DiaryEntry {
        DiaryEntry {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            media_id: 603,
            media_title: "The Matrix".to_string(),
            poster: None,
            watched_date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            rating: Some(9.0),
            notes: None,
            runtime_minutes: Some(136),
            kind: EntryKind::Movie,
            genres: vec!["Action".to_string()],
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_zero_entries_reach_share_in_empty_state() {
        let pipeline = SummaryPipeline::new(Arc::new(Diary(Vec::new())), Aggregator::default());
        let (mut wrapped, error) =
            WrappedSession::open(&pipeline, &session(), Period::Month, today(), Duration::from_secs(5))
                .await;
        assert!(error.is_none());

        let mut seen = Vec::new();
        for _ in 0..100 {
            let view = wrapped.current_view().unwrap();
            assert!(view.empty, "{} should be empty", view.slide);
            if !seen.contains(&view.slide) {
                seen.push(view.slide);
            }
            if view.slide == Slide::Share {
                break;
            }
            wrapped.handle(SequencerEvent::Tick(Duration::from_secs(5)));
        }
        assert_eq!(seen, Slide::ALL.to_vec());
        assert_eq!(wrapped.state(), SequencerState::Showing(Slide::Share));
        wrapped.close();
    }

    #[tokio::test]
    async fn test_reopen_restarts_at_intro() {
        let pipeline = SummaryPipeline::new(
            Arc::new(Diary(vec![entry("1", 18), entry("2", 19)])),
            Aggregator::default(),
        );
        let (mut first, _) =
            WrappedSession::open(&pipeline, &session(), Period::Month, today(), Duration::from_secs(5))
                .await;
        first.handle(SequencerEvent::Forward);
        first.handle(SequencerEvent::Forward);
        assert_eq!(first.summary().total_movies, 2);
        first.close();

        let (second, _) =
            WrappedSession::open(&pipeline, &session(), Period::Month, today(), Duration::from_secs(5))
                .await;
        assert_eq!(second.state(), SequencerState::Showing(Slide::Intro));
        assert_eq!(second.summary().total_movies, 2);
    }

    #[test]
    fn test_visible_lines_follow_reveal() {
        let mut summary = AggregatedPeriodSummary::empty(Period::Week);
        summary.total_entries = 2;
        summary.total_movies = 2;
        let mut wrapped = WrappedSession::from_summary(summary, Duration::from_secs(5));
        wrapped.handle(SequencerEvent::Forward);

        assert_eq!(wrapped.current_view().unwrap().slide, Slide::TotalWatched);
        assert!(wrapped.visible_lines().is_empty());
        wrapped.handle(SequencerEvent::Tick(crate::slides::REVEAL_LEAD_IN));
        assert_eq!(wrapped.visible_lines(), ["2 titles".to_string()]);
        wrapped.handle(SequencerEvent::Tick(Duration::from_secs(2)));
        assert_eq!(wrapped.visible_lines().len(), 3);
    }

    #[test]
    fn test_closed_session_has_no_view() {
        let mut wrapped =
            WrappedSession::from_summary(AggregatedPeriodSummary::empty(Period::Today), Duration::from_secs(5));
        wrapped.handle(SequencerEvent::Close);
        assert!(wrapped.is_finished());
        assert!(wrapped.current_view().is_none());
        assert!(wrapped.visible_lines().is_empty());
    }
}
