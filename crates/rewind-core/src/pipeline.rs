use chrono::NaiveDate;
use rewind_config::UserSession;
use rewind_models::{AggregatedPeriodSummary, Period};
use rewind_sources::{DiaryRepository, MetadataProvider, SourceError};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::aggregator::{Aggregator, CreditsIndex};
use crate::enrich::enrich;
use crate::period::date_range;

/// Result of one fetch-and-aggregate pass.
///
/// A failed fetch still produces a summary (the empty one, flagged
/// `fetch_failed`); the error rides along for whoever wants to show it.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub summary: AggregatedPeriodSummary,
    pub error: Option<SourceError>,
}

/// Fetch → enrich → aggregate for one user and period
pub struct SummaryPipeline {
    diary: Arc<dyn DiaryRepository>,
    metadata: Option<Arc<dyn MetadataProvider>>,
    aggregator: Aggregator,
}

impl SummaryPipeline {
    pub fn new(diary: Arc<dyn DiaryRepository>, aggregator: Aggregator) -> Self {
        Self {
            diary,
            metadata: None,
            aggregator,
        }
    }

    pub fn with_metadata(mut self, metadata: Arc<dyn MetadataProvider>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub async fn run(&self, session: &UserSession, period: Period, today: NaiveDate) -> PipelineOutcome {
        let start = Instant::now();
        let range = date_range(period, today);

        let mut entries = match self.diary.fetch_entries(session, range).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Diary fetch from {} failed: {}", self.diary.source_name(), e);
                let mut summary = AggregatedPeriodSummary::empty(period);
                summary.fetch_failed = true;
                return PipelineOutcome {
                    summary,
                    error: Some(e),
                };
            }
        };

        let credits = match &self.metadata {
            Some(provider) => enrich(&mut entries, provider.as_ref()).await,
            None => CreditsIndex::new(),
        };

        let summary = self.aggregator.aggregate(period, &range, &entries, &credits);
        info!(
            "Built {} summary from {} entries in {:?}",
            period,
            entries.len(),
            start.elapsed()
        );

        PipelineOutcome {
            summary,
            error: None,
        }
    }
}
