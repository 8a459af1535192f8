use futures::stream::{self, StreamExt};
use rewind_models::{DiaryEntry, MediaRef};
use rewind_sources::MetadataProvider;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::aggregator::CreditsIndex;

/// Concurrent metadata lookups per enrichment pass
const LOOKUP_CONCURRENCY: usize = 8;

/// Look up every distinct title once and fill in missing runtime/genres.
///
/// A row whose diary runtime is null takes the provider's runtime here, so it
/// counts toward total hours only when metadata is enabled. Without
/// enrichment such rows contribute nothing.
///
/// Lookup failures are logged and skipped; the affected entries simply stay
/// as they came from the diary.
pub async fn enrich(entries: &mut [DiaryEntry], provider: &dyn MetadataProvider) -> CreditsIndex {
    let mut seen = HashSet::new();
    let refs: Vec<MediaRef> = entries
        .iter()
        .map(|e| e.media_ref())
        .filter(|r| seen.insert(*r))
        .collect();

    if refs.is_empty() {
        return CreditsIndex::new();
    }
    debug!("Enriching {} distinct titles", refs.len());

    let results: Vec<_> = stream::iter(refs)
        .map(|media| async move { (media, provider.details(media).await) })
        .buffer_unordered(LOOKUP_CONCURRENCY)
        .collect()
        .await;

    let mut credits = CreditsIndex::new();
    let mut failures = 0;
    for (media, result) in results {
        match result {
            Ok(details) => {
                credits.insert(media, details);
            }
            Err(e) => {
                failures += 1;
                warn!("Metadata lookup failed for {:?} {}: {}", media.kind, media.media_id, e);
            }
        }
    }
    if failures > 0 {
        warn!("{} metadata lookups failed; statistics may be incomplete", failures);
    }

    for entry in entries.iter_mut() {
        if let Some(details) = credits.get(&entry.media_ref()) {
            if entry.runtime_minutes.is_none() {
                entry.runtime_minutes = details.runtime_minutes;
            }
            if entry.genres.is_empty() {
                entry.genres = details.genres.clone();
            }
            if entry.poster.is_none() {
                entry.poster = details.poster_path.clone();
            }
        }
    }

    credits
}
