//! Folds diary rows into an [`AggregatedPeriodSummary`].
//!
//! Everything here is pure: the same entries in the same order always give the
//! same summary. Ranking ties go to whatever appeared first in the input, and
//! the fetch layer hands rows over sorted by watched date then id.

use chrono::{FixedOffset, Offset, Utc};
use rewind_config::WrappedConfig;
use rewind_models::{
    AggregatedPeriodSummary, DateRange, DiaryEntry, MediaDetails, MediaRef, Period,
    RankedEntity, TopTitle,
};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::fun_facts::fun_facts;
use crate::patterns::viewing_patterns;
use crate::ranking::Tally;

/// Metadata per title, used for genres/cast/crew the diary row doesn't carry
pub type CreditsIndex = HashMap<MediaRef, MediaDetails>;

#[derive(Debug, Clone)]
pub struct Aggregator {
    pub top_n: usize,
    /// Only the first `cast_depth` billed actors of a title are counted
    pub cast_depth: usize,
    pub utc_offset: FixedOffset,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(5, 10)
    }
}

impl Aggregator {
    pub fn new(top_n: usize, cast_depth: usize) -> Self {
        Self {
            top_n,
            cast_depth,
            utc_offset: Utc.fix(),
        }
    }

    pub fn from_config(config: &WrappedConfig) -> Self {
        Self::new(config.top_n, config.cast_depth)
    }

    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    pub fn aggregate(
        &self,
        period: Period,
        range: &DateRange,
        entries: &[DiaryEntry],
        credits: &CreditsIndex,
    ) -> AggregatedPeriodSummary {
        let entries: Vec<DiaryEntry> = entries
            .iter()
            .filter(|e| range.contains(e.watched_date))
            .cloned()
            .collect();

        if entries.is_empty() {
            return AggregatedPeriodSummary::empty(period);
        }

        let total_movies = entries.iter().filter(|e| e.is_movie()).count() as u32;
        let total_episodes = entries.iter().filter(|e| e.is_episode()).count() as u32;

        let minutes: u64 = entries
            .iter()
            .filter_map(|e| e.runtime_minutes)
            .map(u64::from)
            .sum();
        let total_hours = (minutes as f64 / 60.0).round() as u32;

        let ratings: Vec<f64> = entries
            .iter()
            .filter_map(|e| e.normalized_rating())
            .map(f64::from)
            .collect();
        let average_rating = if ratings.is_empty() {
            None
        } else {
            let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
            Some((mean * 10.0).round() / 10.0)
        };

        let mut genres: Tally<String> = Tally::new();
        let mut actors: Tally<String> = Tally::new();
        let mut directors: Tally<String> = Tally::new();
        for entry in &entries {
            let details = credits.get(&entry.media_ref());

            let entry_genres: &[String] = if !entry.genres.is_empty() {
                &entry.genres
            } else {
                details.map(|d| d.genres.as_slice()).unwrap_or(&[])
            };
            add_once(&mut genres, entry_genres.iter());

            if let Some(details) = details {
                add_once(&mut actors, details.cast.iter().take(self.cast_depth));
                add_once(&mut directors, details.directors.iter());
            }
        }

        let top_movie = top_title(entries.iter().filter(|e| e.is_movie()));
        let top_tv_show = top_title(entries.iter().filter(|e| e.is_episode()));
        let viewing_patterns = viewing_patterns(&entries, self.utc_offset);
        let facts = fun_facts(&entries, total_hours, &viewing_patterns, top_movie.as_ref());

        debug!(
            "Aggregated {} entries for {}: {} movies, {} episodes, {}h",
            entries.len(),
            period,
            total_movies,
            total_episodes,
            total_hours
        );

        AggregatedPeriodSummary {
            period,
            total_entries: entries.len() as u32,
            total_movies,
            total_episodes,
            total_hours,
            average_rating,
            top_genre: genres.top().map(|(name, count)| RankedEntity { name: name.clone(), count }),
            top_movie,
            top_tv_show,
            top_actors: ranked(&actors, self.top_n),
            top_directors: ranked(&directors, self.top_n),
            viewing_patterns,
            fun_facts: facts,
            fetch_failed: false,
        }
    }
}

/// Count each distinct name once per entry
fn add_once<'a>(tally: &mut Tally<String>, names: impl Iterator<Item = &'a String>) {
    let mut seen: HashSet<&str> = HashSet::new();
    for name in names {
        let trimmed = name.trim();
        if !trimmed.is_empty() && seen.insert(trimmed) {
            tally.add(trimmed.to_string());
        }
    }
}

fn ranked(tally: &Tally<String>, n: usize) -> Vec<RankedEntity> {
    tally
        .top_n(n)
        .into_iter()
        .map(|(name, count)| RankedEntity { name, count })
        .collect()
}

/// Most-logged title; ties go to the better rating, then to the first seen
fn top_title<'a>(entries: impl Iterator<Item = &'a DiaryEntry>) -> Option<TopTitle> {
    let mut titles: Vec<TopTitle> = Vec::new();
    let mut index: HashMap<u32, usize> = HashMap::new();

    for entry in entries {
        let rating = entry.normalized_rating();
        match index.get(&entry.media_id) {
            Some(&i) => {
                let title = &mut titles[i];
                title.watch_count += 1;
                if is_better_rating(rating, title.best_rating) {
                    title.best_rating = rating;
                }
                if title.poster.is_none() {
                    title.poster = entry.poster.clone();
                }
            }
            None => {
                index.insert(entry.media_id, titles.len());
                titles.push(TopTitle {
                    media_id: entry.media_id,
                    title: entry.media_title.clone(),
                    poster: entry.poster.clone(),
                    watch_count: 1,
                    best_rating: rating,
                });
            }
        }
    }

    let mut best: Option<&TopTitle> = None;
    for title in &titles {
        let wins = match best {
            None => true,
            Some(current) => {
                title.watch_count > current.watch_count
                    || (title.watch_count == current.watch_count
                        && is_better_rating(title.best_rating, current.best_rating))
            }
        };
        if wins {
            best = Some(title);
        }
    }
    best.cloned()
}

fn is_better_rating(candidate: Option<f32>, current: Option<f32>) -> bool {
    match (candidate, current) {
        (Some(a), Some(b)) => a > b,
        (Some(_), None) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests;
