use rewind_models::{DiaryEntry, FunFact, TopTitle, ViewingPatterns};

/// Trivia for the fun facts slide. Each fact only appears when there is data for it.
pub fn fun_facts(
    entries: &[DiaryEntry],
    total_hours: u32,
    patterns: &ViewingPatterns,
    top_movie: Option<&TopTitle>,
) -> Vec<FunFact> {
    let mut facts = Vec::new();

    // min_by_key returns the first minimum, matching first-seen tie order
    if let Some(first) = entries.iter().min_by_key(|e| e.watched_date) {
        facts.push(FunFact::FirstWatch {
            title: first.media_title.clone(),
            date: first.watched_date,
        });
    }

    if patterns.longest_streak >= 2 {
        facts.push(FunFact::LongestStreak { days: patterns.longest_streak });
    }

    if let Some(weekday) = patterns.busiest_weekday {
        let count = patterns.weekday_counts[weekday.num_days_from_monday() as usize];
        if count >= 2 {
            facts.push(FunFact::BusiestWeekday { weekday, count });
        }
    }

    if let Some(movie) = top_movie.filter(|m| m.watch_count >= 2) {
        facts.push(FunFact::MostRewatched {
            title: movie.title.clone(),
            times: movie.watch_count,
        });
    }

    let mut highest: Option<(&DiaryEntry, f32)> = None;
    for entry in entries {
        if let Some(rating) = entry.normalized_rating() {
            if highest.map_or(true, |(_, best)| rating > best) {
                highest = Some((entry, rating));
            }
        }
    }
    if let Some((entry, rating)) = highest {
        facts.push(FunFact::HighestRated {
            title: entry.media_title.clone(),
            rating,
        });
    }

    if total_hours >= 24 {
        facts.push(FunFact::DaysOfFootage { days: total_hours / 24 });
    }

    facts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};
    use rewind_models::EntryKind;

    fn entry(title: &str, day: u32, rating: Option<f32>) -> DiaryEntry {
        DiaryEntry {
            id: day.to_string(),
            user_id: "u".to_string(),
            media_id: day,
            media_title: title.to_string(),
            poster: None,
            watched_date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            rating,
            notes: None,
            runtime_minutes: None,
            kind: EntryKind::Movie,
            genres: Vec::new(),
            created_at: None,
        }
    }

    #[test]
    fn test_no_facts_without_entries() {
        let facts = fun_facts(&[], 0, &ViewingPatterns::default(), None);
        assert!(facts.is_empty());
    }

    #[test]
    fn test_highest_rated_keeps_first_on_tie() {
        let entries = vec![
            entry("Heat", 3, Some(9.0)),
            entry("Alien", 1, None),
            entry("Ronin", 5, Some(9.0)),
        ];
        let facts = fun_facts(&entries, 5, &ViewingPatterns::default(), None);
        assert!(facts.contains(&FunFact::HighestRated { title: "Heat".to_string(), rating: 9.0 }));
        assert!(facts.contains(&FunFact::FirstWatch {
            title: "Alien".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        }));
        assert!(!facts.iter().any(|f| matches!(f, FunFact::DaysOfFootage { .. })));
    }

    #[test]
    fn test_threshold_facts() {
        let patterns = ViewingPatterns {
            busiest_weekday: Some(Weekday::Sat),
            weekday_counts: [0, 0, 0, 0, 0, 3, 0],
            longest_streak: 3,
            ..ViewingPatterns::default()
        };
        let top = TopTitle {
            media_id: 1,
            title: "Paddington 2".to_string(),
            poster: None,
            watch_count: 3,
            best_rating: None,
        };
        let facts = fun_facts(&[], 50, &patterns, Some(&top));
        assert_eq!(
            facts,
            vec![
                FunFact::LongestStreak { days: 3 },
                FunFact::BusiestWeekday { weekday: Weekday::Sat, count: 3 },
                FunFact::MostRewatched { title: "Paddington 2".to_string(), times: 3 },
                FunFact::DaysOfFootage { days: 2 },
            ]
        );
    }
}
