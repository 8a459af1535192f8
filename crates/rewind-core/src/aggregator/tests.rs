use super::*;
use chrono::{NaiveDate, TimeZone};
use rewind_models::{EntryKind, FunFact, MediaKind};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

fn all_time() -> DateRange {
    DateRange { from: None, to: day(31) }
}

fn movie(id: &str, media_id: u32, title: &str, d: u32) -> DiaryEntry {
    DiaryEntry {
        id: id.to_string(),
        user_id: "user-1".to_string(),
        media_id,
        media_title: title.to_string(),
        poster: None,
        watched_date: day(d),
        rating: None,
        notes: None,
        runtime_minutes: None,
        kind: EntryKind::Movie,
        genres: Vec::new(),
        created_at: None,
    }
}

fn episode(id: &str, show_id: u32, show: &str, d: u32, number: u32) -> DiaryEntry {
    DiaryEntry {
        kind: EntryKind::Episode { season: 1, episode: number },
        ..movie(id, show_id, show, d)
    }
}

fn details(media: MediaRef, cast: &[&str], directors: &[&str], genres: &[&str]) -> MediaDetails {
    MediaDetails {
        media,
        title: String::new(),
        poster_path: None,
        runtime_minutes: None,
        genres: genres.iter().map(|s| s.to_string()).collect(),
        cast: cast.iter().map(|s| s.to_string()).collect(),
        directors: directors.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn test_empty_input_yields_no_data_summary() {
    let summary = Aggregator::default().aggregate(
        Period::Month,
        &all_time(),
        &[],
        &CreditsIndex::new(),
    );
    assert_eq!(summary.total_movies, 0);
    assert_eq!(summary.total_episodes, 0);
    assert_eq!(summary.total_hours, 0);
    assert_eq!(summary.average_rating, None);
    assert!(summary.top_genre.is_none());
    assert!(summary.top_movie.is_none());
    assert!(summary.top_tv_show.is_none());
    assert!(summary.top_actors.is_empty());
    assert!(summary.top_directors.is_empty());
    assert!(summary.fun_facts.is_empty());
    assert_eq!(summary.viewing_patterns.longest_streak, 0);
    assert_eq!(summary.period, Period::Month);
}

#[test]
fn test_average_rating_ignores_unrated_entries() {
    let mut a = movie("1", 1, "A", 1);
    a.rating = Some(8.0);
    let b = movie("2", 2, "B", 2);
    let mut c = movie("3", 3, "C", 3);
    c.rating = Some(6.0);

    let summary = Aggregator::default().aggregate(
        Period::AllTime,
        &all_time(),
        &[a, b, c],
        &CreditsIndex::new(),
    );
    assert_eq!(summary.average_rating, Some(7.0));
}

#[test]
fn test_average_rating_rounds_to_one_decimal() {
    let ratings = [7.0, 8.0, 8.0];
    let entries: Vec<DiaryEntry> = ratings
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let mut e = movie(&i.to_string(), i as u32, "M", 1);
            e.rating = Some(*r);
            e
        })
        .collect();
    let summary = Aggregator::default().aggregate(
        Period::AllTime,
        &all_time(),
        &entries,
        &CreditsIndex::new(),
    );
    assert_eq!(summary.average_rating, Some(7.7));
}

#[test]
fn test_hours_skip_missing_runtime_but_count_entry() {
    let mut a = movie("1", 1, "A", 1);
    a.runtime_minutes = Some(120);
    let mut b = movie("2", 2, "B", 2);
    b.runtime_minutes = Some(45);
    let c = movie("3", 3, "C", 3);

    let summary = Aggregator::default().aggregate(
        Period::AllTime,
        &all_time(),
        &[a, b, c],
        &CreditsIndex::new(),
    );
    assert_eq!(summary.total_hours, 3);
    assert_eq!(summary.total_movies, 3);
}

#[test]
fn test_counts_split_movies_and_episodes() {
    let entries = vec![
        movie("1", 1, "A", 1),
        episode("2", 10, "Show", 1, 1),
        episode("3", 10, "Show", 2, 2),
    ];
    let summary = Aggregator::default().aggregate(
        Period::AllTime,
        &all_time(),
        &entries,
        &CreditsIndex::new(),
    );
    assert_eq!(summary.total_movies, 1);
    assert_eq!(summary.total_episodes, 2);
    assert_eq!(summary.total_entries, 3);
    let show = summary.top_tv_show.unwrap();
    assert_eq!(show.title, "Show");
    assert_eq!(show.watch_count, 2);
}

#[test]
fn test_entries_outside_range_are_ignored() {
    let mut early = movie("1", 1, "Early", 1);
    early.runtime_minutes = Some(600);
    let mut late = movie("2", 2, "Late", 20);
    late.runtime_minutes = Some(60);

    let range = DateRange { from: Some(day(10)), to: day(31) };
    let summary = Aggregator::default().aggregate(
        Period::Month,
        &range,
        &[early, late],
        &CreditsIndex::new(),
    );
    assert_eq!(summary.total_movies, 1);
    assert_eq!(summary.total_hours, 1);
}

#[test]
fn test_top_genre_tie_goes_to_first_seen() {
    let genres = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    let mut a = movie("1", 1, "A", 1);
    a.genres = genres(&["Horror"]);
    let mut b = movie("2", 2, "B", 2);
    b.genres = genres(&["Comedy"]);
    let mut c = movie("3", 3, "C", 3);
    c.genres = genres(&["Comedy", "Horror"]);

    let summary = Aggregator::default().aggregate(
        Period::AllTime,
        &all_time(),
        &[a, b, c],
        &CreditsIndex::new(),
    );
    assert_eq!(
        summary.top_genre,
        Some(RankedEntity { name: "Horror".to_string(), count: 2 })
    );
}

#[test]
fn test_genres_fall_back_to_metadata() {
    let entries = vec![movie("1", 1, "A", 1), movie("2", 2, "B", 2)];
    let mut credits = CreditsIndex::new();
    credits.insert(MediaRef::movie(1), details(MediaRef::movie(1), &[], &[], &["Drama"]));
    credits.insert(MediaRef::movie(2), details(MediaRef::movie(2), &[], &[], &["Drama", "Drama"]));

    let summary = Aggregator::default().aggregate(Period::AllTime, &all_time(), &entries, &credits);
    assert_eq!(
        summary.top_genre,
        Some(RankedEntity { name: "Drama".to_string(), count: 2 })
    );
}

#[test]
fn test_top_actors_and_directors() {
    let entries = vec![
        movie("1", 1, "John Wick", 1),
        movie("2", 2, "The Matrix", 2),
        movie("3", 3, "Speed", 3),
    ];
    let mut credits = CreditsIndex::new();
    credits.insert(
        MediaRef::movie(1),
        details(MediaRef::movie(1), &["Keanu Reeves", "Ian McShane"], &["Chad Stahelski"], &[]),
    );
    credits.insert(
        MediaRef::movie(2),
        details(MediaRef::movie(2), &["Keanu Reeves", "Carrie-Anne Moss"], &["Lana Wachowski"], &[]),
    );
    credits.insert(
        MediaRef::movie(3),
        details(MediaRef::movie(3), &["Keanu Reeves", "Sandra Bullock"], &["Jan de Bont"], &[]),
    );

    let aggregator = Aggregator::new(2, 10);
    let summary = aggregator.aggregate(Period::AllTime, &all_time(), &entries, &credits);
    assert_eq!(
        summary.top_actors,
        vec![
            RankedEntity { name: "Keanu Reeves".to_string(), count: 3 },
            RankedEntity { name: "Ian McShane".to_string(), count: 1 },
        ]
    );
    assert_eq!(summary.top_directors.len(), 2);
    assert_eq!(summary.top_directors[0].name, "Chad Stahelski");
}

#[test]
fn test_cast_depth_limits_counted_actors() {
    let entries = vec![movie("1", 1, "A", 1)];
    let mut credits = CreditsIndex::new();
    credits.insert(
        MediaRef::movie(1),
        details(MediaRef::movie(1), &["Lead", "Second", "Extra"], &[], &[]),
    );

    let summary = Aggregator::new(5, 2).aggregate(Period::AllTime, &all_time(), &entries, &credits);
    let names: Vec<&str> = summary.top_actors.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Lead", "Second"]);
}

#[test]
fn test_episodes_use_show_credits() {
    let entries = vec![episode("1", 10, "Show", 1, 1), episode("2", 10, "Show", 2, 2)];
    let mut credits = CreditsIndex::new();
    let show = MediaRef { media_id: 10, kind: MediaKind::Tv };
    credits.insert(show, details(show, &["Star"], &["Creator"], &["Drama"]));
    // Same numeric id as a movie must not be confused with the show
    credits.insert(MediaRef::movie(10), details(MediaRef::movie(10), &["Wrong"], &[], &[]));

    let summary = Aggregator::default().aggregate(Period::AllTime, &all_time(), &entries, &credits);
    assert_eq!(summary.top_actors[0], RankedEntity { name: "Star".to_string(), count: 2 });
    assert_eq!(summary.top_directors[0].name, "Creator");
}

#[test]
fn test_top_movie_prefers_rewatches_then_rating() {
    let mut a = movie("1", 1, "Alien", 1);
    a.rating = Some(7.0);
    let mut b = movie("2", 2, "Heat", 2);
    b.rating = Some(9.0);
    let c = movie("3", 3, "Ronin", 3);

    let summary = Aggregator::default().aggregate(
        Period::AllTime,
        &all_time(),
        &[a.clone(), b.clone(), c.clone()],
        &CreditsIndex::new(),
    );
    assert_eq!(summary.top_movie.unwrap().title, "Heat");

    let mut rewatch = movie("4", 3, "Ronin", 4);
    rewatch.rating = Some(6.0);
    let summary = Aggregator::default().aggregate(
        Period::AllTime,
        &all_time(),
        &[a, b, c, rewatch],
        &CreditsIndex::new(),
    );
    let top = summary.top_movie.unwrap();
    assert_eq!(top.title, "Ronin");
    assert_eq!(top.watch_count, 2);
    assert_eq!(top.best_rating, Some(6.0));
    assert!(summary
        .fun_facts
        .contains(&FunFact::MostRewatched { title: "Ronin".to_string(), times: 2 }));
}

#[test]
fn test_streak_and_busiest_weekday() {
    // Mon 4th through Thu 7th, then Sat 9th
    let entries: Vec<DiaryEntry> = [4, 5, 6, 7, 9]
        .iter()
        .map(|d| movie(&d.to_string(), *d, "M", *d))
        .collect();
    let summary = Aggregator::default().aggregate(
        Period::AllTime,
        &all_time(),
        &entries,
        &CreditsIndex::new(),
    );
    assert_eq!(summary.viewing_patterns.longest_streak, 4);
    assert_eq!(summary.viewing_patterns.days_watched, 5);
    // Every weekday appears once: first seen (Monday) wins
    assert_eq!(summary.viewing_patterns.busiest_weekday, Some(chrono::Weekday::Mon));
}

#[test]
fn test_time_of_day_uses_configured_offset() {
    let mut entry = movie("1", 1, "A", 1);
    entry.created_at = Some(chrono::Utc.with_ymd_and_hms(2024, 3, 1, 3, 0, 0).unwrap());

    let offset = FixedOffset::west_opt(5 * 3600).unwrap();
    let summary = Aggregator::default()
        .with_utc_offset(offset)
        .aggregate(Period::AllTime, &all_time(), &[entry], &CreditsIndex::new());
    // 03:00 UTC is 22:00 the evening before at UTC-5
    assert_eq!(
        summary.viewing_patterns.busiest_time_of_day,
        Some(rewind_models::TimeOfDay::Night)
    );
}

#[test]
fn test_aggregation_is_deterministic() {
    let mut entries = Vec::new();
    for d in 1..=10 {
        let mut e = movie(&d.to_string(), d % 3, "M", d);
        e.genres = vec![format!("G{}", d % 2)];
        e.runtime_minutes = Some(90);
        e.rating = Some((d % 10) as f32);
        entries.push(e);
    }
    let aggregator = Aggregator::default();
    let first = aggregator.aggregate(Period::AllTime, &all_time(), &entries, &CreditsIndex::new());
    let second = aggregator.aggregate(Period::AllTime, &all_time(), &entries, &CreditsIndex::new());
    assert_eq!(first, second);
}
