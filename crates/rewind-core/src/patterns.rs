use chrono::{Datelike, FixedOffset, Timelike, Weekday};
use rewind_models::{DiaryEntry, TimeOfDay, ViewingPatterns};
use std::collections::BTreeSet;

use crate::ranking::Tally;
use crate::streak::longest_streak;

/// Weekday, time-of-day and streak statistics for a set of entries.
///
/// `offset` converts `created_at` into the viewer's local hour.
pub fn viewing_patterns(entries: &[DiaryEntry], offset: FixedOffset) -> ViewingPatterns {
    let mut weekdays: Tally<Weekday> = Tally::new();
    let mut times: Tally<TimeOfDay> = Tally::new();
    let mut months: Tally<(i32, u32)> = Tally::new();

    for entry in entries {
        weekdays.add(entry.watched_date.weekday());
        months.add((entry.watched_date.year(), entry.watched_date.month()));
        if let Some(created_at) = entry.created_at {
            let hour = created_at.with_timezone(&offset).hour();
            times.add(TimeOfDay::from_hour(hour));
        }
    }

    let mut weekday_counts = [0u32; 7];
    for (weekday, count) in weekdays.iter() {
        weekday_counts[weekday.num_days_from_monday() as usize] = count;
    }

    let mut time_of_day_counts = [0u32; 4];
    for (time, count) in times.iter() {
        time_of_day_counts[time.index()] = count;
    }

    let days: BTreeSet<_> = entries.iter().map(|e| e.watched_date).collect();

    ViewingPatterns {
        busiest_weekday: weekdays.top().map(|(w, _)| *w),
        weekday_counts,
        busiest_time_of_day: times.top().map(|(t, _)| *t),
        time_of_day_counts,
        longest_streak: longest_streak(days.iter().copied()),
        days_watched: days.len() as u32,
        busiest_month: months.top().map(|(m, _)| *m),
    }
}
