use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::period::Period;

/// Derived statistics for one period. Never persisted; recomputed from diary rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregatedPeriodSummary {
    pub period: Period,
    pub total_entries: u32,
    pub total_movies: u32,
    pub total_episodes: u32,
    pub total_hours: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_genre: Option<RankedEntity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_movie: Option<TopTitle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_tv_show: Option<TopTitle>,
    pub top_actors: Vec<RankedEntity>,
    pub top_directors: Vec<RankedEntity>,
    pub viewing_patterns: ViewingPatterns,
    pub fun_facts: Vec<FunFact>,
    /// Set when the fetch failed and this summary is the empty stand-in
    #[serde(default)]
    pub fetch_failed: bool,
}

impl AggregatedPeriodSummary {
    /// The "no data" summary: zero counts, no top picks
    pub fn empty(period: Period) -> Self {
        Self {
            period,
            total_entries: 0,
            total_movies: 0,
            total_episodes: 0,
            total_hours: 0,
            average_rating: None,
            top_genre: None,
            top_movie: None,
            top_tv_show: None,
            top_actors: Vec::new(),
            top_directors: Vec::new(),
            viewing_patterns: ViewingPatterns::default(),
            fun_facts: Vec::new(),
            fetch_failed: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_entries == 0
    }
}

/// A named thing (genre, actor, director) and how often it appeared
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RankedEntity {
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopTitle {
    pub media_id: u32,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    pub watch_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_rating: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ViewingPatterns {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub busiest_weekday: Option<Weekday>,
    /// Entry counts indexed Monday (0) through Sunday (6)
    pub weekday_counts: [u32; 7],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub busiest_time_of_day: Option<TimeOfDay>,
    /// Entry counts indexed by `TimeOfDay::index`
    pub time_of_day_counts: [u32; 4],
    pub longest_streak: u32,
    pub days_watched: u32,
    /// (year, month) with the most entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub busiest_month: Option<(i32, u32)>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TimeOfDay {
    Morning,   // 05-11
    Afternoon, // 12-16
    Evening,   // 17-21
    Night,     // 22-04
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=21 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            TimeOfDay::Morning => 0,
            TimeOfDay::Afternoon => 1,
            TimeOfDay::Evening => 2,
            TimeOfDay::Night => 3,
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "late night",
        };
        write!(f, "{}", s)
    }
}

/// One-line trivia shown on the fun facts slide
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FunFact {
    LongestStreak { days: u32 },
    DaysOfFootage { days: u32 },
    MostRewatched { title: String, times: u32 },
    HighestRated { title: String, rating: f32 },
    FirstWatch { title: String, date: NaiveDate },
    BusiestWeekday { weekday: Weekday, count: u32 },
}

impl fmt::Display for FunFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunFact::LongestStreak { days } => {
                write!(f, "You watched something {} days in a row", days)
            }
            FunFact::DaysOfFootage { days } => {
                let unit = if *days == 1 { "day" } else { "days" };
                write!(f, "That's {} full {} of screen time", days, unit)
            }
            FunFact::MostRewatched { title, times } => {
                write!(f, "You couldn't stop watching {} ({} times)", title, times)
            }
            FunFact::HighestRated { title, rating } => {
                write!(f, "Your highest rating went to {} ({:.1}/10)", title, rating)
            }
            FunFact::FirstWatch { title, date } => {
                write!(f, "It all started with {} on {}", title, date.format("%b %-d, %Y"))
            }
            FunFact::BusiestWeekday { weekday, count } => {
                write!(f, "{} is your movie night ({} watches)", weekday_name(*weekday), count)
            }
        }
    }
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
