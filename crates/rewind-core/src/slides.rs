//! The twelve Wrapped slides and how each one renders a summary.

use rewind_models::{weekday_name, AggregatedPeriodSummary, RankedEntity, TimeOfDay, TopTitle};
use std::fmt;
use std::time::Duration;

use crate::timeline::{RevealStep, Timeline};

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// Delay before the first line of a slide appears
pub const REVEAL_LEAD_IN: Duration = Duration::from_millis(300);
/// Gap between consecutive lines
pub const REVEAL_STAGGER: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slide {
    Intro,
    TotalWatched,
    TopGenre,
    TopMovie,
    TopTv,
    TopActors,
    TopDirectors,
    Rating,
    HoursWatched,
    ViewingPatterns,
    FunFacts,
    Share,
}

impl Slide {
    pub const ALL: [Slide; 12] = [
        Slide::Intro,
        Slide::TotalWatched,
        Slide::TopGenre,
        Slide::TopMovie,
        Slide::TopTv,
        Slide::TopActors,
        Slide::TopDirectors,
        Slide::Rating,
        Slide::HoursWatched,
        Slide::ViewingPatterns,
        Slide::FunFacts,
        Slide::Share,
    ];

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    /// `None` after Share
    pub fn next(&self) -> Option<Slide> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// `None` at Intro
    pub fn previous(&self) -> Option<Slide> {
        self.index().checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn title(&self) -> &'static str {
        match self {
            Slide::Intro => "Your Rewind",
            Slide::TotalWatched => "Total Watched",
            Slide::TopGenre => "Top Genre",
            Slide::TopMovie => "Top Movie",
            Slide::TopTv => "Top TV Show",
            Slide::TopActors => "Top Actors",
            Slide::TopDirectors => "Top Directors",
            Slide::Rating => "Average Rating",
            Slide::HoursWatched => "Hours Watched",
            Slide::ViewingPatterns => "Viewing Patterns",
            Slide::FunFacts => "Fun Facts",
            Slide::Share => "Share",
        }
    }
}

impl fmt::Display for Slide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// What a front end draws for one slide.
///
/// `empty` marks the defined no-data state; `lines` then holds the message
/// to show instead of statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideView {
    pub slide: Slide,
    pub title: String,
    pub lines: Vec<String>,
    pub empty: bool,
}

impl SlideView {
    fn filled(slide: Slide, lines: Vec<String>) -> Self {
        Self {
            slide,
            title: slide.title().to_string(),
            lines,
            empty: false,
        }
    }

    fn empty(slide: Slide, message: &str) -> Self {
        Self {
            slide,
            title: slide.title().to_string(),
            lines: vec![message.to_string()],
            empty: true,
        }
    }

    /// Title counts as the first field
    pub fn field_count(&self) -> usize {
        1 + self.lines.len()
    }

    /// Title immediately, then lines one by one. Empty states show at once.
    pub fn reveal_timeline(&self) -> Timeline {
        if self.empty {
            return Timeline::instant(self.field_count());
        }
        let mut steps = vec![RevealStep {
            delay: Duration::ZERO,
            visible_fields_delta: 1,
        }];
        steps.extend(self.lines.iter().enumerate().map(|(i, _)| RevealStep {
            delay: if i == 0 { REVEAL_LEAD_IN } else { REVEAL_STAGGER },
            visible_fields_delta: 1,
        }));
        Timeline::new(steps)
    }
}

pub fn render(slide: Slide, summary: &AggregatedPeriodSummary) -> SlideView {
    if summary.fetch_failed && slide != Slide::Intro && slide != Slide::Share {
        return SlideView::empty(slide, "Couldn't load your diary. Try again later.");
    }

    match slide {
        Slide::Intro => render_intro(summary),
        Slide::TotalWatched => render_totals(summary),
        Slide::TopGenre => match &summary.top_genre {
            Some(genre) => SlideView::filled(
                slide,
                vec![
                    genre.name.clone(),
                    format!("{} {}", genre.count, plural(genre.count, "watch", "watches")),
                ],
            ),
            None => SlideView::empty(slide, "No genres to rank yet"),
        },
        Slide::TopMovie => match &summary.top_movie {
            Some(top) => SlideView::filled(slide, title_lines(top)),
            None => SlideView::empty(slide, "No movies logged this period"),
        },
        Slide::TopTv => match &summary.top_tv_show {
            Some(top) => SlideView::filled(slide, title_lines(top)),
            None => SlideView::empty(slide, "No episodes logged this period"),
        },
        Slide::TopActors => ranked_view(slide, &summary.top_actors, "No cast data yet"),
        Slide::TopDirectors => ranked_view(slide, &summary.top_directors, "No director data yet"),
        Slide::Rating => match summary.average_rating {
            Some(avg) => SlideView::filled(
                slide,
                vec![format!("{:.1} / 10", avg), "across everything you rated".to_string()],
            ),
            None => SlideView::empty(slide, "Nothing rated yet"),
        },
        Slide::HoursWatched => {
            if summary.is_empty() {
                SlideView::empty(slide, "No watch time logged yet")
            } else {
                SlideView::filled(
                    slide,
                    vec![format!(
                        "{} {}",
                        summary.total_hours,
                        plural(summary.total_hours, "hour", "hours")
                    )],
                )
            }
        }
        Slide::ViewingPatterns => render_patterns(summary),
        Slide::FunFacts => {
            if summary.fun_facts.is_empty() {
                SlideView::empty(slide, "Watch a little more to unlock fun facts")
            } else {
                SlideView::filled(slide, summary.fun_facts.iter().map(|f| f.to_string()).collect())
            }
        }
        Slide::Share => {
            if summary.is_empty() {
                SlideView::empty(slide, "Nothing to share yet")
            } else {
                SlideView::filled(slide, vec!["Share your Rewind with friends".to_string()])
            }
        }
    }
}

fn render_intro(summary: &AggregatedPeriodSummary) -> SlideView {
    let period = summary.period.label().to_string();
    if summary.fetch_failed {
        return SlideView::empty(Slide::Intro, "Couldn't load your diary. Try again later.");
    }
    if summary.is_empty() {
        return SlideView::empty(Slide::Intro, "Nothing logged yet. Go watch something!");
    }
    SlideView::filled(Slide::Intro, vec![period, "Let's look back".to_string()])
}

fn render_totals(summary: &AggregatedPeriodSummary) -> SlideView {
    if summary.is_empty() {
        return SlideView::empty(Slide::TotalWatched, "Nothing watched yet");
    }
    SlideView::filled(
        Slide::TotalWatched,
        vec![
            format!(
                "{} {}",
                summary.total_entries,
                plural(summary.total_entries, "title", "titles")
            ),
            format!(
                "{} {}",
                summary.total_movies,
                plural(summary.total_movies, "movie", "movies")
            ),
            format!(
                "{} {}",
                summary.total_episodes,
                plural(summary.total_episodes, "episode", "episodes")
            ),
        ],
    )
}

fn render_patterns(summary: &AggregatedPeriodSummary) -> SlideView {
    let patterns = &summary.viewing_patterns;
    let mut lines = Vec::new();

    if let Some(weekday) = patterns.busiest_weekday {
        lines.push(format!("Busiest day: {}", weekday_name(weekday)));
    }
    if let Some(time) = patterns.busiest_time_of_day {
        lines.push(format!("You watch most in the {}", time_phrase(time)));
    }
    if patterns.longest_streak > 0 {
        lines.push(format!(
            "Longest streak: {} {}",
            patterns.longest_streak,
            plural(patterns.longest_streak, "day", "days")
        ));
    }
    if let Some((year, month)) = patterns.busiest_month {
        if let Some(name) = month.checked_sub(1).and_then(|i| MONTH_NAMES.get(i as usize)) {
            lines.push(format!("Busiest month: {} {}", name, year));
        }
    }

    if lines.is_empty() {
        SlideView::empty(Slide::ViewingPatterns, "No viewing patterns yet")
    } else {
        SlideView::filled(Slide::ViewingPatterns, lines)
    }
}

fn time_phrase(time: TimeOfDay) -> String {
    match time {
        TimeOfDay::Night => "late night hours".to_string(),
        other => other.to_string(),
    }
}

fn title_lines(top: &TopTitle) -> Vec<String> {
    let mut lines = vec![
        top.title.clone(),
        format!("{} {}", top.watch_count, plural(top.watch_count, "watch", "watches")),
    ];
    if let Some(rating) = top.best_rating {
        lines.push(format!("Rated {:.1}", rating));
    }
    lines
}

fn ranked_view(slide: Slide, ranked: &[RankedEntity], empty_message: &str) -> SlideView {
    if ranked.is_empty() {
        return SlideView::empty(slide, empty_message);
    }
    let lines = ranked
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {} ({})", i + 1, r.name, r.count))
        .collect();
    SlideView::filled(slide, lines)
}

fn plural<'a>(count: u32, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}
