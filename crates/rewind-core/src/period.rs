use chrono::{Datelike, Duration, Local, NaiveDate};
use rewind_models::{DateRange, Period};

/// Inclusive watched-date range for `period`, ending today.
///
/// Weeks start on Monday and months on the 1st; all-time has no lower bound.
pub fn date_range(period: Period, today: NaiveDate) -> DateRange {
    let from = match period {
        Period::Today => Some(today),
        Period::Week => {
            let offset = today.weekday().num_days_from_monday() as i64;
            Some(today - Duration::days(offset))
        }
        Period::Month => today.with_day(1),
        Period::AllTime => None,
    };
    DateRange { from, to: today }
}

pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}
