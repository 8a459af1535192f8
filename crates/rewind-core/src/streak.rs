use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Longest run of consecutive calendar days in `dates` (duplicates ignored)
pub fn longest_streak<I>(dates: I) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let distinct: BTreeSet<NaiveDate> = dates.into_iter().collect();

    let mut longest = 0;
    let mut current = 0;
    let mut previous: Option<NaiveDate> = None;
    for date in distinct {
        current = match previous.and_then(|p| p.succ_opt()) {
            Some(next) if next == date => current + 1,
            _ => 1,
        };
        longest = longest.max(current);
        previous = Some(date);
    }
    longest
}
