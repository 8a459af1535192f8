use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed aggregation windows for statistics
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Today,
    Week,
    #[default]
    Month,
    AllTime,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Today => "today",
            Period::Week => "week",
            Period::Month => "month",
            Period::AllTime => "all_time",
        }
    }

    /// Human label used in slide headings and share text
    pub fn label(&self) -> &'static str {
        match self {
            Period::Today => "Today",
            Period::Week => "This Week",
            Period::Month => "This Month",
            Period::AllTime => "All Time",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" | "day" => Ok(Period::Today),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "all_time" | "all-time" | "alltime" | "all" => Ok(Period::AllTime),
            other => Err(format!(
                "Invalid period: {}. Use 'today', 'week', 'month', or 'all-time'",
                other
            )),
        }
    }
}

/// Inclusive range of watched dates; `from == None` means no lower bound
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date <= self.to && self.from.map_or(true, |from| date >= from)
    }
}
