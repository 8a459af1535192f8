pub mod diary;
pub mod media;
pub mod period;
pub mod summary;

pub use diary::{sort_chronologically, DiaryEntry, EntryKind};
pub use media::{MediaDetails, MediaKind, MediaRef};
pub use period::{DateRange, Period};
pub use summary::{weekday_name, AggregatedPeriodSummary, FunFact, RankedEntity, TimeOfDay, TopTitle, ViewingPatterns};
