use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Human-readable one-hour booking window, e.g. "09:00 - 10:00".
///
/// Equality is exact string match. Labels are zero-padded 24h ranges, so
/// the derived lexicographic ordering coincides with start-time ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotLabel(String);

impl SlotLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Start time parsed from the leading "HH:MM" token, or `None` for a
    /// label that does not follow the catalog format.
    pub fn start_time(&self) -> Option<NaiveTime> {
        let start = self.0.split(" - ").next()?;
        NaiveTime::parse_from_str(start, "%H:%M").ok()
    }
}

impl fmt::Display for SlotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const MONDAY_TO_WEDNESDAY: &[&str] = &[
    "09:00 - 10:00",
    "10:00 - 11:00",
    "11:00 - 12:00",
    "12:00 - 13:00",
    "13:00 - 14:00",
    "14:00 - 15:00",
];

const THURSDAY_FRIDAY: &[&str] = &[
    "09:00 - 10:00",
    "10:00 - 11:00",
    "11:00 - 12:00",
    "12:00 - 13:00",
    "13:00 - 14:00",
    "14:00 - 15:00",
    "15:00 - 16:00",
];

const SATURDAY: &[&str] = &[
    "09:00 - 10:00",
    "10:00 - 11:00",
    "11:00 - 12:00",
    "12:00 - 13:00",
];

/// All potential slots for a date, determined solely by its weekday.
/// Sundays are closed. Total over all valid dates.
pub fn slots_for_date(date: NaiveDate) -> Vec<SlotLabel> {
    let labels: &[&str] = match date.weekday() {
        Weekday::Mon | Weekday::Tue | Weekday::Wed => MONDAY_TO_WEDNESDAY,
        Weekday::Thu | Weekday::Fri => THURSDAY_FRIDAY,
        Weekday::Sat => SATURDAY,
        Weekday::Sun => &[],
    };
    labels.iter().map(|label| SlotLabel::new(*label)).collect()
}
