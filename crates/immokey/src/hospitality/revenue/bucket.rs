use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Reporting period size. Week buckets follow the ISO calendar, so every
/// week starts on Monday and carries the ISO week-year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Day => "Daily",
            Self::Week => "Weekly",
            Self::Month => "Monthly",
        }
    }
}

/// Bucket key for a check-in date. Keys are zero-padded so lexicographic
/// order equals chronological order, which is what lets the report store
/// buckets in a `BTreeMap` keyed by string.
pub(crate) fn bucket_key(granularity: Granularity, date: NaiveDate) -> String {
    match granularity {
        Granularity::Day => date.format("%Y-%m-%d").to_string(),
        Granularity::Week => {
            let week = date.iso_week();
            format!("{:04}-W{:02}", week.year(), week.week())
        }
        Granularity::Month => format!("{:04}-{:02}", date.year(), date.month()),
    }
}
