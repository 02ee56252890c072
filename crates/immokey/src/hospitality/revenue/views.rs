use chrono::NaiveDate;
use serde::Serialize;

use super::Granularity;

/// One bucket of the time series, ascending by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevenuePoint {
    pub bucket: String,
    pub revenue: i64,
    pub bookings: usize,
}

/// Serializable report: the ordered series plus the headline numbers.
#[derive(Debug, Clone, Serialize)]
pub struct RevenueReportView {
    pub granularity: Granularity,
    pub granularity_label: &'static str,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub points: Vec<RevenuePoint>,
    pub total_revenue: i64,
    pub average_per_bucket: f64,
    pub growth_pct: f64,
}
