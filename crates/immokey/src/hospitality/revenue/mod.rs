//! Revenue aggregation over paid bookings.
//!
//! Aggregation is pure and order-independent: paid bookings are bucketed by
//! check-in date into a `BTreeMap`, so re-running it over the same booking
//! set yields identical buckets regardless of input ordering. "Now" is always
//! passed in by the caller; nothing in this module reads a clock.

mod bucket;
pub mod views;

pub use bucket::Granularity;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Datelike, Duration, Months, NaiveDate};

use crate::auth::{AuthContext, AuthError};

use super::domain::{Booking, InvalidDateRange, PaymentStatus};
use super::repository::{BookingRepository, RepositoryError};
use bucket::bucket_key;
use views::{RevenuePoint, RevenueReportView};

/// Half-open reporting window `[start, end)` over check-in dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl ReportingWindow {
    pub fn explicit(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidDateRange> {
        if end <= start {
            return Err(InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Default lookback anchored at `today`: 30 days for daily buckets, 90
    /// days for weekly, and twelve calendar months (snapped to the first of
    /// the month) for monthly. The window ends the day after `today` so
    /// today's check-ins are included.
    pub fn lookback(granularity: Granularity, today: NaiveDate) -> Self {
        let end = today + Duration::days(1);
        let start = match granularity {
            Granularity::Day => end - Duration::days(30),
            Granularity::Week => end - Duration::days(90),
            Granularity::Month => first_of_month(today) - Months::new(11),
        };
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RevenueBucket {
    pub revenue: i64,
    pub bookings: usize,
}

#[derive(Debug, Clone)]
pub struct RevenueReport {
    pub granularity: Granularity,
    pub window: ReportingWindow,
    pub buckets: BTreeMap<String, RevenueBucket>,
}

/// Headline numbers over the bucketed series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevenueSummary {
    pub total: i64,
    pub average: f64,
    pub growth_pct: f64,
}

impl RevenueReport {
    pub fn summary(&self) -> RevenueSummary {
        let total: i64 = self.buckets.values().map(|bucket| bucket.revenue).sum();

        let average = if self.buckets.is_empty() {
            0.0
        } else {
            total as f64 / self.buckets.len() as f64
        };

        RevenueSummary {
            total,
            average,
            growth_pct: self.growth_pct(),
        }
    }

    /// Percentage change of the last bucket against the one before it.
    /// Exactly zero with fewer than two buckets or a zero prior bucket, so
    /// the figure is never NaN or infinite.
    fn growth_pct(&self) -> f64 {
        let revenues: Vec<i64> = self.buckets.values().map(|bucket| bucket.revenue).collect();
        let [.., prev, last] = revenues.as_slice() else {
            return 0.0;
        };
        if *prev == 0 {
            return 0.0;
        }
        ((*last - *prev) as f64 / *prev as f64) * 100.0
    }

    pub fn to_view(&self) -> RevenueReportView {
        let summary = self.summary();
        let points = self
            .buckets
            .iter()
            .map(|(bucket, aggregate)| RevenuePoint {
                bucket: bucket.clone(),
                revenue: aggregate.revenue,
                bookings: aggregate.bookings,
            })
            .collect();

        RevenueReportView {
            granularity: self.granularity,
            granularity_label: self.granularity.label(),
            window_start: self.window.start(),
            window_end: self.window.end(),
            points,
            total_revenue: summary.total,
            average_per_bucket: summary.average,
            growth_pct: summary.growth_pct,
        }
    }
}

/// Bucket paid bookings whose check-in falls inside the window. Unpaid,
/// partially paid, and refunded bookings never contribute.
pub fn aggregate(
    granularity: Granularity,
    window: &ReportingWindow,
    bookings: &[Booking],
) -> RevenueReport {
    let mut buckets: BTreeMap<String, RevenueBucket> = BTreeMap::new();

    for booking in bookings {
        if booking.payment_status != PaymentStatus::Paid {
            continue;
        }
        let check_in = booking.stay.check_in();
        if !window.contains(check_in) {
            continue;
        }

        let entry = buckets.entry(bucket_key(granularity, check_in)).or_default();
        entry.revenue += booking.total_amount;
        entry.bookings += 1;
    }

    RevenueReport {
        granularity,
        window: *window,
        buckets,
    }
}

/// Report facade scoped to one authenticated owner. The establishment scoping
/// itself lives behind [`BookingRepository::paid_for_owner`]; it is the
/// backend's access policy, not a local filter.
pub struct RevenueService<B> {
    bookings: Arc<B>,
}

impl<B> RevenueService<B>
where
    B: BookingRepository + 'static,
{
    pub fn new(bookings: Arc<B>) -> Self {
        Self { bookings }
    }

    pub fn report(
        &self,
        caller: &AuthContext,
        granularity: Granularity,
        window: Option<ReportingWindow>,
        today: NaiveDate,
    ) -> Result<RevenueReportView, RevenueError> {
        let identity = caller.require()?;
        let window = window.unwrap_or_else(|| ReportingWindow::lookback(granularity, today));
        let paid = self.bookings.paid_for_owner(identity, &window)?;
        Ok(aggregate(granularity, &window, &paid).to_view())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RevenueError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Window(#[from] InvalidDateRange),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
