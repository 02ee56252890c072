use super::common::*;

use std::sync::Arc;

use crate::auth::AuthContext;
use crate::hospitality::revenue::{Granularity, ReportingWindow, RevenueError, RevenueService};

fn paid_booking_on(service: &MemoryReservationService, check_in: chrono::NaiveDate) {
    let booking = service
        .create(request(check_in, check_in + chrono::Duration::days(2)))
        .expect("booking accepted");
    service.confirm(&booking.id).expect("confirm");
    service.capture_payment(&booking.id).expect("capture");
}

#[test]
fn report_requires_an_authenticated_caller() {
    let (_, bookings, _) = build_service();
    let revenue = RevenueService::new(bookings);

    let error = revenue
        .report(
            &AuthContext::Anonymous,
            Granularity::Month,
            None,
            date(2024, 3, 15),
        )
        .expect_err("anonymous caller rejected");

    assert!(matches!(error, RevenueError::Auth(_)));
}

#[test]
fn report_covers_only_the_callers_establishments() {
    let (service, bookings, _) = build_service();
    paid_booking_on(&service, date(2024, 3, 4));
    paid_booking_on(&service, date(2024, 3, 11));

    let revenue = RevenueService::new(bookings);
    let window = ReportingWindow::explicit(date(2024, 3, 1), date(2024, 4, 1)).expect("window");

    let own = revenue
        .report(
            &AuthContext::authenticated(OWNER),
            Granularity::Month,
            Some(window),
            date(2024, 3, 15),
        )
        .expect("owner report");
    assert_eq!(own.total_revenue, 200_000);
    assert_eq!(own.points.len(), 1);
    assert_eq!(own.points[0].bookings, 2);

    let other = revenue
        .report(
            &AuthContext::authenticated("user-000099"),
            Granularity::Month,
            Some(window),
            date(2024, 3, 15),
        )
        .expect("stranger report");
    assert_eq!(other.total_revenue, 0);
    assert!(other.points.is_empty());
}

#[test]
fn report_defaults_to_the_granularity_lookback() {
    let (service, bookings, _) = build_service();
    // Inside the 30-day daily lookback from 2024-03-15.
    paid_booking_on(&service, date(2024, 3, 4));
    // Months earlier, outside it.
    paid_booking_on(&service, date(2023, 11, 6));

    let revenue = RevenueService::new(bookings);
    let report = revenue
        .report(
            &AuthContext::authenticated(OWNER),
            Granularity::Day,
            None,
            date(2024, 3, 15),
        )
        .expect("daily report");

    assert_eq!(report.points.len(), 1);
    assert_eq!(report.points[0].bucket, "2024-03-04");
    assert_eq!(report.total_revenue, 100_000);
}

#[test]
fn unpaid_bookings_never_reach_the_report() {
    let (service, bookings, _) = build_service();

    let unpaid = service
        .create(request(date(2024, 3, 4), date(2024, 3, 6)))
        .expect("booking accepted");
    service.confirm(&unpaid.id).expect("confirm");

    let revenue = RevenueService::new(bookings);
    let report = revenue
        .report(
            &AuthContext::authenticated(OWNER),
            Granularity::Month,
            None,
            date(2024, 3, 15),
        )
        .expect("report");

    assert_eq!(report.total_revenue, 0);
    assert!(report.points.is_empty());
}

#[test]
fn backend_outage_propagates() {
    let revenue = RevenueService::new(Arc::new(UnavailableBookings));

    let error = revenue
        .report(
            &AuthContext::authenticated(OWNER),
            Granularity::Week,
            None,
            date(2024, 3, 15),
        )
        .expect_err("outage surfaces");

    assert!(matches!(error, RevenueError::Repository(_)));
}
