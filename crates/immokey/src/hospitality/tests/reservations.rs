use super::common::*;

use crate::hospitality::availability::AvailabilityError;
use crate::hospitality::domain::{BookingChannel, BookingStatus, PaymentStatus, RoomId};
use crate::hospitality::reservations::ReservationError;

#[test]
fn create_prices_and_stores_a_pending_booking() {
    let (service, bookings, _) = build_service();

    let booking = service
        .create(request(date(2024, 3, 10), date(2024, 3, 13)))
        .expect("booking accepted");

    assert_eq!(booking.nights, 3);
    assert_eq!(booking.price_per_night, 50_000);
    assert_eq!(booking.subtotal, 150_000);
    assert_eq!(booking.total_amount, 150_000);
    assert_eq!(booking.taxes, 0);
    assert_eq!(booking.fees, 0);
    assert_eq!(booking.discount, 0);
    assert_eq!(booking.currency, "XOF");
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.payment_status, PaymentStatus::Pending);
    assert_eq!(bookings.stored(), 1);
}

#[test]
fn overlapping_request_is_rejected_without_partial_state() {
    let (service, bookings, _) = build_service();

    service
        .create(request(date(2024, 3, 10), date(2024, 3, 13)))
        .expect("first booking accepted");

    let error = service
        .create(request(date(2024, 3, 12), date(2024, 3, 15)))
        .expect_err("overlap rejected");

    assert!(matches!(
        error,
        ReservationError::Availability(AvailabilityError::SlotTaken { .. })
    ));
    assert_eq!(bookings.stored(), 1);
}

#[test]
fn same_day_turnover_is_accepted() {
    let (service, bookings, _) = build_service();

    service
        .create(request(date(2024, 3, 10), date(2024, 3, 13)))
        .expect("first booking accepted");
    service
        .create(request(date(2024, 3, 13), date(2024, 3, 16)))
        .expect("turnover booking accepted");

    assert_eq!(bookings.stored(), 2);
}

#[test]
fn degenerate_date_ranges_are_rejected() {
    let (service, bookings, _) = build_service();

    for (check_in, check_out) in [
        (date(2024, 3, 10), date(2024, 3, 10)),
        (date(2024, 3, 13), date(2024, 3, 10)),
    ] {
        let error = service
            .create(request(check_in, check_out))
            .expect_err("degenerate range rejected");
        assert!(matches!(
            error,
            ReservationError::Availability(AvailabilityError::InvalidDateRange(_))
        ));
    }
    assert_eq!(bookings.stored(), 0);
}

#[test]
fn unknown_room_is_unavailable() {
    let (service, _, _) = build_service();

    let mut missing = request(date(2024, 3, 10), date(2024, 3, 13));
    missing.room_id = RoomId("room-999999".to_string());

    let error = service.create(missing).expect_err("unknown room rejected");
    assert!(matches!(
        error,
        ReservationError::Availability(AvailabilityError::RoomUnavailable(_))
    ));
}

#[test]
fn public_channel_requires_the_public_booking_flag() {
    let (service, bookings, _) = build_service_with(establishment(false));

    let error = service
        .create(request(date(2024, 3, 10), date(2024, 3, 13)))
        .expect_err("public channel gated");
    assert!(matches!(
        error,
        ReservationError::Availability(AvailabilityError::RoomUnavailable(_))
    ));
    assert_eq!(bookings.stored(), 0);

    let mut back_office = request(date(2024, 3, 10), date(2024, 3, 13));
    back_office.channel = BookingChannel::BackOffice;
    service
        .create(back_office)
        .expect("back office bypasses the flag");
    assert_eq!(bookings.stored(), 1);
}

#[test]
fn cancelling_releases_the_slot() {
    let (service, _, _) = build_service();

    let booking = service
        .create(request(date(2024, 3, 10), date(2024, 3, 13)))
        .expect("booking accepted");
    service.cancel(&booking.id).expect("cancel pending booking");

    service
        .create(request(date(2024, 3, 10), date(2024, 3, 13)))
        .expect("released slot can be rebooked");
}

#[test]
fn lifecycle_walks_forward_and_stops_at_checkout() {
    let (service, _, _) = build_service();

    let booking = service
        .create(request(date(2024, 3, 10), date(2024, 3, 13)))
        .expect("booking accepted");

    let confirmed = service.confirm(&booking.id).expect("confirm");
    assert_eq!(confirmed.status, BookingStatus::Confirmed);

    let checked_in = service.check_in(&booking.id).expect("check in");
    assert_eq!(checked_in.status, BookingStatus::CheckedIn);

    let checked_out = service.check_out(&booking.id).expect("check out");
    assert_eq!(checked_out.status, BookingStatus::CheckedOut);

    let error = service
        .confirm(&booking.id)
        .expect_err("checked-out booking is immutable");
    assert!(matches!(error, ReservationError::InvalidTransition { .. }));
}

#[test]
fn skipping_confirmation_is_an_invalid_transition() {
    let (service, _, _) = build_service();

    let booking = service
        .create(request(date(2024, 3, 10), date(2024, 3, 13)))
        .expect("booking accepted");

    let error = service
        .check_in(&booking.id)
        .expect_err("pending booking cannot check in");
    assert!(matches!(
        error,
        ReservationError::InvalidTransition {
            from: BookingStatus::Pending,
            to: BookingStatus::CheckedIn,
            ..
        }
    ));
}

#[test]
fn no_show_is_reachable_from_confirmed_only() {
    let (service, _, _) = build_service();

    let booking = service
        .create(request(date(2024, 3, 10), date(2024, 3, 13)))
        .expect("booking accepted");

    let error = service
        .mark_no_show(&booking.id)
        .expect_err("pending booking cancels instead of no-showing");
    assert!(matches!(error, ReservationError::InvalidTransition { .. }));

    service.confirm(&booking.id).expect("confirm");
    let no_show = service.mark_no_show(&booking.id).expect("mark no-show");
    assert_eq!(no_show.status, BookingStatus::NoShow);
}

#[test]
fn payment_capture_is_recorded_and_idempotent() {
    let (service, _, payments) = build_service();

    let booking = service
        .create(request(date(2024, 3, 10), date(2024, 3, 13)))
        .expect("booking accepted");

    let paid = service.capture_payment(&booking.id).expect("capture");
    assert_eq!(paid.payment_status, PaymentStatus::Paid);
    let reference = paid.payment_reference.clone().expect("reference stored");

    let again = service.capture_payment(&booking.id).expect("idempotent");
    assert_eq!(again.payment_reference.as_deref(), Some(reference.as_str()));
    assert_eq!(payments.captures(), vec![(150_000, "XOF".to_string())]);
}

#[test]
fn declined_payment_leaves_the_booking_unchanged() {
    let (service, bookings, _) = build_service();
    let booking = service
        .create(request(date(2024, 3, 10), date(2024, 3, 13)))
        .expect("booking accepted");

    let declining = std::sync::Arc::new(DecliningPayments);
    let service = std::sync::Arc::new(crate::hospitality::reservations::ReservationService::new(
        MemoryEstablishments::seeded(establishment(true)),
        MemoryRooms::seeded(room()),
        bookings.clone(),
        declining,
    ));

    let error = service
        .capture_payment(&booking.id)
        .expect_err("capture declined");
    assert!(matches!(error, ReservationError::Payment(_)));

    let unchanged = service.booking(&booking.id).expect("booking still there");
    assert_eq!(unchanged.payment_status, PaymentStatus::Pending);
    assert!(unchanged.payment_reference.is_none());
}

#[test]
fn quotes_do_not_store_anything() {
    let (service, bookings, _) = build_service();

    let quote = service
        .quote(&room().id, date(2024, 3, 10), date(2024, 3, 13))
        .expect("quote");
    assert_eq!(quote.nights, 3);
    assert_eq!(quote.subtotal, 150_000);
    assert_eq!(quote.total, 150_000);
    assert_eq!(bookings.stored(), 0);
}
