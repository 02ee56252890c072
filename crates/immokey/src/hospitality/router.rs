use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::availability::AvailabilityError;
use super::domain::{Booking, BookingId, RoomId};
use super::repository::{
    BookingRepository, EstablishmentRepository, PaymentError, PaymentGateway, RepositoryError,
    RoomRepository,
};
use super::reservations::{ReservationError, ReservationRequest, ReservationService};

/// Router builder exposing the reservation surface: quoting, booking, the
/// lifecycle transitions, and payment capture.
pub fn reservation_router<E, R, B, P>(service: Arc<ReservationService<E, R, B, P>>) -> Router
where
    E: EstablishmentRepository + 'static,
    R: RoomRepository + 'static,
    B: BookingRepository + 'static,
    P: PaymentGateway + 'static,
{
    Router::new()
        .route(
            "/api/v1/rooms/:room_id/availability",
            get(quote_handler::<E, R, B, P>),
        )
        .route("/api/v1/bookings", post(create_handler::<E, R, B, P>))
        .route(
            "/api/v1/bookings/:booking_id",
            get(status_handler::<E, R, B, P>),
        )
        .route(
            "/api/v1/bookings/:booking_id/confirm",
            post(confirm_handler::<E, R, B, P>),
        )
        .route(
            "/api/v1/bookings/:booking_id/check-in",
            post(check_in_handler::<E, R, B, P>),
        )
        .route(
            "/api/v1/bookings/:booking_id/check-out",
            post(check_out_handler::<E, R, B, P>),
        )
        .route(
            "/api/v1/bookings/:booking_id/cancel",
            post(cancel_handler::<E, R, B, P>),
        )
        .route(
            "/api/v1/bookings/:booking_id/no-show",
            post(no_show_handler::<E, R, B, P>),
        )
        .route(
            "/api/v1/bookings/:booking_id/payment",
            post(payment_handler::<E, R, B, P>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct AvailabilityQuery {
    pub(crate) check_in: NaiveDate,
    pub(crate) check_out: NaiveDate,
}

pub(crate) async fn quote_handler<E, R, B, P>(
    State(service): State<Arc<ReservationService<E, R, B, P>>>,
    Path(room_id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> Response
where
    E: EstablishmentRepository + 'static,
    R: RoomRepository + 'static,
    B: BookingRepository + 'static,
    P: PaymentGateway + 'static,
{
    let room_id = RoomId(room_id);
    match service.quote(&room_id, query.check_in, query.check_out) {
        Ok(quote) => (StatusCode::OK, axum::Json(quote)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_handler<E, R, B, P>(
    State(service): State<Arc<ReservationService<E, R, B, P>>>,
    axum::Json(request): axum::Json<ReservationRequest>,
) -> Response
where
    E: EstablishmentRepository + 'static,
    R: RoomRepository + 'static,
    B: BookingRepository + 'static,
    P: PaymentGateway + 'static,
{
    match service.create(request) {
        Ok(booking) => (StatusCode::CREATED, axum::Json(booking.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<E, R, B, P>(
    State(service): State<Arc<ReservationService<E, R, B, P>>>,
    Path(booking_id): Path<String>,
) -> Response
where
    E: EstablishmentRepository + 'static,
    R: RoomRepository + 'static,
    B: BookingRepository + 'static,
    P: PaymentGateway + 'static,
{
    booking_response(service.booking(&BookingId(booking_id)))
}

pub(crate) async fn confirm_handler<E, R, B, P>(
    State(service): State<Arc<ReservationService<E, R, B, P>>>,
    Path(booking_id): Path<String>,
) -> Response
where
    E: EstablishmentRepository + 'static,
    R: RoomRepository + 'static,
    B: BookingRepository + 'static,
    P: PaymentGateway + 'static,
{
    booking_response(service.confirm(&BookingId(booking_id)))
}

pub(crate) async fn check_in_handler<E, R, B, P>(
    State(service): State<Arc<ReservationService<E, R, B, P>>>,
    Path(booking_id): Path<String>,
) -> Response
where
    E: EstablishmentRepository + 'static,
    R: RoomRepository + 'static,
    B: BookingRepository + 'static,
    P: PaymentGateway + 'static,
{
    booking_response(service.check_in(&BookingId(booking_id)))
}

pub(crate) async fn check_out_handler<E, R, B, P>(
    State(service): State<Arc<ReservationService<E, R, B, P>>>,
    Path(booking_id): Path<String>,
) -> Response
where
    E: EstablishmentRepository + 'static,
    R: RoomRepository + 'static,
    B: BookingRepository + 'static,
    P: PaymentGateway + 'static,
{
    booking_response(service.check_out(&BookingId(booking_id)))
}

pub(crate) async fn cancel_handler<E, R, B, P>(
    State(service): State<Arc<ReservationService<E, R, B, P>>>,
    Path(booking_id): Path<String>,
) -> Response
where
    E: EstablishmentRepository + 'static,
    R: RoomRepository + 'static,
    B: BookingRepository + 'static,
    P: PaymentGateway + 'static,
{
    booking_response(service.cancel(&BookingId(booking_id)))
}

pub(crate) async fn no_show_handler<E, R, B, P>(
    State(service): State<Arc<ReservationService<E, R, B, P>>>,
    Path(booking_id): Path<String>,
) -> Response
where
    E: EstablishmentRepository + 'static,
    R: RoomRepository + 'static,
    B: BookingRepository + 'static,
    P: PaymentGateway + 'static,
{
    booking_response(service.mark_no_show(&BookingId(booking_id)))
}

pub(crate) async fn payment_handler<E, R, B, P>(
    State(service): State<Arc<ReservationService<E, R, B, P>>>,
    Path(booking_id): Path<String>,
) -> Response
where
    E: EstablishmentRepository + 'static,
    R: RoomRepository + 'static,
    B: BookingRepository + 'static,
    P: PaymentGateway + 'static,
{
    booking_response(service.capture_payment(&BookingId(booking_id)))
}

fn booking_response(result: Result<Booking, ReservationError>) -> Response {
    match result {
        Ok(booking) => (StatusCode::OK, axum::Json(booking.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ReservationError) -> Response {
    let status = match &error {
        ReservationError::Availability(AvailabilityError::InvalidDateRange(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ReservationError::Availability(AvailabilityError::RoomUnavailable(_)) => {
            StatusCode::NOT_FOUND
        }
        ReservationError::Availability(AvailabilityError::SlotTaken { .. }) => StatusCode::CONFLICT,
        ReservationError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ReservationError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ReservationError::InvalidTransition { .. } => StatusCode::CONFLICT,
        ReservationError::Payment(PaymentError::Declined(_)) => StatusCode::PAYMENT_REQUIRED,
        ReservationError::Repository(RepositoryError::Unavailable(_))
        | ReservationError::Payment(PaymentError::Transport(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
