use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use immokey::auth::AuthContext;
use immokey::hospitality::repository::{EstablishmentRepository, RepositoryError};
use immokey::hospitality::reservation_router;
use immokey::hospitality::revenue::{Granularity, ReportingWindow, RevenueError};
use immokey::hospitality::{InventoryError, NewEstablishment, NewRoom};

use crate::infra::{
    ApiInventoryService, ApiReservationService, ApiRevenueService, AppState,
    InMemoryBookingRepository, InMemoryEstablishmentRepository,
};

/// Identity header filled in by the edge proxy once the hosted auth provider
/// has validated the session token.
pub(crate) const USER_HEADER: &str = "x-immokey-user";

#[derive(Clone)]
pub(crate) struct BackOfficeState {
    pub(crate) inventory: Arc<ApiInventoryService>,
    pub(crate) revenue: Arc<ApiRevenueService>,
    pub(crate) establishments: Arc<InMemoryEstablishmentRepository>,
    pub(crate) bookings: Arc<InMemoryBookingRepository>,
}

pub(crate) fn with_hospitality_routes(
    reservations: Arc<ApiReservationService>,
    back_office: BackOfficeState,
) -> axum::Router {
    reservation_router(reservations)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .merge(back_office_router(back_office))
}

fn back_office_router(state: BackOfficeState) -> axum::Router {
    axum::Router::new()
        .route(
            "/api/v1/establishments",
            axum::routing::post(create_establishment_endpoint),
        )
        .route("/api/v1/rooms", axum::routing::post(create_room_endpoint))
        .route(
            "/api/v1/public/establishments/:slug",
            axum::routing::get(public_profile_endpoint),
        )
        .route(
            "/api/v1/revenue/report",
            axum::routing::get(revenue_report_endpoint),
        )
        .with_state(state)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    if state.readiness.load(std::sync::atomic::Ordering::Acquire) {
        (StatusCode::OK, Json(json!({ "status": "ready" }))).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "starting" })),
        )
            .into_response()
    }
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn create_establishment_endpoint(
    State(state): State<BackOfficeState>,
    Json(submission): Json<NewEstablishment>,
) -> impl IntoResponse {
    match state.inventory.register_establishment(submission) {
        Ok(establishment) => (StatusCode::CREATED, Json(establishment)).into_response(),
        Err(InventoryError::InvalidSlug(slug)) => {
            let payload = json!({ "error": format!("invalid slug '{slug}'") });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(InventoryError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({ "error": "slug already in use" });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn create_room_endpoint(
    State(state): State<BackOfficeState>,
    Json(submission): Json<NewRoom>,
) -> impl IntoResponse {
    let establishment_id = submission.establishment_id.clone();
    match state.inventory.open_room(submission) {
        Ok(room) => {
            // Mirror the ownership the hosted backend derives from its row
            // policies so revenue scoping works against the in-memory store.
            if let Ok(Some(owner)) = state
                .establishments
                .fetch(&establishment_id)
                .map(|found| found.map(|establishment| establishment.owner_id))
            {
                state.bookings.register_owner(room.id.clone(), &owner);
            }
            (StatusCode::CREATED, Json(room)).into_response()
        }
        Err(InventoryError::EstablishmentNotFound(id)) => {
            let payload = json!({ "error": format!("establishment {id} not found") });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(InventoryError::InvalidPrice(price)) => {
            let payload = json!({ "error": format!("nightly price must be positive, got {price}") });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn public_profile_endpoint(
    State(state): State<BackOfficeState>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    match state.inventory.public_profile(&slug) {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(InventoryError::NotListed(slug)) => {
            let payload = json!({ "error": format!("no public booking page for '{slug}'") });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RevenueReportQuery {
    pub(crate) granularity: Option<Granularity>,
    pub(crate) start: Option<NaiveDate>,
    pub(crate) end: Option<NaiveDate>,
}

pub(crate) async fn revenue_report_endpoint(
    State(state): State<BackOfficeState>,
    headers: HeaderMap,
    Query(query): Query<RevenueReportQuery>,
) -> impl IntoResponse {
    let caller = caller_from_headers(&headers);
    let granularity = query.granularity.unwrap_or(Granularity::Month);

    let window = match (query.start, query.end) {
        (Some(start), Some(end)) => match ReportingWindow::explicit(start, end) {
            Ok(window) => Some(window),
            Err(error) => {
                let payload = json!({ "error": error.to_string() });
                return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
            }
        },
        (None, None) => None,
        _ => {
            let payload = json!({ "error": "start and end must be provided together" });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
    };

    let today = Local::now().date_naive();
    match state.revenue.report(&caller, granularity, window, today) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(RevenueError::Auth(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

fn caller_from_headers(headers: &HeaderMap) -> AuthContext {
    headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .map(AuthContext::authenticated)
        .unwrap_or(AuthContext::Anonymous)
}
