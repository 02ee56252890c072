use crate::config::ConfigError;
use crate::hospitality::inventory::InventoryError;
use crate::hospitality::reservations::ReservationError;
use crate::hospitality::revenue::RevenueError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Reservation(ReservationError),
    Inventory(InventoryError),
    Revenue(RevenueError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Reservation(err) => write!(f, "reservation error: {}", err),
            AppError::Inventory(err) => write!(f, "inventory error: {}", err),
            AppError::Revenue(err) => write!(f, "revenue error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Reservation(err) => Some(err),
            AppError::Inventory(err) => Some(err),
            AppError::Revenue(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Reservation(_) | AppError::Inventory(_) | AppError::Revenue(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ReservationError> for AppError {
    fn from(value: ReservationError) -> Self {
        Self::Reservation(value)
    }
}

impl From<InventoryError> for AppError {
    fn from(value: InventoryError) -> Self {
        Self::Inventory(value)
    }
}

impl From<RevenueError> for AppError {
    fn from(value: RevenueError) -> Self {
        Self::Revenue(value)
    }
}
