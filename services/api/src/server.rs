use crate::cli::ServeArgs;
use crate::infra::{AppState, Backend};
use crate::routes::{with_hospitality_routes, BackOfficeState};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use immokey::config::AppConfig;
use immokey::error::AppError;
use immokey::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let backend = Backend::new();
    let back_office = BackOfficeState {
        inventory: backend.inventory(),
        revenue: backend.revenue(),
        establishments: backend.establishments.clone(),
        bookings: backend.bookings.clone(),
    };

    let app = with_hospitality_routes(backend.reservations(), back_office)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "immokey back office ready");

    axum::serve(listener, app).await?;
    Ok(())
}
