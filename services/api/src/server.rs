use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use risk_calculator::calculator::{CalculatorService, JsonFileRepository};
use risk_calculator::config::AppConfig;
use risk_calculator::error::AppError;
use risk_calculator::telemetry;
use tracing::info;

use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_calculator_routes;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(data_dir) = args.storage.data_dir.take() {
        config.storage.data_dir = data_dir;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(JsonFileRepository::in_dir(&config.storage.data_dir));
    info!(path = %repository.path().display(), "using calculator storage");
    let calculator = Arc::new(CalculatorService::open(repository)?);

    let app = with_calculator_routes(calculator)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "security priority calculator ready");

    axum::serve(listener, app).await?;
    Ok(())
}
