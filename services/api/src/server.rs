use crate::cli::ServeArgs;
use crate::infra::{evaluation_service, AppState};
use crate::routes::with_evaluation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use icer_engine::config::AppConfig;
use icer_engine::error::AppError;
use icer_engine::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

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

    let service = evaluation_service(&config);

    // Warm the policy cache so a broken document is reported at startup
    // instead of on the first evaluation.
    match service.policy() {
        Ok(policy) => info!(version = %policy.version, "icer policy loaded"),
        Err(err) => warn!(%err, "icer policy unavailable at startup"),
    }

    let app = with_evaluation_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "icer evaluation engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}
