use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use icer_engine::config::AppConfig;
use icer_engine::evaluation::EvaluationService;
use icer_engine::policy::FilePolicySource;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn evaluation_service(config: &AppConfig) -> Arc<EvaluationService<FilePolicySource>> {
    let source = FilePolicySource::new(&config.policy.path);
    info!(path = %source.path().display(), "icer policy source configured");
    Arc::new(EvaluationService::new(source))
}
