use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::EvaluateRequest;
use super::service::{EvaluationService, EvaluationServiceError};
use crate::policy::{PolicyError, PolicySource};

/// Router builder exposing the policy lookup and evaluation endpoints.
pub fn evaluation_router<S>(service: Arc<EvaluationService<S>>) -> Router
where
    S: PolicySource + 'static,
{
    Router::new()
        .route("/api/v1/icer/policy", get(policy_handler::<S>))
        .route("/api/v1/icer/policy/reload", post(reload_handler::<S>))
        .route("/api/v1/icer/evaluate", post(evaluate_handler::<S>))
        .with_state(service)
}

pub(crate) async fn policy_handler<S>(
    State(service): State<Arc<EvaluationService<S>>>,
) -> Response
where
    S: PolicySource + 'static,
{
    match service.policy() {
        Ok(policy) => (StatusCode::OK, axum::Json(policy.as_ref().clone())).into_response(),
        Err(error) => policy_error_response(error),
    }
}

pub(crate) async fn reload_handler<S>(
    State(service): State<Arc<EvaluationService<S>>>,
) -> Response
where
    S: PolicySource + 'static,
{
    match service.reload_policy() {
        Ok(policy) => (StatusCode::OK, axum::Json(policy.as_ref().clone())).into_response(),
        Err(error) => policy_error_response(error),
    }
}

pub(crate) async fn evaluate_handler<S>(
    State(service): State<Arc<EvaluationService<S>>>,
    axum::Json(request): axum::Json<EvaluateRequest>,
) -> Response
where
    S: PolicySource + 'static,
{
    match service.evaluate(&request) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(EvaluationServiceError::Validation(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(error) => policy_error_response(error),
    }
}

fn policy_error_response(error: EvaluationServiceError) -> Response {
    let status = match &error {
        EvaluationServiceError::Policy(PolicyError::NotFound { .. }) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
