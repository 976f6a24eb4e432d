use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::{Local, NaiveDate};
use serde_json::json;
use tracing::{error, warn};

use super::domain::{CreditBreakdownResponse, CreditScoreRequest};
use super::error::ScoringError;
use super::ScoringEngine;

/// Router builder exposing the scoring endpoints.
pub fn credit_router(engine: Arc<ScoringEngine>) -> Router {
    Router::new()
        .route("/evaluate_credit", post(evaluate_handler))
        .route("/api/v1/credit/breakdown", post(breakdown_handler))
        .with_state(engine)
}

pub(crate) async fn evaluate_handler(
    State(engine): State<Arc<ScoringEngine>>,
    payload: Result<axum::Json<CreditScoreRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(axum::Json(request)) => request,
        Err(rejection) => return malformed_request(rejection),
    };
    let evaluation_date = evaluation_date(&request);
    match engine.respond(&request, evaluation_date) {
        Ok(response) => (StatusCode::OK, axum::Json(response)).into_response(),
        Err(err) => scoring_failure(&request, err),
    }
}

pub(crate) async fn breakdown_handler(
    State(engine): State<Arc<ScoringEngine>>,
    payload: Result<axum::Json<CreditScoreRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(axum::Json(request)) => request,
        Err(rejection) => return malformed_request(rejection),
    };
    let evaluation_date = evaluation_date(&request);
    match engine.score_request(&request, evaluation_date) {
        Ok(breakdown) => {
            let view = CreditBreakdownResponse {
                user_id: request.user_id,
                loan_id: request.loan_id,
                evaluation_date,
                breakdown,
            };
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(err) => scoring_failure(&request, err),
    }
}

fn evaluation_date(request: &CreditScoreRequest) -> NaiveDate {
    request
        .evaluation_date
        .unwrap_or_else(|| Local::now().date_naive())
}

fn malformed_request(rejection: JsonRejection) -> Response {
    warn!(error = %rejection.body_text(), "credit request body rejected");
    let payload = json!({
        "error": rejection.body_text(),
    });
    (rejection.status(), axum::Json(payload)).into_response()
}

fn scoring_failure(request: &CreditScoreRequest, err: ScoringError) -> Response {
    if err.is_client_error() {
        warn!(
            user_id = %request.user_id,
            loan_id = %request.loan_id,
            error = %err,
            "credit request rejected"
        );
        let payload = json!({
            "error": err.to_string(),
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    }

    error!(
        user_id = %request.user_id,
        loan_id = %request.loan_id,
        error = %err,
        "credit evaluation failed"
    );
    let payload = json!({
        "error": format!("Internal error: {err}"),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
