use super::AppState;
use crate::display::answer_text;
use crate::question::Question;
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::info;

fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// `application/json` or any `application/*+json` media type.
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let mime = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

pub(super) async fn ask(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let Some(evaluator) = state.evaluator.as_ref() else {
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Service unavailable - evaluator not initialized",
        );
    };

    if !is_json_content_type(&headers) {
        return error_response(StatusCode::BAD_REQUEST, "Request must be JSON");
    }
    let Ok(payload) = serde_json::from_slice::<Value>(&body) else {
        return error_response(StatusCode::BAD_REQUEST, "Request must be JSON");
    };

    let Some(raw_question) = payload.get("question") else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Missing required fields",
                "missing": ["question"],
            })),
        )
            .into_response();
    };

    let Some(question) = raw_question.as_str().and_then(|q| Question::new(q).ok()) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Question must be a non-empty string",
        );
    };

    info!(question = question.as_str(), "processing question");
    let outcome = evaluator.ask(&question).await;
    let answer = answer_text(&outcome.answer);

    let body = match outcome.evaluation {
        Some(evaluation) => json!({
            "question": question.as_str(),
            "answer": answer,
            "evaluation": evaluation,
            "timestamp": timestamp(),
        }),
        None => json!({
            "question": question.as_str(),
            "answer": answer,
            "error": "Answer generation failed",
            "timestamp": timestamp(),
        }),
    };
    (StatusCode::OK, Json(body)).into_response()
}

pub(super) async fn health(State(state): State<AppState>) -> Json<Value> {
    let ready = state.evaluator.is_some();
    Json(json!({
        "status": if ready { "healthy" } else { "degraded" },
        "evaluator_ready": ready,
        "environment": state.environment.as_str(),
        "timestamp": timestamp(),
    }))
}

pub(super) async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Endpoint not found")
}

pub(super) async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
