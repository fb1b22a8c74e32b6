//! HTTP API over the evaluator.
//!
//! `POST /api/ask` answers and evaluates a question, `GET /api/health`
//! reports readiness. The server also runs when the evaluator could not be
//! constructed; `/api/ask` then answers 503.

mod handlers;

use crate::config::{Environment, ServerConfig};
use crate::error::{EvalError, Result};
use crate::evaluator::Evaluator;
use axum::{
    Router,
    http::{HeaderValue, Method, StatusCode, header},
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// `None` when startup failed to connect to any model.
    pub evaluator: Option<Arc<Evaluator>>,
    pub environment: Environment,
}

impl AppState {
    pub fn new(evaluator: Option<Arc<Evaluator>>, environment: Environment) -> Self {
        Self {
            evaluator,
            environment,
        }
    }
}

fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if config.allowed_origins.is_empty() {
        cors.allow_origin(AllowOrigin::any())
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

/// Build the router with tracing, timeout and CORS layers applied.
pub fn create_app(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/api/ask", post(handlers::ask))
        .route("/api/health", get(handlers::health))
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .with_state(state)
        .layer(build_cors_layer(config))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(TraceLayer::new_for_http())
}

/// Bind `host:port` and serve until the process is stopped.
pub async fn serve(state: AppState, config: &ServerConfig) -> Result<()> {
    if state.evaluator.is_none() {
        warn!("starting in degraded mode, /api/ask will answer 503");
    }
    if config.allowed_origins.is_empty() {
        warn!("CORS allows any origin; set CORS_ALLOWED_ORIGINS to restrict it");
    }

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| EvalError::Server(format!("failed to bind {}: {}", addr, e)))?;

    info!(%addr, environment = config.environment.as_str(), "server listening");

    axum::serve(listener, create_app(state, config))
        .await
        .map_err(|e| EvalError::Server(e.to_string()))
}
