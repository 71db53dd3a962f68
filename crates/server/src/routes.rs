use std::path::Path;

use axum::{
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod calculator;
pub mod counter;
pub mod items;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics() -> (axum::http::StatusCode, String) {
    common::metrics::encode_metrics()
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// JSON API routes, without static files or middleware.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/counter", get(counter::get_counter))
        .route("/api/counter/increment", post(counter::increment))
        .route("/api/counter/decrement", post(counter::decrement))
        .route("/api/demo", get(items::list).post(items::add))
        .route("/api/demo/:id", put(items::update).delete(items::delete))
        .route("/api/calculator-data", get(calculator::data))
        .route("/api/accrual", get(calculator::accrual))
}

/// Build the full application router: API, health, metrics, docs and the static page.
pub fn build_router(state: AppState, cors: CorsLayer, frontend_dir: &str) -> Router {
    let index = Path::new(frontend_dir).join("index.html");
    let static_dir = ServeDir::new(frontend_dir).fallback(ServeFile::new(index));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(api_router())
        .fallback_service(static_dir)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
