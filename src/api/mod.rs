pub mod dto;
pub mod errors;
pub mod handlers;
pub mod payload;

use std::time::Duration;

use axum::{extract::DefaultBodyLimit, routing::post, Router};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::db::Database;

use payload::BODY_LIMIT_BYTES;

/// Builds the application: the single ingestion route plus body limit,
/// permissive CORS, response compression and request tracing.
///
/// `request_timeout` adds a 408 deadline per request when set.
pub fn router(db: Database, request_timeout: Option<Duration>) -> Router {
    let router = Router::new()
        .route("/fiap/globalSolution", post(handlers::ingest_reading))
        .with_state(db);

    let router = match request_timeout {
        Some(timeout) => router.layer(TimeoutLayer::new(timeout)),
        None => router,
    };

    router
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}
