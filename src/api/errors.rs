use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use super::dto::ErrorResponse;

/// Body returned for every failed insert. The underlying cause is only logged.
pub const GENERIC_ERROR_MESSAGE: &str = "Erro interno do servidor ao salvar os dados.";

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        error!(error = %self, "Failed to insert sensor reading");
        let body = Json(ErrorResponse {
            error: GENERIC_ERROR_MESSAGE.to_owned(),
        });
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
