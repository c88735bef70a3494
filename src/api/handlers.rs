use axum::{extract::State, Json};
use tracing::info;
use utoipa::OpenApi;

use super::{
    dto::{ErrorResponse, InsertResponse},
    errors::IngestError,
    payload::ReadingPayload,
};
use crate::db::{
    models::{FieldValue, SensorReading},
    Database,
};

pub const SUCCESS_MESSAGE: &str = "Dados inseridos com sucesso!";

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Store one sensor reading.
///
/// Fields are passed through unvalidated in whatever JSON type they were sent;
/// missing ones are inserted as `NULL`. Form-encoded bodies with the same
/// field names are accepted as well.
#[utoipa::path(
    post,
    path = "/fiap/globalSolution",
    request_body(content = SensorReading, content_type = "application/json"),
    responses(
        (status = 200, description = "Reading stored", body = InsertResponse),
        (status = 400, description = "Body is not readable JSON"),
        (status = 413, description = "Body larger than 5 MiB"),
        (status = 500, description = "Reading could not be stored", body = ErrorResponse),
    ),
    tag = "readings"
)]
pub async fn ingest_reading(
    State(db): State<Database>,
    ReadingPayload(reading): ReadingPayload,
) -> Result<Json<InsertResponse>, IngestError> {
    info!(payload = ?reading, "Received sensor reading");

    let insert_id = db.insert_reading(&reading).await?;

    info!(insert_id, "Sensor reading stored");
    Ok(Json(InsertResponse {
        message: SUCCESS_MESSAGE.to_owned(),
        insert_id,
    }))
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(ingest_reading),
    components(schemas(SensorReading, FieldValue, InsertResponse, ErrorResponse)),
    tags((name = "readings", description = "Sensor telemetry ingestion")),
    info(
        title = "Sensor Ingest API",
        version = "0.1.0",
        description = "Stores sensor telemetry readings in MySQL"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
