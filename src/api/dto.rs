use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Success body for `POST /fiap/globalSolution`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InsertResponse {
    pub message: String,
    /// Primary key assigned to the new row.
    #[serde(rename = "insertId")]
    pub insert_id: u64,
}

/// Failure body. Never carries detail about the cause.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
