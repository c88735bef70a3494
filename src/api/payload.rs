use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::db::models::SensorReading;

/// Request body limit shared by every content type.
pub const BODY_LIMIT_BYTES: usize = 5 * 1024 * 1024;

/// Decodes a [`SensorReading`] from whatever body the sensor sent.
///
/// - `application/json` (and `+json` types): an object supplies the fields,
///   an array supplies none, any other top-level value is a 400
/// - `application/x-www-form-urlencoded`: every value arrives as text
/// - anything else (`text/plain`, `application/jwt`, no content type) is read
///   and discarded, leaving every field absent
///
/// Field values are never type-checked. Unreadable JSON is a 400 and bodies
/// over [`BODY_LIMIT_BYTES`] are a 413; everything else reaches the handler.
#[derive(Debug)]
pub struct ReadingPayload(pub SensorReading);

#[derive(Debug, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Opaque,
}

fn body_kind(content_type: Option<&str>) -> BodyKind {
    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|m| m.trim().to_ascii_lowercase())
        .unwrap_or_default();

    if mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json")) {
        BodyKind::Json
    } else if mime == "application/x-www-form-urlencoded" {
        BodyKind::Form
    } else {
        BodyKind::Opaque
    }
}

impl<S> FromRequest<S> for ReadingPayload
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());

        match body_kind(content_type) {
            BodyKind::Json => {
                let Json(body) = Json::<Value>::from_request(req, state)
                    .await
                    .map_err(IntoResponse::into_response)?;
                match body {
                    Value::Object(fields) => Ok(Self(SensorReading::from_fields(fields))),
                    Value::Array(_) => Ok(Self(SensorReading::default())),
                    _ => Err((
                        StatusCode::BAD_REQUEST,
                        "JSON body must be an object or an array",
                    )
                        .into_response()),
                }
            }
            BodyKind::Form => {
                let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(IntoResponse::into_response)?;
                let mut fields = Map::new();
                for (key, value) in pairs {
                    // First occurrence of a repeated key wins.
                    fields.entry(key).or_insert(Value::String(value));
                }
                Ok(Self(SensorReading::from_fields(fields)))
            }
            BodyKind::Opaque => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(IntoResponse::into_response)?;
                debug!(bytes = bytes.len(), "Body is not JSON or form data; no reading fields decoded");
                Ok(Self(SensorReading::default()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_content_types() {
        assert_eq!(body_kind(Some("application/json")), BodyKind::Json);
        assert_eq!(body_kind(Some("application/json; charset=utf-8")), BodyKind::Json);
        assert_eq!(body_kind(Some("Application/JSON")), BodyKind::Json);
        assert_eq!(body_kind(Some("application/vnd.sensor+json")), BodyKind::Json);
    }

    #[test]
    fn form_content_type() {
        assert_eq!(
            body_kind(Some("application/x-www-form-urlencoded")),
            BodyKind::Form
        );
    }

    #[test]
    fn everything_else_is_opaque() {
        assert_eq!(body_kind(Some("text/plain")), BodyKind::Opaque);
        assert_eq!(body_kind(Some("application/jwt")), BodyKind::Opaque);
        assert_eq!(body_kind(None), BodyKind::Opaque);
    }
}
