use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// A single posted field value, kept in the shape it arrived in.
///
/// Nothing is coerced here: `"23.5"` stays text and `23.5` stays a number,
/// and MySQL converts either to the column type on insert.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl FieldValue {
    /// `null` maps to `None`. Arrays and objects are passed on as their JSON text.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(Self::Bool(b)),
            Value::Number(n) => Some(match n.as_i64() {
                Some(i) => Self::Int(i),
                None => n
                    .as_f64()
                    .map(Self::Float)
                    .unwrap_or_else(|| Self::Text(n.to_string())),
            }),
            Value::String(s) => Some(Self::Text(s)),
            other @ (Value::Array(_) | Value::Object(_)) => Some(Self::Text(other.to_string())),
        }
    }
}

/// One telemetry sample, as posted by a sensor and as stored in
/// `LEITURA_SENSOR`.
///
/// Every field is optional and unvalidated: absent fields are bound as `NULL`
/// and the table schema decides whether the row is acceptable.
/// Field names on the wire follow the column names; the English spellings
/// are accepted when the column name is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct SensorReading {
    /// Sensor health or event flag, e.g. `"OK"`.
    pub status: Option<FieldValue>,
    #[serde(rename = "mensagem")]
    pub message: Option<FieldValue>,
    /// Degrees Celsius
    #[serde(rename = "temperatura")]
    pub temperature: Option<FieldValue>,
    /// Raw MQ-2 gas sensor reading
    #[serde(rename = "valorMQ2")]
    pub gas_value: Option<FieldValue>,
    #[serde(rename = "id_sensor")]
    pub sensor_id: Option<FieldValue>,
}

impl SensorReading {
    /// Picks the five reading fields out of a decoded body. Unknown keys are ignored.
    pub fn from_fields(mut fields: Map<String, Value>) -> Self {
        let mut take = |names: &[&str]| {
            names
                .iter()
                .find_map(|name| fields.remove(*name).and_then(FieldValue::from_json))
        };

        Self {
            status: take(&["status"]),
            message: take(&["mensagem", "message"]),
            temperature: take(&["temperatura", "temperature"]),
            gas_value: take(&["valorMQ2", "gas_value"]),
            sensor_id: take(&["id_sensor", "sensor_id"]),
        }
    }
}
