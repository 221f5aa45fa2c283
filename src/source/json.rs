use super::Decode;
use crate::error::Result;
use crate::inference::{EmptyArrays, Value};
use crate::ir::TagStyle;

pub struct JsonDecoder;

impl Decode for JsonDecoder {
    fn decode(&self, data: &[u8]) -> Result<Value> {
        let value: serde_json::Value = serde_json::from_slice(data)?;
        Ok(value.into())
    }

    fn tag_style(&self) -> TagStyle {
        TagStyle::Json
    }

    /// An empty JSON array says nothing about its element type; the member is dropped.
    fn empty_arrays(&self) -> EmptyArrays {
        EmptyArrays::Drop
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => Value::object(map.into_iter().map(|(k, v)| (k, Value::from(v)))),
        }
    }
}
