use ::toml::Value as Toml;

use super::Decode;
use crate::error::Result;
use crate::inference::Value;
use crate::ir::TagStyle;

pub struct TomlDecoder;

impl Decode for TomlDecoder {
    fn decode(&self, data: &[u8]) -> Result<Value> {
        let text = std::str::from_utf8(data)?;
        let table: ::toml::Table = ::toml::from_str(text)?;
        Ok(lower(Toml::Table(table)))
    }

    fn tag_style(&self) -> TagStyle {
        TagStyle::Toml
    }
}

fn lower(value: Toml) -> Value {
    match value {
        Toml::Boolean(b) => Value::Bool(b),
        Toml::Integer(i) => Value::Int(i),
        Toml::Float(f) => Value::float(f),
        Toml::String(s) => Value::String(s),
        Toml::Datetime(dt) => Value::String(dt.to_string()),
        Toml::Array(items) => Value::Array(items.into_iter().map(lower).collect()),
        Toml::Table(table) => Value::object(table.into_iter().map(|(k, v)| (k, lower(v)))),
    }
}
