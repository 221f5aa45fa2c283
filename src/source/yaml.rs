use serde::Deserialize;
use serde_yaml::Value as Yaml;

use super::Decode;
use crate::error::Result;
use crate::inference::Value;
use crate::ir::TagStyle;

pub struct YamlDecoder;

impl Decode for YamlDecoder {
    fn decode(&self, data: &[u8]) -> Result<Value> {
        // Only the first document of a multi-document stream is sampled.
        let Some(first) = serde_yaml::Deserializer::from_slice(data).next() else {
            return Ok(Value::Null);
        };
        let mut doc = Yaml::deserialize(first)?;
        doc.apply_merge()?;
        Ok(lower(doc))
    }

    fn tag_style(&self) -> TagStyle {
        TagStyle::Yaml
    }
}

fn lower(doc: Yaml) -> Value {
    match doc {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => n.as_f64().map(Value::float).unwrap_or(Value::Null),
        },
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(lower).collect()),
        Yaml::Mapping(map) => Value::object(map.into_iter().map(|(k, v)| (key_text(k), lower(v)))),
        Yaml::Tagged(tagged) => lower(tagged.value),
    }
}

// Mapping keys need not be strings in YAML (`1: x`, `true: y`).
fn key_text(key: Yaml) -> String {
    match key {
        Yaml::String(s) => s,
        Yaml::Null => "null".to_string(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Number(n) => n.to_string(),
        Yaml::Tagged(tagged) => key_text(tagged.value),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
