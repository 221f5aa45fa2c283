use indexmap::IndexMap;

use super::Decode;
use crate::config::XmlConfig;
use crate::error::Result;
use crate::inference::Value;
use crate::ir::TagStyle;

/// Lowers an XML document to a generic value: attributes become
/// `attribute_prefix + name` keys, mixed text becomes `content_prefix + "content"`,
/// repeated sibling elements become arrays, and text-only leaves become strings.
pub struct XmlDecoder {
    attribute_prefix: String,
    content_prefix: String,
}

impl XmlDecoder {
    pub fn new(config: &XmlConfig) -> Self {
        Self {
            attribute_prefix: config.attribute_prefix.clone(),
            content_prefix: config.content_prefix.clone(),
        }
    }

    fn element(&self, node: roxmltree::Node<'_, '_>) -> Value {
        let text: String = node
            .children()
            .filter(|child| child.is_text())
            .filter_map(|child| child.text())
            .map(str::trim)
            .collect();

        let mut elements: IndexMap<String, Vec<Value>> = IndexMap::new();
        for child in node.children().filter(|child| child.is_element()) {
            elements
                .entry(child.tag_name().name().to_string())
                .or_default()
                .push(self.element(child));
        }

        if elements.is_empty() && node.attributes().len() == 0 {
            return Value::String(text);
        }

        let mut fields: IndexMap<String, Value> = IndexMap::new();
        for attr in node.attributes() {
            fields.insert(format!("{}{}", self.attribute_prefix, attr.name()), Value::from(attr.value()));
        }
        for (name, mut values) in elements {
            let value = if values.len() == 1 {
                values.remove(0)
            } else {
                Value::Array(values)
            };
            fields.insert(name, value);
        }
        if !text.is_empty() {
            fields.insert(format!("{}content", self.content_prefix), Value::String(text));
        }
        Value::Object(fields)
    }
}

impl Decode for XmlDecoder {
    fn decode(&self, data: &[u8]) -> Result<Value> {
        let text = std::str::from_utf8(data)?;
        let doc = roxmltree::Document::parse(text)?;
        let root = doc.root_element();
        Ok(Value::object([(root.tag_name().name(), self.element(root))]))
    }

    fn tag_style(&self) -> TagStyle {
        TagStyle::Xml {
            attribute_prefix: self.attribute_prefix.clone(),
            content_prefix: self.content_prefix.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::ir::Ty;
    use crate::source::{Parse, StructuredParser};

    const OSM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
  <osm version="0.6" generator="CGImap 0.0.2">
   <bounds minlat="54.0889580" minlon="12.2487570" maxlat="54.0913900" maxlon="12.2524800"/>
   <foo>bar</foo>
  </osm>"#;

    fn decoder(attribute_prefix: &str, content_prefix: &str) -> XmlDecoder {
        XmlDecoder::new(&XmlConfig {
            attribute_prefix: attribute_prefix.into(),
            content_prefix: content_prefix.into(),
        })
    }

    #[test]
    fn attributes_and_leaves() {
        let value = decoder(",", "").decode(OSM.as_bytes()).unwrap();
        let expected = Value::object([(
            "osm",
            Value::object([
                (",version", Value::from("0.6")),
                (",generator", Value::from("CGImap 0.0.2")),
                (
                    "bounds",
                    Value::object([
                        (",minlat", Value::from("54.0889580")),
                        (",minlon", Value::from("12.2487570")),
                        (",maxlat", Value::from("54.0913900")),
                        (",maxlon", Value::from("12.2524800")),
                    ]),
                ),
                ("foo", Value::from("bar")),
            ]),
        )]);
        assert_eq!(value, expected);
    }

    #[test]
    fn repeated_siblings_and_mixed_content() {
        let src = r#"<list kind="a"><item id="1">x</item><item id="2">y</item><note>n</note></list>"#;
        let value = decoder("-", "#").decode(src.as_bytes()).unwrap();
        let item = |id: &str, text: &str| Value::object([("-id", Value::from(id)), ("#content", Value::from(text))]);
        let expected = Value::object([(
            "list",
            Value::object([
                ("-kind", Value::from("a")),
                ("item", Value::Array(vec![item("1", "x"), item("2", "y")])),
                ("note", Value::from("n")),
            ]),
        )]);
        assert_eq!(value, expected);
    }

    #[test]
    fn struct_tags_follow_prefixes() {
        let src = r#"<doc lang="en"><title>t</title><p class="c">body</p></doc>"#;
        let structs = StructuredParser::new(decoder("-", "#"), "Root").parse(src.as_bytes()).unwrap();
        let names: Vec<&str> = structs.iter().map(|s| s.struct_name()).collect();
        assert_eq!(names, ["P", "Doc", "Root"]);

        let p = &structs[0];
        let tags: Vec<&str> = p.members.iter().map(|m| m.tags[0].as_str()).collect();
        assert_eq!(tags, [r#"xml:",chardata""#, r#"xml:"class,attr""#]);

        let doc = &structs[1];
        assert_eq!(doc.members[0].field, "-lang");
        assert_eq!(doc.members[0].field_camel(), "Lang");
        assert_eq!(doc.members[2].ty, Ty::String);
        assert_eq!(doc.members[2].tags, [r#"xml:"title""#]);
    }

    #[test]
    fn malformed_xml_is_an_error() {
        let err = StructuredParser::new(decoder("-", "#"), "Root").parse(b"<a><b></a>").unwrap_err();
        assert!(matches!(err, Error::Xml(_)));
    }
}
