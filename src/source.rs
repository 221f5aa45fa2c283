//! Source front-ends: one parser per input format, all producing `Vec<Struct>`.
//!
//! Data formats (JSON, YAML, TOML, XML) go through [`StructuredParser`]: decode
//! into a [`Value`](crate::inference::Value), build a node tree, unify. CSV
//! reads only its header. Go and Thrift are declaration formats walked from
//! tree-sitter syntax trees (see [`syntax`]); Proto has its own [`lexer`].
pub mod csv;
pub mod golang;
pub mod json;
pub mod lexer;
pub mod proto;
pub mod structured;
pub mod syntax;
pub mod thrift;
pub mod toml;
pub mod xml;
pub mod yaml;

use crate::config::Config;
use crate::error::Result;
use crate::ir::Struct;
use crate::lang::Lang;

pub use structured::{Decode, StructuredParser};

/// Turns raw input bytes into declarations. Empty input yields `Ok(vec![])`;
/// malformed input yields the format's own error unchanged.
pub trait Parse {
    fn parse(&self, data: &[u8]) -> Result<Vec<Struct>>;
}

pub fn create_parser(lang: Lang, config: &Config) -> Box<dyn Parse> {
    let root = config.root_name();
    match lang {
        Lang::Json => Box::new(StructuredParser::new(json::JsonDecoder, root)),
        Lang::Yaml => Box::new(StructuredParser::new(yaml::YamlDecoder, root)),
        Lang::Toml => Box::new(StructuredParser::new(toml::TomlDecoder, root)),
        Lang::Xml => Box::new(StructuredParser::new(xml::XmlDecoder::new(&config.xml), root)),
        Lang::Csv => Box::new(csv::CsvParser::new(root)),
        Lang::Go => Box::new(golang::GoParser),
        Lang::Proto => Box::new(proto::ProtoParser),
        Lang::Thrift => Box::new(thrift::ThriftParser),
    }
}
