//! Conversion settings.
//!
//! Layered as defaults ← optional config file ← command-line flags. Format
//! tokens stay strings here and are validated when a conversion starts, so an
//! unknown token surfaces as `UnsupportedSource`/`UnsupportedDestination`.
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::ident::{self, Acronyms};
use crate::lang::Lang;
use crate::path_de;

pub const DEFAULT_ROOT: &str = "Root";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub src: String,
    pub dst: String,
    /// Name of the synthesized top-level struct.
    pub root: String,
    pub xml: XmlConfig,
    /// Render well-known acronyms upper-case in Go field names.
    pub acronyms: bool,
    /// Pipe Go output through `gofmt`.
    pub gofmt: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct XmlConfig {
    pub content_prefix: String,
    pub attribute_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            src: String::new(),
            dst: String::new(),
            root: DEFAULT_ROOT.to_string(),
            xml: XmlConfig::default(),
            acronyms: false,
            gofmt: false,
        }
    }
}

impl Default for XmlConfig {
    fn default() -> Self {
        Self { content_prefix: "#".to_string(), attribute_prefix: "-".to_string() }
    }
}

impl Config {
    /// `.json` files are read as JSON, everything else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let parsed = match Lang::from_path(path) {
            Some(Lang::Json) => path_de::from_json_str_with_path(&text),
            _ => path_de::from_toml_str_with_path(&text),
        };
        parsed.map_err(|message| Error::Config { path: path.to_path_buf(), message })
    }

    /// Fill empty `src`/`dst` from the input and output file extensions.
    pub fn detect(&mut self, input: Option<&Path>, output: Option<&Path>) {
        if self.src.is_empty()
            && let Some(lang) = input.and_then(Lang::from_path)
        {
            self.src = lang.token().to_string();
        }
        if self.dst.is_empty()
            && let Some(lang) = output.and_then(Lang::from_path)
        {
            self.dst = lang.token().to_string();
        }
    }

    pub fn source(&self) -> Result<Lang> {
        Lang::parse_token(&self.src).ok_or_else(|| Error::UnsupportedSource(self.src.clone()))
    }

    pub fn destination(&self) -> Result<Lang> {
        Lang::parse_token(&self.dst)
            .filter(|lang| lang.is_destination())
            .ok_or_else(|| Error::UnsupportedDestination(self.dst.clone()))
    }

    pub fn root_name(&self) -> String {
        ident::normalize_token(&self.root, DEFAULT_ROOT)
    }

    pub fn acronym_table(&self) -> Acronyms {
        if self.acronyms { Acronyms::common() } else { Acronyms::none() }
    }
}
