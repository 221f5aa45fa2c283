use std::path::PathBuf;

use crate::lang::Lang;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Xml(#[from] roxmltree::Error),
    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),
    #[error("failed to load grammar: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),
    /// Malformed Go, Proto or Thrift declarations.
    #[error("{line}:{column}: {message}")]
    Syntax { line: usize, column: usize, message: String },

    #[error("unsupported source format: {0:?}")]
    UnsupportedSource(String),
    #[error("unsupported destination format: {0:?}")]
    UnsupportedDestination(String),
    #[error("source and destination are both {0}")]
    SameSourceDestination(Lang),

    #[error("failed to render output: {0}")]
    Render(#[from] std::fmt::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl Error {
    pub fn syntax(line: usize, column: usize, message: impl Into<String>) -> Self {
        Error::Syntax { line, column, message: message.into() }
    }

    /// Malformed input in the source format.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            Error::Json(_)
                | Error::Yaml(_)
                | Error::Toml(_)
                | Error::Xml(_)
                | Error::Utf8(_)
                | Error::Syntax { .. }
        )
    }
}
