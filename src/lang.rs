use std::fmt;
use std::path::Path;

/// Every format the converter knows about. All of them can be read; only
/// [`Lang::is_destination`] ones can be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    Json,
    Yaml,
    Toml,
    Xml,
    Csv,
    Go,
    Proto,
    Thrift,
}

impl Lang {
    pub const ALL: [Lang; 8] = [
        Lang::Json,
        Lang::Yaml,
        Lang::Toml,
        Lang::Xml,
        Lang::Csv,
        Lang::Go,
        Lang::Proto,
        Lang::Thrift,
    ];

    /// Canonical token, also the file extension.
    pub fn token(self) -> &'static str {
        match self {
            Lang::Json => "json",
            Lang::Yaml => "yaml",
            Lang::Toml => "toml",
            Lang::Xml => "xml",
            Lang::Csv => "csv",
            Lang::Go => "go",
            Lang::Proto => "proto",
            Lang::Thrift => "thrift",
        }
    }

    /// Case-insensitive; accepts `yml` and `protobuf` as aliases.
    pub fn parse_token(token: &str) -> Option<Lang> {
        let token = token.trim().to_ascii_lowercase();
        match token.as_str() {
            "yml" => Some(Lang::Yaml),
            "protobuf" => Some(Lang::Proto),
            other => Lang::ALL.into_iter().find(|lang| lang.token() == other),
        }
    }

    pub fn from_path(path: &Path) -> Option<Lang> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Lang::parse_token)
    }

    /// Whether an emitter exists for this format.
    pub fn is_destination(self) -> bool {
        matches!(self, Lang::Go | Lang::Proto | Lang::Thrift)
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
