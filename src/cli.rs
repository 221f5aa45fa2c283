//! Command line: convert one input to one output.
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use schema_morph::{Config, convert};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Convert JSON/YAML/TOML/XML/CSV samples or Go/Proto/Thrift declarations into
/// Go, Proto or Thrift definitions
#[derive(Parser, Debug)]
#[command(name = "schema-morph", version)]
pub struct CommandLineInterface {
    /// source format: json, yaml, toml, xml, csv, go, proto, thrift (default: input extension)
    #[arg(short, long)]
    src: Option<String>,

    /// destination format: go, proto, thrift (default: output extension)
    #[arg(short, long)]
    dst: Option<String>,

    /// input file (stdin if omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// name of the top-level struct inferred from data samples
    #[arg(short, long)]
    root: Option<String>,

    /// TOML or JSON file with default settings; flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// key prefix for XML element text
    #[arg(long)]
    xml_content_prefix: Option<String>,

    /// key prefix for XML attributes
    #[arg(long)]
    xml_attribute_prefix: Option<String>,

    /// render well-known acronyms upper-case in Go field names
    #[arg(long)]
    acronyms: bool,

    /// run Go output through gofmt
    #[arg(long)]
    gofmt: bool,

    /// more logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    /// Defaults ← config file ← flags, then fill formats from file extensions.
    pub fn settings(&self) -> anyhow::Result<Config> {
        let mut config = match self.config.as_deref() {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(src) = &self.src {
            config.src = src.clone();
        }
        if let Some(dst) = &self.dst {
            config.dst = dst.clone();
        }
        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(prefix) = &self.xml_content_prefix {
            config.xml.content_prefix = prefix.clone();
        }
        if let Some(prefix) = &self.xml_attribute_prefix {
            config.xml.attribute_prefix = prefix.clone();
        }
        config.acronyms |= self.acronyms;
        config.gofmt |= self.gofmt;
        config.detect(self.input.as_deref(), self.output.as_deref());
        Ok(config)
    }

    pub fn run(&self) -> anyhow::Result<()> {
        let config = self.settings()?;
        debug!(?config, "resolved settings");

        let input: Box<dyn Read> = match &self.input {
            Some(path) => {
                let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
                Box::new(BufReader::new(file))
            }
            None => Box::new(std::io::stdin().lock()),
        };

        // Render into memory first so a failed conversion leaves no partial file.
        let mut rendered = Vec::new();
        convert(&config, input, &mut rendered)?;

        match &self.output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
                let mut out = BufWriter::new(file);
                out.write_all(&rendered)?;
                out.flush()?;
            }
            None => {
                let mut out = std::io::stdout().lock();
                out.write_all(&rendered)?;
                out.flush()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> CommandLineInterface {
        CommandLineInterface::try_parse_from(std::iter::once("schema-morph").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn formats_come_from_extensions_unless_given() {
        let config = cli(&["-i", "sample.yml", "-o", "out/types.go"]).settings().unwrap();
        assert_eq!((config.src.as_str(), config.dst.as_str()), ("yaml", "go"));

        let config = cli(&["-s", "json", "-d", "thrift", "-i", "sample.yml"]).settings().unwrap();
        assert_eq!((config.src.as_str(), config.dst.as_str()), ("json", "thrift"));
    }

    #[test]
    fn flags_override_config_file() {
        let path = std::env::temp_dir().join(format!("schema-morph-cli-{}.toml", std::process::id()));
        std::fs::write(&path, "src = \"xml\"\ndst = \"proto\"\nroot = \"Doc\"\n[xml]\nattribute_prefix = \"@\"\n").unwrap();
        let config = cli(&["-c", path.to_str().unwrap(), "-d", "go", "--xml-content-prefix", "_", "--acronyms"])
            .settings()
            .unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.src, "xml");
        assert_eq!(config.dst, "go");
        assert_eq!(config.root, "Doc");
        assert_eq!(config.xml.attribute_prefix, "@");
        assert_eq!(config.xml.content_prefix, "_");
        assert!(config.acronyms);
        assert!(!config.gofmt);
    }

    #[test]
    fn verbosity_counts() {
        assert_eq!(cli(&["-vv"]).verbose, 2);
    }
}
