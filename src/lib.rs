//! Convert data samples and schema declarations between formats.
//!
//! Sources: JSON, YAML, TOML, XML and CSV samples (shapes are inferred), plus
//! Go, Proto and Thrift declarations (parsed). Destinations: Go, Proto and
//! Thrift.
//!
//! ```no_run
//! use schema_morph::{Config, convert};
//!
//! let config = Config { src: "json".into(), dst: "go".into(), ..Config::default() };
//! convert(&config, std::io::stdin(), std::io::stdout())?;
//! # Ok::<(), schema_morph::Error>(())
//! ```
pub mod codegen;
pub mod config;
pub mod convert;
pub mod error;
pub mod format;
pub mod ident;
pub mod inference;
pub mod ir;
pub mod lang;
pub mod path_de;
pub mod source;

pub use codegen::{RenderOptions, render};
pub use config::Config;
pub use convert::convert;
pub use error::{Error, Result};
pub use lang::Lang;
pub use source::{Parse, create_parser};
