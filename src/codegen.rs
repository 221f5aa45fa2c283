//! Emitters: `Vec<Struct>` → Go / Proto / Thrift source text.
//!
//! Every declaration is followed by a blank line, so an empty list renders as
//! the empty string. Emitters read the IR's string hooks only.
pub mod go;
pub mod proto;
pub mod thrift;

use tracing::debug;

use crate::error::{Error, Result};
use crate::ident::Acronyms;
use crate::ir::Struct;
use crate::lang::Lang;

pub use go::GoCodegen;
pub use proto::ProtoCodegen;
pub use thrift::ThriftCodegen;

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Acronym table for Go field names.
    pub acronyms: Acronyms,
}

pub fn render(lang: Lang, structs: &[Struct], options: &RenderOptions) -> Result<String> {
    let out = match lang {
        Lang::Go => {
            let mut codegen = GoCodegen::new(&options.acronyms);
            structs.iter().try_for_each(|st| codegen.emit(st))?;
            codegen.into_string()
        }
        Lang::Proto => {
            let mut codegen = ProtoCodegen::new();
            structs.iter().try_for_each(|st| codegen.emit(st))?;
            codegen.into_string()
        }
        Lang::Thrift => {
            let mut codegen = ThriftCodegen::new();
            structs.iter().try_for_each(|st| codegen.emit(st))?;
            codegen.into_string()
        }
        other => return Err(Error::UnsupportedDestination(other.token().to_string())),
    };
    debug!(dst = %lang, decls = structs.len(), bytes = out.len(), "rendered");
    Ok(out)
}
