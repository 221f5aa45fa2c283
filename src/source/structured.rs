use tracing::debug;

use super::Parse;
use crate::error::Result;
use crate::inference::{EmptyArrays, Node, Unifier, Value};
use crate::ir::{Struct, TagStyle};

/// Format-specific half of a data-format parser.
pub trait Decode {
    fn decode(&self, data: &[u8]) -> Result<Value>;
    fn tag_style(&self) -> TagStyle;
    fn empty_arrays(&self) -> EmptyArrays {
        EmptyArrays::Any
    }
}

pub struct StructuredParser<D> {
    decoder: D,
    root: String,
}

impl<D: Decode> StructuredParser<D> {
    pub fn new(decoder: D, root: impl Into<String>) -> Self {
        Self { decoder, root: root.into() }
    }
}

impl<D: Decode> Parse for StructuredParser<D> {
    fn parse(&self, data: &[u8]) -> Result<Vec<Struct>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        let value = self.decoder.decode(data)?;
        let root = Node::build(&self.root, &value, self.decoder.empty_arrays());
        let tags = self.decoder.tag_style();
        let (structs, _) = Unifier::new(&tags).unify(&root);
        debug!(root = self.root.as_str(), structs = structs.len(), "parsed structured source");
        Ok(structs)
    }
}
