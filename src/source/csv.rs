use tracing::debug;

use super::Parse;
use crate::error::Result;
use crate::ident::{self, Acronyms};
use crate::ir::{Member, Struct, TagStyle, Ty};

/// Only the header line matters: every column becomes a `String` member.
pub struct CsvParser {
    root: String,
}

impl CsvParser {
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }
}

impl Parse for CsvParser {
    fn parse(&self, data: &[u8]) -> Result<Vec<Struct>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        let text = std::str::from_utf8(data)?;
        let header = text.lines().next().unwrap_or_default();

        let mut decl = Struct::new(Ty::structure(ident::camel_case(&self.root, &Acronyms::none())));
        for (position, cell) in header.split(',').enumerate() {
            let field = column_name(cell);
            let tag = TagStyle::Csv.annotate(&field);
            let mut member = Member::new(field, Ty::String).with_index(position as i64 + 1);
            member.tags.extend(tag);
            decl.members.push(member);
        }
        debug!(columns = decl.members.len(), "parsed csv header");
        Ok(vec![decl])
    }
}

/// `"  first   name "` → `first_name`.
fn column_name(cell: &str) -> String {
    cell.split_whitespace().collect::<Vec<_>>().join("_")
}
