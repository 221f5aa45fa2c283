use std::fmt::Write;

use crate::ident;
use crate::ir::Struct;

#[derive(Default)]
pub struct ProtoCodegen {
    out: String,
}

impl ProtoCodegen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, st: &Struct) -> std::fmt::Result {
        for comment in &st.comment.beginning_comments {
            writeln!(self.out, "{comment}")?;
        }
        write!(self.out, "{} {} {{", st.proto_keyword(), st.struct_name())?;
        if !st.comment.inline_comment.is_empty() {
            write!(self.out, " {}", st.comment.inline_comment)?;
        }
        for member in &st.members {
            let field = ident::normalize_token(&member.field, "field");
            if st.is_enum() {
                write!(self.out, " \n    {} = {}; {}", field, member.index, member.comment.inline_comment)?;
                continue;
            }
            for comment in &member.comment.beginning_comments {
                write!(self.out, "\n    {comment}")?;
            }
            write!(
                self.out,
                "\n    {} {} = {}; {}",
                member.proto(),
                field,
                member.index,
                member.comment.inline_comment
            )?;
        }
        self.out.push_str("\n}\n\n");
        Ok(())
    }

    pub fn into_string(self) -> String {
        self.out
    }
}
