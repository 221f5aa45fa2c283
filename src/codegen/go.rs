use std::fmt::Write;

use crate::ident::Acronyms;
use crate::ir::{Member, Struct};

pub struct GoCodegen<'a> {
    out: String,
    acronyms: &'a Acronyms,
}

impl<'a> GoCodegen<'a> {
    pub fn new(acronyms: &'a Acronyms) -> Self {
        Self { out: String::new(), acronyms }
    }

    pub fn emit(&mut self, st: &Struct) -> std::fmt::Result {
        for comment in &st.comment.beginning_comments {
            writeln!(self.out, "{comment}")?;
        }
        if st.is_enum() {
            self.enumeration(st)?;
        } else {
            self.structure(st)?;
        }
        self.out.push_str("\n\n");
        Ok(())
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn structure(&mut self, st: &Struct) -> std::fmt::Result {
        write!(self.out, "type {} struct {{", st.struct_name())?;
        inline(&mut self.out, &st.comment.inline_comment)?;
        for member in &st.members {
            self.member(member)?;
        }
        self.out.push_str("\n}");
        Ok(())
    }

    fn member(&mut self, member: &Member) -> std::fmt::Result {
        for comment in &member.comment.beginning_comments {
            write!(self.out, "\n\t{comment}")?;
        }
        write!(self.out, "\n\t{} {}", member.field_camel_with(self.acronyms), member.go())?;
        let tag = member.go_tag();
        if !tag.is_empty() {
            write!(self.out, " {tag}")?;
        }
        inline(&mut self.out, &member.comment.inline_comment)
    }

    /// `type E int` plus a `const` block of `Name E = N`.
    fn enumeration(&mut self, st: &Struct) -> std::fmt::Result {
        write!(self.out, "type {} int", st.struct_name())?;
        inline(&mut self.out, &st.comment.inline_comment)?;
        self.out.push_str("\n\nconst (");
        for member in &st.members {
            write!(
                self.out,
                " \n\t{} {} = {} {}",
                member.field_camel_with(self.acronyms),
                member.go(),
                member.index,
                member.comment.inline_comment
            )?;
        }
        self.out.push_str("\n)");
        Ok(())
    }
}

fn inline(out: &mut String, comment: &str) -> std::fmt::Result {
    if comment.is_empty() {
        return Ok(());
    }
    write!(out, " {comment}")
}
