use std::fmt::Write;

use crate::ident;
use crate::ir::Struct;

#[derive(Default)]
pub struct ThriftCodegen {
    out: String,
}

impl ThriftCodegen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, st: &Struct) -> std::fmt::Result {
        for comment in &st.comment.beginning_comments {
            writeln!(self.out, "{comment}")?;
        }
        write!(self.out, "{} {} {{", st.thrift_keyword(), st.struct_name())?;
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
                "\n    {}: {} {}, {}",
                member.index,
                member.thrift(),
                field,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Comment, Member, Ty};

    #[test]
    fn structs_unions_and_enums() {
        let mut st = Struct::new(Ty::structure("Aaa"));
        st.comment = Comment { beginning_comments: vec!["// haha".into()], inline_comment: "// aaa".into() };
        let mut a = Member::new("a", Ty::Int32).with_index(1);
        a.comment = Comment { beginning_comments: vec!["// a".into()], inline_comment: "// a".into() };
        st.members.push(a);
        st.members.push(Member::new("details", Ty::array(Ty::reference("google.protobuf.Any"))).with_index(2));

        let mut un = Struct::new(Ty::union("UUU"));
        un.members.push(Member::new("s", Ty::set(Ty::Uint16)).with_index(1));

        let mut en = Struct::new(Ty::enumeration("EEE"));
        en.members.push(Member::new("A", Ty::enumeration("EEE")).with_index(1));
        en.members.push(Member::new("B", Ty::enumeration("EEE")).with_index(2));

        let mut codegen = ThriftCodegen::new();
        for decl in [&st, &un, &en] {
            codegen.emit(decl).unwrap();
        }
        assert_eq!(
            codegen.into_string(),
            "// haha\nstruct Aaa { // aaa\n    // a\n    1: i32 a, // a\n    2: list<google.protobuf.Any> details, \n}\n\n\
             union UUU {\n    1: set<i16> s, \n}\n\n\
             enum EEE { \n    A = 1;  \n    B = 2; \n}\n\n"
        );
    }

    #[test]
    fn member_names_are_identifiers() {
        let mut st = Struct::new(Ty::structure("Root"));
        st.members.push(Member::new("user-id", Ty::Int64).with_index(1));
        st.members.push(Member::new("1st", Ty::String).with_index(2));
        st.members.push(Member::new("$", Ty::Bool).with_index(3));

        let mut codegen = ThriftCodegen::new();
        codegen.emit(&st).unwrap();
        assert_eq!(
            codegen.into_string(),
            "struct Root {\n    1: i64 userid, \n    2: string N1st, \n    3: bool field, \n}\n\n"
        );
    }
}
