//! Protocol Buffers front-end.
//!
//! Reads `message` and `enum` declarations (nested ones included, emitted
//! before their parent). Services, options, imports and extensions are
//! recognized only so they can be skipped.
use tracing::debug;

use super::lexer::{self, Cursor};
use super::Parse;
use crate::error::Result;
use crate::ir::{Comment, Member, Struct, Ty};

pub struct ProtoParser;

impl Parse for ProtoParser {
    fn parse(&self, data: &[u8]) -> Result<Vec<Struct>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        let src = std::str::from_utf8(data)?;
        let mut cur = Cursor::new(lexer::tokenize(src)?);
        let mut out = Vec::new();
        while !cur.is_eof() {
            let comments = cur.leading_comments();
            if cur.eat_punct(';') {
                continue;
            }
            let word = cur.expect_ident()?;
            match word.as_str() {
                "syntax" | "edition" | "package" | "import" | "option" => cur.skip_through(';')?,
                "message" => message(&mut cur, comments, &mut out)?,
                "enum" => enumeration(&mut cur, comments, &mut out)?,
                "service" | "extend" => skip_named_block(&mut cur)?,
                other => return Err(cur.error(format!("unexpected `{other}` at top level"))),
            }
        }
        debug!(decls = out.len(), "parsed proto source");
        Ok(out)
    }
}

fn skip_named_block(cur: &mut Cursor) -> Result<()> {
    cur.expect_ident()?;
    cur.expect_punct('{')?;
    cur.skip_balanced('{', '}')
}

fn message(cur: &mut Cursor, comments: Vec<String>, out: &mut Vec<Struct>) -> Result<()> {
    let name = cur.expect_ident()?;
    cur.expect_punct('{')?;
    let mut decl = Struct::new(Ty::structure(name));
    decl.comment = Comment { beginning_comments: comments, inline_comment: cur.inline_comment() };

    let mut nested = Vec::new();
    loop {
        let comments = cur.leading_comments();
        if cur.eat_punct('}') {
            break;
        }
        if cur.eat_punct(';') {
            continue;
        }
        let word = cur.expect_ident()?;
        match word.as_str() {
            "message" => message(cur, comments, &mut nested)?,
            "enum" => enumeration(cur, comments, &mut nested)?,
            "option" | "reserved" | "extensions" => cur.skip_through(';')?,
            "extend" => skip_named_block(cur)?,
            "oneof" => {
                cur.expect_ident()?;
                cur.expect_punct('{')?;
                loop {
                    let comments = cur.leading_comments();
                    if cur.eat_punct('}') {
                        break;
                    }
                    if cur.eat_keyword("option") {
                        cur.skip_through(';')?;
                        continue;
                    }
                    let ty = field_type(cur)?;
                    let mut member = field(cur, ty, comments)?;
                    member.optional = true;
                    decl.members.push(member);
                }
            }
            "repeated" => {
                let ty = Ty::array(field_type(cur)?);
                decl.members.push(field(cur, ty, comments)?);
            }
            "optional" | "required" => {
                let ty = field_type(cur)?;
                let mut member = field(cur, ty, comments)?;
                member.optional = word == "optional";
                decl.members.push(member);
            }
            _ => {
                let ty = named_type(cur, word)?;
                decl.members.push(field(cur, ty, comments)?);
            }
        }
    }
    // Trailing `;` after the closing brace is legal.
    cur.eat_punct(';');

    out.append(&mut nested);
    out.push(decl);
    Ok(())
}

fn enumeration(cur: &mut Cursor, comments: Vec<String>, out: &mut Vec<Struct>) -> Result<()> {
    let name = cur.expect_ident()?;
    cur.expect_punct('{')?;
    let ty = Ty::enumeration(name);
    let mut decl = Struct::new(ty.clone());
    decl.comment = Comment { beginning_comments: comments, inline_comment: cur.inline_comment() };

    loop {
        let comments = cur.leading_comments();
        if cur.eat_punct('}') {
            break;
        }
        if cur.eat_punct(';') {
            continue;
        }
        let ident = cur.expect_ident()?;
        if ident == "option" || ident == "reserved" {
            cur.skip_through(';')?;
            continue;
        }
        cur.expect_punct('=')?;
        let value = cur.expect_int()?;
        if cur.eat_punct('[') {
            cur.skip_balanced('[', ']')?;
        }
        cur.expect_punct(';')?;
        let mut member = Member::new(ident, ty.clone()).with_index(value);
        member.comment = Comment { beginning_comments: comments, inline_comment: cur.inline_comment() };
        decl.members.push(member);
    }
    cur.eat_punct(';');
    out.push(decl);
    Ok(())
}

/// `name = N [options];` after the field type.
fn field(cur: &mut Cursor, ty: Ty, comments: Vec<String>) -> Result<Member> {
    let name = cur.expect_ident()?;
    cur.expect_punct('=')?;
    let index = cur.expect_int()?;
    if cur.eat_punct('[') {
        cur.skip_balanced('[', ']')?;
    }
    cur.expect_punct(';')?;
    let mut member = Member::new(name, ty).with_index(index);
    member.comment = Comment { beginning_comments: comments, inline_comment: cur.inline_comment() };
    Ok(member)
}

fn field_type(cur: &mut Cursor) -> Result<Ty> {
    let leading_dot = cur.eat_punct('.');
    let word = cur.expect_ident()?;
    if leading_dot {
        return Ok(Ty::reference(format!(".{word}")));
    }
    named_type(cur, word)
}

fn named_type(cur: &mut Cursor, word: String) -> Result<Ty> {
    if word == "map" && cur.is_punct('<') {
        cur.expect_punct('<')?;
        let key = field_type(cur)?;
        cur.expect_punct(',')?;
        let value = field_type(cur)?;
        cur.expect_punct('>')?;
        return Ok(Ty::map(key, value));
    }
    Ok(scalar(word))
}

fn scalar(word: String) -> Ty {
    match word.as_str() {
        "double" => Ty::Float64,
        "float" => Ty::Float32,
        "int32" | "sint32" | "sfixed32" => Ty::Int32,
        "int64" | "sint64" | "sfixed64" => Ty::Int64,
        "uint32" | "fixed32" => Ty::Uint32,
        "uint64" | "fixed64" => Ty::Uint64,
        "bool" => Ty::Bool,
        "string" => Ty::String,
        "bytes" => Ty::Binary,
        _ => Ty::reference(word),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn parse(src: &str) -> Vec<Struct> {
        ProtoParser.parse(src.as_bytes()).unwrap()
    }

    fn comment(beginning: &[&str], inline: &str) -> Comment {
        Comment {
            beginning_comments: beginning.iter().map(|s| s.to_string()).collect(),
            inline_comment: inline.to_string(),
        }
    }

    const SAMPLE: &str = r#"
syntax = "proto3";

import "google/protobuf/any.proto";
option go_package="tenfyzhong/st2";

// EEEE
enum Eeee { // EEEE
    // A
    A = 0; // a
}

// haha
message Aaa { // aaa
    // a
    int32 a = 1; // a
    int64 b = 2;
    string c = 3;
}

message BbbBB {
    uint32 a = 1;
    uint64 b = 2;
    string c = 3;
}

message Ccc {
    sint32 a = 1;
    sint64 b = 2;
    string c = 3;
    Aaa aaa = 4;
}

message ErrorStatus {
  string message = 1;
  repeated google.protobuf.Any details = 2;
  map<int32, Ccc> m = 3;
}
"#;

    #[test]
    fn messages_enums_and_comments() {
        let structs = parse(SAMPLE);
        let names: Vec<&str> = structs.iter().map(|s| s.struct_name()).collect();
        assert_eq!(names, ["Eeee", "Aaa", "BbbBB", "Ccc", "ErrorStatus"]);

        let eeee = &structs[0];
        assert!(eeee.is_enum());
        assert_eq!(eeee.comment, comment(&["// EEEE"], "// EEEE"));
        assert_eq!(eeee.members[0].field, "A");
        assert_eq!(eeee.members[0].index, 0);
        assert_eq!(eeee.members[0].ty, Ty::enumeration("Eeee"));
        assert_eq!(eeee.members[0].comment, comment(&["// A"], "// a"));

        let aaa = &structs[1];
        assert_eq!(aaa.comment, comment(&["// haha"], "// aaa"));
        assert_eq!(aaa.members[0].comment, comment(&["// a"], "// a"));
        assert!(aaa.members[1].comment.is_empty());

        let tys: Vec<&Ty> = structs[3].members.iter().map(|m| &m.ty).collect();
        assert_eq!(tys, [&Ty::Int32, &Ty::Int64, &Ty::String, &Ty::reference("Aaa")]);

        let status = &structs[4];
        assert_eq!(status.members[1].ty, Ty::array(Ty::reference("google.protobuf.Any")));
        assert_eq!(status.members[2].ty, Ty::map(Ty::Int32, Ty::reference("Ccc")));
        assert_eq!(status.members[2].index, 3);
    }

    #[test]
    fn nested_oneof_and_skipped_statements() {
        let structs = parse(
            r#"
syntax = "proto2";
package demo.v1;
service Api { rpc Get(Req) returns (Resp) { option (x) = { a: 1 }; } }
message Outer {
  option deprecated = true;
  reserved 4, 6 to 9;
  message Inner { optional bytes raw = 1 [default = ""]; }
  enum Kind { option allow_alias = true; UNKNOWN = 0; NEG = -1; }
  required Inner inner = 1;
  oneof choice {
    string name = 2;
    fixed64 id = 3 [json_name = "ID"];
  }
  repeated .demo.v1.Kind kinds = 5;
};
"#,
        );
        let names: Vec<&str> = structs.iter().map(|s| s.struct_name()).collect();
        assert_eq!(names, ["Inner", "Kind", "Outer"]);

        assert!(structs[0].members[0].optional);
        assert_eq!(structs[0].members[0].ty, Ty::Binary);
        assert_eq!(structs[1].members[1].index, -1);

        let outer = &structs[2];
        let got: Vec<(&str, i64, bool)> = outer.members.iter().map(|m| (m.field.as_str(), m.index, m.optional)).collect();
        assert_eq!(got, [("inner", 1, false), ("name", 2, true), ("id", 3, true), ("kinds", 5, false)]);
        assert_eq!(outer.members[2].ty, Ty::Uint64);
        assert_eq!(outer.members[3].ty, Ty::array(Ty::reference(".demo.v1.Kind")));
    }

    #[test]
    fn scalar_table() {
        let cases = [
            ("double", Ty::Float64),
            ("float", Ty::Float32),
            ("int32", Ty::Int32),
            ("sint32", Ty::Int32),
            ("sfixed32", Ty::Int32),
            ("int64", Ty::Int64),
            ("sint64", Ty::Int64),
            ("sfixed64", Ty::Int64),
            ("uint32", Ty::Uint32),
            ("fixed32", Ty::Uint32),
            ("uint64", Ty::Uint64),
            ("fixed64", Ty::Uint64),
            ("bool", Ty::Bool),
            ("string", Ty::String),
            ("bytes", Ty::Binary),
            ("Other", Ty::reference("Other")),
        ];
        for (word, want) in cases {
            assert_eq!(scalar(word.to_string()), want, "{word}");
        }
    }

    #[test]
    fn malformed_input() {
        let err = ProtoParser.parse(b"a").unwrap_err();
        assert!(matches!(err, Error::Syntax { line: 1, column: 1, .. }), "{err}");
        let err = ProtoParser.parse(b"message A { int32 a = ; }").unwrap_err();
        assert_eq!(err.to_string(), "1:23: expected integer, found `;`");
        assert!(ProtoParser.parse(b"message A {").is_err());
    }
}
