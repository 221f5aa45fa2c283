//! Thrift IDL front-end.
//!
//! Declarations come out in source order: `enum`, `struct`/`exception`
//! (struct-like) and `union`. Everything else at top level is skipped.
use tracing::debug;
use tree_sitter::Node;

use super::Parse;
use super::syntax::{Document, children, parse_int, visit};
use crate::error::Result;
use crate::ir::{Comment, Member, Struct, StructLikeSource, Ty};

pub struct ThriftParser;

impl Parse for ThriftParser {
    fn parse(&self, data: &[u8]) -> Result<Vec<Struct>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        let src = std::str::from_utf8(data)?;
        let doc = Document::parse(arborium_thrift::language().into(), src)?;
        doc.check()?;

        let mut definitions = Vec::new();
        visit(doc.root(), &mut |node| match node.kind() {
            "enum_definition" | "struct_definition" | "exception_definition" | "union_definition" => {
                definitions.push(node);
                false
            }
            kind => !kind.ends_with("_definition") || kind == "definition",
        });

        let mut out = Vec::with_capacity(definitions.len());
        for node in definitions {
            let decl = match node.kind() {
                "enum_definition" => enumeration(&doc, node)?,
                "union_definition" => struct_like(&doc, node, StructLikeSource::Union)?,
                _ => struct_like(&doc, node, StructLikeSource::Struct)?,
            };
            out.push(decl);
        }
        debug!(decls = out.len(), "parsed thrift source");
        Ok(out)
    }
}

/// Name, comments and the children between `{` and `}`.
fn header<'t>(doc: &Document, node: Node<'t>) -> Result<(String, Comment, Vec<Node<'t>>)> {
    let parts = children(node);
    let name = parts
        .iter()
        .find(|c| c.kind() == "identifier")
        .map(|c| doc.text(*c).to_string())
        .ok_or_else(|| doc.error_at(node, "expected declaration name"))?;
    let open = parts.iter().position(|c| c.kind() == "{");
    let close = parts.iter().rposition(|c| c.kind() == "}");
    let (Some(open), Some(close)) = (open, close) else {
        return Err(doc.error_at(node, format!("expected body of `{name}`")));
    };
    let comment = Comment {
        beginning_comments: doc.leading_comments(node),
        inline_comment: doc.inline_comment(parts[open]),
    };
    let body = parts[open + 1..close].iter().copied().filter(|c| !is_annotation(c)).collect();
    Ok((name, comment, body))
}

fn is_annotation(node: &Node) -> bool {
    node.kind().contains("annotation")
}

// ————————————————————————————————————————————————————————————————————————————
// ENUMS
// ————————————————————————————————————————————————————————————————————————————

fn enumeration(doc: &Document, node: Node) -> Result<Struct> {
    let (name, comment, body) = header(doc, node)?;
    let ty = Ty::enumeration(name);
    let mut decl = Struct::new(ty.clone());
    decl.comment = comment;

    let mut entries = Vec::new();
    enum_entries(body, &mut entries, &mut false);

    // only computed once an implicit value needs it
    let mut next = Some(0i64);
    for entry in entries {
        let value = match entry.value {
            Some(literal) => parse_int(doc.text(literal))
                .ok_or_else(|| doc.error_at(literal, format!("invalid enum value `{}`", doc.text(literal))))?,
            None => next.ok_or_else(|| doc.error_at(entry.name, "implicit enum value overflows i64"))?,
        };
        next = value.checked_add(1);

        let mut member = Member::new(doc.text(entry.name), ty.clone()).with_index(value);
        member.comment = Comment {
            beginning_comments: doc.leading_comments(entry.name),
            inline_comment: doc.inline_comment(entry.value.unwrap_or(entry.name)),
        };
        decl.members.push(member);
    }
    Ok(decl)
}

struct EnumEntry<'t> {
    name: Node<'t>,
    value: Option<Node<'t>>,
}

/// `A = 1, B, C = 0x10`: an identifier opens an entry and the node after `=`
/// is its value. Entries may or may not be wrapped in their own node.
fn enum_entries<'t>(nodes: Vec<Node<'t>>, out: &mut Vec<EnumEntry<'t>>, after_eq: &mut bool) {
    for node in nodes {
        if is_annotation(&node) {
            continue;
        }
        match node.kind() {
            "identifier" if !*after_eq => out.push(EnumEntry { name: node, value: None }),
            "=" => *after_eq = true,
            _ if *after_eq && node.is_named() => {
                if let Some(entry) = out.last_mut() {
                    entry.value = Some(node);
                }
                *after_eq = false;
            }
            _ if node.is_named() && node.child_count() > 0 => enum_entries(children(node), out, after_eq),
            _ => {}
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// STRUCTS, EXCEPTIONS, UNIONS
// ————————————————————————————————————————————————————————————————————————————

fn struct_like(doc: &Document, node: Node, source: StructLikeSource) -> Result<Struct> {
    let (name, comment, body) = header(doc, node)?;
    let mut decl = Struct::new(Ty::StructLike { name, source });
    decl.comment = comment;

    let mut fields = Vec::new();
    for part in body {
        visit(part, &mut |n| {
            if n.kind() == "field" {
                fields.push(n);
                return false;
            }
            !is_annotation(&n)
        });
    }
    for field in fields {
        let member = member(doc, field, decl.members.len() as i64 + 1)?;
        decl.members.push(member);
    }
    Ok(decl)
}

/// `[id:] [required|optional] T name [= default] [(annotations)] [,|;]`
fn member(doc: &Document, field: Node, position: i64) -> Result<Member> {
    let mut id = None;
    let mut optional = false;
    let mut ty = None;
    let mut name = None;
    for part in children(field) {
        if is_annotation(&part) || part.kind() == ":" {
            continue;
        }
        let text = doc.text(part).trim();
        match text {
            "optional" => optional = true,
            "required" => {}
            "=" if name.is_some() => break,
            _ if ty.is_none() && id.is_none() && parse_int(text.trim_end_matches(':')).is_some() => {
                id = parse_int(text.trim_end_matches(':'));
            }
            _ if !part.is_named() => {}
            _ if ty.is_none() => ty = Some(field_type(doc, part)?),
            _ if name.is_none() => name = Some(text.to_string()),
            _ => {}
        }
    }
    let (Some(ty), Some(name)) = (ty, name) else {
        return Err(doc.error_at(field, "expected field type and name"));
    };
    let mut member = Member::new(name, ty).with_index(id.unwrap_or(position));
    member.optional = optional;
    member.comment = Comment { beginning_comments: doc.leading_comments(field), inline_comment: doc.inline_comment(field) };
    Ok(member)
}

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Reads the type from its tokens: `list<T>`, `set<T>`, `map<K, V>` or a
/// (possibly dotted) name.
fn field_type(doc: &Document, node: Node) -> Result<Ty> {
    let mut tokens: Vec<String> = Vec::new();
    visit(node, &mut |n| {
        if is_annotation(&n) || n.kind() == "string" {
            return false;
        }
        if n.child_count() == 0 {
            match (tokens.last_mut(), doc.text(n)) {
                (Some(prev), ".") => prev.push('.'),
                (Some(prev), word) if prev.ends_with('.') => prev.push_str(word),
                (_, word) => tokens.push(word.to_string()),
            }
        }
        true
    });
    let mut rest = tokens.as_slice();
    let ty = type_tokens(&mut rest);
    match ty {
        Some(ty) if rest.is_empty() => Ok(ty),
        _ => Err(doc.error_at(node, format!("unsupported type `{}`", doc.text(node)))),
    }
}

fn type_tokens(rest: &mut &[String]) -> Option<Ty> {
    let (word, tail) = rest.split_first()?;
    *rest = tail;
    let mut expect = |punct: &str, rest: &mut &[String]| -> Option<()> {
        let (head, tail) = rest.split_first()?;
        *rest = tail;
        (head == punct).then_some(())
    };
    match word.as_str() {
        "list" | "set" => {
            expect("<", rest)?;
            let elem = type_tokens(rest)?;
            expect(">", rest)?;
            Some(if word == "list" { Ty::array(elem) } else { Ty::set(elem) })
        }
        "map" => {
            expect("<", rest)?;
            let key = type_tokens(rest)?;
            expect(",", rest)?;
            let value = type_tokens(rest)?;
            expect(">", rest)?;
            Some(Ty::map(key, value))
        }
        _ => Some(scalar(word)),
    }
}

fn scalar(word: &str) -> Ty {
    match word {
        "bool" => Ty::Bool,
        "byte" | "i8" => Ty::Int8,
        "i16" => Ty::Int16,
        "i32" => Ty::Int32,
        "i64" => Ty::Int64,
        "double" => Ty::Float64,
        "string" => Ty::String,
        "binary" => Ty::Binary,
        _ => Ty::reference(word),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const SAMPLE: &str = r#"
enum EEE {
    A = 1;
    B = 2;
}

struct SS {
    1: optional bool a,
    2: byte b,
    3: i16 c,
    4: i32 d,
    5: i64 e,
    6: double f,
    7: string g,
    8: binary h,
    9: map<i32, i32> i,
    10: optional list<i32> j,
    11: set<i32> k,
}

struct AAA {
    1: string hello,
}

struct BBB {
    1: i16 b1,
    2: i32 b2,
    3: EEE e,
    4: map<AAA, BBB> mapab,
    5: set<AAA> seta,
    6: list<BBB> listb,
}

union UUU {
    1: AAA a;
    2: BBB b;
}
"#;

    #[test]
    fn declarations_in_source_order() {
        let structs = ThriftParser.parse(SAMPLE.as_bytes()).unwrap();
        let names: Vec<&str> = structs.iter().map(|s| s.struct_name()).collect();
        assert_eq!(names, ["EEE", "SS", "AAA", "BBB", "UUU"]);

        let eee = &structs[0];
        assert!(eee.is_enum());
        let values: Vec<(&str, i64)> = eee.members.iter().map(|m| (m.field.as_str(), m.index)).collect();
        assert_eq!(values, [("A", 1), ("B", 2)]);
        assert_eq!(eee.members[0].ty, Ty::enumeration("EEE"));

        assert_eq!(structs[4].ty, Ty::StructLike { name: "UUU".into(), source: StructLikeSource::Union });
        assert_eq!(structs[4].thrift_keyword(), "union");
        assert_eq!(structs[1].thrift_keyword(), "struct");
    }

    #[test]
    fn scalar_mapping_is_exhaustive() {
        let structs = ThriftParser.parse(SAMPLE.as_bytes()).unwrap();
        let ss = &structs[1];
        let got: Vec<(&str, i64, bool, &Ty)> = ss
            .members
            .iter()
            .map(|m| (m.field.as_str(), m.index, m.optional, &m.ty))
            .collect();
        assert_eq!(
            got,
            [
                ("a", 1, true, &Ty::Bool),
                ("b", 2, false, &Ty::Int8),
                ("c", 3, false, &Ty::Int16),
                ("d", 4, false, &Ty::Int32),
                ("e", 5, false, &Ty::Int64),
                ("f", 6, false, &Ty::Float64),
                ("g", 7, false, &Ty::String),
                ("h", 8, false, &Ty::Binary),
                ("i", 9, false, &Ty::map(Ty::Int32, Ty::Int32)),
                ("j", 10, true, &Ty::array(Ty::Int32)),
                ("k", 11, false, &Ty::set(Ty::Int32)),
            ]
        );
        assert_eq!(scalar("i8"), Ty::Int8);

        let bbb = &structs[3];
        assert_eq!(bbb.members[2].ty, Ty::reference("EEE"));
        assert_eq!(bbb.members[3].ty, Ty::map(Ty::reference("AAA"), Ty::reference("BBB")));
        assert_eq!(bbb.members[4].ty, Ty::set(Ty::reference("AAA")));
        assert_eq!(bbb.members[5].ty, Ty::array(Ty::reference("BBB")));
    }

    #[test]
    fn headers_defaults_and_implicit_values() {
        let src = r#"
# generated
namespace go demo.api
namespace * demo
include "shared.thrift"
typedef i64 Timestamp
const list<string> NAMES = ["a", "b"]
const i32 LIMIT = 5;

/** Status codes */
enum Status {
  OK,          // zero
  MISSING = 4,
  GONE
}

exception Failure {
  string why = "unknown" (go.tag = "json:\"why\""),
  7: required shared.Code code
} (final = "true")

service Api extends shared.Base {
  Status ping(1: i32 n) throws (1: Failure f)
}
"#;
        let structs = ThriftParser.parse(src.as_bytes()).unwrap();
        let names: Vec<&str> = structs.iter().map(|s| s.struct_name()).collect();
        assert_eq!(names, ["Status", "Failure"]);

        let status = &structs[0];
        assert_eq!(status.comment.beginning_comments, ["/** Status codes */"]);
        let values: Vec<(&str, i64)> = status.members.iter().map(|m| (m.field.as_str(), m.index)).collect();
        assert_eq!(values, [("OK", 0), ("MISSING", 4), ("GONE", 5)]);
        assert_eq!(status.members[0].comment.inline_comment, "// zero");

        let failure = &structs[1];
        assert_eq!(failure.ty, Ty::structure("Failure"));
        let got: Vec<(&str, i64)> = failure.members.iter().map(|m| (m.field.as_str(), m.index)).collect();
        assert_eq!(got, [("why", 1), ("code", 7)]);
        assert_eq!(failure.members[1].ty, Ty::reference("shared.Code"));
    }

    #[test]
    fn largest_explicit_enum_value_is_accepted() {
        let structs = ThriftParser.parse(b"enum E { A = 9223372036854775807 }").unwrap();
        assert_eq!(structs[0].members[0].index, i64::MAX);
    }

    #[test]
    fn implicit_value_past_the_largest_is_an_error() {
        let err = ThriftParser.parse(b"enum E {\n  A = 9223372036854775807,\n  B\n}").unwrap_err();
        assert!(matches!(err, Error::Syntax { line: 3, column: 3, .. }), "{err}");
        assert!(err.to_string().contains("overflows"), "{err}");
    }

    #[test]
    fn whitespace_only_input_has_no_declarations() {
        assert!(ThriftParser.parse(b" \n\t").unwrap().is_empty());
    }

    #[test]
    fn malformed_input() {
        let err = ThriftParser.parse(b"a").unwrap_err();
        assert!(matches!(err, Error::Syntax { line: 1, column: 1, .. }), "{err}");
        assert!(ThriftParser.parse(b"struct A { 1: }").is_err());
    }
}
