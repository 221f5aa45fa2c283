//! Go source front-end.
//!
//! Only exported declarations matter: `type X struct {...}` becomes a struct,
//! and typed `const` specs whose type is a named (non-basic) type become enum
//! members, `iota` and implicit repetition included. Functions, variables
//! and imports are skipped.
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use tree_sitter::Node;

use super::Parse;
use super::syntax::{Document, children, parse_int};
use crate::error::{Error, Result};
use crate::ident;
use crate::ir::{Comment, Member, Struct, Ty};

static TAG_PAIR: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(\w+):"([^"]*)""#).expect("tag pattern is valid"));

const BASIC_TYPES: &[&str] = &[
    "int", "int8", "int16", "int32", "int64", "uint", "uint8", "uint16", "uint32", "uint64", "float32",
    "float64", "bool", "string", "complex64", "complex128", "byte", "rune", "uintptr",
];

pub struct GoParser;

impl Parse for GoParser {
    fn parse(&self, data: &[u8]) -> Result<Vec<Struct>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        let src = std::str::from_utf8(data)?;
        let doc = Document::parse(arborium_go::language().into(), src)?;
        let top: Vec<Node> = children(doc.root()).into_iter().filter(|n| n.is_named()).collect();

        match top.first() {
            Some(node) if node.kind() == "package_clause" => {}
            Some(&node) => return Err(doc.error_at(node, format!("expected 'package', found {}", doc.found(node)))),
            None => {
                let end = doc.root().end_position();
                return Err(Error::syntax(end.row + 1, end.column + 1, "expected 'package', found 'EOF'"));
            }
        }
        doc.check()?;

        let mut decls = Decls::default();
        for node in top.into_iter().skip(1) {
            match node.kind() {
                "import_declaration" | "var_declaration" | "function_declaration" | "method_declaration" => {}
                "type_declaration" => {
                    let grouped = children(node).iter().any(|c| c.kind() == "(");
                    for spec in children(node).into_iter().filter(is_type_spec) {
                        let comment_owner = if grouped { spec } else { node };
                        decls.type_spec(&doc, spec, doc.leading_comments(comment_owner))?;
                    }
                }
                "const_declaration" => {
                    let mut group = ConstGroup::default();
                    for spec in children(node).into_iter().filter(|c| c.kind() == "const_spec") {
                        group.spec(&doc, spec, &mut decls);
                    }
                }
                _ => return Err(doc.error_at(node, format!("expected declaration, found {}", doc.found(node)))),
            }
        }
        debug!(decls = decls.out.len(), "parsed go source");
        Ok(decls.out)
    }
}

fn is_type_spec(node: &Node) -> bool {
    matches!(node.kind(), "type_spec" | "type_alias")
}

/// Named nodes stored under `field`; a field may also tag the commas between
/// them.
fn named_fields<'t>(node: Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children_by_field_name(field, &mut cursor).filter(|n| n.is_named()).collect()
}

// ————————————————————————————————————————————————————————————————————————————
// DECLARATIONS
// ————————————————————————————————————————————————————————————————————————————

/// Output in first-seen order; enum members join the enum of their type
/// wherever it was first declared.
#[derive(Default)]
struct Decls {
    out: Vec<Struct>,
    enums: HashMap<String, usize>,
    /// Comments on non-struct type declarations, picked up by their enum.
    type_comments: HashMap<String, Comment>,
}

impl Decls {
    fn type_spec(&mut self, doc: &Document, spec: Node, comments: Vec<String>) -> Result<()> {
        let (Some(name), Some(ty)) = (spec.child_by_field_name("name"), spec.child_by_field_name("type")) else {
            return Err(doc.error_at(spec, "incomplete type declaration"));
        };
        let name = doc.text(name).to_string();
        if ty.kind() == "struct_type" {
            if is_exported(&name) {
                self.out.push(struct_body(doc, ty, name, comments));
            }
            return Ok(());
        }
        let comment = Comment { beginning_comments: comments, inline_comment: doc.inline_comment(spec) };
        if !comment.is_empty() {
            self.type_comments.insert(name, comment);
        }
        Ok(())
    }

    fn enum_member(&mut self, type_name: &str, member: Member) {
        let slot = match self.enums.get(type_name) {
            Some(&slot) => slot,
            None => {
                let mut decl = Struct::new(Ty::enumeration(type_name));
                decl.comment = self.type_comments.remove(type_name).unwrap_or_default();
                self.out.push(decl);
                self.enums.insert(type_name.to_string(), self.out.len() - 1);
                self.out.len() - 1
            }
        };
        self.out[slot].members.push(member);
    }
}

fn struct_body(doc: &Document, ty: Node, name: String, comments: Vec<String>) -> Struct {
    let mut decl = Struct::new(Ty::structure(name));
    let Some(list) = children(ty).into_iter().find(|c| c.kind() == "field_declaration_list") else {
        return decl;
    };
    let inline_comment = match children(list).first() {
        Some(&brace) => doc.inline_comment(brace),
        None => String::new(),
    };
    decl.comment = Comment { beginning_comments: comments, inline_comment };

    for field in children(list).into_iter().filter(|c| c.kind() == "field_declaration") {
        let names: Vec<&str> = named_fields(field, "name").into_iter().map(|n| doc.text(n)).collect();
        // embedded field
        if names.is_empty() {
            continue;
        }
        let Some(type_node) = field.child_by_field_name("type") else { continue };
        let ty = go_type(doc, type_node);
        let optional = type_node.kind() == "pointer_type" && ty.is_basic();
        let tags = field
            .child_by_field_name("tag")
            .map(|tag| parse_tags(&tag_body(doc.text(tag))))
            .unwrap_or_default();
        let comment = Comment {
            beginning_comments: doc.leading_comments(field),
            inline_comment: doc.inline_comment(field),
        };

        for name in names.into_iter().filter(|n| is_exported(n)) {
            let field = json_name(&tags).unwrap_or_else(|| ident::snake_case(name));
            let mut member = Member::new(field, ty.clone()).with_index(decl.members.len() as i64 + 1);
            member.optional = optional;
            member.comment = comment.clone();
            member.tags = tags.clone();
            decl.members.push(member);
        }
    }
    decl
}

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

fn go_type(doc: &Document, node: Node) -> Ty {
    let field = |name: &str| node.child_by_field_name(name);
    match node.kind() {
        "pointer_type" | "parenthesized_type" => match children(node).into_iter().find(|c| c.is_named()) {
            Some(inner) => go_type(doc, inner),
            None => Ty::Any,
        },
        "slice_type" => match field("element").map(|elem| go_type(doc, elem)) {
            Some(Ty::Uint8) => Ty::Binary,
            Some(elem) => Ty::array(elem),
            None => Ty::Any,
        },
        "array_type" | "implicit_length_array_type" => match field("element") {
            Some(elem) => Ty::array(go_type(doc, elem)),
            None => Ty::Any,
        },
        "map_type" => match (field("key"), field("value")) {
            (Some(key), Some(value)) => Ty::map(go_type(doc, key), go_type(doc, value)),
            _ => Ty::Any,
        },
        // `List[int]` is named after its base type
        "generic_type" => match field("type") {
            Some(base) => go_type(doc, base),
            None => Ty::Any,
        },
        "type_identifier" | "qualified_type" => named_type(doc.text(node)),
        _ => Ty::Any,
    }
}

fn named_type(word: &str) -> Ty {
    match word {
        "int" | "int64" => Ty::Int64,
        "int8" => Ty::Int8,
        "int16" => Ty::Int16,
        "int32" | "rune" => Ty::Int32,
        "uint" | "uint64" | "uintptr" => Ty::Uint64,
        "uint8" | "byte" => Ty::Uint8,
        "uint16" => Ty::Uint16,
        "uint32" => Ty::Uint32,
        "float32" => Ty::Float32,
        "float64" => Ty::Float64,
        "bool" => Ty::Bool,
        "string" => Ty::String,
        "any" => Ty::Any,
        _ => Ty::reference(word),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// CONSTANTS
// ————————————————————————————————————————————————————————————————————————————

/// One `const ( ... )` block: `iota` counts specs, and a spec without a value
/// repeats the previous type and expression list.
#[derive(Default)]
struct ConstGroup<'t> {
    iota: i64,
    previous: (Option<Node<'t>>, Vec<Node<'t>>),
}

impl<'t> ConstGroup<'t> {
    fn spec(&mut self, doc: &Document, spec: Node<'t>, decls: &mut Decls) {
        let names: Vec<&str> = named_fields(spec, "name").into_iter().map(|n| doc.text(n)).collect();
        let (type_node, values) = match spec.child_by_field_name("value") {
            Some(list) => {
                let values: Vec<Node<'t>> = children(list).into_iter().filter(|c| c.is_named()).collect();
                self.previous = (spec.child_by_field_name("type"), values);
                self.previous.clone()
            }
            None => self.previous.clone(),
        };
        let iota = self.iota;
        self.iota += 1;

        let type_name = type_node
            .filter(|t| t.kind() == "type_identifier")
            .map(|t| doc.text(t))
            .filter(|t| !BASIC_TYPES.contains(t));
        let Some(type_name) = type_name else { return };
        let comment = Comment {
            beginning_comments: doc.leading_comments(spec),
            inline_comment: doc.inline_comment(spec),
        };
        for (name, expr) in names.into_iter().zip(values) {
            if !is_exported(name) {
                continue;
            }
            let Some(value) = evaluate(doc, expr, iota) else { continue };
            let mut member = Member::new(name, Ty::enumeration(type_name)).with_index(value);
            member.comment = comment.clone();
            decls.enum_member(type_name, member);
        }
    }
}

/// Integer constant expressions over literals and `iota`. Anything else, and
/// any overflow, yields `None`.
fn evaluate(doc: &Document, node: Node, iota: i64) -> Option<i64> {
    match node.kind() {
        "int_literal" => parse_int(doc.text(node)),
        "identifier" if doc.text(node) == "iota" => Some(iota),
        "parenthesized_expression" => evaluate(doc, children(node).into_iter().find(|c| c.is_named())?, iota),
        "unary_expression" => {
            let operand = evaluate(doc, node.child_by_field_name("operand")?, iota)?;
            match doc.text(node.child_by_field_name("operator")?) {
                "-" => operand.checked_neg(),
                "+" => Some(operand),
                "^" => Some(!operand),
                _ => None,
            }
        }
        "binary_expression" => {
            let lhs = evaluate(doc, node.child_by_field_name("left")?, iota)?;
            let rhs = evaluate(doc, node.child_by_field_name("right")?, iota)?;
            match doc.text(node.child_by_field_name("operator")?) {
                "+" => lhs.checked_add(rhs),
                "-" => lhs.checked_sub(rhs),
                "*" => lhs.checked_mul(rhs),
                "/" => lhs.checked_div(rhs),
                "%" => lhs.checked_rem(rhs),
                "<<" => lhs.checked_shl(u32::try_from(rhs).ok()?),
                ">>" => lhs.checked_shr(u32::try_from(rhs).ok()?),
                "|" => Some(lhs | rhs),
                "&" => Some(lhs & rhs),
                "^" => Some(lhs ^ rhs),
                "&^" => Some(lhs & !rhs),
                _ => None,
            }
        }
        _ => None,
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Contents of a raw (`` `...` ``) or interpreted (`"..."`) tag literal.
fn tag_body(literal: &str) -> String {
    if let Some(raw) = literal.strip_prefix('`').and_then(|s| s.strip_suffix('`')) {
        return raw.to_string();
    }
    let inner = literal.strip_prefix('"').and_then(|s| s.strip_suffix('"')).unwrap_or(literal);
    inner.replace("\\\"", "\"").replace("\\\\", "\\")
}

/// `` `json:"a,omitempty" yaml:"a"` `` → `["json:\"a,omitempty\"", "yaml:\"a\""]`.
fn parse_tags(raw: &str) -> Vec<String> {
    TAG_PAIR.find_iter(raw).map(|m| m.as_str().to_string()).collect()
}

fn json_name(tags: &[String]) -> Option<String> {
    tags.iter().find_map(|tag| {
        let caps = TAG_PAIR.captures(tag)?;
        if &caps[1] != "json" {
            return None;
        }
        let name = caps[2].split(',').next().unwrap_or_default();
        (!name.is_empty() && name != "-").then(|| name.to_string())
    })
}
