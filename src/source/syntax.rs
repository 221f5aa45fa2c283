//! Tree-sitter plumbing shared by the Go and Thrift front-ends.
//!
//! A [`Document`] owns the syntax tree of one input together with an index of
//! every comment in it. Comments are extras in both grammars, so they can sit
//! anywhere in the tree; attaching them by position keeps the walkers free of
//! comment handling.
use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::{Error, Result};

pub struct Document<'a> {
    text: &'a str,
    tree: Tree,
    comments: Vec<Span>,
}

#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
    start_row: usize,
    end_row: usize,
}

impl Span {
    fn of(node: Node) -> Self {
        Span {
            start: node.start_byte(),
            end: node.end_byte(),
            start_row: node.start_position().row,
            end_row: node.end_position().row,
        }
    }
}

impl<'a> Document<'a> {
    pub fn parse(language: Language, text: &'a str) -> Result<Self> {
        let mut parser = Parser::new();
        parser.set_language(&language)?;
        let tree = parser
            .parse(text, None)
            .ok_or_else(|| Error::syntax(1, 1, "parser produced no syntax tree"))?;
        let mut comments = Vec::new();
        visit(tree.root_node(), &mut |node| {
            if node.kind() == "comment" {
                comments.push(Span::of(node));
                return false;
            }
            true
        });
        Ok(Self { text, tree, comments })
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn text(&self, node: Node) -> &'a str {
        self.text.get(node.byte_range()).unwrap_or_default()
    }

    /// The first `ERROR` or missing node, as a positioned syntax error.
    pub fn check(&self) -> Result<()> {
        if !self.root().has_error() {
            return Ok(());
        }
        let mut found = None;
        visit(self.root(), &mut |node| {
            if found.is_some() {
                return false;
            }
            if node.is_missing() {
                found = Some(self.error_at(node, format!("expected '{}'", node.kind())));
                return false;
            }
            if node.is_error() {
                found = Some(self.error_at(node, format!("unexpected {}", self.found(node))));
                return false;
            }
            node.has_error()
        });
        Err(found.unwrap_or_else(|| self.error_at(self.root(), "malformed input")))
    }

    pub fn error_at(&self, node: Node, message: impl Into<String>) -> Error {
        let at = node.start_position();
        Error::syntax(at.row + 1, at.column + 1, message)
    }

    /// First token of `node` in Go's diagnostic style: literals and
    /// identifiers bare, keywords and punctuation quoted.
    pub fn found(&self, node: Node) -> String {
        let mut cursor = node.walk();
        while cursor.goto_first_child() {}
        let leaf = cursor.node();
        match self.text(leaf) {
            "" => "'EOF'".to_string(),
            text if leaf.is_named() => text.to_string(),
            text => format!("'{text}'"),
        }
    }

    /// The run of own-line comments directly above `node`, with no blank
    /// line in between.
    pub fn leading_comments(&self, node: Node) -> Vec<String> {
        let (start, row, _, _) = significant_bounds(node);
        let mut boundary = start;
        let mut expected_row = row;
        let mut group = Vec::new();
        let mut idx = self.comments.partition_point(|c| c.end <= start);
        while idx > 0 {
            let span = self.comments[idx - 1];
            let gap = self.text.get(span.end..boundary).unwrap_or_default();
            if span.end_row + 1 != expected_row || !gap.trim().is_empty() || !self.owns_line(span) {
                break;
            }
            group.push(self.span_text(span).trim_end().to_string());
            boundary = span.start;
            expected_row = span.start_row;
            idx -= 1;
        }
        group.reverse();
        group
    }

    /// A comment on the same line right after `node`; list separators may
    /// sit in between.
    pub fn inline_comment(&self, node: Node) -> String {
        let (_, _, end, row) = significant_bounds(node);
        let idx = self.comments.partition_point(|c| c.start < end);
        match self.comments.get(idx) {
            Some(&span) if span.start_row == row => {
                let gap = self.text.get(end..span.start).unwrap_or_default();
                if gap.chars().all(|c| c.is_whitespace() || c == ',' || c == ';') {
                    self.span_text(span).trim_end().to_string()
                } else {
                    String::new()
                }
            }
            _ => String::new(),
        }
    }

    fn owns_line(&self, span: Span) -> bool {
        let before = self.text.get(..span.start).unwrap_or_default();
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        before[line_start..].trim().is_empty()
    }

    fn span_text(&self, span: Span) -> &'a str {
        self.text.get(span.start..span.end).unwrap_or_default()
    }
}

/// Pre-order walk; `enter` returns whether to descend into the node.
pub fn visit<'t>(root: Node<'t>, enter: &mut impl FnMut(Node<'t>) -> bool) {
    let mut cursor = root.walk();
    loop {
        if enter(cursor.node()) && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// Direct children, comments excluded.
pub fn children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).filter(|c| c.kind() != "comment").collect()
}

/// `(start_byte, start_row, end_byte, end_row)` ignoring comments at either
/// edge of the node.
fn significant_bounds(node: Node) -> (usize, usize, usize, usize) {
    let inner = children(node);
    let first = inner.first().copied().unwrap_or(node);
    let last = inner.last().copied().unwrap_or(node);
    (first.start_byte(), first.start_position().row, last.end_byte(), last.end_position().row)
}

/// Integer literal text: decimal, `0x`, `0o`, `0b`, Go-style leading-zero
/// octal, `_` separators and an optional sign.
pub fn parse_int(text: &str) -> Option<i64> {
    let text = text.trim().replace('_', "");
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest.to_string()),
        None => (false, text.strip_prefix('+').unwrap_or(&text).to_string()),
    };
    let lower = digits.to_ascii_lowercase();
    let value = if let Some(hex) = lower.strip_prefix("0x") {
        i64::from_str_radix(hex, 16).ok()?
    } else if let Some(oct) = lower.strip_prefix("0o") {
        i64::from_str_radix(oct, 8).ok()?
    } else if let Some(bin) = lower.strip_prefix("0b") {
        i64::from_str_radix(bin, 2).ok()?
    } else if lower.len() > 1 && lower.starts_with('0') {
        i64::from_str_radix(&lower[1..], 8).ok()?
    } else {
        lower.parse().ok()?
    };
    if negative { value.checked_neg() } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn go(src: &str) -> Document<'_> {
        Document::parse(arborium_go::language().into(), src).unwrap()
    }

    fn first_of_kind<'t>(root: Node<'t>, kind: &str) -> Node<'t> {
        let mut found = None;
        visit(root, &mut |node| {
            if found.is_none() && node.kind() == kind {
                found = Some(node);
            }
            found.is_none()
        });
        found.unwrap()
    }

    #[test]
    fn comments_attach_by_position() {
        let src = "package p\n\n// file header\n\n// doc one\n// doc two\ntype A struct { // inline\n\tB int // b\n}\n";
        let doc = go(src);
        let decl = first_of_kind(doc.root(), "type_declaration");
        assert_eq!(doc.leading_comments(decl), ["// doc one", "// doc two"]);

        let field = first_of_kind(doc.root(), "field_declaration");
        assert!(doc.leading_comments(field).is_empty());
        assert_eq!(doc.inline_comment(field), "// b");

        let brace = children(first_of_kind(doc.root(), "field_declaration_list"))[0];
        assert_eq!(doc.inline_comment(brace), "// inline");
    }

    #[test]
    fn trailing_comment_of_previous_line_is_not_leading() {
        let doc = go("package p\n\nvar x = 1 // about x\ntype A int\n");
        let decl = first_of_kind(doc.root(), "type_declaration");
        assert!(doc.leading_comments(decl).is_empty());
        assert_eq!(doc.inline_comment(decl), "");
    }

    #[test]
    fn errors_are_positioned() {
        let doc = go("package p\n\ntype A struct {\n");
        let err = doc.check().unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }), "{err}");
        assert!(go("package p\n").check().is_ok());
    }

    #[test]
    fn integer_literals() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("0x1F"), Some(31));
        assert_eq!(parse_int("0o17"), Some(15));
        assert_eq!(parse_int("017"), Some(15));
        assert_eq!(parse_int("0b101"), Some(5));
        assert_eq!(parse_int("1_000"), Some(1000));
        assert_eq!(parse_int("-7"), Some(-7));
        assert_eq!(parse_int("0"), Some(0));
        assert_eq!(parse_int("1.5"), None);
        assert_eq!(parse_int("9223372036854775808"), None);
    }
}
