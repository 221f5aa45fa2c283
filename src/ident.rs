//! Identifier normalization: case conversion and token sanitizing.
//!
//! Acronym handling is an explicit table passed to [`camel_case`]; nothing is
//! registered globally.

use std::collections::BTreeSet;

/// Acronyms rendered fully upper-case when a whole `_`-segment matches.
pub const COMMON_ACRONYMS: &[&str] = &[
    "ACL", "API", "ASCII", "CPU", "CSS", "CSV", "DNS", "EOF", "GUID", "HTML", "HTTP", "HTTPS",
    "ID", "IP", "JSON", "LHS", "QPS", "RAM", "RHS", "RPC", "SLA", "SMTP", "SQL", "SSH", "TCP",
    "TLS", "TTL", "UDP", "UI", "UID", "URI", "URL", "UTF8", "UUID", "VM", "XML", "XMPP", "XSRF",
    "XSS",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Acronyms {
    words: BTreeSet<String>,
}

impl Acronyms {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn common() -> Self {
        Self::new(COMMON_ACRONYMS.iter().copied())
    }

    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words.into_iter().map(|w| w.as_ref().to_ascii_uppercase()).collect(),
        }
    }

    pub fn contains(&self, segment: &str) -> bool {
        !self.words.is_empty() && self.words.contains(&segment.to_ascii_uppercase())
    }
}

/// `hello_world` → `HelloWorld`. Only the first letter of each segment is
/// touched; the rest keeps its case (`helloWorld` → `HelloWorld`).
pub fn camel_case(s: &str, acronyms: &Acronyms) -> String {
    let mut out = String::with_capacity(s.len());
    for segment in s.split('_') {
        if segment.is_empty() {
            continue;
        }
        if acronyms.contains(segment) {
            out.push_str(&segment.to_ascii_uppercase());
            continue;
        }
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// `HelloWorld` → `hello_world`, `IDName` → `id_name`. Upper-case runs stay
/// together (`IDURL` → `idurl`).
pub fn snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_uppercase() {
            out.push(c);
            continue;
        }
        if i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Keep `[A-Za-z0-9_]` only; a leading digit gets an `N` prefix. Returns
/// `fallback` when nothing is left.
pub fn normalize_token(raw: &str, fallback: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    match cleaned.chars().next() {
        None => fallback.to_string(),
        Some(c) if c.is_ascii_digit() => format!("N{cleaned}"),
        Some(_) => cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_plain() {
        let none = Acronyms::none();
        let cases = [
            ("", ""),
            ("_", ""),
            ("a_b", "AB"),
            ("_b", "B"),
            ("a_", "A"),
            ("hello_world", "HelloWorld"),
            ("hEllo_World", "HElloWorld"),
            ("hElloWorld", "HElloWorld"),
            ("helloWorld", "HelloWorld"),
            ("HelloWorld", "HelloWorld"),
            ("id_name", "IdName"),
            ("id_url", "IdUrl"),
        ];
        for (input, want) in cases {
            assert_eq!(camel_case(input, &none), want, "camel({input:?})");
        }
    }

    #[test]
    fn camel_with_acronyms() {
        let common = Acronyms::common();
        assert_eq!(camel_case("http_request", &common), "HTTPRequest");
        assert_eq!(camel_case("user_id", &common), "UserID");
        assert_eq!(camel_case("Url", &common), "URL");
        assert_eq!(camel_case("hello_world", &common), "HelloWorld");

        let custom = Acronyms::new(["grpc"]);
        assert_eq!(camel_case("grpc_port", &custom), "GRPCPort");
        assert_eq!(camel_case("http_request", &custom), "HttpRequest");
    }

    #[test]
    fn snake() {
        let cases = [
            ("A", "a"),
            ("ID", "id"),
            ("IDName", "id_name"),
            ("IDURL", "idurl"),
            ("id_name", "id_name"),
            ("HelloWorld", "hello_world"),
            ("MM", "mm"),
            ("B1", "b1"),
            ("Version2Name", "version2_name"),
        ];
        for (input, want) in cases {
            assert_eq!(snake_case(input), want, "snake({input:?})");
        }
    }

    #[test]
    fn normalize() {
        assert_eq!(normalize_token("hello world", "X"), "helloworld");
        assert_eq!(normalize_token("-minlat", "X"), "minlat");
        assert_eq!(normalize_token("1st", "X"), "N1st");
        assert_eq!(normalize_token("#$%", "X"), "X");
        assert_eq!(normalize_token("", ""), "");
        assert_eq!(normalize_token("a_b9", "X"), "a_b9");
    }
}
