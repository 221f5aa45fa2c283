//! Tokenizer and token cursor for the Proto front-end.
//!
//! Comments are kept as tokens (with their start and end lines) so parsers can
//! attach them to the declarations and members around them. The [`Cursor`]
//! skips them transparently everywhere else.
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tok {
    /// Identifiers, including dotted paths such as `google.protobuf.Any`.
    Ident(String),
    /// Raw numeric literal text.
    Number(String),
    /// String literal contents, escapes resolved.
    Str(String),
    Punct(char),
    /// Raw comment text including its delimiters.
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub tok: Tok,
    pub line: usize,
    pub end_line: usize,
    pub column: usize,
}

// ————————————————————————————————————————————————————————————————————————————
// TOKENIZER
// ————————————————————————————————————————————————————————————————————————————

pub fn tokenize(src: &str) -> Result<Vec<Token>> {
    Scanner { chars: src.chars().collect(), pos: 0, line: 1, column: 1 }.run()
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Scanner {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn take_while(&mut self, mut keep: impl FnMut(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek()
            && keep(c)
        {
            out.push(c);
            self.bump();
        }
        out
    }

    fn run(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.take_while(char::is_whitespace);
            let (line, column) = (self.line, self.column);
            let Some(c) = self.peek() else { break };
            let tok = match c {
                '/' if self.peek_at(1) == Some('/') => Tok::Comment(self.take_while(|c| c != '\n').trim_end().to_string()),
                '/' if self.peek_at(1) == Some('*') => Tok::Comment(self.block_comment(line, column)?),
                '"' | '\'' => Tok::Str(self.quoted(c, line, column)?),
                c if c.is_alphabetic() || c == '_' => {
                    Tok::Ident(self.take_while(|c| c.is_alphanumeric() || c == '_' || c == '.'))
                }
                c if c.is_ascii_digit() => Tok::Number(self.number()),
                c => {
                    self.bump();
                    Tok::Punct(c)
                }
            };
            tokens.push(Token { tok, line, end_line: self.line, column });
        }
        Ok(tokens)
    }

    fn block_comment(&mut self, line: usize, column: usize) -> Result<String> {
        let mut out = String::new();
        out.extend(self.bump());
        out.extend(self.bump());
        loop {
            match self.bump() {
                Some('*') if self.peek() == Some('/') => {
                    self.bump();
                    out.push_str("*/");
                    return Ok(out);
                }
                Some(c) => out.push(c),
                None => return Err(Error::syntax(line, column, "unterminated block comment")),
            }
        }
    }

    fn quoted(&mut self, quote: char, line: usize, column: usize) -> Result<String> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some(c) => out.push(c),
                    None => break,
                },
                Some('\n') | None => break,
                Some(c) => out.push(c),
            }
        }
        Err(Error::syntax(line, column, "unterminated string literal"))
    }

    fn number(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            let exponent_sign = (c == '-' || c == '+')
                && out.ends_with(['e', 'E'])
                && !out.starts_with("0x")
                && !out.starts_with("0X");
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' || exponent_sign {
                out.push(c);
                self.bump();
            } else {
                break;
            }
        }
        out
    }
}

/// Integer literal value: decimal or `0x` hex.
pub fn parse_int(text: &str) -> Option<i64> {
    let digits = text.replace('_', "");
    match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16).ok(),
        None => digits.parse().ok(),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// CURSOR
// ————————————————————————————————————————————————————————————————————————————

pub struct Cursor {
    tokens: Vec<Token>,
    pos: usize,
    /// End line of the last consumed non-comment token.
    last_line: usize,
}

impl Cursor {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0, last_line: 0 }
    }

    fn significant(&self) -> Option<usize> {
        (self.pos..self.tokens.len()).find(|&i| !matches!(self.tokens[i].tok, Tok::Comment(_)))
    }

    pub fn peek(&self) -> Option<&Token> {
        self.significant().map(|i| &self.tokens[i])
    }

    pub fn peek_tok(&self) -> Option<&Tok> {
        self.peek().map(|t| &t.tok)
    }

    pub fn is_eof(&self) -> bool {
        self.significant().is_none()
    }

    pub fn bump(&mut self) -> Result<Token> {
        match self.significant() {
            Some(i) => {
                let token = self.tokens[i].clone();
                self.pos = i + 1;
                self.last_line = token.end_line;
                Ok(token)
            }
            None => Err(self.error("unexpected end of input")),
        }
    }

    /// The block of comment lines directly above the next token. Comments on
    /// the previous token's line, and blocks separated by a blank line, are
    /// dropped.
    pub fn leading_comments(&mut self) -> Vec<String> {
        let mut group: Vec<String> = Vec::new();
        let mut group_end: Option<usize> = None;
        while let Some(token) = self.tokens.get(self.pos)
            && let Tok::Comment(text) = &token.tok
        {
            self.pos += 1;
            if token.line == self.last_line {
                continue;
            }
            if group_end.is_some_and(|end| token.line > end + 1) {
                group.clear();
            }
            group.push(text.clone());
            group_end = Some(token.end_line);
        }
        if let (Some(end), Some(next)) = (group_end, self.tokens.get(self.pos))
            && next.line > end + 1
        {
            group.clear();
        }
        group
    }

    /// A comment that trails the last consumed token on the same line.
    pub fn inline_comment(&mut self) -> String {
        match self.tokens.get(self.pos) {
            Some(Token { tok: Tok::Comment(text), line, .. }) if *line == self.last_line => {
                let text = text.clone();
                self.pos += 1;
                text
            }
            _ => String::new(),
        }
    }

    pub fn is_punct(&self, c: char) -> bool {
        self.peek_tok() == Some(&Tok::Punct(c))
    }

    pub fn is_keyword(&self, kw: &str) -> bool {
        matches!(self.peek_tok(), Some(Tok::Ident(word)) if word == kw)
    }

    pub fn eat_punct(&mut self, c: char) -> bool {
        self.is_punct(c) && self.bump().is_ok()
    }

    pub fn eat_keyword(&mut self, kw: &str) -> bool {
        self.is_keyword(kw) && self.bump().is_ok()
    }

    pub fn expect_punct(&mut self, c: char) -> Result<()> {
        if self.eat_punct(c) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("`{c}`")))
        }
    }

    pub fn expect_ident(&mut self) -> Result<String> {
        match self.peek_tok() {
            Some(Tok::Ident(_)) => match self.bump()?.tok {
                Tok::Ident(word) => Ok(word),
                _ => Err(self.error("expected identifier")),
            },
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// Signed integer literal.
    pub fn expect_int(&mut self) -> Result<i64> {
        let negative = self.eat_punct('-');
        let token = self.peek().cloned();
        match token {
            Some(Token { tok: Tok::Number(text), line, column, .. }) => {
                self.bump()?;
                let value = parse_int(&text)
                    .ok_or_else(|| Error::syntax(line, column, format!("invalid integer `{text}`")))?;
                Ok(if negative { -value } else { value })
            }
            _ => Err(self.unexpected("integer")),
        }
    }

    /// Skip through the `close` matching an already consumed `open`.
    pub fn skip_balanced(&mut self, open: char, close: char) -> Result<()> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.bump()?.tok {
                Tok::Punct(c) if c == open => depth += 1,
                Tok::Punct(c) if c == close => depth -= 1,
                _ => {}
            }
        }
        Ok(())
    }

    /// Skip up to and including `end`, stepping over nested brackets.
    pub fn skip_through(&mut self, end: char) -> Result<()> {
        loop {
            match self.bump()?.tok {
                Tok::Punct(c) if c == end => return Ok(()),
                Tok::Punct('{') => self.skip_balanced('{', '}')?,
                Tok::Punct('(') => self.skip_balanced('(', ')')?,
                Tok::Punct('[') => self.skip_balanced('[', ']')?,
                _ => {}
            }
        }
    }

    pub fn error(&self, message: impl Into<String>) -> Error {
        let (line, column) = match self.peek().or(self.tokens.last()) {
            Some(t) => (t.line, t.column),
            None => (1, 1),
        };
        Error::syntax(line, column, message)
    }

    pub fn unexpected(&self, expected: &str) -> Error {
        let found = match self.peek_tok() {
            Some(Tok::Ident(w)) => format!("`{w}`"),
            Some(Tok::Number(n)) => format!("`{n}`"),
            Some(Tok::Str(s)) => format!("{s:?}"),
            Some(Tok::Punct(c)) => format!("`{c}`"),
            Some(Tok::Comment(_)) | None => "end of input".to_string(),
        };
        self.error(format!("expected {expected}, found {found}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(src: &str) -> Vec<Tok> {
        tokenize(src).unwrap().into_iter().map(|t| t.tok).collect()
    }

    #[test]
    fn basic_tokens() {
        let got = toks("map<int32, google.protobuf.Any> m = 0x1F; // tail");
        assert_eq!(
            got,
            [
                Tok::Ident("map".into()),
                Tok::Punct('<'),
                Tok::Ident("int32".into()),
                Tok::Punct(','),
                Tok::Ident("google.protobuf.Any".into()),
                Tok::Punct('>'),
                Tok::Ident("m".into()),
                Tok::Punct('='),
                Tok::Number("0x1F".into()),
                Tok::Punct(';'),
                Tok::Comment("// tail".into()),
            ]
        );
    }

    #[test]
    fn strings_and_comments() {
        let got = toks("\"x\\\"y\" 'z' /* b\nc */ # h");
        assert_eq!(
            got,
            [
                Tok::Str("x\"y".into()),
                Tok::Str("z".into()),
                Tok::Comment("/* b\nc */".into()),
                Tok::Punct('#'),
                Tok::Ident("h".into()),
            ]
        );
    }

    #[test]
    fn positions_and_errors() {
        let tokens = tokenize("a\n  /* x\n */ b").unwrap();
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].end_line, tokens[1].column), (2, 3, 3));
        assert_eq!(tokens[2].line, 3);

        let err = tokenize("\n \"open").unwrap_err();
        assert_eq!(err.to_string(), "2:2: unterminated string literal");
        assert!(tokenize("/* never").is_err());
    }

    #[test]
    fn numbers() {
        assert_eq!(toks("1.5e-3 42"), [Tok::Number("1.5e-3".into()), Tok::Number("42".into())]);
        assert_eq!(parse_int("0x10"), Some(16));
        assert_eq!(parse_int("1_000"), Some(1000));
        assert_eq!(parse_int("1.5"), None);
    }

    #[test]
    fn cursor_comment_attachment() {
        let src = "// file header\n\n// doc one\n// doc two\nfoo { // inline\n  bar;\n}\n";
        let mut cur = Cursor::new(tokenize(src).unwrap());
        assert_eq!(cur.leading_comments(), ["// doc one", "// doc two"]);
        assert_eq!(cur.expect_ident().unwrap(), "foo");
        cur.expect_punct('{').unwrap();
        assert_eq!(cur.inline_comment(), "// inline");
        assert!(cur.leading_comments().is_empty());
        assert!(cur.eat_keyword("bar"));
        assert_eq!(cur.inline_comment(), "");
        assert!(cur.eat_punct(';'));
        assert!(cur.eat_punct('}'));
        assert!(cur.is_eof());
    }

    #[test]
    fn cursor_skipping_and_errors() {
        let mut cur = Cursor::new(tokenize("[a, (b)] x; y = -7").unwrap());
        cur.skip_through(';').unwrap();
        assert_eq!(cur.expect_ident().unwrap(), "y");
        cur.expect_punct('=').unwrap();
        assert_eq!(cur.expect_int().unwrap(), -7);
        let err = cur.expect_ident().unwrap_err();
        assert_eq!(err.to_string(), "1:18: expected identifier, found end of input");
    }
}
