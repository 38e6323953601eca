//! Tokenizer: scans raw BBCode into text runs and bracket tags.
//!
//! Scanning is lazy and never fails. Anything that looks like a tag but is not
//! one is reported as [`TokenKind::Malformed`] and keeps its literal text.

use serde::Serialize;

/// Byte range into the source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must be <= end");
        Self { start, end }
    }

    pub fn len(self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenKind {
    Text,
    OpenTag,
    CloseTag,
    SelfClosingTag,
    Malformed,
}

/// A single scanned token. `raw` is always the exact source slice at `span`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Tag name as written (not case-folded). `None` for text and malformed tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    /// Raw text after `=` in an open tag, e.g. `red` in `[color=red]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<&'a str>,
    pub raw: &'a str,
    pub span: Span,
}

impl<'a> Token<'a> {
    fn literal(kind: TokenKind, raw: &'a str, start: usize) -> Self {
        Self {
            kind,
            name: None,
            value: None,
            raw,
            span: Span::new(start, start + raw.len()),
        }
    }

    fn tag(
        kind: TokenKind,
        name: &'a str,
        value: Option<&'a str>,
        raw: &'a str,
        start: usize,
    ) -> Self {
        Self {
            kind,
            name: Some(name),
            value,
            raw,
            span: Span::new(start, start + raw.len()),
        }
    }

    pub fn is_tag(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::OpenTag | TokenKind::CloseTag | TokenKind::SelfClosingTag
        )
    }
}

/// Lazy token stream over a source string.
///
/// Cloning forks the stream at its current position. Calling [`tokenize`]
/// again on the same input yields an identical sequence.
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    input: &'a str,
    pos: usize,
}

/// Scan `raw` left to right into tokens.
pub fn tokenize(raw: &str) -> Tokens<'_> {
    Tokens { input: raw, pos: 0 }
}

impl<'a> Tokens<'a> {
    fn scan_tag(&self, start: usize) -> Token<'a> {
        let input: &'a str = self.input;
        let rest = &input[start..];
        // `rest` starts with '['; look for whichever bracket comes next.
        match rest[1..].find(|c: char| c == '[' || c == ']') {
            Some(i) if rest.as_bytes()[i + 1] == b']' => classify(&rest[..i + 2], start),
            // Another '[' opens before this one closes: everything up to it is literal.
            Some(i) => Token::literal(TokenKind::Malformed, &rest[..i + 1], start),
            None => Token::literal(TokenKind::Malformed, rest, start),
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let input: &'a str = self.input;
        let rest = &input[self.pos..];
        if rest.is_empty() {
            return None;
        }

        let token = if rest.starts_with('[') {
            self.scan_tag(self.pos)
        } else {
            let len = rest.find('[').unwrap_or(rest.len());
            Token::literal(TokenKind::Text, &rest[..len], self.pos)
        };

        self.pos = token.span.end;
        log::trace!(target: "bbcode.tokenizer", "token: {token:?}");
        Some(token)
    }
}

/// Classify a complete `[...]` slice.
fn classify(raw: &str, start: usize) -> Token<'_> {
    let inner = &raw[1..raw.len() - 1];

    if let Some(name) = inner.strip_prefix('/') {
        if is_tag_name(name) {
            return Token::tag(TokenKind::CloseTag, name, None, raw, start);
        }
    } else if let Some((name, value)) = inner.split_once('=') {
        if is_tag_name(name) {
            return Token::tag(TokenKind::OpenTag, name, Some(value), raw, start);
        }
    } else if let Some(name) = inner.strip_suffix('/') {
        if is_tag_name(name) {
            return Token::tag(TokenKind::SelfClosingTag, name, None, raw, start);
        }
    } else if is_tag_name(inner) {
        return Token::tag(TokenKind::OpenTag, inner, None, raw, start);
    }

    Token::literal(TokenKind::Malformed, raw, start)
}

/// A tag name starts with an ASCII letter or `*` and continues with ASCII
/// alphanumerics, `_`, `-` or `*`.
pub fn is_tag_name(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() || b == b'*' => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'*'))
}
