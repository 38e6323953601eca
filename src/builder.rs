//! Tree builder: folds a token stream into an [`Element`] tree.
//!
//! Open elements live on an explicit stack of owned nodes; an element is
//! attached to its parent when it is popped. Recovery rules:
//! - a close tag that does not match the innermost open element is literal text
//! - malformed tokens are literal text
//! - elements still open at end of input are closed implicitly
//! - open tags nested deeper than the depth limit are literal text, and so are
//!   their matching close tags

use std::collections::HashMap;

use crate::element::Element;
use crate::token::{Token, TokenKind};

pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Hard ceiling for any configured depth limit. Later passes walk the tree
/// recursively, so depth must stay well inside the default thread stack.
pub const MAX_DEPTH_LIMIT: usize = 256;

#[derive(Debug)]
pub struct TreeBuilder {
    /// `stack[0]` is the root and is never popped before `finish`.
    stack: Vec<Element>,
    max_depth: usize,
    /// Open tags kept as text because of the depth limit, by lowercase name.
    demoted: HashMap<String, usize>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// Values above [`MAX_DEPTH_LIMIT`] are clamped to it.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            stack: vec![Element::root(0)],
            max_depth: max_depth.min(MAX_DEPTH_LIMIT),
            demoted: HashMap::new(),
        }
    }

    fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    fn current(&mut self) -> &mut Element {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    pub fn push(&mut self, token: Token<'_>) {
        match (token.kind, token.name) {
            (TokenKind::OpenTag, Some(name)) if self.depth() < self.max_depth => {
                self.stack
                    .push(Element::tag_element(name, token.value, token.raw, token.span));
            }
            (TokenKind::SelfClosingTag, Some(name)) if self.depth() < self.max_depth => {
                let element = Element::tag_element(name, None, token.raw, token.span);
                self.current().push_child(element);
            }
            (TokenKind::OpenTag, Some(name)) => {
                *self.demoted.entry(name.to_ascii_lowercase()).or_default() += 1;
                self.push_literal(&token);
            }
            (TokenKind::CloseTag, Some(name)) if self.closes_demoted(name) => {
                self.push_literal(&token);
            }
            (TokenKind::CloseTag, Some(name)) if self.closes_current(name) => {
                if let Some(mut element) = self.stack.pop() {
                    element.close(token.raw, token.span.end);
                    self.current().push_child(element);
                }
            }
            _ => self.push_literal(&token),
        }
    }

    fn push_literal(&mut self, token: &Token<'_>) {
        if token.kind != TokenKind::Text {
            log::trace!(
                target: "bbcode.builder",
                "keeping {:?} at {}..{} as literal text: {:?}",
                token.kind,
                token.span.start,
                token.span.end,
                token.raw
            );
        }
        self.current().push_text(token.raw, token.span);
    }

    /// Consumes one pending demoted open of `name`, if any.
    fn closes_demoted(&mut self, name: &str) -> bool {
        match self.demoted.get_mut(&name.to_ascii_lowercase()) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    fn closes_current(&self, name: &str) -> bool {
        self.stack.len() > 1
            && self
                .stack
                .last()
                .and_then(Element::tag)
                .is_some_and(|tag| tag.eq_ignore_ascii_case(name))
    }

    /// Close whatever is still open and return the root.
    pub fn finish(mut self) -> Element {
        while self.stack.len() > 1 {
            if let Some(element) = self.stack.pop() {
                log::trace!(
                    target: "bbcode.builder",
                    "implicitly closing [{}] opened at {}",
                    element.tag().unwrap_or_default(),
                    element.span().start
                );
                self.current().push_child(element);
            }
        }
        self.stack.pop().unwrap_or_else(|| Element::root(0))
    }
}

/// Build a tree from tokens with the default depth limit.
pub fn build<'a>(tokens: impl IntoIterator<Item = Token<'a>>) -> Element {
    build_with_max_depth(tokens, DEFAULT_MAX_DEPTH)
}

pub fn build_with_max_depth<'a>(
    tokens: impl IntoIterator<Item = Token<'a>>,
    max_depth: usize,
) -> Element {
    let mut builder = TreeBuilder::with_max_depth(max_depth);
    for token in tokens {
        builder.push(token);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{tokenize, Span};

    fn parse(input: &str) -> Element {
        build(tokenize(input))
    }

    #[test]
    fn nested_tags() {
        let root = parse("a[b]x[i]y[/i][/b]z");
        assert_eq!(root.text(), Some("a"));
        let b = &root.children()[0];
        assert_eq!(b.tag(), Some("b"));
        assert_eq!(b.text(), Some("x"));
        assert_eq!(b.children()[0].tag(), Some("i"));
        assert_eq!(b.children()[0].text(), Some("y"));
        assert_eq!(b.span(), Span::new(1, 17));
        assert_eq!(root.children()[1].text(), Some("z"));
        assert_eq!(root.inner_text(), "axyz");
    }

    #[test]
    fn unmatched_close_is_literal() {
        let root = parse("a[b]c[/b][/b]d");
        assert_eq!(root.children()[0].tag(), Some("b"));
        assert_eq!(root.children()[0].close_markup(), Some("[/b]"));
        assert_eq!(root.children()[1].text(), Some("[/b]d"));
    }

    #[test]
    fn mismatched_close_does_not_pop() {
        let root = parse("[b]x[/i]y[/b]");
        let b = &root.children()[0];
        assert_eq!(b.inner_text(), "x[/i]y");
        assert_eq!(b.close_markup(), Some("[/b]"));
    }

    #[test]
    fn unclosed_tags_close_at_end() {
        let root = parse("[b]bold [i]both");
        let b = &root.children()[0];
        assert_eq!(b.close_markup(), None);
        assert_eq!(b.children()[0].tag(), Some("i"));
        assert_eq!(root.inner_text(), "bold both");
        assert_eq!(root.span(), Span::new(0, 15));
    }

    #[test]
    fn close_tag_matches_case_insensitively() {
        let root = parse("[B]x[/b]");
        assert_eq!(root.children()[0].tag(), Some("b"));
        assert_eq!(root.children()[0].close_markup(), Some("[/b]"));
    }

    #[test]
    fn malformed_is_literal() {
        let root = parse("[bold");
        assert_eq!(root.text(), Some("[bold"));
        assert!(root.children().is_empty());
    }

    #[test]
    fn self_closing_has_no_children() {
        let root = parse("a[br/]b");
        assert_eq!(root.children()[0].tag(), Some("br"));
        assert!(root.children()[0].children().is_empty());
        assert_eq!(root.children()[1].text(), Some("b"));
    }

    #[test]
    fn depth_limit_demotes_to_text() {
        let root = build_with_max_depth(tokenize("[b][i]x[/i][/b]"), 1);
        let b = &root.children()[0];
        assert_eq!(b.tag(), Some("b"));
        assert_eq!(b.text(), Some("[i]x[/i]"));
        assert!(b.children().is_empty());
    }

    #[test]
    fn close_of_demoted_tag_is_literal() {
        let root = build_with_max_depth(tokenize("[b][b]x[/b]y[/b]"), 1);
        assert_eq!(root.children().len(), 1);
        let b = &root.children()[0];
        assert_eq!(b.text(), Some("[b]x[/b]y"));
        assert_eq!(b.close_markup(), Some("[/b]"));
        assert_eq!(b.span(), Span::new(0, 16));
    }

    #[test]
    fn configured_depth_is_clamped() {
        let input = "[b]".repeat(MAX_DEPTH_LIMIT * 4);
        let root = build_with_max_depth(tokenize(&input), usize::MAX);
        let depth = root.descendants().filter(|e| e.is_tag()).count();
        assert_eq!(depth, MAX_DEPTH_LIMIT);
    }

    #[test]
    fn deep_nesting_does_not_overflow() {
        let input = "[b]".repeat(100_000);
        let root = parse(&input);
        let depth = root.descendants().filter(|e| e.is_tag()).count();
        assert_eq!(depth, DEFAULT_MAX_DEPTH);
        assert_eq!(root.inner_text().len(), (100_000 - DEFAULT_MAX_DEPTH) * 3);
    }
}
