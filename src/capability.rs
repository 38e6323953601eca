//! Capability gate: removes tags the host did not declare before styling.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::element::Element;
use crate::error::{BbError, BbResult};
use crate::token::is_tag_name;

/// What happens to an element whose tag is not whitelisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagPolicy {
    /// Keep the content, drop the tag and its markup.
    #[default]
    Flatten,
    /// Keep the content and re-emit the original markup as plain text.
    Literal,
    /// Remove the element and everything inside it.
    Drop,
}

/// Validated, lowercase set of supported tag names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whitelist {
    tags: BTreeSet<String>,
}

impl Whitelist {
    /// Build a whitelist, rejecting names that the tokenizer could never produce.
    pub fn new<I, S>(tags: I) -> BbResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for tag in tags {
            let tag = tag.as_ref();
            if !is_tag_name(tag) {
                return Err(BbError::InvalidTag {
                    tag: tag.to_string(),
                });
            }
            set.insert(tag.to_ascii_lowercase());
        }
        Ok(Self { tags: set })
    }

    pub fn contains(&self, tag: &str) -> bool {
        if tag.bytes().any(|b| b.is_ascii_uppercase()) {
            self.tags.contains(&tag.to_ascii_lowercase())
        } else {
            self.tags.contains(tag)
        }
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }
}

/// Remove non-whitelisted tags from the tree according to `policy`.
///
/// The root is always kept. Filtering an already filtered tree with the same
/// whitelist returns it unchanged.
pub fn filter(mut root: Element, whitelist: &Whitelist, policy: TagPolicy) -> Element {
    let children = root.take_children();
    root.set_children(filter_children(children, whitelist, policy));
    root
}

fn filter_children(
    children: Vec<Element>,
    whitelist: &Whitelist,
    policy: TagPolicy,
) -> Vec<Element> {
    let mut out = Vec::with_capacity(children.len());

    for mut child in children {
        let grandchildren = filter_children(child.take_children(), whitelist, policy);

        let unsupported = child.tag().is_some_and(|tag| !whitelist.contains(tag));
        if !unsupported {
            child.set_children(grandchildren);
            out.push(child);
            continue;
        }

        log::debug!(
            target: "bbcode.capability",
            "unsupported tag [{}] at {}..{}: {:?}",
            child.tag().unwrap_or_default(),
            child.span().start,
            child.span().end,
            policy
        );

        let span = child.span();
        match policy {
            TagPolicy::Flatten => {
                if let Some(text) = child.take_text() {
                    push_text(&mut out, &text, span);
                }
                out.extend(grandchildren);
            }
            TagPolicy::Literal => {
                if let Some(open) = child.open_markup() {
                    push_text(&mut out, open, span);
                }
                if let Some(text) = child.take_text() {
                    push_text(&mut out, &text, span);
                }
                out.extend(grandchildren);
                if let Some(close) = child.close_markup() {
                    push_text(&mut out, close, span);
                }
            }
            TagPolicy::Drop => {}
        }
    }

    out
}

fn push_text(out: &mut Vec<Element>, text: &str, span: crate::token::Span) {
    match out.last_mut() {
        Some(last) if last.is_text() => last.push_text(text, span),
        _ => out.push(Element::text_element(text, span)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::token::tokenize;

    fn parse(input: &str) -> Element {
        build(tokenize(input))
    }

    fn whitelist(tags: &[&str]) -> Whitelist {
        Whitelist::new(tags.iter().copied()).unwrap()
    }

    fn tags(root: &Element) -> Vec<&str> {
        root.descendants().filter_map(Element::tag).collect()
    }

    #[test]
    fn flatten_keeps_content_drops_markup() {
        let root = filter(parse("a[x]b[b]c[/b][/x]d"), &whitelist(&["b"]), TagPolicy::Flatten);
        assert_eq!(tags(&root), vec!["b"]);
        assert_eq!(root.inner_text(), "abcd");
    }

    #[test]
    fn literal_reemits_markup() {
        let root = filter(parse("[X=1]hi[/x]"), &whitelist(&[]), TagPolicy::Literal);
        assert!(tags(&root).is_empty());
        assert_eq!(root.inner_text(), "[X=1]hi[/x]");
    }

    #[test]
    fn literal_without_close_markup() {
        let root = filter(parse("[x]open"), &whitelist(&[]), TagPolicy::Literal);
        assert_eq!(root.inner_text(), "[x]open");
    }

    #[test]
    fn drop_removes_subtree() {
        let root = filter(parse("a[x]b[b]c[/b][/x]d"), &whitelist(&["b"]), TagPolicy::Drop);
        assert!(tags(&root).is_empty());
        assert_eq!(root.inner_text(), "ad");
    }

    #[test]
    fn filtering_is_idempotent() {
        let list = whitelist(&["b", "i"]);
        for policy in [TagPolicy::Flatten, TagPolicy::Literal, TagPolicy::Drop] {
            let once = filter(parse("q[u]a[b]b[s]c[/s][/b][/u][i]d[/i]e"), &list, policy);
            let twice = filter(once.clone(), &list, policy);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn whitelist_is_case_insensitive() {
        let list = whitelist(&["B", "url"]);
        assert!(list.contains("b"));
        assert!(list.contains("URL"));
        assert!(!list.contains("i"));
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["b", "url"]);
    }

    #[test]
    fn whitelist_rejects_bad_names() {
        assert_eq!(
            Whitelist::new(["b", "not a tag"]),
            Err(BbError::InvalidTag {
                tag: "not a tag".to_string()
            })
        );
        assert!(Whitelist::new([""]).is_err());
    }
}
