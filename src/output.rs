//! Output builder: flattens a resolved tree into [`StyledText`].

use crate::attributes::Attributes;
use crate::resolve::{Content, ResolvedElement};
use crate::styled::{StyledRun, StyledText};

/// Walk the resolved tree in document order and emit one run per piece of
/// text. Each run carries the attributes of every enclosing element, inner
/// elements overriding outer ones. Pre-styled fragments are emitted as is.
///
/// With `merge` set, neighbouring runs with identical attributes are joined.
pub fn flatten(root: &ResolvedElement<'_>, merge: bool) -> StyledText {
    let mut out = Emitter {
        styled: StyledText::new(),
        merge,
    };
    let mut stack: Vec<(&ResolvedElement<'_>, Attributes)> = vec![(root, Attributes::new())];

    while let Some((node, inherited)) = stack.pop() {
        let mut attributes = inherited;
        attributes.extend(
            node.decision
                .attributes
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        match &node.decision.content {
            Content::Source => {
                if let Some(text) = node.element.text() {
                    out.emit(text, &attributes);
                }
                for child in node.children.iter().rev() {
                    stack.push((child, attributes.clone()));
                }
            }
            Content::Text(text) => out.emit(text, &attributes),
            Content::Fragment(fragment) => {
                for run in fragment.runs() {
                    out.emit_run(run);
                }
            }
        }
    }

    out.styled
}

struct Emitter {
    styled: StyledText,
    merge: bool,
}

impl Emitter {
    fn emit(&mut self, text: &str, attributes: &Attributes) {
        if self.merge {
            self.styled.push_merged(text, attributes);
        } else {
            self.styled.push(text, attributes.clone());
        }
    }

    fn emit_run(&mut self, run: &StyledRun) {
        if run.is_marker() {
            self.styled.push_marker(run.attributes.clone());
        } else {
            self.emit(&run.text, &run.attributes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{AttrValue, FONT_STYLE, FONT_WEIGHT};
    use crate::builder::build;
    use crate::element::Element;
    use crate::provider::StyleProvider;
    use crate::resolve::StyleResolver;
    use crate::token::tokenize;

    struct Defaults;

    impl StyleProvider for Defaults {
        fn supported_tags(&self) -> Vec<String> {
            vec!["b".into(), "i".into()]
        }

        fn attributes_for_element(&self, _element: &Element) -> Option<Attributes> {
            None
        }
    }

    fn render(input: &str, merge: bool) -> StyledText {
        let root = build(tokenize(input));
        let resolved = StyleResolver::new(&Defaults).resolve(&root).unwrap();
        flatten(&resolved, merge)
    }

    #[test]
    fn nested_attributes_accumulate() {
        let styled = render("a[b]b[i]c[/i][/b]", false);
        let runs = styled.runs();
        assert_eq!(runs.len(), 3);
        assert!(runs[0].attributes.is_empty());
        assert_eq!(runs[1].attributes.get(FONT_WEIGHT), Some(&AttrValue::from("bold")));
        assert!(runs[1].attributes.get(FONT_STYLE).is_none());
        assert_eq!(runs[2].attributes.get(FONT_WEIGHT), Some(&AttrValue::from("bold")));
        assert_eq!(runs[2].attributes.get(FONT_STYLE), Some(&AttrValue::from("italic")));
    }

    #[test]
    fn document_order_is_kept() {
        let styled = render("1[b]2[i]3[/i]4[/b]5", false);
        let texts: Vec<_> = styled.runs().iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn merge_joins_equal_neighbours() {
        // Text on both sides of an empty bold element.
        let unmerged = render("a[b][/b]c", false);
        assert_eq!(unmerged.runs().len(), 2);
        let merged = render("a[b][/b]c", true);
        assert_eq!(merged.runs().len(), 1);
        assert_eq!(merged.text(), "ac");
    }
}
