//! Style resolution: one [`StyleDecision`] per element, consulting the host
//! provider first and the built-in defaults last.
//!
//! Precedence for a whitelisted element, first match wins:
//! 1. `attributed_text_for_element`: used verbatim, no attributes
//! 2. `text_for_element`: replaces the content, attributes still resolved below
//! 3. `attributes_for_element`
//! 4. legacy `font` / `text_color` hooks, then built-in tag defaults
//!
//! If 3 and 4 both come up empty the element fails with [`BbError::MissingStyle`].

use crate::attributes::{AttrValue, Attributes, FONT, FOREGROUND_COLOR};
use crate::defaults::builtin_attributes;
use crate::element::Element;
use crate::error::{BbError, BbResult};
use crate::provider::StyleProvider;
use crate::styled::StyledText;

/// What an element displays.
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    /// The element's own text followed by its children.
    Source,
    /// Replacement plain text for the whole element.
    Text(String),
    /// Replacement pre-styled text for the whole element.
    Fragment(StyledText),
}

#[derive(Clone, Debug, PartialEq)]
pub struct StyleDecision {
    pub content: Content,
    pub attributes: Attributes,
}

impl StyleDecision {
    fn unstyled() -> Self {
        Self {
            content: Content::Source,
            attributes: Attributes::new(),
        }
    }
}

/// An element paired with its decision. Children are only resolved when the
/// content is [`Content::Source`]; replaced content has none.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedElement<'a> {
    pub element: &'a Element,
    pub decision: StyleDecision,
    pub children: Vec<ResolvedElement<'a>>,
}

pub struct StyleResolver<'p, P: ?Sized> {
    provider: &'p P,
    builtin_defaults: bool,
}

impl<'p, P: StyleProvider + ?Sized> StyleResolver<'p, P> {
    pub fn new(provider: &'p P) -> Self {
        Self {
            provider,
            builtin_defaults: true,
        }
    }

    /// Allow or forbid falling back to [`builtin_attributes`].
    pub fn builtin_defaults(mut self, enabled: bool) -> Self {
        self.builtin_defaults = enabled;
        self
    }

    /// Resolve a whole (already filtered) tree. Fails on the first element
    /// without a usable attribute mapping.
    pub fn resolve<'a>(&self, root: &'a Element) -> BbResult<ResolvedElement<'a>> {
        let decision = self.decide(root)?;
        let children = match decision.content {
            Content::Source => root
                .children()
                .iter()
                .map(|child| self.resolve(child))
                .collect::<BbResult<Vec<_>>>()?,
            Content::Text(_) | Content::Fragment(_) => Vec::new(),
        };
        Ok(ResolvedElement {
            element: root,
            decision,
            children,
        })
    }

    /// Decide a single element.
    pub fn decide(&self, element: &Element) -> BbResult<StyleDecision> {
        let Some(tag) = element.tag() else {
            return Ok(StyleDecision::unstyled());
        };

        if let Some(fragment) = self.provider.attributed_text_for_element(element) {
            log::debug!(
                target: "bbcode.resolve",
                "[{tag}] at {}: pre-styled text",
                element.span().start
            );
            return Ok(StyleDecision {
                content: Content::Fragment(fragment),
                attributes: Attributes::new(),
            });
        }

        let content = match self.provider.text_for_element(element) {
            Some(text) => Content::Text(text),
            None => Content::Source,
        };

        let attributes = match self.provider.attributes_for_element(element) {
            Some(attributes) => attributes,
            None => self.fallback(element).ok_or_else(|| BbError::MissingStyle {
                tag: tag.to_string(),
                start: element.span().start,
                end: element.span().end,
            })?,
        };

        Ok(StyleDecision {
            content,
            attributes,
        })
    }

    fn fallback(&self, element: &Element) -> Option<Attributes> {
        let font = self.provider.font(element);
        let color = self.provider.text_color(element);

        if font.is_none() && color.is_none() {
            if !self.builtin_defaults {
                return None;
            }
            let attributes = builtin_attributes(element);
            if attributes.is_some() {
                log::debug!(
                    target: "bbcode.resolve",
                    "[{}] at {}: built-in defaults",
                    element.tag().unwrap_or_default(),
                    element.span().start
                );
            }
            return attributes;
        }

        log::debug!(
            target: "bbcode.resolve",
            "[{}] at {}: legacy font/color hooks",
            element.tag().unwrap_or_default(),
            element.span().start
        );
        let mut attributes = if self.builtin_defaults {
            builtin_attributes(element).unwrap_or_default()
        } else {
            Attributes::new()
        };
        if let Some(font) = font {
            attributes.insert(FONT.to_string(), AttrValue::Handle(font));
        }
        if let Some(color) = color {
            attributes.insert(FOREGROUND_COLOR.to_string(), AttrValue::Handle(color));
        }
        Some(attributes)
    }
}
