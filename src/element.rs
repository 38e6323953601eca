use serde::Serialize;

use crate::token::Span;

/// A node of the parsed markup tree.
///
/// Three shapes occur:
/// - the root: no tag, no markup, owns the top-level content
/// - a tag element such as `[b]…[/b]`: lowercase tag name, optional value
/// - a text-only element: no tag, only a text payload
///
/// A tag element's own `text` payload always precedes its children in
/// document order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<Element>,
    span: Span,
    #[serde(skip)]
    open_markup: Option<String>,
    #[serde(skip)]
    close_markup: Option<String>,
}

impl Element {
    pub(crate) fn root(len: usize) -> Self {
        Self::bare(None, None, Span::new(0, len))
    }

    pub(crate) fn tag_element(
        name: &str,
        value: Option<&str>,
        open_markup: &str,
        span: Span,
    ) -> Self {
        let mut element = Self::bare(
            Some(name.to_ascii_lowercase()),
            value.map(str::to_string),
            span,
        );
        element.open_markup = Some(open_markup.to_string());
        element
    }

    pub(crate) fn text_element(text: &str, span: Span) -> Self {
        let mut element = Self::bare(None, None, span);
        element.text = Some(text.to_string());
        element
    }

    fn bare(tag: Option<String>, value: Option<String>, span: Span) -> Self {
        Self {
            tag,
            value,
            text: None,
            children: Vec::new(),
            span,
            open_markup: None,
            close_markup: None,
        }
    }

    /// Lowercase tag name, `None` for the root and for text-only elements.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Raw `=value` of the opening tag, without the `=`.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// The element's own text payload (not including children).
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Source range this element came from: opening tag through closing tag,
    /// or through the last content when the tag was closed implicitly.
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn is_tag(&self) -> bool {
        self.tag.is_some()
    }

    pub fn is_text(&self) -> bool {
        self.tag.is_none() && self.text.is_some() && self.children.is_empty()
    }

    /// The opening markup exactly as written, e.g. `[Color=red]`.
    pub fn open_markup(&self) -> Option<&str> {
        self.open_markup.as_deref()
    }

    /// The closing markup as written, `None` if the element was closed implicitly.
    pub fn close_markup(&self) -> Option<&str> {
        self.close_markup.as_deref()
    }

    /// Tag name joined with its value, e.g. `url=http://example.org`.
    pub fn tag_with_value(&self) -> Option<String> {
        let tag = self.tag.as_deref()?;
        Some(match &self.value {
            Some(value) => format!("{tag}={value}"),
            None => tag.to_string(),
        })
    }

    /// Concatenated text of this element and all of its descendants.
    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        for element in self.descendants() {
            if let Some(text) = &element.text {
                out.push_str(text);
            }
        }
        out
    }

    /// Pre-order walk over this element and every descendant.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Append text in document order. Text after the first child goes into a
    /// trailing text-only child so ordering is kept.
    pub(crate) fn push_text(&mut self, text: &str, span: Span) {
        if text.is_empty() {
            return;
        }
        if self.children.is_empty() {
            self.text.get_or_insert_with(String::new).push_str(text);
        } else if let Some(last) = self.children.last_mut().filter(|c| c.is_text()) {
            last.text.get_or_insert_with(String::new).push_str(text);
            last.span.end = span.end;
        } else {
            self.children.push(Element::text_element(text, span));
        }
        self.span.end = self.span.end.max(span.end);
    }

    pub(crate) fn push_child(&mut self, child: Element) {
        self.span.end = self.span.end.max(child.span.end);
        self.children.push(child);
    }

    pub(crate) fn close(&mut self, close_markup: &str, end: usize) {
        self.close_markup = Some(close_markup.to_string());
        self.span.end = end;
    }

    pub(crate) fn take_text(&mut self) -> Option<String> {
        self.text.take()
    }

    pub(crate) fn take_children(&mut self) -> Vec<Element> {
        std::mem::take(&mut self.children)
    }

    pub(crate) fn set_children(&mut self, children: Vec<Element>) {
        self.children = children;
    }
}

/// Iterator returned by [`Element::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<&'a Element> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}
