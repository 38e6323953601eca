//! Built-in attributes for the common BBCode tags, used when the host has
//! nothing for an element.

use crate::attributes::{
    AttrValue, Attributes, Color, BLOCKQUOTE, FONT_FAMILY, FONT_SIZE, FONT_STYLE, FONT_WEIGHT,
    FOREGROUND_COLOR, LINK, STRIKETHROUGH, UNDERLINE,
};
use crate::element::Element;

/// Tags that have a built-in default.
pub const STANDARD_TAGS: &[&str] = &[
    "b", "strong", "i", "em", "u", "s", "strike", "code", "quote", "color", "size", "url", "font",
];

/// Default attributes for `element`, or `None` if its tag has no default.
///
/// A known tag with an unusable value (say `[color=nope]`) yields an empty
/// mapping rather than `None`.
pub fn builtin_attributes(element: &Element) -> Option<Attributes> {
    let mut attrs = Attributes::new();
    let value = element.value().map(unquote);

    match element.tag()? {
        "b" | "strong" => {
            attrs.insert(FONT_WEIGHT.to_string(), "bold".into());
        }
        "i" | "em" => {
            attrs.insert(FONT_STYLE.to_string(), "italic".into());
        }
        "u" => {
            attrs.insert(UNDERLINE.to_string(), true.into());
        }
        "s" | "strike" => {
            attrs.insert(STRIKETHROUGH.to_string(), true.into());
        }
        "code" => {
            attrs.insert(FONT_FAMILY.to_string(), "monospace".into());
        }
        "quote" => {
            attrs.insert(BLOCKQUOTE.to_string(), true.into());
        }
        "color" => {
            if let Some(color) = value.and_then(Color::parse) {
                attrs.insert(FOREGROUND_COLOR.to_string(), color.into());
            }
        }
        "size" => {
            if let Some(size) = value.and_then(|v| v.parse::<f64>().ok()) {
                if size.is_finite() && size > 0.0 {
                    attrs.insert(FONT_SIZE.to_string(), size.into());
                }
            }
        }
        "url" => {
            let target = match value {
                Some(v) if !v.is_empty() => v.to_string(),
                _ => element.inner_text(),
            };
            if !target.is_empty() {
                attrs.insert(LINK.to_string(), AttrValue::Text(target));
            }
            attrs.insert(UNDERLINE.to_string(), true.into());
        }
        "font" => {
            if let Some(family) = value.filter(|v| !v.is_empty()) {
                attrs.insert(FONT_FAMILY.to_string(), family.into());
            }
        }
        _ => return None,
    }

    Some(attrs)
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::token::tokenize;

    fn first(input: &str) -> Element {
        build(tokenize(input)).children()[0].clone()
    }

    #[test]
    fn bold_and_italic() {
        let attrs = builtin_attributes(&first("[b]x[/b]")).unwrap();
        assert_eq!(attrs.get(FONT_WEIGHT), Some(&AttrValue::from("bold")));
        let attrs = builtin_attributes(&first("[I]x[/I]")).unwrap();
        assert_eq!(attrs.get(FONT_STYLE), Some(&AttrValue::from("italic")));
    }

    #[test]
    fn color_value_is_parsed() {
        let attrs = builtin_attributes(&first("[color=\"#00ff00\"]x[/color]")).unwrap();
        assert_eq!(
            attrs.get(FOREGROUND_COLOR),
            Some(&AttrValue::Color(Color::rgb(0, 255, 0)))
        );
        let attrs = builtin_attributes(&first("[color=nope]x[/color]")).unwrap();
        assert!(attrs.is_empty());
    }

    #[test]
    fn size_must_be_positive_number() {
        let attrs = builtin_attributes(&first("[size=18]x[/size]")).unwrap();
        assert_eq!(attrs.get(FONT_SIZE), Some(&AttrValue::Number(18.0)));
        assert!(builtin_attributes(&first("[size=-1]x[/size]")).unwrap().is_empty());
    }

    #[test]
    fn url_links_to_value_or_text() {
        let attrs = builtin_attributes(&first("[url=http://a.org]A[/url]")).unwrap();
        assert_eq!(attrs.get(LINK), Some(&AttrValue::from("http://a.org")));
        let attrs = builtin_attributes(&first("[url]http://b.org[/url]")).unwrap();
        assert_eq!(attrs.get(LINK), Some(&AttrValue::from("http://b.org")));
    }

    #[test]
    fn unknown_tag_has_no_default() {
        assert_eq!(builtin_attributes(&first("[bold]x[/bold]")), None);
        assert_eq!(builtin_attributes(&build(tokenize("plain"))), None);
    }

    #[test]
    fn every_standard_tag_has_a_default() {
        for tag in STANDARD_TAGS {
            let element = first(&format!("[{tag}]x[/{tag}]"));
            assert!(builtin_attributes(&element).is_some(), "{tag}");
        }
    }
}
