//! A [`StyleProvider`] driven by a YAML style sheet.
//!
//! ```yaml
//! supported: [b, i]          # styled by the built-in defaults
//! tags:
//!   color:
//!     foregroundColor: $value
//!   url:
//!     link: $value
//!     underline: true
//! text:
//!   spoiler: "(spoiler)"
//! fragments:
//!   img:
//!     - attributes:
//!         attachment: $value
//! ```
//!
//! The whitelist is `supported` plus every key of `tags`, `text` and
//! `fragments`. In strings, `$value` expands to the element's `=value` and
//! `$text` to its inner text. A string under a key ending in `color` that
//! parses as a color becomes a color value.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::attributes::{AttrValue, Attributes, Color};
use crate::defaults::STANDARD_TAGS;
use crate::element::Element;
use crate::error::BbResult;
use crate::provider::StyleProvider;
use crate::styled::{StyledRun, StyledText};

/// Plain attribute value as written in YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SheetValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetRun {
    pub text: String,
    pub attributes: BTreeMap<String, SheetValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSheet {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub supported: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, BTreeMap<String, SheetValue>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub text: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fragments: BTreeMap<String, Vec<SheetRun>>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every standard tag, styled by the built-in defaults.
    pub fn standard() -> Self {
        Self {
            supported: STANDARD_TAGS.iter().map(|t| t.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn from_yaml(yaml: &str) -> BbResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let sheet: StyleSheet = serde_yaml::from_str(yaml)?;
        Ok(sheet.normalized())
    }

    pub fn from_file(path: impl AsRef<Path>) -> BbResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Lowercase every tag key so lookups by element tag always hit.
    fn normalized(self) -> Self {
        fn lower<V>(map: BTreeMap<String, V>) -> BTreeMap<String, V> {
            map.into_iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v))
                .collect()
        }
        Self {
            supported: self
                .supported
                .into_iter()
                .map(|t| t.to_ascii_lowercase())
                .collect(),
            tags: lower(self.tags),
            text: lower(self.text),
            fragments: lower(self.fragments),
        }
    }

    /// Substitutes `$value` and `$text` in a single pass; substituted content
    /// is never rescanned.
    fn expand(template: &str, element: &Element) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(i) = rest.find('$') {
            out.push_str(&rest[..i]);
            let tail = &rest[i..];
            if let Some(after) = tail.strip_prefix("$value") {
                out.push_str(element.value().unwrap_or_default());
                rest = after;
            } else if let Some(after) = tail.strip_prefix("$text") {
                out.push_str(&element.inner_text());
                rest = after;
            } else {
                out.push('$');
                rest = &tail[1..];
            }
        }
        out.push_str(rest);
        out
    }

    fn attributes(map: &BTreeMap<String, SheetValue>, element: &Element) -> Attributes {
        map.iter()
            .map(|(key, value)| {
                let value = match value {
                    SheetValue::Bool(b) => AttrValue::Bool(*b),
                    SheetValue::Number(n) => AttrValue::Number(*n),
                    SheetValue::Text(s) => {
                        let s = Self::expand(s, element);
                        match Color::parse(&s) {
                            Some(color) if key.to_ascii_lowercase().ends_with("color") => {
                                AttrValue::Color(color)
                            }
                            _ => AttrValue::Text(s),
                        }
                    }
                };
                (key.clone(), value)
            })
            .collect()
    }
}

impl StyleProvider for StyleSheet {
    fn supported_tags(&self) -> Vec<String> {
        let mut tags: BTreeSet<&str> = self.supported.iter().map(String::as_str).collect();
        tags.extend(self.tags.keys().map(String::as_str));
        tags.extend(self.text.keys().map(String::as_str));
        tags.extend(self.fragments.keys().map(String::as_str));
        tags.into_iter().map(str::to_string).collect()
    }

    fn attributes_for_element(&self, element: &Element) -> Option<Attributes> {
        let map = self.tags.get(element.tag()?)?;
        Some(Self::attributes(map, element))
    }

    fn text_for_element(&self, element: &Element) -> Option<String> {
        let template = self.text.get(element.tag()?)?;
        Some(Self::expand(template, element))
    }

    fn attributed_text_for_element(&self, element: &Element) -> Option<StyledText> {
        let runs = self.fragments.get(element.tag()?)?;
        Some(StyledText::from_runs(runs.iter().map(|run| {
            StyledRun::new(
                Self::expand(&run.text, element),
                Self::attributes(&run.attributes, element),
            )
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{FOREGROUND_COLOR, LINK, UNDERLINE};
    use crate::builder::build;
    use crate::token::tokenize;

    const SHEET: &str = r#"
supported: [B]
tags:
  Color:
    foregroundColor: $value
  url:
    link: "$value"
    underline: true
    title: "go to $text"
text:
  spoiler: "(hidden)"
fragments:
  img:
    - attributes:
        attachment: $value
"#;

    fn first(input: &str) -> Element {
        build(tokenize(input)).children()[0].clone()
    }

    #[test]
    fn whitelist_is_union_of_keys() {
        let sheet = StyleSheet::from_yaml(SHEET).unwrap();
        assert_eq!(
            sheet.supported_tags(),
            vec!["b", "color", "img", "spoiler", "url"]
        );
    }

    #[test]
    fn value_expands_into_color() {
        let sheet = StyleSheet::from_yaml(SHEET).unwrap();
        let attrs = sheet
            .attributes_for_element(&first("[color=#ff0000]x[/color]"))
            .unwrap();
        assert_eq!(
            attrs.get(FOREGROUND_COLOR),
            Some(&AttrValue::Color(Color::rgb(255, 0, 0)))
        );
    }

    #[test]
    fn value_and_text_expand_in_strings() {
        let sheet = StyleSheet::from_yaml(SHEET).unwrap();
        let attrs = sheet
            .attributes_for_element(&first("[url=http://a.org]here[/url]"))
            .unwrap();
        assert_eq!(attrs.get(LINK), Some(&AttrValue::from("http://a.org")));
        assert_eq!(attrs.get(UNDERLINE), Some(&AttrValue::Bool(true)));
        assert_eq!(attrs.get("title"), Some(&AttrValue::from("go to here")));
    }

    #[test]
    fn substituted_values_are_not_expanded_again() {
        let sheet = StyleSheet::from_yaml(SHEET).unwrap();
        let attrs = sheet
            .attributes_for_element(&first("[url=$text]secret body[/url]"))
            .unwrap();
        assert_eq!(attrs.get(LINK), Some(&AttrValue::from("$text")));

        let attrs = sheet
            .attributes_for_element(&first("[url=a]$value and $5[/url]"))
            .unwrap();
        assert_eq!(attrs.get("title"), Some(&AttrValue::from("go to $value and $5")));
    }

    #[test]
    fn supported_only_tags_have_no_mapping() {
        let sheet = StyleSheet::from_yaml(SHEET).unwrap();
        assert_eq!(sheet.attributes_for_element(&first("[b]x[/b]")), None);
    }

    #[test]
    fn text_and_fragment_overrides() {
        let sheet = StyleSheet::from_yaml(SHEET).unwrap();
        assert_eq!(
            sheet.text_for_element(&first("[spoiler]secret[/spoiler]")),
            Some("(hidden)".to_string())
        );
        let fragment = sheet
            .attributed_text_for_element(&first("[img=cat.png][/img]"))
            .unwrap();
        assert_eq!(fragment.runs().len(), 1);
        assert!(fragment.runs()[0].is_marker());
        assert_eq!(
            fragment.runs()[0].attributes.get("attachment"),
            Some(&AttrValue::from("cat.png"))
        );
    }

    #[test]
    fn standard_sheet_covers_standard_tags() {
        let tags = StyleSheet::standard().supported_tags();
        assert_eq!(tags.len(), STANDARD_TAGS.len());
        assert!(tags.iter().any(|t| t == "url"));
    }
}
