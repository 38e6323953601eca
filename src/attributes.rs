use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Style attribute name to value. Keys are unique; iteration order carries no meaning.
pub type Attributes = BTreeMap<String, AttrValue>;

// Well-known attribute keys used by the built-in defaults.
pub const FONT: &str = "font";
pub const FONT_FAMILY: &str = "fontFamily";
pub const FONT_SIZE: &str = "fontSize";
pub const FONT_STYLE: &str = "fontStyle";
pub const FONT_WEIGHT: &str = "fontWeight";
pub const FOREGROUND_COLOR: &str = "foregroundColor";
pub const UNDERLINE: &str = "underline";
pub const STRIKETHROUGH: &str = "strikethrough";
pub const LINK: &str = "link";
pub const BLOCKQUOTE: &str = "blockquote";

/// A single style attribute value.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Color(Color),
    /// Host object passed through untouched.
    Handle(PlatformHandle),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            AttrValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_handle(&self) -> Option<&PlatformHandle> {
        match self {
            AttrValue::Handle(h) => Some(h),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Number(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<Color> for AttrValue {
    fn from(value: Color) -> Self {
        AttrValue::Color(value)
    }
}

impl From<PlatformHandle> for AttrValue {
    fn from(value: PlatformHandle) -> Self {
        AttrValue::Handle(value)
    }
}

/// Opaque host value such as a native font or color object.
///
/// The compiler never looks inside a handle. Two handles are equal only when
/// they are clones of the same handle.
#[derive(Clone)]
pub struct PlatformHandle(Arc<dyn Any + Send + Sync>);

impl PlatformHandle {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl PartialEq for PlatformHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for PlatformHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlatformHandle(..)")
    }
}

impl Serialize for PlatformHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("<platform handle>")
    }
}

/// An sRGB color with alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", Color::rgb(0x00, 0x00, 0x00)),
    ("white", Color::rgb(0xff, 0xff, 0xff)),
    ("red", Color::rgb(0xff, 0x00, 0x00)),
    ("green", Color::rgb(0x00, 0x80, 0x00)),
    ("blue", Color::rgb(0x00, 0x00, 0xff)),
    ("yellow", Color::rgb(0xff, 0xff, 0x00)),
    ("orange", Color::rgb(0xff, 0xa5, 0x00)),
    ("purple", Color::rgb(0x80, 0x00, 0x80)),
    ("gray", Color::rgb(0x80, 0x80, 0x80)),
    ("grey", Color::rgb(0x80, 0x80, 0x80)),
    ("transparent", Color::rgba(0x00, 0x00, 0x00, 0x00)),
];

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa` (the `#` is optional) or a basic
    /// color name. Surrounding whitespace and quotes are ignored.
    pub fn parse(value: &str) -> Option<Color> {
        static HEX_COLOR_REGEX: OnceLock<Regex> = OnceLock::new();
        let hex_regex = HEX_COLOR_REGEX.get_or_init(|| {
            Regex::new(r"^#?([0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap()
        });

        let value = value.trim().trim_matches(|c: char| c == '"' || c == '\'');

        if let Some((_, color)) = NAMED_COLORS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(value))
        {
            return Some(*color);
        }

        let digits = hex_regex.captures(value)?.get(1)?.as_str();
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        match digits.len() {
            3 => {
                let short = |i: usize| {
                    u8::from_str_radix(&digits[i..i + 1], 16)
                        .ok()
                        .map(|v| v * 0x11)
                };
                Some(Color::rgb(short(0)?, short(1)?, short(2)?))
            }
            6 => Some(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Color::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        if self.a == 0xff {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Color::parse(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color value '{value}'")))
    }
}
