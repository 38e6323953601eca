//! # BBCode String
//!
//! Compiles BBCode markup (`[b]bold[/b]`, `[color=red]…[/color]`) into a
//! sequence of styled runs that a host turns into its native attributed string.
//!
//! ## Pipeline
//! - [`token`]: lazy tokenizer, never fails
//! - [`builder`]: tree builder with permissive recovery for unbalanced markup
//! - [`capability`]: drops or flattens tags the host does not support
//! - [`resolve`]: asks the host's [`StyleProvider`] how each element looks
//! - [`output`]: flattens the styled tree into [`StyledText`]
//!
//! Malformed or unbalanced markup is always recovered as literal text. Once a
//! [`Compiler`] is built, the only error a compile can return is
//! [`BbError::MissingStyle`], raised when the host whitelists a tag but gives no
//! attributes for it. A whitelist entry that is not a valid tag name is rejected
//! up front with [`BbError::InvalidTag`].
//!
//! ## Example
//! ```ignore
//! use bbcode_string::{compile, StyleSheet};
//!
//! let sheet = StyleSheet::from_yaml(r#"
//! supported: [b, i]
//! tags:
//!   color:
//!     foregroundColor: $value
//! "#)?;
//!
//! let styled = compile("[b]Hello[/b] [color=#ff0000]world[/color]", &sheet)?;
//! assert_eq!(styled.text(), "Hello world");
//! ```

pub mod attributes;
pub mod builder;
pub mod capability;
pub mod compiler;
pub mod defaults;
pub mod element;
pub mod error;
pub mod options;
pub mod output;
pub mod provider;
pub mod resolve;
pub mod styled;
pub mod stylesheet;
pub mod token;

// --- Core types ---
pub use attributes::{AttrValue, Attributes, Color, PlatformHandle};
pub use capability::{TagPolicy, Whitelist};
pub use compiler::Compiler;
pub use element::Element;
pub use error::{BbError, BbResult};
pub use options::CompileOptions;
pub use provider::StyleProvider;
pub use resolve::{Content, StyleDecision};
pub use styled::{StyledRun, StyledText};
pub use stylesheet::StyleSheet;
pub use token::{Span, Token, TokenKind, Tokens};

/// Scan markup into tokens.
pub fn tokenize(raw: &str) -> Tokens<'_> {
    token::tokenize(raw)
}

/// Parse markup into an unfiltered element tree.
pub fn parse(raw: &str) -> Element {
    builder::build(token::tokenize(raw))
}

/// Compile markup with the given provider and default options.
pub fn compile<P: StyleProvider + ?Sized>(raw: &str, provider: &P) -> BbResult<StyledText> {
    Compiler::new(provider)?.compile(raw)
}

/// Compile markup with the given provider and options.
pub fn compile_with_options<P: StyleProvider + ?Sized>(
    raw: &str,
    provider: &P,
    options: CompileOptions,
) -> BbResult<StyledText> {
    Compiler::with_options(provider, options)?.compile(raw)
}
