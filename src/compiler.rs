use std::fmt;

use crate::builder::build_with_max_depth;
use crate::capability::{filter, Whitelist};
use crate::element::Element;
use crate::error::BbResult;
use crate::options::CompileOptions;
use crate::output::flatten;
use crate::provider::StyleProvider;
use crate::resolve::StyleResolver;
use crate::styled::StyledText;
use crate::token::tokenize;

/// The full BBCode pipeline bound to one style provider.
///
/// The provider's whitelist is read and validated once, here. Every call to
/// [`Compiler::compile`] is independent: nothing is cached between calls, so
/// a `Compiler` over a `Sync` provider can be shared across threads.
pub struct Compiler<P> {
    provider: P,
    whitelist: Whitelist,
    options: CompileOptions,
}

impl<P> fmt::Debug for Compiler<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compiler")
            .field("whitelist", &self.whitelist)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<P: StyleProvider> Compiler<P> {
    pub fn new(provider: P) -> BbResult<Self> {
        Self::with_options(provider, CompileOptions::default())
    }

    pub fn with_options(provider: P, options: CompileOptions) -> BbResult<Self> {
        options.validate()?;
        let whitelist = Whitelist::new(provider.supported_tags())?;
        log::debug!(
            target: "bbcode.compiler",
            "compiler ready: {} supported tags, {:?}",
            whitelist.len(),
            options
        );
        Ok(Self {
            provider,
            whitelist,
            options,
        })
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn whitelist(&self) -> &Whitelist {
        &self.whitelist
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Tokenize, build and filter. Never fails.
    pub fn parse(&self, raw: &str) -> Element {
        let root = build_with_max_depth(tokenize(raw), self.options.max_depth);
        filter(root, &self.whitelist, self.options.unsupported_tags)
    }

    /// Run the whole pipeline. The only failure is a whitelisted element the
    /// provider gives no attributes for; no partial output is returned then.
    pub fn compile(&self, raw: &str) -> BbResult<StyledText> {
        let root = self.parse(raw);
        let resolved = StyleResolver::new(&self.provider)
            .builtin_defaults(self.options.builtin_defaults)
            .resolve(&root)?;
        let styled = flatten(&resolved, self.options.merge_runs);
        log::debug!(
            target: "bbcode.compiler",
            "compiled {} bytes into {} runs",
            raw.len(),
            styled.runs().len()
        );
        Ok(styled)
    }
}
