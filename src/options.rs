use serde::{Deserialize, Serialize};

use crate::builder::{DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT};
use crate::capability::TagPolicy;
use crate::error::{BbError, BbResult};

/// Compiler settings. Every field has a default, so a YAML document only
/// needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    /// Handling of tags outside the provider's whitelist.
    pub unsupported_tags: TagPolicy,
    /// Join neighbouring runs with identical attributes.
    pub merge_runs: bool,
    /// Fall back to built-in attributes for standard tags the provider leaves unstyled.
    pub builtin_defaults: bool,
    /// Open tags nested deeper than this are kept as literal text. At most
    /// [`MAX_DEPTH_LIMIT`].
    pub max_depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            unsupported_tags: TagPolicy::default(),
            merge_runs: true,
            builtin_defaults: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_yaml(yaml: &str) -> BbResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let options: Self = serde_yaml::from_str(yaml)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> BbResult<()> {
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(BbError::Config(format!(
                "maxDepth {} exceeds the limit of {}",
                self.max_depth, MAX_DEPTH_LIMIT
            )));
        }
        Ok(())
    }

    pub fn with_unsupported_tags(mut self, policy: TagPolicy) -> Self {
        self.unsupported_tags = policy;
        self
    }

    pub fn with_merge_runs(mut self, merge: bool) -> Self {
        self.merge_runs = merge;
        self
    }

    pub fn with_builtin_defaults(mut self, enabled: bool) -> Self {
        self.builtin_defaults = enabled;
        self
    }

    /// Clamped to [`MAX_DEPTH_LIMIT`].
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.min(MAX_DEPTH_LIMIT);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(CompileOptions::from_yaml("").unwrap(), CompileOptions::default());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let options = CompileOptions::from_yaml("unsupportedTags: literal\nmaxDepth: 8\n").unwrap();
        assert_eq!(options.unsupported_tags, TagPolicy::Literal);
        assert_eq!(options.max_depth, 8);
        assert!(options.merge_runs);
        assert!(options.builtin_defaults);
    }

    #[test]
    fn unknown_policy_is_config_error() {
        let err = CompileOptions::from_yaml("unsupportedTags: explode").unwrap_err();
        assert!(matches!(err, BbError::Config(_)));
    }

    #[test]
    fn depth_above_limit_is_config_error() {
        let err = CompileOptions::from_yaml("maxDepth: 200000").unwrap_err();
        assert!(matches!(err, BbError::Config(msg) if msg.contains("200000")));

        let at_limit = format!("maxDepth: {MAX_DEPTH_LIMIT}");
        assert_eq!(CompileOptions::from_yaml(&at_limit).unwrap().max_depth, MAX_DEPTH_LIMIT);
    }

    #[test]
    fn builder_clamps_depth() {
        let options = CompileOptions::new().with_max_depth(1_000_000);
        assert_eq!(options.max_depth, MAX_DEPTH_LIMIT);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn round_trips_through_yaml() {
        let options = CompileOptions::new()
            .with_unsupported_tags(TagPolicy::Drop)
            .with_merge_runs(false);
        let yaml = serde_yaml::to_string(&options).unwrap();
        assert!(yaml.contains("unsupportedTags: drop"));
        assert_eq!(CompileOptions::from_yaml(&yaml).unwrap(), options);
    }
}
