//! Build configuration.
//!
//! [`BuildOptions`] is a plain value: construct it with `Default` and the
//! setters, or parse it from a TOML/JSON document. Keys missing from a
//! document fall back to the defaults, so defaulting happens exactly once,
//! when the value is created.

use serde::{Deserialize, Serialize};

use crate::error::{BuildError, BuildResult};

/// Options controlling how objects are built.
///
/// | field | default |
/// |---|---|
/// | `eager` | `false` (relationships resolve on first read) |
/// | `ignore_links` | `false` (link-only relationships fail) |
/// | `allow_circular` | `true` (no ancestor-chain suppression) |
/// | `ancestor_types` | empty |
/// | `include_type` | `false` |
/// | `include_meta` | `false` |
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildOptions {
    /// Resolve every relationship while building instead of on first read.
    pub eager: bool,

    /// Treat link-only relationships as omitted instead of failing.
    #[serde(alias = "ignore_links")]
    pub ignore_links: bool,

    /// When `false`, a relationship target whose type already appears on
    /// the current path is left as a raw reference.
    #[serde(alias = "allow_circular")]
    pub allow_circular: bool,

    /// Types on the path from the root to the object being built. Callers
    /// normally leave this empty.
    #[serde(rename = "parentTree", alias = "ancestor_types", alias = "parent_tree")]
    pub ancestor_types: Vec<String>,

    /// Add a `type` field holding the entity's type name.
    #[serde(alias = "include_type")]
    pub include_type: bool,

    /// Attach record meta, and relationship meta under `meta.relationships`.
    #[serde(alias = "include_meta")]
    pub include_meta: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            eager: false,
            ignore_links: false,
            allow_circular: true,
            ancestor_types: Vec::new(),
            include_type: false,
            include_meta: false,
        }
    }
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eager(mut self, eager: bool) -> Self {
        self.eager = eager;
        self
    }

    pub fn ignore_links(mut self, ignore: bool) -> Self {
        self.ignore_links = ignore;
        self
    }

    pub fn allow_circular(mut self, allow: bool) -> Self {
        self.allow_circular = allow;
        self
    }

    pub fn include_type(mut self, include: bool) -> Self {
        self.include_type = include;
        self
    }

    pub fn include_meta(mut self, include: bool) -> Self {
        self.include_meta = include;
        self
    }

    pub fn ancestor_types<I, T>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.ancestor_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Parse options from TOML. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> BuildResult<Self> {
        toml::from_str(text).map_err(|e| BuildError::Config(e.to_string()))
    }

    /// Parse options from JSON. Missing keys take their defaults.
    pub fn from_json_str(text: &str) -> BuildResult<Self> {
        serde_json::from_str(text).map_err(|e| BuildError::Config(e.to_string()))
    }

    /// Whether a target of `type_name` must stay a raw reference.
    pub(crate) fn suppresses(&self, type_name: &str) -> bool {
        !self.allow_circular && self.ancestor_types.iter().any(|t| t == type_name)
    }

    /// Options for the children of an object of `type_name`.
    ///
    /// The ancestor chain only grows while suppression is active; each
    /// branch gets its own copy.
    pub(crate) fn descend(&self, type_name: &str) -> Self {
        let mut child = self.clone();
        if !self.allow_circular {
            child.ancestor_types.push(type_name.to_string());
        }
        child
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = BuildOptions::default();
        assert!(!opts.eager);
        assert!(!opts.ignore_links);
        assert!(opts.allow_circular);
        assert!(opts.ancestor_types.is_empty());
        assert!(!opts.include_type);
        assert!(!opts.include_meta);
    }

    #[test]
    fn toml_merges_over_defaults() {
        let opts = BuildOptions::from_toml_str("eager = true\nincludeMeta = true\n").unwrap();
        assert!(opts.eager);
        assert!(opts.include_meta);
        assert!(opts.allow_circular);
    }

    #[test]
    fn snake_case_aliases() {
        let opts =
            BuildOptions::from_toml_str("allow_circular = false\nparent_tree = [\"a\"]\n").unwrap();
        assert!(!opts.allow_circular);
        assert_eq!(opts.ancestor_types, vec!["a"]);
    }

    #[test]
    fn json_uses_camel_case() {
        let opts =
            BuildOptions::from_json_str(r#"{"ignoreLinks": true, "parentTree": ["x"]}"#).unwrap();
        assert!(opts.ignore_links);
        assert_eq!(opts.ancestor_types, vec!["x"]);
        let back = serde_json::to_value(&opts).unwrap();
        assert_eq!(back["ignoreLinks"], serde_json::json!(true));
    }

    #[test]
    fn bad_document_is_config_error() {
        assert!(matches!(
            BuildOptions::from_toml_str("eager = \"yes\""),
            Err(BuildError::Config(_))
        ));
        assert!(matches!(
            BuildOptions::from_json_str("[1]"),
            Err(BuildError::Config(_))
        ));
    }

    #[test]
    fn suppression_only_when_circular_disallowed() {
        let open = BuildOptions::new().ancestor_types(["people"]);
        assert!(!open.suppresses("people"));

        let strict = open.allow_circular(false);
        assert!(strict.suppresses("people"));
        assert!(!strict.suppresses("tags"));
    }

    #[test]
    fn descend_extends_a_copy() {
        let root = BuildOptions::new().allow_circular(false);
        let child = root.descend("people");
        let grandchild = child.descend("tags");
        assert!(root.ancestor_types.is_empty());
        assert_eq!(child.ancestor_types, vec!["people"]);
        assert_eq!(grandchild.ancestor_types, vec!["people", "tags"]);

        let open = BuildOptions::new().descend("people");
        assert!(open.ancestor_types.is_empty());
    }
}
