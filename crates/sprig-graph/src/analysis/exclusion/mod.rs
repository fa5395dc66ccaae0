//! Exclusion filter.
//!
//! Decides whether a resolved path is dropped from the graph. Checks run in a
//! fixed order and the first hit gives the reason:
//!
//! 1. inside a package-manager directory (`excludeThirdParty`)
//! 2. matched by the project ignore file (`respectIgnoreFile`)
//! 3. matched by a user exclusion pattern

mod ignore_file;
mod patterns;

pub use ignore_file::{IGNORE_FILE_NAME, IgnoreCache, IgnoreRules};
pub use patterns::{
    MAX_ALTERNATIVES, MAX_BRACE_DEPTH, MAX_GLOBSTARS, MAX_PATTERN_LEN, PatternError, PatternSet,
    check_pattern, expand_pattern,
};

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use sprig_config::SmartSelectConfig;

use crate::graph::ExcludeReason;

/// Directory names that hold package-manager installs.
pub const THIRD_PARTY_DIRS: &[&str] = &["node_modules", "bower_components", "jspm_packages"];

/// Exclusion rules for one analysis.
#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    root: PathBuf,
    exclude_third_party: bool,
    ignore: Option<Arc<IgnoreRules>>,
    patterns: PatternSet,
    warnings: Vec<String>,
}

impl ExclusionFilter {
    /// Build the filter from configuration.
    ///
    /// `ignore` is only consulted when `respectIgnoreFile` is set. Patterns
    /// refused by the pathological-shape check are reported in
    /// [`warnings`](Self::warnings) and otherwise ignored.
    pub fn new(
        root: impl Into<PathBuf>,
        config: &SmartSelectConfig,
        ignore: Option<Arc<IgnoreRules>>,
    ) -> Self {
        let (patterns, rejected) = PatternSet::compile(&config.exclusion_patterns);
        let warnings = rejected
            .into_iter()
            .map(|(pattern, e)| {
                tracing::warn!(pattern = %pattern, error = %e, "rejected exclusion pattern");
                format!("rejected exclusion pattern '{pattern}': {e}")
            })
            .collect();

        Self {
            root: root.into(),
            exclude_third_party: config.exclude_third_party,
            ignore: if config.respect_ignore_file { ignore } else { None },
            patterns,
            warnings,
        }
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// `Some(reason)` when `path` should be dropped from the graph.
    pub fn should_exclude(&self, path: &Path) -> Option<ExcludeReason> {
        if self.exclude_third_party && self.is_third_party(path) {
            return Some(ExcludeReason::ExternallyManaged);
        }

        if self.ignore.as_ref().is_some_and(|rules| rules.is_ignored(path)) {
            return Some(ExcludeReason::IgnoreRule);
        }

        if !self.patterns.is_empty() && self.patterns.is_match(&self.relative(path)) {
            return Some(ExcludeReason::UserPattern);
        }

        None
    }

    fn is_third_party(&self, path: &Path) -> bool {
        let scoped = path.strip_prefix(&self.root).unwrap_or(path);
        scoped.components().any(|c| match c {
            Component::Normal(name) => name
                .to_str()
                .is_some_and(|name| THIRD_PARTY_DIRS.contains(&name)),
            _ => false,
        })
    }

    /// `/`-separated path relative to the root (absolute when outside it).
    fn relative(&self, path: &Path) -> String {
        let scoped = path.strip_prefix(&self.root).unwrap_or(path);
        scoped
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}
