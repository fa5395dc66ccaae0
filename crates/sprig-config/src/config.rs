//! Smart-selection settings.
//!
//! These are the user-facing options read from the settings store. Keys are
//! camelCase on the wire (`maxDepth`, `includeTests`, ...); environment
//! variables are mapped onto the same names by the loader.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Default number of import hops followed from a root file.
pub const DEFAULT_MAX_DEPTH: u32 = 5;

/// Largest accepted numeric depth. Anything deeper must use [`DepthLimit::Unlimited`].
pub const MAX_DEPTH_LEVELS: u32 = 20;

/// Keyword accepted in place of a number for unbounded traversal.
pub const UNLIMITED_KEYWORD: &str = "unlimited";

/// How far breadth-first expansion may go from a root.
///
/// `Levels(0)` selects the root alone. Unbounded traversal is the separate
/// `Unlimited` variant, written as the string `"unlimited"` in config files;
/// zero is never overloaded to mean "no limit".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthLimit {
    Levels(u32),
    Unlimited,
}

impl DepthLimit {
    /// The numeric bound, or `None` when unlimited.
    pub fn levels(self) -> Option<u32> {
        match self {
            DepthLimit::Levels(n) => Some(n),
            DepthLimit::Unlimited => None,
        }
    }

    /// The bound as a `usize` for traversal code.
    pub fn as_usize(self) -> Option<usize> {
        self.levels().map(|n| n as usize)
    }
}

impl Default for DepthLimit {
    fn default() -> Self {
        DepthLimit::Levels(DEFAULT_MAX_DEPTH)
    }
}

impl From<u32> for DepthLimit {
    fn from(levels: u32) -> Self {
        DepthLimit::Levels(levels)
    }
}

impl fmt::Display for DepthLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepthLimit::Levels(n) => write!(f, "{n}"),
            DepthLimit::Unlimited => f.write_str(UNLIMITED_KEYWORD),
        }
    }
}

impl std::str::FromStr for DepthLimit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(UNLIMITED_KEYWORD) {
            return Ok(DepthLimit::Unlimited);
        }
        trimmed
            .parse::<u32>()
            .map(DepthLimit::Levels)
            .map_err(|_| {
                format!(
                    "expected a depth between 0 and {MAX_DEPTH_LEVELS} or \"{UNLIMITED_KEYWORD}\", got '{s}'"
                )
            })
    }
}

impl Serialize for DepthLimit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DepthLimit::Levels(n) => serializer.serialize_u32(*n),
            DepthLimit::Unlimited => serializer.serialize_str(UNLIMITED_KEYWORD),
        }
    }
}

impl<'de> Deserialize<'de> for DepthLimit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DepthVisitor;

        impl Visitor<'_> for DepthVisitor {
            type Value = DepthLimit;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a non-negative integer or \"{UNLIMITED_KEYWORD}\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<DepthLimit, E> {
                u32::try_from(v)
                    .map(DepthLimit::Levels)
                    .map_err(|_| E::custom(format!("depth {v} is too large")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<DepthLimit, E> {
                if v < 0 {
                    return Err(E::custom(format!("depth cannot be negative (got {v})")));
                }
                self.visit_u64(v as u64)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<DepthLimit, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(DepthVisitor)
    }
}

/// User-facing smart-selection options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SmartSelectConfig {
    /// Gates whether any analysis runs.
    pub enabled: bool,

    /// Caps breadth-first expansion depth.
    pub max_depth: DepthLimit,

    /// Enables test-file discovery per node.
    pub include_tests: bool,

    /// Appended to the built-in test-name heuristics.
    pub test_file_patterns: Vec<String>,

    /// Additional paths dropped from the graph.
    pub exclusion_patterns: Vec<String>,

    /// Toggles externally-managed-package exclusion.
    pub exclude_third_party: bool,

    /// Toggles ignore-file pattern enforcement.
    pub respect_ignore_file: bool,
}

impl Default for SmartSelectConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_depth: DepthLimit::default(),
            include_tests: false,
            test_file_patterns: Vec::new(),
            exclusion_patterns: Vec::new(),
            exclude_third_party: true,
            respect_ignore_file: true,
        }
    }
}

impl SmartSelectConfig {
    /// Parse settings from a JSON value (e.g. a `sprig` block in package.json).
    pub fn from_value(value: serde_json::Value) -> crate::Result<Self> {
        serde_json::from_value(value).map_err(|e| crate::ConfigError::InvalidValue {
            field: "sprig".to_string(),
            hint: Some(e.to_string()),
        })
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_max_depth(mut self, depth: impl Into<DepthLimit>) -> Self {
        self.max_depth = depth.into();
        self
    }

    pub fn with_tests(mut self, include: bool) -> Self {
        self.include_tests = include;
        self
    }

    pub fn with_exclusions(
        mut self,
        patterns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.exclusion_patterns.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn with_test_patterns(
        mut self,
        patterns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.test_file_patterns.extend(patterns.into_iter().map(Into::into));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_limit_parses_numbers_and_keyword() {
        assert_eq!("7".parse::<DepthLimit>().unwrap(), DepthLimit::Levels(7));
        assert_eq!(
            "Unlimited".parse::<DepthLimit>().unwrap(),
            DepthLimit::Unlimited
        );
        assert!("-1".parse::<DepthLimit>().is_err());
        assert!("deep".parse::<DepthLimit>().is_err());
    }

    #[test]
    fn depth_limit_zero_is_root_only() {
        assert_eq!(DepthLimit::Levels(0).as_usize(), Some(0));
        assert_eq!(DepthLimit::Unlimited.as_usize(), None);
    }

    #[test]
    fn depth_limit_serde_shapes() {
        let json = serde_json::to_string(&DepthLimit::Unlimited).unwrap();
        assert_eq!(json, "\"unlimited\"");
        let json = serde_json::to_string(&DepthLimit::Levels(3)).unwrap();
        assert_eq!(json, "3");

        let back: DepthLimit = serde_json::from_str("\"unlimited\"").unwrap();
        assert_eq!(back, DepthLimit::Unlimited);
        let back: DepthLimit = serde_json::from_str("12").unwrap();
        assert_eq!(back, DepthLimit::Levels(12));
        assert!(serde_json::from_str::<DepthLimit>("-3").is_err());
    }

    #[test]
    fn config_reads_camel_case_keys() {
        let config: SmartSelectConfig = serde_json::from_str(
            r#"{
                "enabled": true,
                "maxDepth": 2,
                "includeTests": true,
                "testFilePatterns": ["{name}.stories.tsx"],
                "exclusionPatterns": ["**/*.generated.ts"],
                "excludeThirdParty": false,
                "respectIgnoreFile": false
            }"#,
        )
        .unwrap();

        assert!(config.enabled);
        assert_eq!(config.max_depth, DepthLimit::Levels(2));
        assert!(config.include_tests);
        assert_eq!(config.test_file_patterns, vec!["{name}.stories.tsx"]);
        assert_eq!(config.exclusion_patterns, vec!["**/*.generated.ts"]);
        assert!(!config.exclude_third_party);
        assert!(!config.respect_ignore_file);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: SmartSelectConfig = serde_json::from_str(r#"{"enabled": true}"#).unwrap();
        assert!(config.enabled);
        assert_eq!(config.max_depth, DepthLimit::Levels(DEFAULT_MAX_DEPTH));
        assert!(config.exclude_third_party);
        assert!(config.respect_ignore_file);
    }
}
