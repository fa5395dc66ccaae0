//! Path alias handling for module resolution.
//!
//! Aliases come from `compilerOptions.paths` in `tsconfig.json` (or
//! `jsconfig.json`) and from [`AnalyzerOptions::path_aliases`]. Patterns may
//! hold a single `*`; a pattern without one matches the specifier exactly, or
//! as a `pattern/` prefix when supplied programmatically (`"@"` → `"./src"`).
//!
//! [`AnalyzerOptions::path_aliases`]: crate::analysis::AnalyzerOptions::path_aliases

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use path_clean::PathClean;
use regex::Regex;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::analysis::extractors::strip_comments;
use crate::runtime::Runtime;

/// Config files consulted for aliases, first hit wins.
pub const ALIAS_CONFIG_FILES: &[&str] = &["tsconfig.json", "jsconfig.json"];

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*[}\]])").expect("trailing comma regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
struct AliasEntry {
    prefix: String,
    /// `Some(suffix)` for `prefix*suffix` patterns, `None` for exact ones.
    suffix: Option<String>,
    targets: Vec<String>,
}

impl AliasEntry {
    fn parse(pattern: &str, targets: Vec<String>) -> Option<Self> {
        match pattern.matches('*').count() {
            0 => Some(Self {
                prefix: pattern.to_string(),
                suffix: None,
                targets,
            }),
            1 => {
                let (prefix, suffix) = pattern.split_once('*')?;
                Some(Self {
                    prefix: prefix.to_string(),
                    suffix: Some(suffix.to_string()),
                    targets,
                })
            }
            _ => None,
        }
    }

    /// The text the wildcard captured, or `""` for an exact match.
    fn capture<'s>(&self, specifier: &'s str) -> Option<&'s str> {
        match &self.suffix {
            None => (specifier == self.prefix).then_some(""),
            Some(suffix) => {
                let rest = specifier.strip_prefix(self.prefix.as_str())?;
                rest.strip_suffix(suffix.as_str())
            }
        }
    }
}

/// Alias patterns with their substitution targets, anchored at `base_dir`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    base_dir: PathBuf,
    entries: Vec<AliasEntry>,
}

impl AliasTable {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            entries: Vec::new(),
        }
    }

    /// Build from a programmatic `pattern → target` map.
    ///
    /// A target without `*` under a pattern without `*` also maps
    /// `pattern/rest` to `target/rest`.
    pub fn from_map(base_dir: impl Into<PathBuf>, aliases: &FxHashMap<String, String>) -> Self {
        let mut table = Self::new(base_dir);
        for (pattern, target) in aliases {
            if !pattern.contains('*') && !target.contains('*') {
                let prefix = pattern.trim_end_matches('/');
                let target = target.trim_end_matches('/');
                table.insert(prefix, vec![target.to_string()]);
                table.insert(&format!("{prefix}/*"), vec![format!("{target}/*")]);
            } else {
                table.insert(pattern, vec![target.clone()]);
            }
        }
        table
    }

    /// Parse a `tsconfig.json`-style document located in `config_dir`.
    ///
    /// Returns `None` when the document has no usable `compilerOptions.paths`.
    pub fn from_tsconfig(content: &str, config_dir: &Path) -> Option<Self> {
        let cleaned = TRAILING_COMMA.replace_all(&strip_comments(content), "$1").into_owned();
        let parsed: Value = serde_json::from_str(&cleaned).ok()?;
        let options = parsed.get("compilerOptions")?;
        let paths = options.get("paths")?.as_object()?;

        let base_dir = match options.get("baseUrl").and_then(Value::as_str) {
            Some(base_url) => config_dir.join(base_url).clean(),
            None => config_dir.to_path_buf(),
        };

        let mut table = Self::new(base_dir);
        for (pattern, targets) in paths {
            let targets: Vec<String> = targets
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(|t| t.as_str().map(String::from))
                .collect();
            if targets.is_empty() {
                continue;
            }
            table.insert(pattern, targets);
        }
        (!table.is_empty()).then_some(table)
    }

    fn insert(&mut self, pattern: &str, targets: Vec<String>) {
        match AliasEntry::parse(pattern, targets) {
            Some(entry) => self.entries.push(entry),
            None => tracing::warn!(pattern, "ignoring alias pattern with more than one '*'"),
        }
        // Longest prefix wins, exact patterns before wildcards of equal length.
        self.entries.sort_by(|a, b| {
            b.prefix
                .len()
                .cmp(&a.prefix.len())
                .then_with(|| a.suffix.is_some().cmp(&b.suffix.is_some()))
        });
    }

    /// Append another table's entries after this one's (lower priority).
    pub fn extend(&mut self, other: AliasTable) {
        let base = other.base_dir;
        for mut entry in other.entries {
            // Rebase relative targets so they stay anchored to their own config.
            entry.targets = entry
                .targets
                .into_iter()
                .map(|t| base.join(t).clean().to_string_lossy().into_owned())
                .collect();
            self.entries.push(entry);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether any pattern matches `specifier`.
    pub fn matches(&self, specifier: &str) -> bool {
        self.entries.iter().any(|e| e.capture(specifier).is_some())
    }

    /// Candidate base paths for `specifier` from the first matching pattern.
    pub fn candidates(&self, specifier: &str) -> Vec<PathBuf> {
        for entry in &self.entries {
            if let Some(captured) = entry.capture(specifier) {
                return entry
                    .targets
                    .iter()
                    .map(|target| self.base_dir.join(target.replacen('*', captured, 1)).clean())
                    .collect();
            }
        }
        Vec::new()
    }
}

/// Load the alias table from `tsconfig.json`, falling back to `jsconfig.json`.
///
/// Missing or unreadable files yield `None`; they are never an error.
pub async fn load_alias_table(project_root: &Path, runtime: &dyn Runtime) -> Option<AliasTable> {
    for name in ALIAS_CONFIG_FILES {
        let path = project_root.join(name);
        if !runtime.exists(&path) {
            continue;
        }
        let bytes = match runtime.read_file(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "alias config unreadable");
                continue;
            }
        };
        let content = String::from_utf8_lossy(&bytes);
        if let Some(table) = AliasTable::from_tsconfig(&content, project_root) {
            tracing::debug!(path = %path.display(), aliases = table.len(), "loaded path aliases");
            return Some(table);
        }
    }
    None
}
