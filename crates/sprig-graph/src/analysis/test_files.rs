//! Test-file discovery.
//!
//! For a source file `dir/Button.tsx` the built-in heuristics look for
//! `dir/Button.test.*`, `dir/Button.spec.*`, `dir/__tests__/Button.*` and the
//! same names under a `test`, `tests` or `__tests__` tree that mirrors a `src`
//! tree. User patterns are added on top: `{name}` is the source file's stem,
//! `{ext}` any script suffix, and a leading `/` anchors the directory part at
//! the project root (otherwise it is relative to the source file).
//!
//! Candidate directories are listed once per traversal and matched in memory.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use globset::{GlobBuilder, GlobMatcher};
use rustc_hash::FxHashMap;

use crate::runtime::Runtime;

/// Directory names used for a parallel test tree.
pub const PARALLEL_TEST_DIRS: &[&str] = &["test", "tests", "__tests__"];

const EXT_ALTERNATION: &str = "{ts,tsx,js,jsx,mjs,cjs,mts,cts}";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Anchor {
    /// Relative to the source file's directory.
    Sibling(PathBuf),
    /// Relative to the project root.
    Root(PathBuf),
    /// The source directory with its `src` component swapped for `dir`.
    Parallel(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TestPattern {
    anchor: Anchor,
    file: String,
}

impl TestPattern {
    fn sibling(dir: &str, file: &str) -> Self {
        Self {
            anchor: Anchor::Sibling(PathBuf::from(dir)),
            file: file.to_string(),
        }
    }

    /// Parse a user pattern such as `{name}.e2e.{ext}` or `/e2e/{name}.*`.
    ///
    /// The directory part must be literal; globs are only allowed in the file name.
    fn parse(pattern: &str) -> Option<Self> {
        let pattern = pattern.trim();
        let (dir, file) = match pattern.rsplit_once('/') {
            Some((dir, file)) => (dir, file),
            None => ("", pattern),
        };
        if file.is_empty() || dir.contains(['*', '?', '[', '{']) {
            return None;
        }
        let anchor = match dir.strip_prefix('/') {
            Some(rooted) => Anchor::Root(PathBuf::from(rooted)),
            None if pattern.starts_with('/') => Anchor::Root(PathBuf::new()),
            None => Anchor::Sibling(PathBuf::from(dir.strip_prefix("./").unwrap_or(dir))),
        };
        Some(Self {
            anchor,
            file: file.to_string(),
        })
    }

    fn directory(&self, source_dir: &Path, project_root: &Path) -> Option<PathBuf> {
        match &self.anchor {
            Anchor::Sibling(rel) => Some(source_dir.join(rel)),
            Anchor::Root(rel) => Some(project_root.join(rel)),
            Anchor::Parallel(name) => parallel_dir(source_dir, project_root, name),
        }
    }

    fn matcher(&self, stem: &str) -> Option<GlobMatcher> {
        let glob = self
            .file
            .replace("{name}", &escape_glob(stem))
            .replace("{ext}", EXT_ALTERNATION);
        GlobBuilder::new(&glob)
            .literal_separator(true)
            .build()
            .ok()
            .map(|g| g.compile_matcher())
    }
}

/// `root/src/a/b` → `root/<name>/a/b`. `None` without a `src` component.
fn parallel_dir(source_dir: &Path, project_root: &Path, name: &str) -> Option<PathBuf> {
    let relative = source_dir.strip_prefix(project_root).ok()?;
    let mut swapped = false;
    let mut out = project_root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) if !swapped && part == "src" => {
                out.push(name);
                swapped = true;
            }
            other => out.push(other),
        }
    }
    swapped.then_some(out)
}

fn escape_glob(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        match c {
            '*' | '?' | '[' | ']' | '{' | '}' => {
                escaped.push('[');
                escaped.push(c);
                escaped.push(']');
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

fn default_patterns() -> Vec<TestPattern> {
    let mut patterns = vec![
        TestPattern::sibling("", "{name}.test.{ext}"),
        TestPattern::sibling("", "{name}.spec.{ext}"),
        TestPattern::sibling("__tests__", "{name}.{ext}"),
        TestPattern::sibling("__tests__", "{name}.test.{ext}"),
        TestPattern::sibling("__tests__", "{name}.spec.{ext}"),
    ];
    for dir in PARALLEL_TEST_DIRS {
        for file in ["{name}.test.{ext}", "{name}.spec.{ext}", "{name}.{ext}"] {
            patterns.push(TestPattern {
                anchor: Anchor::Parallel(*dir),
                file: file.to_string(),
            });
        }
    }
    patterns
}

/// Finds test files for source files.
#[derive(Debug, Clone)]
pub struct TestFileFinder {
    project_root: PathBuf,
    patterns: Vec<TestPattern>,
    /// Patterns that mention `{name}`; the rest also need a `stem.` prefix.
    named: Vec<bool>,
    warnings: Vec<String>,
}

impl TestFileFinder {
    /// Built-in heuristics followed by `user_patterns`, in that order.
    pub fn new(project_root: impl Into<PathBuf>, user_patterns: &[String]) -> Self {
        let mut patterns = default_patterns();
        let mut named: Vec<bool> = vec![true; patterns.len()];
        let mut warnings = Vec::new();

        for raw in user_patterns {
            match TestPattern::parse(raw) {
                Some(pattern) => {
                    named.push(raw.contains("{name}"));
                    patterns.push(pattern);
                }
                None => {
                    tracing::warn!(
                        pattern = %raw,
                        "ignoring test file pattern with a glob directory"
                    );
                    warnings.push(format!(
                        "ignored test file pattern '{raw}': only the file name may contain globs"
                    ));
                }
            }
        }

        Self {
            project_root: project_root.into(),
            patterns,
            named,
            warnings,
        }
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Existing test files for `source`, sorted and deduplicated.
    pub async fn find(
        &self,
        source: &Path,
        runtime: &dyn Runtime,
        listings: &mut DirListings,
    ) -> Vec<PathBuf> {
        let (Some(dir), Some(stem)) = (source.parent(), source.file_stem().and_then(|s| s.to_str()))
        else {
            return Vec::new();
        };
        let prefix = format!("{stem}.");

        let mut found = Vec::new();
        for (pattern, named) in self.patterns.iter().zip(&self.named) {
            let Some(candidate_dir) = pattern.directory(dir, &self.project_root) else {
                continue;
            };
            let Some(matcher) = pattern.matcher(stem) else {
                continue;
            };
            let entries = listings.list(&candidate_dir, runtime).await;
            for name in entries.iter() {
                if !*named && !name.starts_with(&prefix) {
                    continue;
                }
                if !matcher.is_match(name) {
                    continue;
                }
                let path = candidate_dir.join(name);
                if path != source {
                    found.push(path);
                }
            }
        }

        found.sort();
        found.dedup();
        found
    }
}

/// Directory listings cached for the duration of one traversal.
#[derive(Debug, Default)]
pub struct DirListings {
    entries: FxHashMap<PathBuf, Arc<Vec<String>>>,
}

impl DirListings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry names of `dir`; missing or unreadable directories are empty.
    pub async fn list(&mut self, dir: &Path, runtime: &dyn Runtime) -> Arc<Vec<String>> {
        if let Some(entries) = self.entries.get(dir) {
            return Arc::clone(entries);
        }
        let entries = if runtime.is_dir(dir).await {
            runtime.read_dir(dir).await.unwrap_or_else(|e| {
                tracing::debug!(dir = %dir.display(), error = %e, "cannot list directory");
                Vec::new()
            })
        } else {
            Vec::new()
        };
        let entries = Arc::new(entries);
        self.entries.insert(dir.to_path_buf(), Arc::clone(&entries));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::test_utils::TestRuntime;
    use std::fs;
    use tempfile::TempDir;

    fn project(files: &[&str]) -> (TempDir, TestRuntime) {
        let temp = TempDir::new().unwrap();
        for file in files {
            let path = temp.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "").unwrap();
        }
        let runtime = TestRuntime::new(temp.path().to_path_buf());
        (temp, runtime)
    }

    async fn find(
        temp: &TempDir,
        runtime: &TestRuntime,
        patterns: &[&str],
        source: &str,
    ) -> Vec<String> {
        let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        let finder = TestFileFinder::new(temp.path(), &patterns);
        let mut listings = DirListings::new();
        finder
            .find(&temp.path().join(source), runtime, &mut listings)
            .await
            .into_iter()
            .map(|p| {
                p.strip_prefix(temp.path())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[tokio::test]
    async fn sibling_test_and_spec() {
        let (temp, runtime) = project(&[
            "src/Button.tsx",
            "src/Button.test.tsx",
            "src/Button.spec.ts",
            "src/ButtonGroup.test.tsx",
        ]);
        let found = find(&temp, &runtime, &[], "src/Button.tsx").await;
        assert_eq!(found, vec!["src/Button.spec.ts", "src/Button.test.tsx"]);
    }

    #[tokio::test]
    async fn dunder_tests_directory() {
        let (temp, runtime) = project(&["src/utils.ts", "src/__tests__/utils.ts"]);
        let found = find(&temp, &runtime, &[], "src/utils.ts").await;
        assert_eq!(found, vec!["src/__tests__/utils.ts"]);
    }

    #[tokio::test]
    async fn parallel_test_tree() {
        let (temp, runtime) = project(&[
            "src/lib/math.ts",
            "test/lib/math.test.ts",
            "tests/lib/math.ts",
        ]);
        let found = find(&temp, &runtime, &[], "src/lib/math.ts").await;
        assert_eq!(found, vec!["test/lib/math.test.ts", "tests/lib/math.ts"]);
    }

    #[tokio::test]
    async fn user_patterns_extend_defaults() {
        let (temp, runtime) = project(&[
            "src/api.ts",
            "src/api.e2e.ts",
            "e2e/api.e2e.ts",
            "src/api.test.ts",
        ]);
        let found = find(
            &temp,
            &runtime,
            &["{name}.e2e.{ext}", "/e2e/{name}.e2e.{ext}"],
            "src/api.ts",
        )
        .await;
        assert_eq!(found, vec!["e2e/api.e2e.ts", "src/api.e2e.ts", "src/api.test.ts"]);
    }

    #[tokio::test]
    async fn nameless_pattern_requires_stem_prefix() {
        let (temp, runtime) = project(&["src/api.ts", "src/api.bench.ts", "src/other.bench.ts"]);
        let found = find(&temp, &runtime, &["*.bench.ts"], "src/api.ts").await;
        assert_eq!(found, vec!["src/api.bench.ts"]);
    }

    #[tokio::test]
    async fn glob_directory_is_rejected() {
        let temp = TempDir::new().unwrap();
        let finder = TestFileFinder::new(temp.path(), &["**/{name}.test.ts".to_string()]);
        assert_eq!(finder.warnings().len(), 1);
    }

    #[tokio::test]
    async fn no_tests_found() {
        let (temp, runtime) = project(&["src/lonely.ts"]);
        assert!(find(&temp, &runtime, &[], "src/lonely.ts").await.is_empty());
    }

    #[test]
    fn parallel_dir_needs_src() {
        let root = Path::new("/proj");
        assert_eq!(
            parallel_dir(Path::new("/proj/src/a"), root, "test"),
            Some(PathBuf::from("/proj/test/a"))
        );
        assert_eq!(parallel_dir(Path::new("/proj/lib/a"), root, "test"), None);
    }
}
