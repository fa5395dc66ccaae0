//! Engine-level options and shared analysis types.
//!
//! User-facing settings live in [`sprig_config::SmartSelectConfig`]; the knobs
//! here belong to the host embedding the analyzer.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use rustc_hash::FxHashMap;

use super::extractors::SCRIPT_EXTENSIONS;

/// Default node ceiling for one traversal.
///
/// Graphs that reach it are returned with `GraphStatus::Truncated`.
pub const DEFAULT_MAX_MODULES: usize = 10_000;

/// Default wall-clock budget for one traversal.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum file size in bytes (10 MB).
///
/// Larger files are recorded as unreadable instead of being scanned.
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Minimum interval between progress callbacks.
pub const PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// Options the host sets once per [`Analyzer`](super::Analyzer).
#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    /// Project root. Relative specifiers starting with `/`, the ignore file and
    /// alias config are all anchored here. Falls back to the runtime's cwd.
    pub project_root: Option<PathBuf>,

    /// File suffixes (without dot) the extractor is run on.
    pub source_extensions: Vec<String>,

    /// Node ceiling (DoS protection). `None` disables it.
    ///
    /// Default: `DEFAULT_MAX_MODULES` (10,000)
    pub max_modules: Option<usize>,

    /// Wall-clock budget. `None` disables it.
    ///
    /// Default: `DEFAULT_TIMEOUT` (30s)
    pub timeout: Option<Duration>,

    /// Per-file size cap in bytes.
    pub max_file_size: usize,

    /// Extra path aliases (`"@/*"` → `"src/*"`), consulted before the ones
    /// loaded from `tsconfig.json`/`jsconfig.json`.
    pub path_aliases: FxHashMap<String, String>,

    /// Whether to read `tsconfig.json`/`jsconfig.json` for aliases.
    pub load_tsconfig_aliases: bool,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            project_root: None,
            source_extensions: SCRIPT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            max_modules: Some(DEFAULT_MAX_MODULES),
            timeout: Some(DEFAULT_TIMEOUT),
            max_file_size: MAX_FILE_SIZE,
            path_aliases: FxHashMap::default(),
            load_tsconfig_aliases: true,
        }
    }
}

impl AnalyzerOptions {
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = Some(root.into());
        self
    }

    pub fn with_max_modules(mut self, max: Option<usize>) -> Self {
        self.max_modules = max;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_path_alias(
        mut self,
        pattern: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.path_aliases.insert(pattern.into(), target.into());
        self
    }

    pub fn with_source_extensions(
        mut self,
        extensions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.source_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }
}

/// Result of module resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveResult {
    /// Resolved to an existing file.
    Local(PathBuf),

    /// Bare package specifier (npm package, node builtin).
    External(String),

    /// Could not be resolved.
    Unresolved(String),
}

impl ResolveResult {
    pub fn is_local(&self) -> bool {
        matches!(self, ResolveResult::Local(_))
    }

    pub fn is_external(&self) -> bool {
        matches!(self, ResolveResult::External(_))
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, ResolveResult::Unresolved(_))
    }
}

impl fmt::Display for ResolveResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveResult::Local(path) => write!(f, "Local({})", path.display()),
            ResolveResult::External(name) => write!(f, "External({})", name),
            ResolveResult::Unresolved(specifier) => write!(f, "Unresolved({})", specifier),
        }
    }
}
