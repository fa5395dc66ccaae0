//! Import extractors.
//!
//! An extractor turns file content into an ordered list of
//! [`ImportStatement`]s. Extraction never fails: malformed occurrences are
//! skipped and unsupported files yield an empty list.
//!
//! # Usage
//!
//! ```rust
//! use sprig_graph::analysis::extractors::extract_imports;
//!
//! let imports = extract_imports("import { foo } from './bar'");
//! assert_eq!(imports[0].source, "./bar");
//! assert_eq!(imports[0].specifiers, vec!["foo"]);
//! ```

mod comments;
mod script;

pub use comments::strip_comments;
pub use script::ScriptExtractor;

use std::path::Path;

use crate::import::ImportStatement;

/// File suffixes the script extractor understands.
pub const SCRIPT_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs", "mts", "cts"];

/// Strategy for pulling import statements out of file content.
///
/// The regex [`ScriptExtractor`] is the only implementation today; a
/// syntax-tree extractor can be slotted in without touching the walker.
pub trait ImportExtractor: Send + Sync + std::fmt::Debug {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Extract imports in source order.
    fn extract(&self, content: &str) -> Vec<ImportStatement>;
}

/// Whether `path` has one of the `allowed` suffixes (case-insensitive, no dot).
pub fn is_supported(path: &Path, allowed: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)))
}

/// Extract imports from script content.
pub fn extract_imports(content: &str) -> Vec<ImportStatement> {
    ScriptExtractor.extract(content)
}
