//! Extension resolution for module files.
//!
//! Suffixes are appended to the candidate (`./a.config` → `./a.config.ts`),
//! never substituted for an existing one.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::analysis::extractors::SCRIPT_EXTENSIONS;
use crate::runtime::{Runtime, RuntimeError, RuntimeResult};

/// Suffixes accepted verbatim when a specifier already carries one.
pub const KNOWN_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "js", "jsx", "mjs", "cjs", "mts", "cts", "json",
];

/// TypeScript sources imported with their emitted suffix (`./a.js` for `a.ts`).
const ESM_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("js", "ts"),
    ("jsx", "tsx"),
    ("mjs", "mts"),
    ("cjs", "cts"),
];

/// Whether `path` exists as a regular file. Missing files are `Ok(false)`;
/// other failures (permissions, I/O) propagate.
pub async fn is_file(path: &Path, runtime: &dyn Runtime) -> RuntimeResult<bool> {
    if !runtime.exists(path) {
        return Ok(false);
    }
    match runtime.metadata(path).await {
        Ok(metadata) => Ok(metadata.is_file),
        Err(RuntimeError::FileNotFound(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

fn known_extension(path: &Path) -> Option<&str> {
    let ext = path.extension()?.to_str()?;
    KNOWN_EXTENSIONS.contains(&ext).then_some(ext)
}

fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut raw = OsString::from(path.as_os_str());
    raw.push(".");
    raw.push(ext);
    PathBuf::from(raw)
}

/// Try a candidate as a file.
///
/// With a known suffix: the path verbatim, then its TypeScript counterpart.
/// Without one: each of [`SCRIPT_EXTENSIONS`] appended in order.
pub async fn try_extensions(
    base_path: &Path,
    runtime: &dyn Runtime,
) -> RuntimeResult<Option<PathBuf>> {
    if let Some(ext) = known_extension(base_path) {
        if is_file(base_path, runtime).await? {
            return Ok(Some(base_path.to_path_buf()));
        }
        if let Some((_, ts_ext)) = ESM_SUBSTITUTIONS.iter().find(|(js, _)| *js == ext) {
            let substituted = base_path.with_extension(ts_ext);
            if is_file(&substituted, runtime).await? {
                return Ok(Some(substituted));
            }
        }
        return Ok(None);
    }

    for ext in SCRIPT_EXTENSIONS {
        let with_ext = append_extension(base_path, ext);
        if is_file(&with_ext, runtime).await? {
            return Ok(Some(with_ext));
        }
    }

    Ok(None)
}

/// Try a candidate as a directory holding an index file.
pub async fn try_index_files(
    dir_path: &Path,
    runtime: &dyn Runtime,
) -> RuntimeResult<Option<PathBuf>> {
    if !runtime.exists(dir_path) {
        return Ok(None);
    }

    let metadata = match runtime.metadata(dir_path).await {
        Ok(metadata) => metadata,
        Err(RuntimeError::FileNotFound(_)) => return Ok(None),
        Err(e) => return Err(e),
    };

    if metadata.is_dir {
        for ext in SCRIPT_EXTENSIONS {
            let index = dir_path.join(format!("index.{ext}"));
            if is_file(&index, runtime).await? {
                return Ok(Some(index));
            }
        }
    }

    Ok(None)
}

/// Resolve a candidate base path with extension and index-file fallbacks.
pub async fn resolve_candidate(
    candidate: &Path,
    runtime: &dyn Runtime,
) -> RuntimeResult<Option<PathBuf>> {
    if let Some(resolved) = try_extensions(candidate, runtime).await? {
        return Ok(Some(resolved));
    }
    try_index_files(candidate, runtime).await
}
