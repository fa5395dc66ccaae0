//! Root containment checks for traversal.
//!
//! Every path that becomes a graph node must sit inside the project root.
//! Checks are lexical: they run on cleaned paths and never touch the
//! filesystem, so they behave the same for any [`Runtime`](crate::runtime::Runtime).

use std::path::{Component, Path, PathBuf};

use path_clean::PathClean;
use thiserror::Error;

/// A path resolved outside the project root.
#[derive(Debug, Error)]
#[error("Path traversal detected: path '{path}' escapes from root '{root}'")]
pub struct PathTraversalError {
    /// The path that attempted to escape
    pub path: PathBuf,
    /// The project root it escaped from
    pub root: PathBuf,
}

/// Validate that an absolute, cleaned path stays within `root`.
pub fn validate_path_within_root(path: &Path, root: &Path) -> Result<(), PathTraversalError> {
    let escapes = match path.strip_prefix(root) {
        Ok(relative) => relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_))),
        Err(_) => true,
    };

    if escapes {
        return Err(PathTraversalError {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        });
    }
    Ok(())
}

/// Make `path` absolute against `root`, clean it, and check containment.
///
/// `./src/../src/index.ts` becomes `<root>/src/index.ts`; `../../etc/passwd`
/// is rejected.
pub fn normalize_and_validate_path(
    path: &Path,
    root: &Path,
) -> Result<PathBuf, PathTraversalError> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };

    let cleaned = joined.clean();
    validate_path_within_root(&cleaned, &root.to_path_buf().clean())?;
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inside_root_is_accepted() {
        let root = Path::new("/proj");
        assert!(validate_path_within_root(Path::new("/proj/src/index.ts"), root).is_ok());
        assert!(validate_path_within_root(Path::new("/proj"), root).is_ok());
    }

    #[test]
    fn sibling_with_shared_prefix_is_rejected() {
        let root = Path::new("/proj");
        let err = validate_path_within_root(Path::new("/project-b/a.ts"), root).unwrap_err();
        assert_eq!(err.path, PathBuf::from("/project-b/a.ts"));
    }

    #[test]
    fn uncleaned_parent_segments_are_rejected() {
        let root = Path::new("/proj");
        assert!(validate_path_within_root(Path::new("/proj/../etc/passwd"), root).is_err());
    }

    #[test]
    fn relative_paths_are_joined_and_cleaned() {
        let root = Path::new("/proj");
        let result =
            normalize_and_validate_path(Path::new("./src/../src/./index.ts"), root).unwrap();
        assert_eq!(result, PathBuf::from("/proj/src/index.ts"));
    }

    #[test]
    fn traversal_attempt_is_rejected() {
        let root = Path::new("/proj");
        assert!(normalize_and_validate_path(Path::new("../../../etc/passwd"), root).is_err());
        assert!(normalize_and_validate_path(Path::new("/proj/a/../../x.ts"), root).is_err());
    }
}
