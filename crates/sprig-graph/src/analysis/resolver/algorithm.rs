//! Core resolution algorithm for module resolution.
//!
//! This module implements the resolution steps the [`ModuleResolver`]
//! orchestrates: bare-specifier classification, alias substitution and
//! local (relative or root-anchored) resolution.
//!
//! [`ModuleResolver`]: super::ModuleResolver

use std::path::Path;

use path_clean::PathClean;

use super::aliases::AliasTable;
use super::extensions::resolve_candidate;
use crate::analysis::config::ResolveResult;
use crate::runtime::{Runtime, RuntimeResult};

/// Whether a specifier is bare (`react`, `@scope/pkg`, `node:fs`) rather than
/// a path into the project.
pub fn is_bare(specifier: &str) -> bool {
    !specifier.starts_with('.') && !specifier.starts_with('/')
}

/// Resolve a relative (`./x`, `../x`) or root-anchored (`/x`) specifier.
///
/// `/x` is looked up under `project_root`; an absolute path that already lies
/// inside the project is also accepted as-is.
pub async fn resolve_local(
    specifier: &str,
    from: &Path,
    project_root: &Path,
    runtime: &dyn Runtime,
) -> RuntimeResult<ResolveResult> {
    let candidates = if specifier.starts_with('/') {
        let as_is = Path::new(specifier).clean();
        let anchored = project_root.join(specifier.trim_start_matches('/')).clean();
        if as_is.starts_with(project_root) {
            vec![as_is, anchored]
        } else {
            vec![anchored]
        }
    } else {
        let base = from.parent().unwrap_or(Path::new(""));
        vec![base.join(specifier).clean()]
    };

    for candidate in &candidates {
        if let Some(resolved) = resolve_candidate(candidate, runtime).await? {
            return Ok(ResolveResult::Local(resolved));
        }
    }

    Ok(ResolveResult::Unresolved(specifier.to_string()))
}

/// Resolve a specifier through the alias table.
///
/// `Ok(None)` means resolution continues with the next step: no pattern
/// matched, or a path specifier matched a pattern whose targets do not
/// exist. A bare specifier whose alias targets are missing is `Unresolved`
/// rather than external.
pub async fn resolve_with_alias(
    specifier: &str,
    aliases: &AliasTable,
    runtime: &dyn Runtime,
) -> RuntimeResult<Option<ResolveResult>> {
    let candidates = aliases.candidates(specifier);
    if candidates.is_empty() {
        return Ok(None);
    }

    for candidate in &candidates {
        if let Some(resolved) = resolve_candidate(candidate, runtime).await? {
            return Ok(Some(ResolveResult::Local(resolved)));
        }
    }

    if is_bare(specifier) {
        Ok(Some(ResolveResult::Unresolved(specifier.to_string())))
    } else {
        Ok(None)
    }
}
