//! User exclusion patterns.
//!
//! Patterns are globs matched against the `/`-separated path relative to the
//! project root. A pattern without a `/` matches at any level (`dist` covers
//! `dist/` and `pkg/dist/`), a trailing `/` means "everything below".
//! Patterns are screened for pathological shapes before they reach the glob
//! compiler, so a hostile config cannot make matching blow up.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

pub const MAX_PATTERN_LEN: usize = 512;
pub const MAX_GLOBSTARS: usize = 8;
pub const MAX_BRACE_DEPTH: usize = 3;
pub const MAX_ALTERNATIVES: usize = 32;

/// Why a pattern was refused.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("pattern is {len} bytes long (max: {max})")]
    TooLong { len: usize, max: usize },

    #[error("pattern has {count} '**' segments (max: {max})")]
    TooManyGlobstars { count: usize, max: usize },

    #[error("pattern nests braces {depth} deep (max: {max})")]
    BracesTooDeep { depth: usize, max: usize },

    #[error("pattern has {count} alternatives (max: {max})")]
    TooManyAlternatives { count: usize, max: usize },

    #[error("pattern has unbalanced braces")]
    UnbalancedBraces,

    #[error("invalid glob: {0}")]
    Invalid(#[from] globset::Error),
}

/// Reject patterns whose shape could make matching expensive.
pub fn check_pattern(pattern: &str) -> Result<(), PatternError> {
    if pattern.len() > MAX_PATTERN_LEN {
        return Err(PatternError::TooLong {
            len: pattern.len(),
            max: MAX_PATTERN_LEN,
        });
    }

    let globstars = pattern.matches("**").count();
    if globstars > MAX_GLOBSTARS {
        return Err(PatternError::TooManyGlobstars {
            count: globstars,
            max: MAX_GLOBSTARS,
        });
    }

    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut alternatives = 0usize;
    for c in pattern.chars() {
        match c {
            '{' => {
                depth += 1;
                deepest = deepest.max(depth);
                alternatives += 1;
            }
            '}' => depth = depth.checked_sub(1).ok_or(PatternError::UnbalancedBraces)?,
            ',' if depth > 0 => alternatives += 1,
            _ => {}
        }
    }
    if depth != 0 {
        return Err(PatternError::UnbalancedBraces);
    }
    if deepest > MAX_BRACE_DEPTH {
        return Err(PatternError::BracesTooDeep {
            depth: deepest,
            max: MAX_BRACE_DEPTH,
        });
    }
    if alternatives > MAX_ALTERNATIVES {
        return Err(PatternError::TooManyAlternatives {
            count: alternatives,
            max: MAX_ALTERNATIVES,
        });
    }
    Ok(())
}

/// Expand a user pattern into the globs actually compiled.
pub fn expand_pattern(pattern: &str) -> Vec<String> {
    let trimmed = pattern.trim();
    let trimmed = trimmed.strip_prefix("./").unwrap_or(trimmed);
    let anchored = trimmed.starts_with('/');
    let trimmed = trimmed.trim_start_matches('/');

    let (body, dir_only) = match trimmed.strip_suffix('/') {
        Some(body) => (body, true),
        None => (trimmed, false),
    };

    let body = if anchored || body.contains('/') || body.starts_with("**") {
        body.to_string()
    } else {
        format!("**/{body}")
    };

    if dir_only || body.ends_with("/**") {
        return vec![if body.ends_with("/**") { body } else { format!("{body}/**") }];
    }
    vec![body.clone(), format!("{body}/**")]
}

/// Compiled user exclusion patterns.
#[derive(Debug, Clone)]
pub struct PatternSet {
    set: GlobSet,
    patterns: Vec<String>,
}

impl Default for PatternSet {
    fn default() -> Self {
        Self {
            set: GlobSet::empty(),
            patterns: Vec::new(),
        }
    }
}

impl PatternSet {
    /// Compile `patterns`, returning refused patterns alongside the set.
    pub fn compile(patterns: &[String]) -> (Self, Vec<(String, PatternError)>) {
        let mut builder = GlobSetBuilder::new();
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();

        for pattern in patterns {
            if let Err(e) = check_pattern(pattern) {
                rejected.push((pattern.clone(), e));
                continue;
            }
            let globs: Result<Vec<_>, _> = expand_pattern(pattern)
                .iter()
                .map(|g| GlobBuilder::new(g).literal_separator(true).build())
                .collect();
            match globs {
                Ok(globs) => {
                    for glob in globs {
                        builder.add(glob);
                    }
                    accepted.push(pattern.clone());
                }
                Err(e) => rejected.push((pattern.clone(), PatternError::Invalid(e))),
            }
        }

        let set = builder.build().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to build exclusion pattern set");
            GlobSet::empty()
        });
        (
            Self {
                set,
                patterns: accepted,
            },
            rejected,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Accepted patterns as written.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Match a `/`-separated path relative to the project root.
    pub fn is_match(&self, relative: &str) -> bool {
        !self.patterns.is_empty() && self.set.is_match(relative)
    }
}
