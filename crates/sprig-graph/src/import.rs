use serde::{Deserialize, Serialize};

/// Syntactic form an import was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportKind {
    /// `import x from "mod"`, `import "mod"`, `export * from "mod"`
    StaticImport,
    /// `const x = require("mod")`
    DynamicRequire,
    /// `import("mod")`, optionally awaited
    DynamicImport,
}

impl ImportKind {
    pub fn is_dynamic(self) -> bool {
        !matches!(self, ImportKind::StaticImport)
    }
}

impl std::fmt::Display for ImportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ImportKind::StaticImport => "static-import",
            ImportKind::DynamicRequire => "dynamic-require",
            ImportKind::DynamicImport => "dynamic-import",
        })
    }
}

/// One import occurrence found in a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStatement {
    /// Specifier text as written (`./bar`, `react`, `@/lib/x`).
    pub source: String,
    pub kind: ImportKind,
    /// Bound names in declaration order. Empty for require and dynamic forms.
    pub specifiers: Vec<String>,
    /// 1-based line of the occurrence.
    pub line: usize,
}

impl ImportStatement {
    pub fn new(source: impl Into<String>, kind: ImportKind, line: usize) -> Self {
        Self {
            source: source.into(),
            kind,
            specifiers: Vec::new(),
            line,
        }
    }

    pub fn with_specifiers(mut self, specifiers: Vec<String>) -> Self {
        self.specifiers = specifiers;
        self
    }

    /// Whether the specifier points into the project (`./x`, `../x`, `/x`).
    pub fn is_relative(&self) -> bool {
        self.source.starts_with('.') || self.source.starts_with('/')
    }
}
