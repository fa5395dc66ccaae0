//! Regex-based import scanner for JavaScript and TypeScript sources.
//!
//! The scanner works on comment-stripped text and visits every `import`,
//! `export` and `require` keyword once. At each keyword it tries the forms
//! that can start there, anchored at the keyword. A form that matches
//! textually but has a malformed binding clause (unbalanced braces, stray
//! tokens) is skipped, and scanning resumes at the next keyword.

use std::sync::LazyLock;

use memchr::memmem;
use regex::Regex;

use super::ImportExtractor;
use super::comments::strip_comments;
use crate::import::{ImportKind, ImportStatement};

/// `import <clause> from "mod"` and `import type <clause> from "mod"`.
static STATIC_FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^import\s+(?:type\s+)?([\w$*{}\s,]+?)\s*\bfrom\s*["']([^"'\n]+)["']"#)
        .expect("static import regex")
});

/// `import "mod"` (side-effect import).
static SIDE_EFFECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^import\s*["']([^"'\n]+)["']"#).expect("side-effect import regex")
});

/// `import("mod")`, with an optional options argument.
static DYNAMIC_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^import\s*\(\s*(?:["']([^"'\n]+)["']|`([^`$\n]+)`)\s*[,)]"#)
        .expect("dynamic import regex")
});

/// `export * from "mod"`, `export * as ns from "mod"`, `export { a } from "mod"`.
static EXPORT_FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^export\s+(?:type\s+)?(\*(?:\s+as\s+[\w$]+)?|\{[^{}]*\})\s*from\s*["']([^"'\n]+)["']"#,
    )
    .expect("re-export regex")
});

/// `require("mod")`.
static REQUIRE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^require\s*\(\s*["']([^"'\n]+)["']\s*\)"#).expect("require regex")
});

const KEYWORDS: [&str; 3] = ["import", "export", "require"];

/// Import scanner for `.ts`, `.tsx`, `.js`, `.jsx`, `.mjs`, `.cjs` and friends.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptExtractor;

impl ImportExtractor for ScriptExtractor {
    fn name(&self) -> &'static str {
        "script"
    }

    fn extract(&self, content: &str) -> Vec<ImportStatement> {
        if !might_contain_imports(content) {
            return Vec::new();
        }

        let text = strip_comments(content);
        let lines = LineIndex::new(&text);
        let mut found: Vec<(usize, ImportStatement)> = Vec::new();
        let mut skipped = 0usize;

        for keyword in KEYWORDS {
            for pos in memmem::find_iter(text.as_bytes(), keyword.as_bytes()) {
                if !is_keyword_at(&text, pos, keyword.len()) {
                    continue;
                }
                match scan_at(&text[pos..], keyword) {
                    Scan::Found(statement) => {
                        let line = lines.line_of(pos);
                        found.push((pos, ImportStatement { line, ..statement }));
                    }
                    Scan::Malformed => skipped += 1,
                    Scan::NoMatch => {}
                }
            }
        }

        if skipped > 0 {
            tracing::debug!(skipped, "skipped malformed import occurrences");
        }

        found.sort_by_key(|(pos, _)| *pos);
        found.into_iter().map(|(_, s)| s).collect()
    }
}

/// Cheap substring check that lets import-free files skip the regex pass.
fn might_contain_imports(content: &str) -> bool {
    let bytes = content.as_bytes();
    ["import", "require", "from"]
        .iter()
        .any(|needle| memmem::find(bytes, needle.as_bytes()).is_some())
}

enum Scan {
    Found(ImportStatement),
    Malformed,
    NoMatch,
}

fn scan_at(rest: &str, keyword: &str) -> Scan {
    match keyword {
        "import" => {
            if let Some(caps) = STATIC_FROM.captures(rest) {
                return match parse_clause(&caps[1]) {
                    Some(names) => Scan::Found(
                        ImportStatement::new(&caps[2], ImportKind::StaticImport, 0)
                            .with_specifiers(names),
                    ),
                    None => Scan::Malformed,
                };
            }
            if let Some(caps) = SIDE_EFFECT.captures(rest) {
                return Scan::Found(ImportStatement::new(
                    &caps[1],
                    ImportKind::StaticImport,
                    0,
                ));
            }
            if let Some(caps) = DYNAMIC_IMPORT.captures(rest) {
                let source = caps.get(1).or_else(|| caps.get(2));
                return match source {
                    Some(m) => Scan::Found(ImportStatement::new(
                        m.as_str(),
                        ImportKind::DynamicImport,
                        0,
                    )),
                    None => Scan::Malformed,
                };
            }
            Scan::NoMatch
        }
        "export" => match EXPORT_FROM.captures(rest) {
            Some(caps) => match parse_reexport_clause(&caps[1]) {
                Some(names) => Scan::Found(
                    ImportStatement::new(&caps[2], ImportKind::StaticImport, 0)
                        .with_specifiers(names),
                ),
                None => Scan::Malformed,
            },
            None => Scan::NoMatch,
        },
        "require" => match REQUIRE.captures(rest) {
            Some(caps) => Scan::Found(ImportStatement::new(
                &caps[1],
                ImportKind::DynamicRequire,
                0,
            )),
            None => Scan::NoMatch,
        },
        _ => Scan::NoMatch,
    }
}

/// Whether `text[pos..pos + len]` is a standalone keyword, not part of a
/// longer identifier or a member access like `loader.import(...)`.
fn is_keyword_at(text: &str, pos: usize, len: usize) -> bool {
    let before = text[..pos].chars().next_back();
    let after = text[pos + len..].chars().next();
    let standalone_before = before.is_none_or(|c| !is_ident_char(c) && c != '.');
    let standalone_after = after.is_none_or(|c| !is_ident_char(c));
    standalone_before && standalone_after
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(is_ident_char)
}

/// Parse an import clause into its bound local names.
///
/// Accepts `def`, `* as ns`, `{ a, b as c, type D }` and a default binding
/// followed by either of the latter two. Returns `None` when malformed.
fn parse_clause(clause: &str) -> Option<Vec<String>> {
    let mut names = Vec::new();
    let mut rest = clause.trim();

    if rest.starts_with(|c: char| c != '{' && c != '*') {
        let end = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
        let default = &rest[..end];
        if !is_identifier(default) {
            return None;
        }
        names.push(default.to_string());
        rest = rest[end..].trim_start();
        if rest.is_empty() {
            return Some(names);
        }
        rest = rest.strip_prefix(',')?.trim_start();
    }

    if let Some(namespace) = rest.strip_prefix('*') {
        let alias = namespace.trim_start().strip_prefix("as")?.trim();
        if !is_identifier(alias) {
            return None;
        }
        names.push(alias.to_string());
        return Some(names);
    }

    names.extend(parse_braces(rest)?);
    Some(names)
}

/// Parse the clause of `export ... from`, returning the exported names.
fn parse_reexport_clause(clause: &str) -> Option<Vec<String>> {
    let clause = clause.trim();
    if let Some(namespace) = clause.strip_prefix('*') {
        let namespace = namespace.trim();
        if namespace.is_empty() {
            return Some(Vec::new());
        }
        let alias = namespace.strip_prefix("as")?.trim();
        return is_identifier(alias).then(|| vec![alias.to_string()]);
    }
    parse_braces(clause)
}

/// `{ a, b as c, type D }` → `["a", "c", "D"]`.
fn parse_braces(rest: &str) -> Option<Vec<String>> {
    let inner = rest.strip_prefix('{')?;
    let close = inner.find('}')?;
    if !inner[close + 1..].trim().is_empty() || inner[..close].contains('{') {
        return None;
    }

    let mut names = Vec::new();
    for part in inner[..close].split(',') {
        let words: Vec<&str> = part.split_whitespace().collect();
        let name = match words.as_slice() {
            [] => continue,
            [name] | ["type", name] => *name,
            [_, "as", alias] | ["type", _, "as", alias] => *alias,
            _ => return None,
        };
        if !is_identifier(name) {
            return None;
        }
        names.push(name.to_string());
    }
    Some(names)
}

/// Byte offset to 1-based line lookup.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(memchr::memchr_iter(b'\n', text.as_bytes()).map(|i| i + 1));
        Self { starts }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(content: &str) -> Vec<ImportStatement> {
        ScriptExtractor.extract(content)
    }

    fn sources(content: &str) -> Vec<String> {
        extract(content).into_iter().map(|s| s.source).collect()
    }

    #[test]
    fn comment_import_static_and_require() {
        let content = "// import nope from './nope'\nimport { foo } from './bar'\nconst baz = require('./baz')\n";
        let imports = extract(content);
        assert_eq!(imports.len(), 2);

        assert_eq!(imports[0].source, "./bar");
        assert_eq!(imports[0].kind, ImportKind::StaticImport);
        assert_eq!(imports[0].specifiers, vec!["foo"]);
        assert_eq!(imports[0].line, 2);

        assert_eq!(imports[1].source, "./baz");
        assert_eq!(imports[1].kind, ImportKind::DynamicRequire);
        assert!(imports[1].specifiers.is_empty());
        assert_eq!(imports[1].line, 3);
    }

    #[test]
    fn awaited_dynamic_import() {
        let imports = extract("async function load() {\n  const m = await import('./lazy');\n}");
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].source, "./lazy");
        assert_eq!(imports[0].kind, ImportKind::DynamicImport);
        assert_eq!(imports[0].line, 2);
    }

    #[test]
    fn no_keywords_short_circuits() {
        assert!(extract("const x = 1;\nexport default x;").is_empty());
        assert!(extract("").is_empty());
    }

    #[test]
    fn default_namespace_and_named_bindings() {
        let imports = extract(
            "import React, { useState, useEffect as ue } from 'react'\nimport * as path from \"node:path\"",
        );
        assert_eq!(imports[0].specifiers, vec!["React", "useState", "ue"]);
        assert_eq!(imports[1].specifiers, vec!["path"]);
        assert_eq!(imports[1].source, "node:path");
    }

    #[test]
    fn multiline_named_import() {
        let imports = extract("import {\n  a,\n  b,\n} from './ab'\n");
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].specifiers, vec!["a", "b"]);
        assert_eq!(imports[0].line, 1);
    }

    #[test]
    fn type_only_imports_count_as_static() {
        let imports = extract("import type { Props } from './types'\nimport { type Ref, x } from './mixed'");
        assert_eq!(imports.len(), 2);
        assert_eq!(imports[0].kind, ImportKind::StaticImport);
        assert_eq!(imports[0].specifiers, vec!["Props"]);
        assert_eq!(imports[1].specifiers, vec!["Ref", "x"]);
    }

    #[test]
    fn side_effect_import() {
        let imports = extract("import './polyfills'\nimport \"./styles.css\";");
        assert_eq!(sources("import './polyfills'"), vec!["./polyfills"]);
        assert_eq!(imports.len(), 2);
        assert!(imports.iter().all(|i| i.specifiers.is_empty()));
    }

    #[test]
    fn re_exports_are_static_imports() {
        let imports = extract(
            "export * from './all'\nexport * as ns from './ns'\nexport { a, b as c } from './named'\nexport const local = 1;",
        );
        assert_eq!(imports.len(), 3);
        assert!(imports.iter().all(|i| i.kind == ImportKind::StaticImport));
        assert!(imports[0].specifiers.is_empty());
        assert_eq!(imports[1].specifiers, vec!["ns"]);
        assert_eq!(imports[2].specifiers, vec!["a", "c"]);
    }

    #[test]
    fn malformed_occurrence_is_skipped() {
        let content = "import { foo from './broken'\nimport real from './real'\n";
        let imports = extract(content);
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].source, "./real");
        assert_eq!(imports[0].line, 2);
    }

    #[test]
    fn block_commented_imports_are_ignored() {
        let content = "/*\nimport a from './a'\n*/\nimport b from './b'";
        assert_eq!(sources(content), vec!["./b"]);
        assert_eq!(extract(content)[0].line, 4);
    }

    #[test]
    fn member_calls_are_not_imports() {
        assert!(extract("loader.import('./x'); context.require('./y')").is_empty());
        assert!(extract("const reimport = 1; myrequire('./z')").is_empty());
    }

    #[test]
    fn source_order_across_kinds() {
        let content = "const a = require('./a')\nimport b from './b'\nexport * from './c'\nimport('./d')";
        assert_eq!(sources(content), vec!["./a", "./b", "./c", "./d"]);
    }

    #[test]
    fn template_literal_without_interpolation() {
        assert_eq!(sources("import(`./page`)"), vec!["./page"]);
        assert!(extract("import(`./pages/${name}`)").is_empty());
    }

    #[test]
    fn line_index_is_one_based() {
        let index = LineIndex::new("a\nb\nc");
        assert_eq!(index.line_of(0), 1);
        assert_eq!(index.line_of(2), 2);
        assert_eq!(index.line_of(4), 3);
    }
}
