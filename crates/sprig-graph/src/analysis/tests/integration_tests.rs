//! Analyzer-level behaviour: caching, configuration errors, aliases.

use std::fs;
use std::time::{Duration, SystemTime};

use super::test_helpers::*;
use crate::analysis::{AnalyzeError, AnalyzerOptions, compute_stats};
use sprig_config::{ConfigError, SmartSelectConfig};
use tempfile::TempDir;

#[tokio::test]
async fn test_repeated_analysis_is_idempotent_and_cached() {
    let temp = TempDir::new().unwrap();
    let root = create_chain_project(&temp);
    let (analyzer, runtime) = analyzer_for(&root);

    let first = analyzer.analyze("src/a.ts", &config(5)).await.unwrap();
    let reads = runtime.reads();
    let second = analyzer.analyze("src/a.ts", &config(5)).await.unwrap();

    assert_eq!(depths(&first, &root), depths(&second, &root));
    assert_eq!(first.edges, second.edges);
    assert_eq!(runtime.reads(), reads, "second run is served from the cache");

    let stats = analyzer.cache_stats();
    assert_eq!(stats.entries, 5);
    assert_eq!(stats.hits, 5);
}

#[tokio::test]
async fn test_modified_file_is_re_extracted() {
    let temp = TempDir::new().unwrap();
    let root = create_test_project(
        &temp,
        &[
            ("a.ts", "import { b } from './b';"),
            ("b.ts", ""),
            ("c.ts", ""),
        ],
    );
    let (analyzer, _) = analyzer_for(&root);

    let before = analyzer.analyze("a.ts", &config(5)).await.unwrap();
    assert_eq!(edges(&before, &root), vec!["a.ts -> b.ts"]);

    let b = root.join("b.ts");
    fs::write(&b, "import { c } from './c';").unwrap();
    let file = fs::File::options().write(true).open(&b).unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(60))
        .unwrap();

    let after = analyzer.analyze("a.ts", &config(5)).await.unwrap();
    assert_eq!(edges(&after, &root), vec!["a.ts -> b.ts", "b.ts -> c.ts"]);
}

#[tokio::test]
async fn test_reset_caches_forces_rereads() {
    let temp = TempDir::new().unwrap();
    let root = create_test_project(&temp, &[("a.ts", "")]);
    let (analyzer, runtime) = analyzer_for(&root);

    analyzer.analyze("a.ts", &config(1)).await.unwrap();
    analyzer.reset_caches();
    assert_eq!(analyzer.cache_stats().entries, 0);

    analyzer.analyze("a.ts", &config(1)).await.unwrap();
    assert_eq!(runtime.reads(), 2);
}

#[tokio::test]
async fn test_disabled_config_is_rejected() {
    let temp = TempDir::new().unwrap();
    let root = create_test_project(&temp, &[("a.ts", "")]);
    let (analyzer, runtime) = analyzer_for(&root);

    let result = analyzer.analyze("a.ts", &SmartSelectConfig::default()).await;

    assert!(matches!(result, Err(AnalyzeError::Disabled)));
    assert_eq!(runtime.reads(), 0);
}

#[tokio::test]
async fn test_out_of_range_depth_is_rejected_before_traversal() {
    let temp = TempDir::new().unwrap();
    let root = create_test_project(&temp, &[("a.ts", "")]);
    let (analyzer, runtime) = analyzer_for(&root);

    let result = analyzer.analyze("a.ts", &config(25)).await;

    assert!(matches!(
        result,
        Err(AnalyzeError::InvalidConfig(ConfigError::DepthOutOfRange { value: 25, .. }))
    ));
    assert_eq!(runtime.reads(), 0);
}

#[tokio::test]
async fn test_root_outside_project_is_rejected() {
    let temp = TempDir::new().unwrap();
    let root = create_test_project(&temp, &[("a.ts", "")]);
    let (analyzer, _) = analyzer_for(&root);

    let result = analyzer.analyze("../elsewhere.ts", &config(1)).await;

    assert!(matches!(result, Err(AnalyzeError::RootOutsideProject { .. })));
}

#[tokio::test]
async fn test_absolute_root_inside_project_is_accepted() {
    let temp = TempDir::new().unwrap();
    let root = create_test_project(&temp, &[("src/a.ts", "")]);
    let (analyzer, _) = analyzer_for(&root);

    let graph = analyzer
        .analyze(root.join("src/./a.ts"), &config(1))
        .await
        .unwrap();

    assert_eq!(graph.root(), Some(root.join("src/a.ts").as_path()));
}

#[tokio::test]
async fn test_tsconfig_aliases_resolve_before_external() {
    let temp = TempDir::new().unwrap();
    let root = create_test_project(
        &temp,
        &[
            (
                "tsconfig.json",
                r#"{
                    // path mapping
                    "compilerOptions": {
                        "baseUrl": ".",
                        "paths": { "@/*": ["src/*"], },
                    },
                }"#,
            ),
            ("src/app.ts", "import { util } from '@/lib/util';\nimport React from 'react';"),
            ("src/lib/util.ts", ""),
        ],
    );
    let (analyzer, _) = analyzer_for(&root);

    let graph = analyzer.analyze("src/app.ts", &config(5)).await.unwrap();

    assert_eq!(edges(&graph, &root), vec!["src/app.ts -> src/lib/util.ts"]);
}

#[tokio::test]
async fn test_explicit_alias_option() {
    let temp = TempDir::new().unwrap();
    let root = create_test_project(
        &temp,
        &[
            ("app.ts", "import { theme } from '~theme';"),
            ("styles/theme.ts", ""),
        ],
    );
    let (analyzer, _) = analyzer_with(
        &root,
        AnalyzerOptions::default().with_path_alias("~theme", "styles/theme"),
    );

    let graph = analyzer.analyze("app.ts", &config(5)).await.unwrap();

    assert_eq!(edges(&graph, &root), vec!["app.ts -> styles/theme.ts"]);
}

#[tokio::test]
async fn test_rejected_exclusion_pattern_becomes_warning() {
    let temp = TempDir::new().unwrap();
    let root = create_test_project(&temp, &[("a.ts", "")]);
    let (analyzer, _) = analyzer_for(&root);

    let config = config(1).with_exclusions(["{a,{b,{c,{d,e}}}}"]);
    let graph = analyzer.analyze("a.ts", &config).await.unwrap();

    assert_eq!(graph.warnings.len(), 1);
    assert!(graph.warnings[0].contains("rejected exclusion pattern"));
}

#[tokio::test]
async fn test_statistics_summarize_graph() {
    let temp = TempDir::new().unwrap();
    let root = create_chain_project(&temp);
    let (analyzer, _) = analyzer_for(&root);

    let graph = analyzer.analyze("src/a.ts", &config(3)).await.unwrap();
    let stats = compute_stats(&graph);

    assert_eq!(stats.nodes, 4);
    assert_eq!(stats.edges, 3);
    assert_eq!(stats.max_depth, 3);
    assert_eq!(stats.cycles, 0);
}
