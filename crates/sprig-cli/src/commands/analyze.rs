//! Analyze command: build and report the bounded graph of one file.

use std::time::Instant;

use anyhow::Context;
use console::style;
use sprig_graph::{AnalysisControl, DependencyGraph, compute_stats};

use crate::cli::AnalyzeArgs;
use crate::commands::utils::{self, display_path};
use crate::error::Result;
use crate::ui;

/// Execute the analyze command.
///
/// Human-readable output goes to stderr and stdout; with `--json` only the
/// serialized graph is written to stdout.
pub async fn execute(args: AnalyzeArgs) -> Result<()> {
    let project_root = utils::project_root(&args.project)?;
    let config = utils::load_settings(&project_root, &args.project, &args.settings, true)?;
    let analyzer = utils::build_analyzer(&project_root, &args.engine)?;

    let spinner = if args.json {
        ui::Spinner::hidden()
    } else {
        ui::Spinner::new(&format!("Analyzing {}...", args.root.display()))
    };
    let handle = spinner.handle();
    let control = AnalysisControl::new().with_progress(move |progress| {
        handle.set_message(format!(
            "{} files visited, {} queued",
            progress.visited, progress.queued
        ));
    });

    let started = Instant::now();
    let result = analyzer.analyze_with(&args.root, &config, &control).await;
    spinner.clear();
    let graph = result?;

    if args.json {
        let json = serde_json::to_string_pretty(&graph).context("failed to serialize the graph")?;
        println!("{json}");
        return Ok(());
    }

    print_graph(&graph, analyzer.project_root());
    for warning in &graph.warnings {
        ui::warning(warning);
    }

    let stats = compute_stats(&graph);
    let elapsed = ui::format_duration(started.elapsed());
    if graph.is_partial() {
        ui::warning(&format!("Partial result ({:?}): {stats} in {elapsed}", graph.status));
    } else {
        ui::success(&format!("{stats} in {elapsed}"));
    }
    Ok(())
}

fn print_graph(graph: &DependencyGraph, project_root: &std::path::Path) {
    for (depth, nodes) in graph.nodes_by_depth() {
        println!("{}", style(format!("depth {depth}")).bold());
        for node in nodes {
            let path = display_path(&node.path, project_root);
            if node.excluded {
                println!("  {} {}", path, style("(excluded)").dim());
            } else if node.error.is_some() {
                println!("  {} {}", path, style("(unreadable)").red());
            } else {
                println!("  {path}");
            }
            for test in &node.test_files {
                println!("    {} {}", style("test").cyan(), display_path(test, project_root));
            }
        }
    }

    for cycle in &graph.cycles {
        let members: Vec<String> = cycle.iter().map(|p| display_path(p, project_root)).collect();
        println!("{} {}", style("cycle").yellow(), members.join(" -> "));
    }
}
