//! Select command: merge roots into one selection and print every change.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde_json::json;
use sprig_graph::{SelectionSession, SelectionUpdate};

use crate::cli::SelectArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::ui;

/// Execute the select command.
///
/// Roots are selected in order, then `--deselect` roots are removed. Each
/// step prints one JSON line: `{"action", "root", "update"}`.
pub async fn execute(args: SelectArgs) -> Result<()> {
    let project_root = utils::project_root(&args.project)?;
    let config = utils::load_settings(&project_root, &args.project, &args.settings, true)?;
    let analyzer = utils::build_analyzer(&project_root, &args.engine)?;
    let session = SelectionSession::new(Arc::new(analyzer), config);

    for root in &args.roots {
        match session.select(root).await? {
            Some(update) => emit("select", root, &update)?,
            None => ui::warning(&format!("Selection of {} was superseded", root.display())),
        }
    }

    for root in &args.deselect {
        let update = session.deselect(root)?;
        emit("deselect", root, &update)?;
    }

    let selected = session.orchestrator().len();
    ui::success(&format!(
        "{selected} files auto-selected for {} roots",
        session.orchestrator().roots().len()
    ));
    Ok(())
}

fn emit(action: &str, root: &Path, update: &SelectionUpdate) -> Result<()> {
    let line = json!({
        "action": action,
        "root": root,
        "update": update,
    });
    let line = serde_json::to_string(&line)
        .with_context(|| format!("failed to serialize the update for {}", root.display()))?;
    println!("{line}");
    Ok(())
}
