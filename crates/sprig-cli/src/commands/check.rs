//! Check command: validate the smart-selection settings without analyzing.

use sprig_config::{ConfigDiscovery, ConfigValidator, FsValidator};

use crate::cli::CheckArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::ui;

/// Execute the check command.
///
/// Loads the layered settings exactly as `analyze` would (without forcing
/// `enabled`), validates them, and prints the effective settings as JSON.
pub async fn execute(args: CheckArgs) -> Result<()> {
    let project_root = utils::project_root(&args.project)?;

    let source = args
        .project
        .config
        .clone()
        .or_else(|| ConfigDiscovery::new(&project_root).find());
    match &source {
        Some(path) => ui::info(&format!("Using settings from {}", path.display())),
        None => ui::info("No settings file found, using defaults"),
    }

    let config = utils::load_settings(&project_root, &args.project, &args.settings, false)?;
    FsValidator::new(&project_root).validate(&config)?;

    if !config.enabled {
        ui::warning("Smart selection is disabled; analyze and select enable it per run");
    }

    println!("{}", serde_json::to_string_pretty(&config)?);
    ui::success("Settings are valid");
    Ok(())
}
