//! Settings loading and analyzer construction shared by the commands.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::providers::Serialized;
use serde_json::{Map, Value, json};
use sprig_config::{ConfigDiscovery, ConfigError, SmartSelectConfig};
use sprig_graph::{Analyzer, AnalyzerOptions};

use crate::cli::{EngineArgs, ProjectArgs, SettingsArgs};
use crate::error::{CliError, Result};

/// Absolute project root from `--project`.
pub fn project_root(project: &ProjectArgs) -> Result<PathBuf> {
    let root = std::path::absolute(&project.project)?;
    if !root.is_dir() {
        return Err(CliError::FileNotFound(root));
    }
    Ok(root)
}

/// Command-line overrides as a settings fragment with camelCase keys.
///
/// Only flags that were given appear, so unset flags never mask the file.
pub fn overrides(settings: &SettingsArgs, enable: bool) -> Result<Value> {
    let mut map = Map::new();
    if enable {
        map.insert("enabled".into(), json!(true));
    }
    if let Some(depth) = settings.depth {
        map.insert("maxDepth".into(), serde_json::to_value(depth)?);
    }
    if settings.tests {
        map.insert("includeTests".into(), json!(true));
    }
    if !settings.test_patterns.is_empty() {
        map.insert("testFilePatterns".into(), json!(settings.test_patterns));
    }
    if !settings.exclusions.is_empty() {
        map.insert("exclusionPatterns".into(), json!(settings.exclusions));
    }
    if settings.include_third_party {
        map.insert("excludeThirdParty".into(), json!(false));
    }
    if settings.no_ignore {
        map.insert("respectIgnoreFile".into(), json!(false));
    }
    Ok(Value::Object(map))
}

/// Load the layered settings and merge the command-line overrides last.
///
/// Pattern lists from flags are appended to the ones from the settings file.
/// `enable` turns smart selection on for commands that run an analysis on
/// request.
pub fn load_settings(
    root: &Path,
    project: &ProjectArgs,
    settings: &SettingsArgs,
    enable: bool,
) -> Result<SmartSelectConfig> {
    let figment = ConfigDiscovery::new(root).figment(project.config.as_deref())?;
    let config = figment
        .admerge(Serialized::defaults(overrides(settings, enable)?))
        .extract::<SmartSelectConfig>()
        .map_err(ConfigError::from)?;

    tracing::debug!(?config, "effective settings");
    Ok(config)
}

/// Analyzer over the native filesystem with the engine limits applied.
pub fn build_analyzer(root: &Path, engine: &EngineArgs) -> Result<Analyzer> {
    let mut options = AnalyzerOptions::default().with_project_root(root);
    if let Some(max) = engine.max_files {
        options = options.with_max_modules(Some(max));
    }
    if let Some(secs) = engine.timeout {
        options = options.with_timeout(Some(Duration::from_secs(secs)));
    }
    Ok(Analyzer::native(options)?)
}

/// `path` relative to `root` with forward slashes, for display.
pub fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
