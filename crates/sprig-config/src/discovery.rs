//! File-based config discovery and layered loading.
//!
//! Precedence, lowest first: built-in defaults, the discovered (or explicit)
//! config file, then `SPRIG_*` environment variables. Callers such as the CLI
//! merge their own overrides on top of the returned [`Figment`].

use std::fs;
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Json, Serialized, Toml};
use figment::Figment;
use serde_json::Value;

use crate::config::SmartSelectConfig;
use crate::error::{ConfigError, Result};

/// Name of the dedicated TOML config file.
pub const CONFIG_FILE_NAME: &str = "sprig.toml";

/// Field read from `package.json` when no dedicated file exists.
pub const PACKAGE_JSON_FIELD: &str = "sprig";

/// Prefix for environment overrides (`SPRIG_MAX_DEPTH=3`).
pub const ENV_PREFIX: &str = "SPRIG_";

/// File-based configuration discovery
///
/// # Example
///
/// ```no_run
/// use sprig_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// let config = discovery.load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    /// Create a new config discovery with a root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. TOML config: sprig.toml
    /// 2. package.json (sprig field)
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join(CONFIG_FILE_NAME);
        if toml_path.exists() {
            return Some(toml_path);
        }

        let pkg_path = self.root.join("package.json");
        if pkg_path.exists() {
            if let Ok(content) = fs::read_to_string(&pkg_path) {
                if let Ok(parsed) = serde_json::from_str::<Value>(&content) {
                    if parsed
                        .get(PACKAGE_JSON_FIELD)
                        .is_some_and(|v| !v.is_null())
                    {
                        return Some(pkg_path);
                    }
                }
            }
        }

        None
    }

    /// Build the layered figment: defaults, config file, environment.
    ///
    /// `explicit` takes the place of discovery; a missing explicit file is an
    /// error while a missing discovered file simply leaves the defaults.
    pub fn figment(&self, explicit: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::new().merge(Serialized::defaults(SmartSelectConfig::default()));

        let file = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound(path.to_path_buf()));
                }
                Some(path.to_path_buf())
            }
            None => self.find(),
        };

        if let Some(path) = file {
            tracing::debug!("Loading smart-select config from {}", path.display());
            figment = merge_file(figment, &path)?;
        }

        Ok(figment.merge(env_provider()))
    }

    /// Discover and extract the configuration.
    pub fn load(&self) -> Result<SmartSelectConfig> {
        self.load_from(None)
    }

    /// Extract the configuration from an explicit file (or discovery when `None`).
    pub fn load_from(&self, explicit: Option<&Path>) -> Result<SmartSelectConfig> {
        let config: SmartSelectConfig = self.figment(explicit)?.extract()?;
        tracing::trace!("Resolved smart-select config: {:?}", config);
        Ok(config)
    }
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    if file_name == "package.json" {
        return Ok(figment.merge(Serialized::defaults(read_package_json_field(path)?)));
    }

    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => Ok(figment.merge(Toml::file(path))),
        Some("json") => Ok(figment.merge(Json::file(path))),
        other => Err(ConfigError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

fn read_package_json_field(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    let parsed: Value = serde_json::from_str(&content).map_err(|e| ConfigError::InvalidValue {
        field: "package.json".to_string(),
        hint: Some(format!("Invalid JSON: {e}")),
    })?;

    match parsed.get(PACKAGE_JSON_FIELD) {
        Some(value) if value.is_object() => Ok(value.clone()),
        _ => Err(ConfigError::InvalidValue {
            field: PACKAGE_JSON_FIELD.to_string(),
            hint: Some("The 'sprig' field in package.json must be an object".to_string()),
        }),
    }
}

/// `SPRIG_MAX_DEPTH` arrives lowercased as `max_depth`; map it to `maxDepth`.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).map(|key| snake_to_camel(key.as_str()).into())
}

fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for ch in key.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Load configuration for a project root, honouring an explicit file if given.
pub fn discover(root: impl AsRef<Path>, explicit: Option<&Path>) -> Result<SmartSelectConfig> {
    ConfigDiscovery::new(root).load_from(explicit)
}
