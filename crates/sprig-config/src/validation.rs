//! Pluggable config validation strategies
//!
//! Schema validation runs before any traversal starts; a config that fails it
//! is rejected synchronously instead of producing a partial graph.

use std::path::Path;

use crate::config::{DepthLimit, MAX_DEPTH_LEVELS, SmartSelectConfig};
use crate::error::{ConfigError, Result};

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    /// Validate smart-selection settings
    fn validate(&self, config: &SmartSelectConfig) -> Result<()>;
}

/// Schema-only validation (no filesystem checks)
///
/// # Example
///
/// ```
/// use sprig_config::{SmartSelectConfig, SchemaValidator, ConfigValidator};
///
/// let config = SmartSelectConfig::default().with_max_depth(3);
/// SchemaValidator.validate(&config).unwrap();
/// ```
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, config: &SmartSelectConfig) -> Result<()> {
        if let DepthLimit::Levels(value) = config.max_depth {
            if value > MAX_DEPTH_LEVELS {
                return Err(ConfigError::DepthOutOfRange {
                    value,
                    max: MAX_DEPTH_LEVELS,
                });
            }
        }

        for pattern in &config.exclusion_patterns {
            if pattern.trim().is_empty() {
                return Err(ConfigError::SchemaValidation {
                    message: "exclusion patterns cannot be empty".to_string(),
                    hint: Some("Remove empty strings from 'exclusionPatterns'".to_string()),
                });
            }
        }

        for pattern in &config.test_file_patterns {
            if pattern.trim().is_empty() {
                return Err(ConfigError::SchemaValidation {
                    message: "test file patterns cannot be empty".to_string(),
                    hint: Some("Remove empty strings from 'testFilePatterns'".to_string()),
                });
            }
        }

        Ok(())
    }
}

/// Filesystem validator (for CLI use)
///
/// Runs schema validation, then checks that the project root exists.
pub struct FsValidator {
    root: std::path::PathBuf,
}

impl FsValidator {
    /// Create a new filesystem validator with a root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ConfigValidator for FsValidator {
    fn validate(&self, config: &SmartSelectConfig) -> Result<()> {
        SchemaValidator.validate(config)?;

        if !self.root.is_dir() {
            return Err(ConfigError::FileNotFound(self.root.clone()));
        }

        Ok(())
    }
}

/// Convenience function for schema-only validation
pub fn validate_schema(config: &SmartSelectConfig) -> Result<()> {
    SchemaValidator.validate(config)
}

/// Convenience function for filesystem validation
pub fn validate_fs(config: &SmartSelectConfig, root: impl AsRef<Path>) -> Result<()> {
    FsValidator::new(root).validate(config)
}
