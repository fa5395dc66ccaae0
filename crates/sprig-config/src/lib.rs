//! # sprig-config
//!
//! Smart-selection settings for the sprig dependency analyzer: the
//! [`SmartSelectConfig`] type, its [`DepthLimit`] sentinel, schema validation,
//! and layered loading (defaults, `sprig.toml` or `package.json#sprig`,
//! `SPRIG_*` environment variables).

pub mod config;
pub mod discovery;
pub mod error;
pub mod validation;

pub use config::{
    DEFAULT_MAX_DEPTH, DepthLimit, MAX_DEPTH_LEVELS, SmartSelectConfig, UNLIMITED_KEYWORD,
};
pub use discovery::{ConfigDiscovery, discover};
pub use error::{ConfigError, Result};
pub use validation::{ConfigValidator, FsValidator, SchemaValidator, validate_fs, validate_schema};
