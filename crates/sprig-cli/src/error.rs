//! Error handling for the sprig CLI.
//!
//! Commands return [`CliError`]; `main` renders it through
//! [`cli_error_to_miette`]. Engine and configuration errors convert
//! automatically via `#[from]`, and [`ResultExt`] attaches paths and hints.

use std::path::PathBuf;

use miette::Report;
use sprig_config::ConfigError;
use sprig_graph::AnalyzeError;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Settings could not be loaded or failed validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The engine refused the request
    #[error("Analysis error: {0}")]
    Analyze(#[from] AnalyzeError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failures carried as `anyhow` chains from command internals
    #[error(transparent)]
    Other(#[from] anyhow::Error),

    #[error("{0}")]
    Custom(String),
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for enriching errors with paths and hints.
pub trait ResultExt<T> {
    /// Turn a not-found I/O error into [`CliError::FileNotFound`] for `path`.
    ///
    /// ```rust,no_run
    /// # use std::path::Path;
    /// # use sprig_cli::error::{Result, ResultExt};
    /// # fn run() -> Result<()> {
    /// let path = Path::new("src/missing.ts");
    /// std::fs::read_to_string(path).with_path(path)?;
    /// # Ok(())
    /// # }
    /// ```
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;

    /// Append a `Hint:` line to the error message.
    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T>;

    /// Prefix the error message.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| match e.into() {
            CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                CliError::FileNotFound(path.as_ref().to_path_buf())
            }
            other => other,
        })
    }

    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{err}\n\nHint: {hint}"))
        })
    }

    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{msg}: {err}"))
        })
    }
}

/// Convert a [`CliError`] into a miette report with an actionable help line.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(ConfigError::DepthOutOfRange { value, max }) => miette::miette!(
            help = format!("Use a depth between 0 and {max}, or \"unlimited\""),
            "maxDepth {value} is out of range"
        ),
        CliError::Config(e) => miette::miette!(
            help = "Check sprig.toml, the \"sprig\" field of package.json and SPRIG_* variables",
            "Configuration error: {e}"
        ),
        CliError::Analyze(AnalyzeError::RootOutsideProject { path, project_root }) => {
            miette::miette!(
                help = format!(
                    "{} is not under {}; pass --project to choose another project root",
                    path.display(),
                    project_root.display()
                ),
                "Root file is outside the project root"
            )
        }
        CliError::Analyze(AnalyzeError::Disabled) => miette::miette!(
            help = "Set enabled = true in sprig.toml",
            "Smart selection is disabled"
        ),
        _ => miette::miette!("{}", err),
    }
}
