//! Sprig CLI - bounded import graphs and smart selection from the terminal.
//!
//! Thin front-end over `sprig-graph`:
//!
//! - [`cli`] - clap argument definitions
//! - `commands` - `analyze`, `select`, `imports` and `check`
//! - [`error`] - CLI error type and miette rendering
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status messages and the progress spinner
//!
//! # Example
//!
//! ```rust,no_run
//! use sprig_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result, ResultExt};
