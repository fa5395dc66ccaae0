//! Command-line interface definition.
//!
//! - `sprig analyze` - build the bounded import graph of one file
//! - `sprig select` - merge several roots into one selection
//! - `sprig imports` - list the imports of one file
//! - `sprig check` - validate the smart-selection settings

mod commands;

use clap::Parser;

pub use commands::{
    AnalyzeArgs, CheckArgs, Command, EngineArgs, ImportsArgs, ProjectArgs, SelectArgs,
    SettingsArgs,
};

/// Sprig - bounded import graphs for JavaScript/TypeScript projects
#[derive(Parser, Debug)]
#[command(
    name = "sprig",
    version,
    about = "Bounded import graphs and smart selection for JavaScript/TypeScript",
    long_about = "Sprig follows the imports of a file breadth-first, up to a depth limit,\n\
                  and reports which project files it reaches. Several roots can be merged\n\
                  into one selection that keeps shared dependencies until the last root\n\
                  that needs them is removed."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}
