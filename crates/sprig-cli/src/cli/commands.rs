use std::path::PathBuf;

use clap::{Args, Subcommand};
use sprig_config::DepthLimit;

/// Available sprig subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the import graph of one file
    ///
    /// Prints a summary of the files reached, grouped by depth, with any
    /// cycles and warnings. `--json` prints the full graph instead.
    Analyze(AnalyzeArgs),

    /// Select one or more roots and print the resulting selection changes
    ///
    /// Each root is analyzed and merged into one selection; `--deselect`
    /// then removes roots again. Every change is printed as one JSON line.
    Select(SelectArgs),

    /// Print the imports found in one file as JSON
    Imports(ImportsArgs),

    /// Validate the smart-selection settings
    Check(CheckArgs),
}

/// Where the project lives and which settings file to use.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Project root; imports never resolve outside it
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    pub project: PathBuf,

    /// Settings file (`.toml`, `.json` or `package.json`) instead of discovery
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Overrides for the discovered smart-selection settings.
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// How many import hops to follow, 0-20 or "unlimited"
    #[arg(short, long, value_name = "DEPTH")]
    pub depth: Option<DepthLimit>,

    /// Attach test files to every visited file
    #[arg(short, long)]
    pub tests: bool,

    /// Extra test-file pattern, e.g. "{name}.e2e.{ext}" (repeatable)
    #[arg(long = "test-pattern", value_name = "PATTERN")]
    pub test_patterns: Vec<String>,

    /// Exclude files matching a glob, e.g. "**/generated/**" (repeatable)
    #[arg(short, long = "exclude", value_name = "GLOB")]
    pub exclusions: Vec<String>,

    /// Follow files inside package-manager directories
    #[arg(long)]
    pub include_third_party: bool,

    /// Do not apply the project's .gitignore
    #[arg(long)]
    pub no_ignore: bool,
}

/// Engine limits that are not part of the user settings.
#[derive(Args, Debug, Clone, Default)]
pub struct EngineArgs {
    /// Stop after visiting this many files
    #[arg(long, value_name = "N")]
    pub max_files: Option<usize>,

    /// Wall-clock budget per analysis, in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Arguments for the analyze command
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// File to start from, relative to the project root
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    #[command(flatten)]
    pub project: ProjectArgs,

    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Print the graph as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the select command
#[derive(Args, Debug)]
pub struct SelectArgs {
    /// Files to select, in order
    #[arg(required = true, value_name = "ROOT")]
    pub roots: Vec<PathBuf>,

    /// Files to deselect after all roots were selected (repeatable)
    #[arg(long, value_name = "ROOT")]
    pub deselect: Vec<PathBuf>,

    #[command(flatten)]
    pub project: ProjectArgs,

    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Arguments for the imports command
#[derive(Args, Debug)]
pub struct ImportsArgs {
    /// File to scan
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    #[command(flatten)]
    pub settings: SettingsArgs,
}
