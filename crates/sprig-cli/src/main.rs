//! Sprig CLI entry point: argument parsing, logging setup and dispatch.

use clap::Parser;
use miette::Result;
use sprig_cli::{cli, commands, error, logger, ui};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = match args.command {
        cli::Command::Analyze(analyze_args) => commands::analyze_execute(analyze_args).await,
        cli::Command::Select(select_args) => commands::select_execute(select_args).await,
        cli::Command::Imports(imports_args) => commands::imports_execute(imports_args).await,
        cli::Command::Check(check_args) => commands::check_execute(check_args).await,
    };

    result.map_err(error::cli_error_to_miette)
}
