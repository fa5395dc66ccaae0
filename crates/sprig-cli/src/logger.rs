//! Logging setup for the sprig CLI.
//!
//! Engine events are emitted with `tracing`; this module installs the
//! subscriber that renders them on stderr.
//!
//! ```rust,no_run
//! use sprig_cli::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("starting analysis");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "sprig_graph=debug,sprig_config=debug,sprig_cli=debug";
const QUIET_FILTER: &str = "sprig_graph=error,sprig_config=error,sprig_cli=error";
const DEFAULT_FILTER: &str = "sprig_graph=warn,sprig_config=warn,sprig_cli=info";

/// Choose the log filter for the given flags.
///
/// Precedence: `--verbose`, then `--quiet`, then `RUST_LOG`, then the default.
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Initialize the tracing subscriber. Call once, before any logging.
///
/// Logs go to stderr so JSON written to stdout stays machine-readable.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

/// Initialize the subscriber with a caller-supplied filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    // A second initialization (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

/// Whether colored output should be used on stdout.
///
/// `NO_COLOR` disables and `FORCE_COLOR` forces colors; otherwise the
/// terminal is asked.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stdout().features().colors_supported()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_wins_over_quiet() {
        let filter = filter_for(true, true);
        assert!(filter.to_string().contains("sprig_graph=debug"));
    }

    #[test]
    fn test_quiet_filter() {
        let filter = filter_for(false, true);
        assert!(filter.to_string().contains("sprig_graph=error"));
    }
}
