//! Terminal output: status messages on stderr and a progress spinner.
//!
//! Machine-readable output (JSON) always goes to stdout; everything in this
//! module writes to stderr so it never mixes with it.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::logger::should_use_colors;

/// Enable or disable colors for both stdout and stderr.
pub fn init_colors(no_color: bool) {
    let enabled = !no_color && should_use_colors();
    console::set_colors_enabled(enabled);
    console::set_colors_enabled_stderr(enabled);
}

pub fn success(message: &str) {
    eprintln!("{} {}", style("✓").green().bold(), message);
}

pub fn info(message: &str) {
    eprintln!("{} {}", style("ℹ").blue().bold(), message);
}

pub fn warning(message: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), style(message).yellow());
}

pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), style(message).red());
}

/// Spinner for analyses of unknown length.
///
/// Draws to stderr, and only when stderr is a terminal.
///
/// ```no_run
/// use sprig_cli::ui::Spinner;
///
/// let spinner = Spinner::new("Analyzing src/App.tsx...");
/// spinner.set_message("120 files visited");
/// spinner.finish("Analysis complete");
/// ```
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if !console::Term::stderr().is_term() {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_strings(&["◐", "◓", "◑", "◒", "●"]));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb }
    }

    /// A spinner that never draws (for `--quiet` and JSON output).
    pub fn hidden() -> Self {
        Self {
            pb: ProgressBar::hidden(),
        }
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.pb.set_message(message.into());
    }

    /// A cloneable handle for updating the message from callbacks.
    pub fn handle(&self) -> ProgressBar {
        self.pb.clone()
    }

    pub fn finish(&self, message: &str) {
        self.pb
            .finish_with_message(format!("{} {}", style("✓").green(), message));
    }

    /// Remove the spinner without leaving a line behind.
    pub fn clear(&self) {
        self.pb.finish_and_clear();
    }
}

/// Format a duration the way summaries print it (`850ms`, `1.24s`).
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{millis}ms")
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}
