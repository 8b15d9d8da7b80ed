//! Logging initialization for `envschema`.
//!
//! Events from this crate follow the verbosity flags; dependencies stay at
//! `warn` unless `ENVSCHEMA_LOG_LEVEL` says otherwise. Everything goes to
//! stderr so `check --format json` and `render` keep stdout clean.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

use crate::cli::args::{Cli, ColorChoice};

/// Environment variable holding an `EnvFilter` directive; overrides the
/// verbosity flags.
pub const LOG_LEVEL_ENV: &str = "ENVSCHEMA_LOG_LEVEL";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with optional ANSI colors.
    #[default]
    Human,
    /// One flat JSON object per event.
    Json,
}

/// Logging settings taken from the global CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Number of `-v` flags.
    pub verbosity: u8,
    /// `--quiet`: only errors are logged.
    pub quiet: bool,
    /// Color preference.
    pub color: ColorChoice,
}

impl From<&Cli> for LoggingConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            format: cli.log_format,
            verbosity: cli.verbose,
            quiet: cli.quiet,
            color: cli.color,
        }
    }
}

impl LoggingConfig {
    /// Level for this crate's events.
    #[must_use]
    pub const fn level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Default filter directive: dependencies at `warn` (or quieter), this
    /// crate at [`Self::level`].
    #[must_use]
    pub fn directive(&self) -> String {
        let level = self.level();
        let deps = if self.quiet { "error" } else { "warn" };
        format!("{deps},{}={level}", env!("CARGO_CRATE_NAME"))
    }

    /// Whether human output should carry ANSI colors.
    #[must_use]
    pub fn use_ansi(&self, stderr_is_terminal: bool, no_color: bool) -> bool {
        match self.color {
            ColorChoice::Auto => stderr_is_terminal && !no_color,
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

/// Installs the global subscriber. Later calls are no-ops.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new(config.directive()));
    let show_target = config.verbosity >= 2;

    match config.format {
        LogFormat::Human => {
            let ansi = config.use_ansi(
                std::io::stderr().is_terminal(),
                std::env::var_os("NO_COLOR").is_some(),
            );
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(ansi)
                .with_target(show_target)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogFormat::Json => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .flatten_event(true)
                .with_target(show_target)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
