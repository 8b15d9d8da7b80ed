//! CLI argument definitions
//!
//! All Clap derive structs for `envschema` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::observability::LogFormat;
use crate::plugin::ValidateOn;

// ============================================================================
// Root CLI
// ============================================================================

/// Validate prefixed environment variables against a schema.
#[derive(Parser, Debug)]
#[command(name = "envschema", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "ENVSCHEMA_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true)]
    pub log_format: LogFormat,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate the environment and print the resulting configuration.
    Check(CheckArgs),

    /// Print the virtual module source for the validated environment.
    Render(RenderArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Pipeline Commands
// ============================================================================

/// Where the environment comes from; shared by `check` and `render`.
#[derive(Args, Debug, Clone)]
pub struct EnvArgs {
    /// Path to the YAML or JSON schema file.
    pub schema: PathBuf,

    /// Build mode selecting `.env.<mode>` files.
    #[arg(short, long, default_value = "development", env = "ENVSCHEMA_MODE")]
    pub mode: String,

    /// Directory containing `.env` files.
    #[arg(short, long, default_value = ".", env = "ENVSCHEMA_DIR")]
    pub dir: PathBuf,

    /// Override the schema file's validation timing.
    #[arg(long)]
    pub validate_on: Option<ValidateOn>,
}

/// Arguments for `check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Environment source.
    #[command(flatten)]
    pub env: EnvArgs,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Environment source.
    #[command(flatten)]
    pub env: EnvArgs,

    /// Write the module to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,

    /// Write the script to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_check_defaults() {
        let cli = Cli::try_parse_from(["envschema", "check", "env.yaml"]).unwrap();
        let Commands::Check(args) = cli.command else {
            panic!("Expected CheckArgs");
        };
        assert_eq!(args.env.schema, PathBuf::from("env.yaml"));
        assert_eq!(args.env.mode, "development");
        assert_eq!(args.env.dir, PathBuf::from("."));
        assert_eq!(args.env.validate_on, None);
        assert_eq!(args.format, OutputFormat::Human);
    }

    #[test]
    fn test_check_requires_schema() {
        assert!(Cli::try_parse_from(["envschema", "check"]).is_err());
    }

    #[test]
    fn test_render_options() {
        let cli = Cli::try_parse_from([
            "envschema",
            "render",
            "env.yaml",
            "--mode",
            "production",
            "--dir",
            "config",
            "--validate-on",
            "load",
            "--output",
            "env.js",
        ])
        .unwrap();
        let Commands::Render(args) = cli.command else {
            panic!("Expected RenderArgs");
        };
        assert_eq!(args.env.mode, "production");
        assert_eq!(args.env.dir, PathBuf::from("config"));
        assert_eq!(args.env.validate_on, Some(ValidateOn::Load));
        assert_eq!(args.output, Some(PathBuf::from("env.js")));
    }

    #[test]
    fn test_color_choices_parse() {
        for variant in ["auto", "always", "never"] {
            let cli = Cli::try_parse_from(["envschema", "--color", variant, "check", "x.yaml"]);
            assert!(cli.is_ok(), "Failed to parse color={variant}");
        }
    }

    #[test]
    fn test_log_format_parse() {
        let cli =
            Cli::try_parse_from(["envschema", "--log-format", "json", "check", "x.yaml"]).unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn test_completions_shells_parse() {
        for shell in ["bash", "zsh", "fish", "powershell", "elvish"] {
            let cli = Cli::try_parse_from(["envschema", "completions", shell]);
            assert!(cli.is_ok(), "Failed to parse shell={shell}");
        }
    }

    #[test]
    fn test_completions_output() {
        let cli =
            Cli::try_parse_from(["envschema", "completions", "zsh", "-o", "_envschema"]).unwrap();
        let Commands::Completions(args) = cli.command else {
            panic!("Expected CompletionsArgs");
        };
        assert_eq!(args.shell, Shell::Zsh);
        assert_eq!(args.output, Some(PathBuf::from("_envschema")));
    }

    #[test]
    fn test_verbose_count() {
        let cli = Cli::try_parse_from(["envschema", "-vvv", "check", "x.yaml"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_quiet_flag() {
        let cli = Cli::try_parse_from(["envschema", "--quiet", "version"]).unwrap();
        assert!(cli.quiet);
    }
}
