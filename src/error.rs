//! Error types for `envschema`
//!
//! One enum per concern (environment loading, schema files, plugin host)
//! plus the single pipeline failure, [`ValidationError`], aggregated by
//! [`EnvSchemaError`] for exit code mapping.

use std::path::PathBuf;
use thiserror::Error;

use crate::schema::{Issue, format_issues};

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `envschema` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Schema file error (invalid YAML, semantic validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// The environment did not satisfy the schema
    pub const VALIDATION_ERROR: i32 = 4;

    /// Environment loading error (bad `.env` file, reserved mode)
    pub const ENV_ERROR: i32 = 5;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `envschema` operations.
#[derive(Debug, Error)]
pub enum EnvSchemaError {
    /// The environment failed schema validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Environment loading error
    #[error(transparent)]
    Env(#[from] EnvError),

    /// Schema file loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Plugin host error
    #[error(transparent)]
    Host(#[from] HostError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl EnvSchemaError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => ExitCode::VALIDATION_ERROR,
            Self::Env(_) => ExitCode::ENV_ERROR,
            Self::Config(_) | Self::Json(_) | Self::Yaml(_) => ExitCode::CONFIG_ERROR,
            Self::Host(_) => ExitCode::ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Validation Failure
// ============================================================================

/// Header line of every validation failure message.
pub const VALIDATION_HEADER: &str =
    "Invalid environment configuration.\nThe following variables are missing or invalid:";

/// The environment did not satisfy the schema.
///
/// Carries only the formatted, human-readable message. Callers that need
/// the individual issues should inspect the schema's [`Outcome`] directly.
///
/// [`Outcome`]: crate::schema::Outcome
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    /// Builds the error from the issues reported by a schema.
    #[must_use]
    pub fn from_issues(issues: &[Issue]) -> Self {
        Self {
            message: format!("{VALIDATION_HEADER}\n{}", format_issues(issues)),
        }
    }

    /// The full multi-line message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

// ============================================================================
// Environment Loading Errors
// ============================================================================

/// Errors raised while collecting the raw environment.
#[derive(Debug, Error)]
pub enum EnvError {
    /// `local` collides with the `.local` suffix of dotenv files
    #[error(
        "\"{0}\" cannot be used as a mode name because it conflicts with the .local postfix for .env files"
    )]
    ReservedMode(String),

    /// An empty prefix would expose the whole process environment
    #[error("env prefix cannot be empty, it would expose every environment variable")]
    EmptyPrefix,

    /// A dotenv file could not be read or parsed
    #[error("failed to parse {path}: {message}")]
    Parse {
        /// Path to the dotenv file
        path: PathBuf,
        /// Error message from the parser
        message: String,
    },
}

// ============================================================================
// Schema File Errors
// ============================================================================

/// Schema file loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the schema file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// The schema file has no content
    #[error("schema file is empty: {path}")]
    Empty {
        /// Path to the schema file
        path: PathBuf,
    },

    /// Semantic validation of the schema file failed
    #[error("validation failed for {path}: {}", summarize(.errors))]
    ValidationError {
        /// Path to the schema file
        path: String,
        /// Every problem found
        errors: Vec<ConfigIssue>,
    },

    /// Schema file not found or unreadable
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },
}

fn summarize(errors: &[ConfigIssue]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A single problem found while validating a schema file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Location in the file (e.g., "fields.PORT.min")
    pub path: String,
    /// Description of the problem
    pub message: String,
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.message, self.path)
    }
}

// ============================================================================
// Plugin Host Errors
// ============================================================================

/// Errors raised by the plugin container.
#[derive(Debug, Error)]
pub enum HostError {
    /// No plugin resolved the specifier
    #[error("failed to resolve import \"{0}\"")]
    Unresolved(String),

    /// The specifier resolved but no plugin produced its source
    #[error("no plugin could load \"{0}\"")]
    NotLoaded(String),
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `envschema` operations.
pub type Result<T> = std::result::Result<T, EnvSchemaError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::SUCCESS, 0);
        assert_eq!(ExitCode::ERROR, 1);
        assert_eq!(ExitCode::CONFIG_ERROR, 2);
        assert_eq!(ExitCode::IO_ERROR, 3);
        assert_eq!(ExitCode::VALIDATION_ERROR, 4);
        assert_eq!(ExitCode::ENV_ERROR, 5);
        assert_eq!(ExitCode::USAGE_ERROR, 64);
        assert_eq!(ExitCode::INTERRUPTED, 130);
        assert_eq!(ExitCode::TERMINATED, 143);
    }

    #[test]
    fn test_exit_code_mapping() {
        let cases: Vec<(EnvSchemaError, i32)> = vec![
            (
                ValidationError::from_issues(&[]).into(),
                ExitCode::VALIDATION_ERROR,
            ),
            (EnvError::EmptyPrefix.into(), ExitCode::ENV_ERROR),
            (
                ConfigError::MissingFile {
                    path: PathBuf::from("/x"),
                }
                .into(),
                ExitCode::CONFIG_ERROR,
            ),
            (
                HostError::Unresolved("virtual:x".into()).into(),
                ExitCode::ERROR,
            ),
            (
                std::io::Error::new(std::io::ErrorKind::NotFound, "x").into(),
                ExitCode::IO_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.exit_code(), expected, "Wrong exit code for {err}");
        }
    }

    #[test]
    fn test_validation_error_message() {
        let err = ValidationError::from_issues(&[Issue::at(["API_URL"], "Required")]);
        assert_eq!(
            err.to_string(),
            "Invalid environment configuration.\n\
             The following variables are missing or invalid:\n\
             - API_URL: Required"
        );
    }

    #[test]
    fn test_validation_error_without_issues_keeps_header() {
        let err = ValidationError::from_issues(&[]);
        assert!(err.message().starts_with(VALIDATION_HEADER));
    }

    #[test]
    fn test_reserved_mode_display() {
        let err = EnvError::ReservedMode("local".to_string());
        assert!(err.to_string().contains("\"local\" cannot be used as a mode name"));
    }

    #[test]
    fn test_config_issue_display() {
        let issue = ConfigIssue {
            path: "fields.PORT.min".to_string(),
            message: "min is greater than max".to_string(),
        };
        assert_eq!(issue.to_string(), "min is greater than max at fields.PORT.min");
    }

    #[test]
    fn test_config_validation_error_lists_issues() {
        let err = ConfigError::ValidationError {
            path: "env.yaml".to_string(),
            errors: vec![
                ConfigIssue {
                    path: "options.prefix".to_string(),
                    message: "prefix cannot be empty".to_string(),
                },
                ConfigIssue {
                    path: "fields.MODE.values".to_string(),
                    message: "enum needs at least one value".to_string(),
                },
            ],
        };
        let text = err.to_string();
        assert!(text.contains("env.yaml"));
        assert!(text.contains("prefix cannot be empty at options.prefix"));
        assert!(text.contains("enum needs at least one value at fields.MODE.values"));
    }
}
