//! Schema file loader
//!
//! Pipeline:
//! 1. Size check and read
//! 2. BOM strip and empty-document check
//! 3. YAML parsing (JSON is accepted as a YAML subset)
//! 4. Semantic validation
//! 5. Schema compilation

use std::path::{Path, PathBuf};

use crate::config::SchemaFile;
use crate::config::validation::Validator;
use crate::error::ConfigError;
use crate::schema::DeclarativeSchema;

/// Default upper bound for schema files (1 MiB).
pub const DEFAULT_MAX_SCHEMA_SIZE: usize = 1024 * 1024;

// ============================================================================
// Public API
// ============================================================================

/// Options for the schema file loader.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Maximum schema file size in bytes.
    pub max_schema_size: usize,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            max_schema_size: env_or("ENVSCHEMA_MAX_SCHEMA_SIZE", DEFAULT_MAX_SCHEMA_SIZE),
        }
    }
}

/// Result of loading a schema file.
#[derive(Debug)]
pub struct LoadResult {
    /// The file as written.
    pub file: SchemaFile,

    /// Compiled validator for the declared fields.
    pub schema: DeclarativeSchema,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during schema file loading.
#[derive(Debug, Clone)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

/// Schema file loader.
#[derive(Debug, Default)]
pub struct SchemaFileLoader {
    options: LoaderOptions,
}

impl SchemaFileLoader {
    /// Creates a loader with the given options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Loads, validates and compiles a schema file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read or exceeds the size limit
    /// - The file is empty or not valid YAML
    /// - Semantic validation fails
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let file_size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if file_size > self.options.max_schema_size {
            return Err(ConfigError::InvalidValue {
                field: "file_size".to_string(),
                value: format!("{file_size} bytes"),
                expected: format!("at most {} bytes", self.options.max_schema_size),
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        tracing::debug!(path = %path.display(), bytes = raw.len(), "loading schema file");
        self.load_str(&raw, path)
    }

    /// Parses and validates schema text; `path` is used in messages only.
    ///
    /// # Errors
    ///
    /// Same as [`SchemaFileLoader::load`], minus the I/O failures.
    pub fn load_str(&self, raw: &str, path: &Path) -> Result<LoadResult, ConfigError> {
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
        if raw.trim().is_empty() {
            return Err(ConfigError::Empty {
                path: path.to_path_buf(),
            });
        }

        let value: serde_yaml::Value =
            serde_yaml::from_str(raw).map_err(|e| parse_error(path, &e))?;
        if value.is_null() {
            return Err(ConfigError::Empty {
                path: path.to_path_buf(),
            });
        }
        let file: SchemaFile = serde_yaml::from_value(value).map_err(|e| parse_error(path, &e))?;

        let result = Validator::new().validate(&file);
        if !result.is_valid() {
            return Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                errors: result.errors,
            });
        }

        let schema = DeclarativeSchema::new(file.fields.clone()).map_err(|(field, e)| {
            ConfigError::InvalidValue {
                field: format!("fields.{field}.pattern"),
                value: e.to_string(),
                expected: "a valid regular expression".to_string(),
            }
        })?;

        let warnings = result
            .warnings
            .into_iter()
            .map(|w| LoadWarning {
                message: w.message,
                location: Some(w.path),
            })
            .collect();

        Ok(LoadResult {
            file,
            schema,
            warnings,
        })
    }
}

fn parse_error(path: &Path, err: &serde_yaml::Error) -> ConfigError {
    ConfigError::ParseError {
        path: PathBuf::from(path),
        line: err.location().map(|l| l.line()),
        message: err.to_string(),
    }
}

/// Reads a numeric override from the environment.
fn env_or(var: &str, default: usize) -> usize {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
