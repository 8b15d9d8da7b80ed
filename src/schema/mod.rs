//! Schema contract
//!
//! Any validator that can turn the filtered environment into either a value
//! or an ordered list of issues plugs into the pipeline through [`Schema`].
//! [`declarative`] ships one such validator driven by a YAML description.

pub mod declarative;

use std::fmt;

use serde_json::Value;

use crate::env::EnvMap;

pub use declarative::{DeclarativeSchema, FieldKind, FieldRule};

// ============================================================================
// Outcome
// ============================================================================

/// Result of a single `validate` call.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The input was accepted; carries the parsed configuration.
    Success(Value),
    /// The input was rejected; issues are kept in reporting order.
    Failure(Vec<Issue>),
}

impl Outcome {
    /// Returns `true` for [`Outcome::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

// ============================================================================
// Issue
// ============================================================================

/// One segment of an issue path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object key
    Key(String),
    /// Array index
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// A single problem reported by a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Location of the offending value; `None` when the schema gave none.
    pub path: Option<Vec<PathSegment>>,
    /// Human-readable description.
    pub message: String,
}

impl Issue {
    /// Creates an issue without a path.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            path: None,
            message: message.into(),
        }
    }

    /// Creates an issue located at `path`.
    #[must_use]
    pub fn at<I, S>(path: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        Self {
            path: Some(path.into_iter().map(Into::into).collect()),
            message: message.into(),
        }
    }

    /// Path segments joined with `.`, or an empty string when absent.
    #[must_use]
    pub fn dotted_path(&self) -> String {
        self.path.as_deref().map_or_else(String::new, |segments| {
            segments
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(".")
        })
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- {}: {}", self.dotted_path(), self.message)
    }
}

/// Renders issues one per line as `- <dotted.path>: <message>`.
#[must_use]
pub fn format_issues(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Schema trait
// ============================================================================

/// A validator for the prefix-stripped environment.
///
/// The call may suspend (remote lookups, filesystem checks); the pipeline
/// awaits it without a timeout.
#[async_trait::async_trait]
pub trait Schema: Send + Sync {
    /// Validates the filtered environment.
    async fn validate(&self, input: &EnvMap) -> Outcome;

    /// Name of the library or author behind this schema, for logging.
    fn vendor(&self) -> &str {
        "custom"
    }
}

/// Adapter turning a synchronous closure into a [`Schema`].
pub struct FnSchema<F> {
    validate: F,
}

/// Wraps `validate` as a [`Schema`].
pub const fn schema_fn<F>(validate: F) -> FnSchema<F>
where
    F: Fn(&EnvMap) -> Outcome + Send + Sync,
{
    FnSchema { validate }
}

impl<F> fmt::Debug for FnSchema<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSchema").finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl<F> Schema for FnSchema<F>
where
    F: Fn(&EnvMap) -> Outcome + Send + Sync,
{
    async fn validate(&self, input: &EnvMap) -> Outcome {
        (self.validate)(input)
    }

    fn vendor(&self) -> &str {
        "fn"
    }
}
