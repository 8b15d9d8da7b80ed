//! `envschema` - validated environment variables as a virtual module
//!
//! Collects prefixed environment variables, validates them against a
//! [`schema::Schema`] and serves the typed result to application code as
//! `export default <json>` through a build-host [`plugin::Plugin`].

pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod host;
pub mod observability;
pub mod plugin;
pub mod schema;

pub use env::{EnvLoader, EnvMap};
pub use error::{EnvSchemaError, Result, ValidationError};
pub use host::PluginContainer;
pub use plugin::{EnvSchemaPlugin, Plugin, PluginOptions, ResolvedConfig, ValidateOn, env_schema};
pub use schema::{Issue, Outcome, PathSegment, Schema, schema_fn};
