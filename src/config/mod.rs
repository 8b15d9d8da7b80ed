//! Schema file handling
//!
//! A schema file carries the plugin options next to the declarative field
//! rules, so the CLI can run the whole pipeline from one YAML (or JSON)
//! document:
//!
//! ```yaml
//! options:
//!   validate_on: config
//!   prefix: VITE_
//! fields:
//!   API_URL: { type: url }
//!   PORT: { type: integer, min: 1 }
//! ```

pub mod loader;
pub mod validation;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::plugin::PluginOptions;
use crate::schema::FieldRule;

pub use loader::{LoadResult, LoadWarning, LoaderOptions, SchemaFileLoader};
pub use validation::{ValidationResult, Validator};

/// Deserialized schema file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaFile {
    /// Plugin options.
    #[serde(default)]
    pub options: PluginOptions,

    /// Field rules in declaration order.
    #[serde(default)]
    pub fields: IndexMap<String, FieldRule>,
}
