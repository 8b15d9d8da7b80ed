//! Schema file validation
//!
//! Semantic checks run after deserialization. Every problem is collected so
//! a single run reports all of them.

use indexmap::IndexMap;

use crate::config::SchemaFile;
use crate::error::ConfigIssue;
use crate::plugin::module::VIRTUAL_MARKER;
use crate::schema::declarative::anchored;
use crate::schema::{DeclarativeSchema, FieldKind, FieldRule, Outcome};

// ============================================================================
// Public API
// ============================================================================

/// Result of schema file validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Problems that prevent the schema from being used.
    pub errors: Vec<ConfigIssue>,

    /// Suspicious but usable declarations.
    pub warnings: Vec<ConfigIssue>,
}

impl ValidationResult {
    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Schema file validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ConfigIssue>,
    warnings: Vec<ConfigIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a schema file and returns every error and warning.
    pub fn validate(&mut self, file: &SchemaFile) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_options(file);
        if file.fields.is_empty() {
            self.add_warning(
                "fields",
                "no fields declared, the virtual module will export an empty object",
            );
        }
        for (name, rule) in &file.fields {
            self.validate_field(name, rule, &file.options.prefix);
        }

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    // ========================================================================
    // Options
    // ========================================================================

    fn validate_options(&mut self, file: &SchemaFile) {
        if file.options.prefix.is_empty() {
            self.add_error(
                "options.prefix",
                "prefix cannot be empty, it would expose every environment variable",
            );
        }
        if file.options.module_id.is_empty() {
            self.add_error("options.module_id", "module id cannot be empty");
        } else if file.options.module_id.starts_with(VIRTUAL_MARKER) {
            self.add_error(
                "options.module_id",
                "module id must be the import specifier, not the resolved id",
            );
        }
    }

    // ========================================================================
    // Fields
    // ========================================================================

    fn validate_field(&mut self, name: &str, rule: &FieldRule, prefix: &str) {
        let at = |key: &str| format!("fields.{name}.{key}");
        let errors_before = self.errors.len();

        if name.is_empty() {
            self.add_error("fields", "field name cannot be empty");
        } else if !prefix.is_empty() && name.starts_with(prefix) {
            self.add_warning(
                &format!("fields.{name}"),
                &format!("field name includes the prefix {prefix}, names are matched after it is stripped"),
            );
        }

        if !rule.kind.is_numeric() {
            if rule.min.is_some() {
                self.add_error(&at("min"), "min only applies to integer and number fields");
            }
            if rule.max.is_some() {
                self.add_error(&at("max"), "max only applies to integer and number fields");
            }
        }
        if let (Some(min), Some(max)) = (rule.min, rule.max)
            && min > max
        {
            self.add_error(&at("min"), "min is greater than max");
        }

        if rule.kind == FieldKind::String {
            if let (Some(min), Some(max)) = (rule.min_length, rule.max_length)
                && min > max
            {
                self.add_error(&at("min_length"), "min_length is greater than max_length");
            }
            if let Some(pattern) = &rule.pattern
                && let Err(e) = anchored(pattern)
            {
                self.add_error(&at("pattern"), &format!("invalid pattern: {e}"));
            }
        } else {
            for (key, set) in [
                ("min_length", rule.min_length.is_some()),
                ("max_length", rule.max_length.is_some()),
                ("pattern", rule.pattern.is_some()),
            ] {
                if set {
                    self.add_error(&at(key), &format!("{key} only applies to string fields"));
                }
            }
        }

        match (rule.kind, rule.separator.as_deref()) {
            (FieldKind::List, Some("")) => {
                self.add_error(&at("separator"), "separator cannot be empty");
            }
            (FieldKind::List, _) | (_, None) => {}
            (_, Some(_)) => {
                self.add_error(&at("separator"), "separator only applies to list fields");
            }
        }

        if rule.kind == FieldKind::Enum {
            if rule.values.is_empty() {
                self.add_error(&at("values"), "enum needs at least one value");
            }
        } else if !rule.values.is_empty() {
            self.add_error(&at("values"), "values only applies to enum fields");
        }

        if rule.optional && rule.default.is_some() {
            self.add_warning(&at("optional"), "optional has no effect when a default is set");
        }

        if self.errors.len() == errors_before && rule.default.is_some() {
            self.validate_default(name, rule);
        }
    }

    fn validate_default(&mut self, name: &str, rule: &FieldRule) {
        let mut single = IndexMap::new();
        single.insert(name.to_string(), rule.clone());
        let Ok(schema) = DeclarativeSchema::new(single) else {
            return;
        };
        if let Outcome::Failure(issues) = schema.check(&crate::env::EnvMap::new()) {
            for issue in issues {
                self.add_error(
                    &format!("fields.{name}.default"),
                    &format!("default is invalid: {}", issue.message),
                );
            }
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ConfigIssue {
            path: path.to_string(),
            message: message.to_string(),
        });
    }

    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ConfigIssue {
            path: path.to_string(),
            message: message.to_string(),
        });
    }
}
