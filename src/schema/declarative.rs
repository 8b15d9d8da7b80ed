//! Schema described as data.
//!
//! Each field names a kind (`string`, `url`, `integer`, `number`,
//! `boolean`, `list`, `enum`) plus optional constraints. Raw strings are
//! coerced to typed JSON values; every failing field yields one issue, in
//! declaration order. Keys not declared are dropped from the output.

use std::collections::HashMap;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use crate::env::EnvMap;
use crate::schema::{Issue, Outcome, Schema};

/// Separator used by `list` fields unless one is configured.
pub const DEFAULT_LIST_SEPARATOR: &str = ",";

/// Largest integer a JSON consumer can represent exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

// ============================================================================
// Field rules
// ============================================================================

/// Value kind of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Any string.
    String,
    /// Absolute URL.
    Url,
    /// Signed 64-bit integer.
    Integer,
    /// Finite floating point number.
    Number,
    /// `true/1/yes/on` or `false/0/no/off`.
    Boolean,
    /// Separated list of trimmed, non-empty strings.
    List,
    /// One of a fixed set of strings.
    Enum,
}

impl FieldKind {
    /// Returns `true` for kinds accepting `min` / `max`.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Number)
    }
}

/// Declaration of a single environment variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldRule {
    /// Value kind.
    #[serde(rename = "type")]
    pub kind: FieldKind,

    /// Missing values are omitted instead of reported.
    #[serde(default)]
    pub optional: bool,

    /// Raw value used when the variable is missing.
    #[serde(
        default,
        deserialize_with = "raw_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<String>,

    /// Inclusive lower bound (numeric kinds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    /// Inclusive upper bound (numeric kinds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// Minimum length in characters (`string`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    /// Maximum length in characters (`string`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    /// Regular expression the whole value must match (`string`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Item separator (`list`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,

    /// Accepted values (`enum`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,

    /// Free-form documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldRule {
    /// A required field of `kind` without constraints.
    #[must_use]
    pub const fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            optional: false,
            default: None,
            min: None,
            max: None,
            min_length: None,
            max_length: None,
            pattern: None,
            separator: None,
            values: Vec::new(),
            description: None,
        }
    }

    /// Marks the field optional.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Sets the raw default.
    #[must_use]
    pub fn with_default(mut self, raw: impl Into<String>) -> Self {
        self.default = Some(raw.into());
        self
    }

    /// Sets numeric bounds.
    #[must_use]
    pub const fn between(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}

/// Accepts `default: 3000` and `default: true` as well as strings.
fn raw_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Integer(i64),
        Float(f64),
        Flag(bool),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Integer(i) => i.to_string(),
        Raw::Float(f) => f.to_string(),
        Raw::Flag(b) => b.to_string(),
    }))
}

// ============================================================================
// DeclarativeSchema
// ============================================================================

/// Validator built from field declarations.
#[derive(Debug, Clone)]
pub struct DeclarativeSchema {
    fields: IndexMap<String, FieldRule>,
    patterns: HashMap<String, Regex>,
}

impl DeclarativeSchema {
    /// Builds the schema, compiling every `pattern`.
    ///
    /// # Errors
    ///
    /// Returns the field name and regex error of the first invalid pattern.
    pub fn new(fields: IndexMap<String, FieldRule>) -> Result<Self, (String, regex::Error)> {
        let mut patterns = HashMap::new();
        for (name, rule) in &fields {
            if let Some(pattern) = &rule.pattern {
                let regex = anchored(pattern).map_err(|e| (name.clone(), e))?;
                patterns.insert(name.clone(), regex);
            }
        }
        Ok(Self { fields, patterns })
    }

    /// Declared fields in declaration order.
    #[must_use]
    pub const fn fields(&self) -> &IndexMap<String, FieldRule> {
        &self.fields
    }

    /// Validates synchronously; [`Schema::validate`] delegates here.
    #[must_use]
    pub fn check(&self, input: &EnvMap) -> Outcome {
        let mut output = Map::new();
        let mut issues = Vec::new();

        for (name, rule) in &self.fields {
            let raw = input.get(name).cloned().or_else(|| rule.default.clone());
            let Some(raw) = raw else {
                if !rule.optional {
                    issues.push(Issue::at([name.as_str()], "Required"));
                }
                continue;
            };

            match self.coerce(name, rule, &raw) {
                Ok(value) => {
                    output.insert(name.clone(), value);
                }
                Err(message) => issues.push(Issue::at([name.as_str()], message)),
            }
        }

        if issues.is_empty() {
            Outcome::Success(Value::Object(output))
        } else {
            Outcome::Failure(issues)
        }
    }

    fn coerce(&self, name: &str, rule: &FieldRule, raw: &str) -> Result<Value, String> {
        match rule.kind {
            FieldKind::String => {
                let len = raw.chars().count();
                if let Some(min) = rule.min_length
                    && len < min
                {
                    return Err(format!("Must be at least {min} characters"));
                }
                if let Some(max) = rule.max_length
                    && len > max
                {
                    return Err(format!("Must be at most {max} characters"));
                }
                if let Some(regex) = self.patterns.get(name)
                    && !regex.is_match(raw)
                {
                    return Err(format!(
                        "Does not match pattern {}",
                        rule.pattern.as_deref().unwrap_or_default()
                    ));
                }
                Ok(Value::String(raw.to_string()))
            }
            FieldKind::Url => url::Url::parse(raw)
                .map(|_| Value::String(raw.to_string()))
                .map_err(|_| "Invalid URL".to_string()),
            FieldKind::Integer => {
                let parsed: i64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| format!("Expected integer, received \"{raw}\""))?;
                #[allow(clippy::cast_precision_loss)]
                let approx = parsed as f64;
                check_bounds(rule, approx)?;
                Ok(Value::from(parsed))
            }
            FieldKind::Number => {
                let parsed: f64 = raw
                    .trim()
                    .parse()
                    .ok()
                    .filter(|n: &f64| n.is_finite())
                    .ok_or_else(|| format!("Expected number, received \"{raw}\""))?;
                check_bounds(rule, parsed)?;
                Ok(number_value(parsed))
            }
            FieldKind::Boolean => parse_bool(raw)
                .map(Value::Bool)
                .ok_or_else(|| format!("Expected boolean, received \"{raw}\"")),
            FieldKind::List => {
                let separator = rule.separator.as_deref().unwrap_or(DEFAULT_LIST_SEPARATOR);
                Ok(Value::Array(
                    raw.split(separator)
                        .map(str::trim)
                        .filter(|item| !item.is_empty())
                        .map(|item| Value::String(item.to_string()))
                        .collect(),
                ))
            }
            FieldKind::Enum => {
                if rule.values.iter().any(|v| v == raw) {
                    Ok(Value::String(raw.to_string()))
                } else {
                    Err(format!("Expected one of: {}", rule.values.join(", ")))
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl Schema for DeclarativeSchema {
    async fn validate(&self, input: &EnvMap) -> Outcome {
        self.check(input)
    }

    fn vendor(&self) -> &str {
        "envschema"
    }
}

/// Compiles `pattern` so it must match the whole value.
pub(crate) fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}

fn check_bounds(rule: &FieldRule, n: f64) -> Result<(), String> {
    if let Some(min) = rule.min
        && n < min
    {
        return Err(format!("Must be greater than or equal to {min}"));
    }
    if let Some(max) = rule.max
        && n > max
    {
        return Err(format!("Must be less than or equal to {max}"));
    }
    Ok(())
}

/// Integral values serialize without a fractional part, like `3000`.
#[allow(clippy::cast_possible_truncation)]
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
