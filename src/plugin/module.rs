//! Virtual module naming and source rendering.

use serde_json::Value;

/// Import specifier application code uses for the validated environment.
pub const DEFAULT_MODULE_ID: &str = "virtual:env";

/// Marker prefixed to resolved virtual ids so other plugins leave them alone.
pub const VIRTUAL_MARKER: char = '\0';

/// Canonical id for a virtual module specifier.
#[must_use]
pub fn resolved_id(module_id: &str) -> String {
    format!("{VIRTUAL_MARKER}{module_id}")
}

/// Renders `export default <json>`; an absent value renders as `null`.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn render(value: Option<&Value>) -> Result<String, serde_json::Error> {
    let literal = match value {
        Some(value) => serde_json::to_string(value)?,
        None => "null".to_string(),
    };
    Ok(format!("export default {literal}"))
}
