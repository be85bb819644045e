use serde_json::Value;
use std::path::Path;

// Use JSON Schema draft-07, matching the `$schema` declared in the file
use jsonschema::draft7 as schema_draft;

use crate::error::{DocguardError, Result};

// Embed schema at compile time
const CONFIG_SCHEMA: &str = include_str!("../../schemas/v1/config-schema.json");

pub fn get_config_schema() -> Result<Value, serde_json::Error> {
    serde_json::from_str(CONFIG_SCHEMA)
}

/// Check a parsed config document against the embedded schema, collecting
/// every violation rather than stopping at the first one.
pub fn validate_config_value(value: &Value, source_path: &Path) -> Result<()> {
    let schema = get_config_schema().map_err(|e| DocguardError::Config {
        path: source_path.to_path_buf(),
        message: format!("embedded config schema is not valid JSON: {e}"),
    })?;
    let validator = schema_draft::options()
        .build(&schema)
        .map_err(|e| DocguardError::Config {
            path: source_path.to_path_buf(),
            message: format!("failed to compile config schema: {e}"),
        })?;

    let violations: Vec<String> = validator
        .iter_errors(value)
        .map(|error| {
            let location = error.instance_path.to_string();
            if location.is_empty() {
                format!("  - {error}")
            } else {
                format!("  - {location}: {error}")
            }
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(DocguardError::ConfigSchema {
            path: source_path.to_path_buf(),
            violations,
        })
    }
}
