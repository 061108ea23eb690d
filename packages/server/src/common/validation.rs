//! Payload validation and sanitizing shared by every handler.
//!
//! Validation runs on the raw JSON payload before it is typed, so a missing
//! field is reported by name instead of as a serde error.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

/// Longest string accepted in a free-form payload field (after sanitizing)
pub const MAX_FIELD_LENGTH: usize = 256;

/// Deepest nesting accepted in a free-form payload
pub const MAX_DEPTH: usize = 8;

lazy_static! {
    // Markup tags, including unterminated ones at the end of input
    static ref TAG_REGEX: Regex = Regex::new(r"<[^>]*(>|$)").unwrap();
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Payload must be an object")]
    NotAnObject,

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Field {field} exceeds {max} characters")]
    FieldTooLong { field: String, max: usize },
}

/// Check that every required field is present
///
/// A field counts as missing when it is absent, `null`, or a blank string.
pub fn validate_input(data: &Value, required: &[&str]) -> Result<(), ValidationError> {
    let object = data.as_object().ok_or(ValidationError::NotAnObject)?;

    for field in required {
        let missing = match object.get(*field) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        };
        if missing {
            return Err(ValidationError::MissingField((*field).to_string()));
        }
    }

    Ok(())
}

/// Sanitize a free-form payload in place
///
/// Strings are stripped of markup tags and control characters and trimmed;
/// anything still longer than [`MAX_FIELD_LENGTH`] or nested deeper than
/// [`MAX_DEPTH`] is rejected.
pub fn sanitize_data(data: &mut Value) -> Result<(), ValidationError> {
    if !data.is_object() {
        return Err(ValidationError::NotAnObject);
    }
    sanitize_value(data, "", 0)
}

fn sanitize_value(value: &mut Value, path: &str, depth: usize) -> Result<(), ValidationError> {
    if depth > MAX_DEPTH {
        return Err(ValidationError::InvalidField {
            field: path.to_string(),
            reason: "nested too deeply".to_string(),
        });
    }

    match value {
        Value::String(s) => {
            let clean = sanitize_string(s);
            if clean.chars().count() > MAX_FIELD_LENGTH {
                return Err(ValidationError::FieldTooLong {
                    field: path.to_string(),
                    max: MAX_FIELD_LENGTH,
                });
            }
            *s = clean;
        }
        Value::Array(items) => {
            for (index, item) in items.iter_mut().enumerate() {
                sanitize_value(item, &format!("{}[{}]", path, index), depth + 1)?;
            }
        }
        Value::Object(map) => {
            for (key, item) in map.iter_mut() {
                let child = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };
                sanitize_value(item, &child, depth + 1)?;
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }

    Ok(())
}

fn sanitize_string(raw: &str) -> String {
    let without_tags = TAG_REGEX.replace_all(raw, "");
    without_tags
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}
