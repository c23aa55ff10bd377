//! Structural validation of inbound JSON payloads
//!
//! The song payload shape is declared once in [`SONG_SCHEMA`]; the typed
//! [`NewSong`] is only built from values that passed it.

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Declarative description of an accepted JSON value
#[derive(Debug, Clone, Copy)]
pub enum Schema {
    /// JSON object; unknown properties are allowed
    Object { properties: &'static [Property] },
    /// JSON string of at least `min_length` characters
    String { min_length: usize },
    /// JSON number without a fractional part
    Integer,
}

/// Named property of an object schema
#[derive(Debug, Clone, Copy)]
pub struct Property {
    pub name: &'static str,
    pub required: bool,
    pub schema: Schema,
}

/// Canonical song creation payload: `{id?, file: {id?, filename}}`
pub const SONG_SCHEMA: Schema = Schema::Object {
    properties: &[
        Property {
            name: "id",
            required: false,
            schema: Schema::Integer,
        },
        Property {
            name: "file",
            required: true,
            schema: Schema::Object {
                properties: &[
                    Property {
                        name: "id",
                        required: false,
                        schema: Schema::Integer,
                    },
                    Property {
                        name: "filename",
                        required: true,
                        schema: Schema::String { min_length: 1 },
                    },
                ],
            },
        },
    ],
};

/// Payload rejected by a schema
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    /// Dotted location of the offending value, empty for the root
    pub path: String,
    /// Human readable description, prefixed with `path` when non-empty
    pub message: String,
}

impl ValidationError {
    fn new(path: &[&str], reason: impl Into<String>) -> Self {
        let path = path.join(".");
        let reason = reason.into();
        let message = if path.is_empty() {
            reason
        } else {
            format!("{}: {}", path, reason)
        };
        Self { path, message }
    }
}

/// Check `value` against `schema`, reporting the first violation found
pub fn validate(value: &Value, schema: &Schema) -> Result<(), ValidationError> {
    let mut path = Vec::new();
    validate_at(value, schema, &mut path)
}

fn validate_at<'a>(
    value: &Value,
    schema: &'a Schema,
    path: &mut Vec<&'a str>,
) -> Result<(), ValidationError> {
    match schema {
        Schema::Object { properties } => {
            let object = value
                .as_object()
                .ok_or_else(|| type_error(path, value, "object"))?;
            validate_object(object, properties, path)
        }
        Schema::String { min_length } => {
            let s = value
                .as_str()
                .ok_or_else(|| type_error(path, value, "string"))?;
            if s.chars().count() < *min_length {
                return Err(ValidationError::new(path, format!("{} is too short", value)));
            }
            Ok(())
        }
        Schema::Integer => {
            if value.is_i64() || value.is_u64() {
                Ok(())
            } else {
                Err(type_error(path, value, "integer"))
            }
        }
    }
}

fn validate_object<'a>(
    object: &Map<String, Value>,
    properties: &'a [Property],
    path: &mut Vec<&'a str>,
) -> Result<(), ValidationError> {
    for property in properties {
        match object.get(property.name) {
            Some(child) => {
                path.push(property.name);
                validate_at(child, &property.schema, path)?;
                path.pop();
            }
            None if property.required => {
                return Err(ValidationError::new(
                    path,
                    format!("'{}' is a required property", property.name),
                ));
            }
            None => {}
        }
    }
    Ok(())
}

fn type_error(path: &[&str], value: &Value, expected: &str) -> ValidationError {
    ValidationError::new(path, format!("{} is not of type '{}'", value, expected))
}

/// Validated song creation request
///
/// Client supplied ids are accepted by the schema but never used: the store
/// assigns ids.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSong {
    #[serde(default)]
    pub id: Option<i64>,
    pub file: NewFile,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewFile {
    #[serde(default)]
    pub id: Option<i64>,
    pub filename: String,
}

impl NewSong {
    /// Validate against [`SONG_SCHEMA`] and convert
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        validate(&value, &SONG_SCHEMA)?;
        // Integers beyond i64 pass the schema but not the conversion
        serde_json::from_value(value).map_err(|e| ValidationError::new(&[], e.to_string()))
    }

    pub fn has_client_ids(&self) -> bool {
        self.id.is_some() || self.file.id.is_some()
    }
}
