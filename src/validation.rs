//! In-process evaluation of the `$jsonSchema` subset used by the declared
//! validators.
//!
//! The server stays the authority on what gets stored. This module lets the
//! schema contract be checked against candidate documents (fixtures, tests)
//! without a running database, and reports the first violation it finds.
use mongodb::bson::{Bson, Document};
use regex::Regex;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("missing required field '{0}'")]
    MissingField(String),
    #[error("field '{field}' should have bsonType '{expected}'")]
    WrongType { field: String, expected: String },
    #[error("field '{field}' does not match pattern {pattern}")]
    PatternMismatch { field: String, pattern: String },
    #[error("field '{field}' is out of range")]
    OutOfRange { field: String },
    #[error("field '{field}' is not one of the allowed values")]
    NotInEnum { field: String },
    #[error("invalid pattern {0}")]
    InvalidPattern(String),
    #[error("unsupported schema keyword '{0}'")]
    UnsupportedKeyword(String),
    #[error("malformed schema at '{0}'")]
    MalformedSchema(String),
}

// `description` and `title` are annotations, not constraints
const KEYWORDS: [&str; 9] = [
    "bsonType",
    "required",
    "properties",
    "pattern",
    "minimum",
    "maximum",
    "enum",
    "description",
    "title",
];

/// Validate `document` against a `$jsonSchema` body.
pub fn validate_document(schema: &Document, document: &Document) -> Result<(), ValidationError> {
    validate_value(schema, &Bson::Document(document.clone()), "$")
}

/// Validate `document` against a full validator (`{ "$jsonSchema": {...} }`).
pub fn validate_with_validator(
    validator: &Document,
    document: &Document,
) -> Result<(), ValidationError> {
    let schema = validator
        .get_document("$jsonSchema")
        .map_err(|_| ValidationError::MalformedSchema("$jsonSchema".to_string()))?;
    validate_document(schema, document)
}

fn validate_value(schema: &Document, value: &Bson, path: &str) -> Result<(), ValidationError> {
    if let Some(keyword) = schema.keys().find(|key| !KEYWORDS.contains(&key.as_str())) {
        return Err(ValidationError::UnsupportedKeyword(keyword.clone()));
    }

    if let Some(bson_type) = schema.get("bsonType") {
        let expected = bson_type
            .as_str()
            .ok_or_else(|| ValidationError::MalformedSchema(format!("{}.bsonType", path)))?;
        if !matches_bson_type(value, expected) {
            return Err(ValidationError::WrongType {
                field: path.to_string(),
                expected: expected.to_string(),
            });
        }
    }

    if let Some(allowed) = schema.get("enum") {
        let allowed = allowed
            .as_array()
            .ok_or_else(|| ValidationError::MalformedSchema(format!("{}.enum", path)))?;
        if !allowed.contains(value) {
            return Err(ValidationError::NotInEnum {
                field: path.to_string(),
            });
        }
    }

    if let Some(pattern) = schema.get("pattern") {
        let pattern = pattern
            .as_str()
            .ok_or_else(|| ValidationError::MalformedSchema(format!("{}.pattern", path)))?;
        // pattern only constrains strings
        if let Bson::String(text) = value {
            let regex = Regex::new(pattern)
                .map_err(|_| ValidationError::InvalidPattern(pattern.to_string()))?;
            if !regex.is_match(text) {
                return Err(ValidationError::PatternMismatch {
                    field: path.to_string(),
                    pattern: pattern.to_string(),
                });
            }
        }
    }

    if let Some(number) = as_f64(value) {
        if let Some(minimum) = schema.get("minimum").and_then(as_f64) {
            if number < minimum {
                return Err(ValidationError::OutOfRange {
                    field: path.to_string(),
                });
            }
        }
        if let Some(maximum) = schema.get("maximum").and_then(as_f64) {
            if number > maximum {
                return Err(ValidationError::OutOfRange {
                    field: path.to_string(),
                });
            }
        }
    }

    if let Bson::Document(document) = value {
        if let Some(required) = schema.get("required") {
            let required = required
                .as_array()
                .ok_or_else(|| ValidationError::MalformedSchema(format!("{}.required", path)))?;
            for field in required {
                let field = field.as_str().ok_or_else(|| {
                    ValidationError::MalformedSchema(format!("{}.required", path))
                })?;
                if !document.contains_key(field) {
                    return Err(ValidationError::MissingField(field.to_string()));
                }
            }
        }

        if let Some(properties) = schema.get("properties") {
            let properties = properties.as_document().ok_or_else(|| {
                ValidationError::MalformedSchema(format!("{}.properties", path))
            })?;
            for (field, field_schema) in properties {
                let field_schema = field_schema.as_document().ok_or_else(|| {
                    ValidationError::MalformedSchema(format!("{}.properties.{}", path, field))
                })?;
                if let Some(field_value) = document.get(field) {
                    validate_value(field_schema, field_value, field)?;
                }
            }
        }
    }

    Ok(())
}

fn matches_bson_type(value: &Bson, expected: &str) -> bool {
    match expected {
        "object" => matches!(value, Bson::Document(_)),
        "string" => matches!(value, Bson::String(_)),
        "int" => matches!(value, Bson::Int32(_)),
        "long" => matches!(value, Bson::Int64(_)),
        "double" => matches!(value, Bson::Double(_)),
        "number" => matches!(value, Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_)),
        "bool" => matches!(value, Bson::Boolean(_)),
        "array" => matches!(value, Bson::Array(_)),
        "null" => matches!(value, Bson::Null),
        _ => false,
    }
}

fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}
