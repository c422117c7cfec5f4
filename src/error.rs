//! Typed errors for option normalization, config loading and mounting.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UsageError {
    #[error("resource options must be a controller reference or an object; got {0}")]
    MalformedOptions(&'static str),
    #[error("option '{field}' must be {expected}; got {got}")]
    InvalidField {
        field: String,
        expected: &'static str,
        got: &'static str,
    },
    #[error("unknown router operation: {0}")]
    UnknownOperation(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config read: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum MountError {
    #[error("no handler registered for '{0}'")]
    UnknownHandler(String),
    #[error("no middleware registered for '{0}'")]
    UnknownMiddleware(String),
    #[error("duplicate route: {method} {path}")]
    DuplicateRoute { method: &'static str, path: String },
    #[error("route {path} conflicts with {existing}")]
    ConflictingRoute { path: String, existing: String },
    #[error("invalid route {path}: {reason}")]
    InvalidRoute { path: String, reason: String },
}

/// JSON type name for error messages.
pub(crate) fn json_type_name(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
