#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed stored value: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("stored value is not a document, found {0}")]
    NotADocument(&'static str),

    #[error("document is missing the '{0}' field")]
    MissingField(&'static str),

    #[error("document field '{field}' holds {found}, expected a string")]
    FieldType {
        field: &'static str,
        found: &'static str,
    },

    #[error("backend failure: {0}")]
    Backend(String),

    #[error("operation was dropped before completing")]
    Incomplete,
}

/// Name of a JSON value's shape, for error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
