use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A backend-native typed record holding at least a key field and a value
/// field, as stored by relational and ORM-backed providers.
pub trait KeyValueRecord: Send + 'static {
    fn key(&self) -> &str;

    fn value(&self) -> &str;

    /// Consume the record, yielding its value field. Used on the read path
    /// so decoding does not have to copy the payload.
    fn into_value(self) -> String;
}

/// Constructor for records, supplied by the integration point wiring an
/// adapter to a record-backed store. Typed records generally need both
/// fields populated to be valid, so the key travels with the value.
pub type RecordFactory<R> = Arc<dyn Fn(&str, String) -> R + Send + Sync>;

/// A plain owned record for backends without a row type of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRecord {
    pub key: String,
    pub value: String,
}

impl TextRecord {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Factory handing this type to a record codec.
    pub fn factory() -> RecordFactory<TextRecord> {
        Arc::new(|key, value| TextRecord {
            key: key.to_string(),
            value,
        })
    }
}

impl KeyValueRecord for TextRecord {
    fn key(&self) -> &str {
        &self.key
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn into_value(self) -> String {
        self.value
    }
}
