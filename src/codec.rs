use serde_json::Value;

use crate::error::json_type_name;
use crate::record::{KeyValueRecord, RecordFactory};
use crate::{Error, Result};

/// The structured value shape: a tree of named fields.
pub type Document = serde_json::Map<String, Value>;

/// Field under which a scalar text value is wrapped when the inner store
/// only accepts documents. Backends reading such documents must use this
/// exact name.
pub const VALUE_FIELD: &str = "value";

/// A value translation between an outer representation (what the caller
/// works with) and an inner one (what the wrapped provider stores).
///
/// Encoding happens on the write path and cannot fail; decoding happens on
/// the read path and can, since stored data may be malformed or missing the
/// expected shape. Codecs are stateless with respect to any single call and
/// are shared across threads by the adapter.
pub trait ValueCodec: Send + Sync + 'static {
    type Outer: Send + 'static;
    type Inner: Send + 'static;

    /// Translate an outer value into the inner representation. The key is
    /// available because some inner representations (records) embed it.
    fn encode(&self, key: &str, value: Self::Outer) -> Self::Inner;

    /// Translate an inner value back to the outer representation.
    fn decode(&self, value: Self::Inner) -> Result<Self::Outer>;
}

fn parse_document(raw: &str) -> Result<Document> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(doc) => Ok(doc),
        other => Err(Error::NotADocument(json_type_name(&other))),
    }
}

fn document_to_string(doc: Document) -> String {
    Value::Object(doc).to_string()
}

/// Documents over a text-native store: serialize on write, parse on read.
/// Reading text that does not parse as a JSON object is an error.
#[derive(Debug, Default)]
pub struct JsonStringCodec;

impl ValueCodec for JsonStringCodec {
    type Outer = Document;
    type Inner = String;

    fn encode(&self, _key: &str, value: Document) -> String {
        document_to_string(value)
    }

    fn decode(&self, value: String) -> Result<Document> {
        parse_document(&value)
    }
}

/// Text over a document-native store: the scalar is wrapped under the
/// [`VALUE_FIELD`] field of a single-field document.
#[derive(Debug, Default)]
pub struct StringDocumentCodec;

impl ValueCodec for StringDocumentCodec {
    type Outer = String;
    type Inner = Document;

    fn encode(&self, _key: &str, value: String) -> Document {
        let mut doc = Document::new();
        doc.insert(VALUE_FIELD.to_string(), Value::String(value));
        doc
    }

    fn decode(&self, mut value: Document) -> Result<String> {
        match value.remove(VALUE_FIELD) {
            Some(Value::String(text)) => Ok(text),
            Some(other) => Err(Error::FieldType {
                field: VALUE_FIELD,
                found: json_type_name(&other),
            }),
            None => Err(Error::MissingField(VALUE_FIELD)),
        }
    }
}

/// Text over a record-native store. Records are built through the supplied
/// factory, since the backend's record type needs both fields to be valid.
pub struct StringRecordCodec<R> {
    factory: RecordFactory<R>,
}

impl<R: KeyValueRecord> StringRecordCodec<R> {
    pub fn new(factory: RecordFactory<R>) -> Self {
        Self { factory }
    }
}

impl<R: KeyValueRecord> ValueCodec for StringRecordCodec<R> {
    type Outer = String;
    type Inner = R;

    fn encode(&self, key: &str, value: String) -> R {
        (self.factory)(key, value)
    }

    fn decode(&self, value: R) -> Result<String> {
        Ok(value.into_value())
    }
}

/// Documents over a record-native store: the document is serialized into the
/// record's value field and parsed back out on read.
pub struct JsonRecordCodec<R> {
    factory: RecordFactory<R>,
}

impl<R: KeyValueRecord> JsonRecordCodec<R> {
    pub fn new(factory: RecordFactory<R>) -> Self {
        Self { factory }
    }
}

impl<R: KeyValueRecord> ValueCodec for JsonRecordCodec<R> {
    type Outer = Document;
    type Inner = R;

    fn encode(&self, key: &str, value: Document) -> R {
        (self.factory)(key, document_to_string(value))
    }

    fn decode(&self, value: R) -> Result<Document> {
        parse_document(&value.into_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    struct TestRecord {
        key: String,
        value: String,
    }

    impl KeyValueRecord for TestRecord {
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

    fn record_factory() -> RecordFactory<TestRecord> {
        Arc::new(|key, value| TestRecord {
            key: key.to_string(),
            value,
        })
    }

    fn doc(pairs: &[(&str, &str)]) -> Document {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect()
    }

    #[test]
    fn scalar_wrapping_round_trips() {
        let codec = StringDocumentCodec;
        for text in ["", "hello", "{\"nested\":true}", "line\nbreak"] {
            let encoded = codec.encode("k", text.to_string());
            assert_eq!(encoded.len(), 1);
            assert_eq!(codec.decode(encoded).unwrap(), text);
        }
    }

    #[test]
    fn scalar_wrapping_missing_field() {
        let codec = StringDocumentCodec;
        let err = codec.decode(doc(&[("other", "x")])).unwrap_err();
        assert!(matches!(err, Error::MissingField(VALUE_FIELD)));
    }

    #[test]
    fn scalar_wrapping_wrong_field_type() {
        let codec = StringDocumentCodec;
        let mut bad = Document::new();
        bad.insert(VALUE_FIELD.to_string(), Value::Bool(true));
        let err = codec.decode(bad).unwrap_err();
        assert!(matches!(
            err,
            Error::FieldType {
                field: VALUE_FIELD,
                ..
            }
        ));
    }

    #[test]
    fn json_string_round_trips() {
        let codec = JsonStringCodec;
        let document = doc(&[("name", "Ann"), ("city", "Berlin")]);
        let encoded = codec.encode("k", document.clone());
        assert_eq!(codec.decode(encoded).unwrap(), document);
    }

    #[test]
    fn json_string_rejects_malformed_text() {
        let codec = JsonStringCodec;
        assert!(matches!(
            codec.decode("{not json".to_string()),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn json_string_rejects_non_document() {
        let codec = JsonStringCodec;
        assert!(matches!(
            codec.decode("[1,2,3]".to_string()),
            Err(Error::NotADocument("an array"))
        ));
    }

    #[test]
    fn string_record_embeds_key_and_value() {
        let codec = StringRecordCodec::new(record_factory());
        let record = codec.encode("user:1", "hello".to_string());
        assert_eq!(record.key(), "user:1");
        assert_eq!(record.value(), "hello");
        assert_eq!(codec.decode(record).unwrap(), "hello");
    }

    #[test]
    fn json_record_round_trips() {
        let codec = JsonRecordCodec::new(record_factory());
        let document = doc(&[("name", "Bob")]);
        let record = codec.encode("user:2", document.clone());
        assert_eq!(record.key(), "user:2");
        assert_eq!(record.value(), r#"{"name":"Bob"}"#);
        assert_eq!(codec.decode(record).unwrap(), document);
    }

    #[test]
    fn json_record_rejects_malformed_value_field() {
        let codec = JsonRecordCodec::new(record_factory());
        let record = TestRecord {
            key: "k".to_string(),
            value: "oops".to_string(),
        };
        assert!(matches!(codec.decode(record), Err(Error::Parse(_))));
    }
}
