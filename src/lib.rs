//! Asynchronous key-value providers with value-mapping adapters.
//!
//! Backend stores implement [`AsyncDataProvider`] for whatever value type
//! they natively hold (text, JSON documents, or typed records). A
//! [`MappedProvider`] wraps any of them and exposes the same interface for a
//! different value type, translating values in both directions through a
//! [`ValueCodec`] while leaving keys, scheduling, and callback semantics
//! untouched. Adapters compose, so a caller picks the representation it
//! wants and stacks codecs until it reaches the backend's native one.
//!
//! ```no_run
//! use kvmap::{json_over_text, AsyncDataProvider, Document, MemoryDataProvider, ProviderExt};
//!
//! # async fn demo() -> kvmap::Result<()> {
//! // A text-native store, viewed through documents.
//! let store = json_over_text(MemoryDataProvider::<String>::new());
//! let mut doc = Document::new();
//! doc.insert("name".into(), "Ann".into());
//! store.put("user:1".into(), doc);
//! let fetched = store.get_value("user:1").await?;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod error;
pub mod logging;
pub mod mapper;
pub mod memory;
pub mod provider;
pub mod record;

pub use codec::{
    Document, JsonRecordCodec, JsonStringCodec, StringDocumentCodec, StringRecordCodec, ValueCodec,
    VALUE_FIELD,
};
pub use error::Error;
pub use logging::setup_logging;
pub use mapper::{
    json_over_records, json_over_text, text_over_documents, text_over_records, MappedProvider,
};
pub use memory::MemoryDataProvider;
pub use provider::{
    AsyncDataProvider, BatchProducer, DataCallback, ProviderExt, Task, ValueProducer,
};
pub use record::{KeyValueRecord, RecordFactory, TextRecord};

pub type Result<T> = std::result::Result<T, Error>;
