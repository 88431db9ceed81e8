use std::collections::HashMap;
use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::debug;

use crate::codec::{
    JsonRecordCodec, JsonStringCodec, StringDocumentCodec, StringRecordCodec, ValueCodec,
};
use crate::provider::{AsyncDataProvider, BatchProducer, DataCallback, Task, ValueProducer};
use crate::record::{KeyValueRecord, RecordFactory};

/// A provider for one value representation implemented by translating every
/// operation onto a wrapped provider of another representation.
///
/// Keys pass through untransformed. Writes encode before delegating; for
/// deferred producers the encode is folded into the producer itself, so it
/// runs exactly when (and only if) the inner provider evaluates the write.
/// Reads install a decoding wrapper around the caller's callback; absent
/// results are forwarded as `None` without touching the codec. Scheduling is
/// pure pass-through: the adapter owns no executor and no per-call state.
pub struct MappedProvider<P, C> {
    inner: Arc<P>,
    codec: Arc<C>,
}

impl<P, C> MappedProvider<P, C>
where
    C: ValueCodec,
    P: AsyncDataProvider<C::Inner> + 'static,
{
    pub fn new(inner: P, codec: C) -> Self {
        Self::from_shared(Arc::new(inner), codec)
    }

    /// Wrap an already shared provider, leaving the caller free to keep
    /// using the inner representation through its own handle.
    pub fn from_shared(inner: Arc<P>, codec: C) -> Self {
        Self {
            inner,
            codec: Arc::new(codec),
        }
    }
}

impl<P, C> Clone for MappedProvider<P, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            codec: Arc::clone(&self.codec),
        }
    }
}

impl<P, C> AsyncDataProvider<C::Outer> for MappedProvider<P, C>
where
    C: ValueCodec,
    P: AsyncDataProvider<C::Inner> + 'static,
{
    fn execute(&self, task: Task) {
        self.inner.execute(task);
    }

    fn executor(&self) -> &Handle {
        self.inner.executor()
    }

    fn put(&self, key: String, value: C::Outer) {
        let encoded = self.codec.encode(&key, value);
        self.inner.put(key, encoded);
    }

    fn put_lazy(&self, key: String, producer: ValueProducer<C::Outer>) {
        let codec = Arc::clone(&self.codec);
        let encode_key = key.clone();
        self.inner
            .put_lazy(key, Box::new(move || codec.encode(&encode_key, producer())));
    }

    fn put_all(&self, entries: HashMap<String, C::Outer>) {
        let encoded = entries
            .into_iter()
            .map(|(key, value)| {
                let value = self.codec.encode(&key, value);
                (key, value)
            })
            .collect();
        self.inner.put_all(encoded);
    }

    fn put_all_lazy(&self, producer: BatchProducer<C::Outer>) {
        let codec = Arc::clone(&self.codec);
        self.inner.put_all_lazy(Box::new(move || {
            producer()
                .into_iter()
                .map(|(key, value)| {
                    let value = codec.encode(&key, value);
                    (key, value)
                })
                .collect()
        }));
    }

    fn get(&self, key: String, callback: DataCallback<Option<C::Outer>>) {
        let codec = Arc::clone(&self.codec);
        self.inner.get(
            key,
            Box::new(move |result| {
                callback(result.and_then(|value| value.map(|v| codec.decode(v)).transpose()))
            }),
        );
    }

    fn contains(&self, key: String, callback: DataCallback<bool>) {
        self.inner.contains(key, callback);
    }

    fn remove_and_get(&self, key: String, callback: DataCallback<Option<C::Outer>>) {
        let codec = Arc::clone(&self.codec);
        self.inner.remove_and_get(
            key,
            Box::new(move |result| {
                callback(result.and_then(|value| value.map(|v| codec.decode(v)).transpose()))
            }),
        );
    }

    fn remove(&self, key: String) {
        self.inner.remove(key);
    }

    fn keys(&self, callback: DataCallback<Vec<String>>) {
        self.inner.keys(callback);
    }

    fn entries(&self, callback: DataCallback<HashMap<String, C::Outer>>) {
        let codec = Arc::clone(&self.codec);
        self.inner.entries(Box::new(move |result| {
            callback(result.and_then(|entries| {
                let mut decoded = HashMap::with_capacity(entries.len());
                for (key, value) in entries {
                    match codec.decode(value) {
                        Ok(value) => {
                            decoded.insert(key, value);
                        }
                        Err(e) => {
                            debug!(key, error = %e, "entry failed to decode");
                            return Err(e);
                        }
                    }
                }
                Ok(decoded)
            }))
        }));
    }

    fn size(&self, callback: DataCallback<usize>) {
        self.inner.size(callback);
    }
}

/// Work with documents on top of a store whose native values are text.
pub fn json_over_text<P>(provider: P) -> MappedProvider<P, JsonStringCodec>
where
    P: AsyncDataProvider<String> + 'static,
{
    MappedProvider::new(provider, JsonStringCodec)
}

/// Work with text on top of a store whose native values are documents; each
/// scalar is wrapped under a single `"value"` field.
pub fn text_over_documents<P>(provider: P) -> MappedProvider<P, StringDocumentCodec>
where
    P: AsyncDataProvider<crate::codec::Document> + 'static,
{
    MappedProvider::new(provider, StringDocumentCodec)
}

/// Work with text on top of a record-backed store. The factory builds the
/// store's record type from a key and a value.
pub fn text_over_records<P, R>(
    provider: P,
    factory: RecordFactory<R>,
) -> MappedProvider<P, StringRecordCodec<R>>
where
    R: KeyValueRecord,
    P: AsyncDataProvider<R> + 'static,
{
    MappedProvider::new(provider, StringRecordCodec::new(factory))
}

/// Work with documents on top of a record-backed store.
pub fn json_over_records<P, R>(
    provider: P,
    factory: RecordFactory<R>,
) -> MappedProvider<P, JsonRecordCodec<R>>
where
    R: KeyValueRecord,
    P: AsyncDataProvider<R> + 'static,
{
    MappedProvider::new(provider, JsonRecordCodec::new(factory))
}
