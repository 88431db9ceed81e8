use std::collections::HashMap;
use std::future::Future;

use tokio::runtime::Handle;
use tokio::sync::oneshot;

use crate::{Error, Result};

/// A unit of work scheduled onto a provider's executor.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// One-shot completion callback for an asynchronous operation.
///
/// Invoked exactly once, with `Ok` holding the operation result or `Err`
/// holding a decode or backend failure. A failed value translation is
/// delivered through the same callback rather than being swallowed, so the
/// exactly-once contract holds on every path.
pub type DataCallback<T> = Box<dyn FnOnce(Result<T>) + Send + 'static>;

/// Deferred value producer for lazy writes.
///
/// Invoked at most once, at the moment the innermost provider actually
/// executes the write. If the write is never executed, the producer is never
/// invoked.
pub type ValueProducer<V> = Box<dyn FnOnce() -> V + Send + 'static>;

/// Batched form of [`ValueProducer`], yielding a whole key-value map.
pub type BatchProducer<V> = Box<dyn FnOnce() -> HashMap<String, V> + Send + 'static>;

/// An asynchronous key-value provider for values of type `V`.
///
/// Implemented by backend stores natively and by [`MappedProvider`] on top
/// of them for any value representation a codec can reach. None of the
/// methods block: each returns once the operation has been handed to the
/// provider's executor. Write operations without a callback are
/// fire-and-forget; use [`ProviderExt::flush`] as a barrier when ordering
/// against them matters.
///
/// [`MappedProvider`]: crate::mapper::MappedProvider
pub trait AsyncDataProvider<V>: Send + Sync
where
    V: Send + 'static,
{
    /// Schedule arbitrary work on this provider's executor.
    fn execute(&self, task: Task);

    /// The runtime handle all operations of this provider run on.
    ///
    /// Adapters forward the wrapped provider's handle unchanged; they never
    /// own an executor of their own.
    fn executor(&self) -> &Handle;

    /// Unconditional upsert.
    fn put(&self, key: String, value: V);

    /// Upsert where the value is produced at execution time.
    fn put_lazy(&self, key: String, producer: ValueProducer<V>);

    /// Upsert every entry of `entries` as one unit.
    fn put_all(&self, entries: HashMap<String, V>);

    /// Batched form of [`put_lazy`](AsyncDataProvider::put_lazy).
    fn put_all_lazy(&self, producer: BatchProducer<V>);

    /// Look up `key`; the callback receives `None` if it is absent.
    fn get(&self, key: String, callback: DataCallback<Option<V>>);

    /// Whether `key` is present.
    fn contains(&self, key: String, callback: DataCallback<bool>);

    /// Delete `key`, handing the previous value (if any) to the callback.
    fn remove_and_get(&self, key: String, callback: DataCallback<Option<V>>);

    /// Delete `key` without retrieving the previous value.
    fn remove(&self, key: String);

    /// All keys currently present.
    fn keys(&self, callback: DataCallback<Vec<String>>);

    /// All entries currently present. An empty store yields an empty map,
    /// never an absent marker.
    fn entries(&self, callback: DataCallback<HashMap<String, V>>);

    /// Number of entries currently present.
    fn size(&self, callback: DataCallback<usize>);
}

/// `async` bridge over the callback surface of [`AsyncDataProvider`].
///
/// Each method installs a oneshot channel as the completion callback and
/// awaits it, so tests and async callers do not have to thread boxed
/// closures around. Blanket-implemented for every provider.
pub trait ProviderExt<V>: AsyncDataProvider<V>
where
    V: Send + 'static,
{
    /// Await the value stored under `key`.
    fn get_value(&self, key: impl Into<String>) -> impl Future<Output = Result<Option<V>>> + Send {
        let (tx, rx) = oneshot::channel();
        self.get(
            key.into(),
            Box::new(move |result| {
                let _ = tx.send(result);
            }),
        );
        async move { rx.await.unwrap_or(Err(Error::Incomplete)) }
    }

    /// Await whether `key` is present.
    fn has_key(&self, key: impl Into<String>) -> impl Future<Output = Result<bool>> + Send {
        let (tx, rx) = oneshot::channel();
        self.contains(
            key.into(),
            Box::new(move |result| {
                let _ = tx.send(result);
            }),
        );
        async move { rx.await.unwrap_or(Err(Error::Incomplete)) }
    }

    /// Delete `key` and await the previous value.
    fn take_value(&self, key: impl Into<String>) -> impl Future<Output = Result<Option<V>>> + Send {
        let (tx, rx) = oneshot::channel();
        self.remove_and_get(
            key.into(),
            Box::new(move |result| {
                let _ = tx.send(result);
            }),
        );
        async move { rx.await.unwrap_or(Err(Error::Incomplete)) }
    }

    /// Await the full key list.
    fn all_keys(&self) -> impl Future<Output = Result<Vec<String>>> + Send {
        let (tx, rx) = oneshot::channel();
        self.keys(Box::new(move |result| {
            let _ = tx.send(result);
        }));
        async move { rx.await.unwrap_or(Err(Error::Incomplete)) }
    }

    /// Await the full entry map.
    fn all_entries(&self) -> impl Future<Output = Result<HashMap<String, V>>> + Send {
        let (tx, rx) = oneshot::channel();
        self.entries(Box::new(move |result| {
            let _ = tx.send(result);
        }));
        async move { rx.await.unwrap_or(Err(Error::Incomplete)) }
    }

    /// Await the entry count.
    fn count(&self) -> impl Future<Output = Result<usize>> + Send {
        let (tx, rx) = oneshot::channel();
        self.size(Box::new(move |result| {
            let _ = tx.send(result);
        }));
        async move { rx.await.unwrap_or(Err(Error::Incomplete)) }
    }

    /// Barrier: resolves once every operation submitted before it has been
    /// executed by the provider.
    fn flush(&self) -> impl Future<Output = ()> + Send {
        let (tx, rx) = oneshot::channel();
        self.execute(Box::new(move || {
            let _ = tx.send(());
        }));
        async move {
            let _ = rx.await;
        }
    }
}

impl<V, P> ProviderExt<V> for P
where
    V: Send + 'static,
    P: AsyncDataProvider<V> + ?Sized,
{
}
