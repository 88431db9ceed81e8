use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::debug;

use crate::provider::{AsyncDataProvider, BatchProducer, DataCallback, Task, ValueProducer};

/// A reference in-memory backend provider.
///
/// Storage is a [`DashMap`]; every operation is submitted to a single worker
/// task owned by this provider, so work executes in submission order. Real
/// storage engines sit behind the same trait; this one exists so adapter
/// stacks can be exercised without any engine running.
#[derive(Clone)]
pub struct MemoryDataProvider<V> {
    map: Arc<DashMap<String, V>>,
    tasks: mpsc::UnboundedSender<Task>,
    handle: Handle,
}

impl<V> MemoryDataProvider<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a provider running its work on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a runtime context, same as
    /// [`Handle::current`].
    pub fn new() -> Self {
        Self::with_handle(Handle::current())
    }

    /// Create a provider running its work on the given runtime handle.
    pub fn with_handle(handle: Handle) -> Self {
        let (tasks, mut queue) = mpsc::unbounded_channel::<Task>();
        handle.spawn(async move {
            while let Some(task) = queue.recv().await {
                task();
            }
        });
        Self {
            map: Arc::new(DashMap::new()),
            tasks,
            handle,
        }
    }

    fn submit(&self, task: Task) {
        // The worker only stops once every sender is gone, so a send can
        // only fail while the runtime itself is shutting down.
        if self.tasks.send(task).is_err() {
            debug!("worker gone, dropping task");
        }
    }
}

impl<V> Default for MemoryDataProvider<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> AsyncDataProvider<V> for MemoryDataProvider<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn execute(&self, task: Task) {
        self.submit(task);
    }

    fn executor(&self) -> &Handle {
        &self.handle
    }

    fn put(&self, key: String, value: V) {
        let map = Arc::clone(&self.map);
        self.submit(Box::new(move || {
            debug!(key, "put");
            map.insert(key, value);
        }));
    }

    fn put_lazy(&self, key: String, producer: ValueProducer<V>) {
        let map = Arc::clone(&self.map);
        self.submit(Box::new(move || {
            debug!(key, "put (deferred)");
            map.insert(key, producer());
        }));
    }

    fn put_all(&self, entries: HashMap<String, V>) {
        let map = Arc::clone(&self.map);
        self.submit(Box::new(move || {
            debug!(count = entries.len(), "put_all");
            for (key, value) in entries {
                map.insert(key, value);
            }
        }));
    }

    fn put_all_lazy(&self, producer: BatchProducer<V>) {
        let map = Arc::clone(&self.map);
        self.submit(Box::new(move || {
            let entries = producer();
            debug!(count = entries.len(), "put_all (deferred)");
            for (key, value) in entries {
                map.insert(key, value);
            }
        }));
    }

    fn get(&self, key: String, callback: DataCallback<Option<V>>) {
        let map = Arc::clone(&self.map);
        self.submit(Box::new(move || {
            let value = map.get(&key).map(|entry| entry.value().clone());
            callback(Ok(value));
        }));
    }

    fn contains(&self, key: String, callback: DataCallback<bool>) {
        let map = Arc::clone(&self.map);
        self.submit(Box::new(move || {
            callback(Ok(map.contains_key(&key)));
        }));
    }

    fn remove_and_get(&self, key: String, callback: DataCallback<Option<V>>) {
        let map = Arc::clone(&self.map);
        self.submit(Box::new(move || {
            debug!(key, "remove");
            let previous = map.remove(&key).map(|(_, value)| value);
            callback(Ok(previous));
        }));
    }

    fn remove(&self, key: String) {
        let map = Arc::clone(&self.map);
        self.submit(Box::new(move || {
            debug!(key, "remove");
            map.remove(&key);
        }));
    }

    fn keys(&self, callback: DataCallback<Vec<String>>) {
        let map = Arc::clone(&self.map);
        self.submit(Box::new(move || {
            let keys = map.iter().map(|entry| entry.key().clone()).collect();
            callback(Ok(keys));
        }));
    }

    fn entries(&self, callback: DataCallback<HashMap<String, V>>) {
        let map = Arc::clone(&self.map);
        self.submit(Box::new(move || {
            let entries = map
                .iter()
                .map(|entry| (entry.key().clone(), entry.value().clone()))
                .collect();
            callback(Ok(entries));
        }));
    }

    fn size(&self, callback: DataCallback<usize>) {
        let map = Arc::clone(&self.map);
        self.submit(Box::new(move || {
            callback(Ok(map.len()));
        }));
    }
}
