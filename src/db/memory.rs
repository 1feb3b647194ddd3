// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory document store for tests and local development.

use super::path::CollectionPath;
use super::store::{
    ensure_document_id, ensure_object, receiver_stream, DocumentStore, SnapshotStream,
    StoreError, StoredDocument,
};
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc};

const CHANGE_CHANNEL_CAPACITY: usize = 256;
const SNAPSHOT_CHANNEL_CAPACITY: usize = 16;

/// Process-local store. Clones share the same data.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

struct Inner {
    collections: DashMap<CollectionPath, BTreeMap<String, Value>>,
    changes: broadcast::Sender<CollectionPath>,
    failure: Mutex<Option<String>>,
    operations: AtomicUsize,
}

enum WatchTarget {
    Collection(CollectionPath),
    Group(String),
}

impl WatchTarget {
    fn matches(&self, changed: &CollectionPath) -> bool {
        match self {
            WatchTarget::Collection(path) => path == changed,
            WatchTarget::Group(name) => changed.collection() == name,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                collections: DashMap::new(),
                changes,
                failure: Mutex::new(None),
                operations: AtomicUsize::new(0),
            }),
        }
    }

    /// Make every following operation fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure_slot() = Some(message.into());
    }

    /// Undo [`MemoryStore::fail_with`].
    pub fn recover(&self) {
        *self.failure_slot() = None;
    }

    /// Number of operations that reached the backend.
    pub fn operation_count(&self) -> usize {
        self.inner.operations.load(Ordering::SeqCst)
    }

    fn failure_slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.inner
            .failure
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin(&self) -> Result<(), StoreError> {
        self.inner.operations.fetch_add(1, Ordering::SeqCst);
        match self.failure_slot().as_ref() {
            Some(message) => Err(StoreError::Backend(message.clone())),
            None => Ok(()),
        }
    }

    fn snapshot(&self, path: &CollectionPath) -> Vec<StoredDocument> {
        self.inner
            .collections
            .get(path)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| StoredDocument {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn group_snapshot(&self, collection: &str) -> Vec<StoredDocument> {
        let mut found: Vec<(CollectionPath, StoredDocument)> = Vec::new();
        for entry in self.inner.collections.iter() {
            if entry.key().collection() != collection {
                continue;
            }
            for (id, data) in entry.value() {
                found.push((
                    entry.key().clone(),
                    StoredDocument {
                        id: id.clone(),
                        data: data.clone(),
                    },
                ));
            }
        }
        found.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.id.cmp(&b.1.id)));
        found.into_iter().map(|(_, doc)| doc).collect()
    }

    fn current(&self, target: &WatchTarget) -> Result<Vec<StoredDocument>, StoreError> {
        self.begin()?;
        Ok(match target {
            WatchTarget::Collection(path) => self.snapshot(path),
            WatchTarget::Group(name) => self.group_snapshot(name),
        })
    }

    fn spawn_watch(&self, target: WatchTarget) -> SnapshotStream {
        let mut changes = self.inner.changes.subscribe();
        let store = self.clone();
        let (tx, rx) = mpsc::channel(SNAPSHOT_CHANNEL_CAPACITY);

        tokio::spawn(async move {
            loop {
                if tx.send(store.current(&target)).await.is_err() {
                    return;
                }
                loop {
                    tokio::select! {
                        _ = tx.closed() => return,
                        change = changes.recv() => match change {
                            Ok(path) if target.matches(&path) => break,
                            Ok(_) => continue,
                            Err(RecvError::Lagged(skipped)) => {
                                tracing::debug!(skipped, "Memory store watcher lagged, resending snapshot");
                                break;
                            }
                            Err(RecvError::Closed) => return,
                        }
                    }
                }
            }
        });

        receiver_stream(rx)
    }

    fn notify(&self, path: &CollectionPath) {
        // No receivers just means nobody is watching.
        let _ = self.inner.changes.send(path.clone());
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn add(&self, path: &CollectionPath, data: Value) -> Result<String, StoreError> {
        ensure_object(&data)?;
        self.begin()?;
        let id = super::generate_document_id()?;
        self.inner
            .collections
            .entry(path.clone())
            .or_default()
            .insert(id.clone(), data);
        self.notify(path);
        Ok(id)
    }

    async fn set(&self, path: &CollectionPath, id: &str, data: Value) -> Result<(), StoreError> {
        ensure_document_id("set", path, id)?;
        ensure_object(&data)?;
        self.begin()?;
        self.inner
            .collections
            .entry(path.clone())
            .or_default()
            .insert(id.to_string(), data);
        self.notify(path);
        Ok(())
    }

    async fn get(
        &self,
        path: &CollectionPath,
        id: &str,
    ) -> Result<Option<StoredDocument>, StoreError> {
        ensure_document_id("get", path, id)?;
        self.begin()?;
        Ok(self.inner.collections.get(path).and_then(|docs| {
            docs.get(id).map(|data| StoredDocument {
                id: id.to_string(),
                data: data.clone(),
            })
        }))
    }

    async fn list(&self, path: &CollectionPath) -> Result<Vec<StoredDocument>, StoreError> {
        self.begin()?;
        Ok(self.snapshot(path))
    }

    async fn list_group(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        self.begin()?;
        Ok(self.group_snapshot(collection))
    }

    async fn delete(&self, path: &CollectionPath, id: &str) -> Result<(), StoreError> {
        ensure_document_id("delete", path, id)?;
        self.begin()?;
        let removed = self
            .inner
            .collections
            .get_mut(path)
            .and_then(|mut docs| docs.remove(id))
            .is_some();
        if removed {
            self.notify(path);
        }
        Ok(())
    }

    async fn watch(&self, path: &CollectionPath) -> Result<SnapshotStream, StoreError> {
        Ok(self.spawn_watch(WatchTarget::Collection(path.clone())))
    }

    async fn watch_group(&self, collection: &str) -> Result<SnapshotStream, StoreError> {
        Ok(self.spawn_watch(WatchTarget::Group(collection.to_string())))
    }
}
