// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The document store port.

use super::path::CollectionPath;
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use serde_json::Value;

/// A document as stored: its id plus the field map (without the id).
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub data: Value,
}

/// Live query results. Every item is the complete current contents of the
/// watched collection (or group). Dropping the stream stops the listener.
pub type SnapshotStream = BoxStream<'static, Result<Vec<StoredDocument>, StoreError>>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document id cannot be blank for {operation} in '{path}'")]
    BlankDocumentId {
        operation: &'static str,
        path: String,
    },

    #[error("document store not connected (offline mode)")]
    Offline,

    #[error("document data must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("document store error: {0}")]
    Backend(String),
}

/// Async access to a hierarchical document database.
///
/// Writes are independent; nothing here is transactional across documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert under a newly generated id and return that id.
    async fn add(&self, path: &CollectionPath, data: Value) -> Result<String, StoreError>;

    /// Create or fully overwrite the document `id`.
    async fn set(&self, path: &CollectionPath, id: &str, data: Value) -> Result<(), StoreError>;

    async fn get(&self, path: &CollectionPath, id: &str)
        -> Result<Option<StoredDocument>, StoreError>;

    async fn list(&self, path: &CollectionPath) -> Result<Vec<StoredDocument>, StoreError>;

    /// All documents in every collection named `collection`, at any depth.
    async fn list_group(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError>;

    async fn delete(&self, path: &CollectionPath, id: &str) -> Result<(), StoreError>;

    async fn watch(&self, path: &CollectionPath) -> Result<SnapshotStream, StoreError>;

    async fn watch_group(&self, collection: &str) -> Result<SnapshotStream, StoreError>;
}

/// Reject blank ids before they reach a backend, where they would address
/// the collection instead of a document.
pub(crate) fn ensure_document_id(
    operation: &'static str,
    path: &CollectionPath,
    id: &str,
) -> Result<(), StoreError> {
    if id.trim().is_empty() {
        return Err(StoreError::BlankDocumentId {
            operation,
            path: path.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn ensure_object(data: &Value) -> Result<(), StoreError> {
    let kind = match data {
        Value::Object(_) => return Ok(()),
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
    };
    Err(StoreError::NotAnObject(kind))
}

/// Adapt the receiving end of a snapshot channel into a [`SnapshotStream`].
pub(crate) fn receiver_stream(
    rx: tokio::sync::mpsc::Receiver<Result<Vec<StoredDocument>, StoreError>>,
) -> SnapshotStream {
    use futures_util::StreamExt;

    futures_util::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|item| (item, rx))
    })
    .boxed()
}
