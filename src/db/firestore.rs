// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore implementation of [`DocumentStore`].
//!
//! Documents are read as raw `gcloud_sdk` documents and converted to JSON so
//! repositories can stay generic. Live queries use a Firestore listen target
//! per watch; any change re-runs the full query.

use super::path::CollectionPath;
use super::store::{
    ensure_document_id, ensure_object, receiver_stream, DocumentStore, SnapshotStream,
    StoreError, StoredDocument,
};
use async_trait::async_trait;
use firestore::{
    FirestoreDocument, FirestoreListenEvent, FirestoreListenerTarget,
    FirestoreMemListenStateStorage,
};
use serde_json::Value;
use tokio::sync::mpsc;

const LISTEN_TARGET: u32 = 1;
const SNAPSHOT_CHANNEL_CAPACITY: usize = 16;

/// Firestore-backed document store.
#[derive(Clone)]
pub struct FirestoreStore {
    client: Option<firestore::FirestoreDb>,
}

/// Where a query looks: one parent, or every collection with the name.
#[derive(Clone)]
enum Scope {
    Parent(String),
    Group,
}

fn backend(err: impl std::fmt::Display) -> StoreError {
    StoreError::Backend(err.to_string())
}

impl FirestoreStore {
    /// Connect to Firestore.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, StoreError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Emulator connection with a dummy token so no local credentials are used.
    async fn create_emulator_client(project_id: &str) -> Result<Self, StoreError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            StoreError::Backend(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Offline store: every operation fails with [`StoreError::Offline`].
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, StoreError> {
        self.client.as_ref().ok_or(StoreError::Offline)
    }

    /// Full resource name of the document owning `path`, or the database
    /// documents root for top-level collections.
    fn parent_for(client: &firestore::FirestoreDb, path: &CollectionPath) -> String {
        let mut parent = client.get_documents_path().clone();
        for (collection, id) in path.parents() {
            parent.push('/');
            parent.push_str(collection);
            parent.push('/');
            parent.push_str(id);
        }
        parent
    }

    fn to_stored(doc: &FirestoreDocument) -> Result<StoredDocument, StoreError> {
        let id = doc.name.rsplit('/').next().unwrap_or_default().to_string();
        let mut data: Value = firestore::FirestoreDb::deserialize_doc_to(doc).map_err(backend)?;
        if let Value::Object(fields) = &mut data {
            fields.retain(|key, _| !key.starts_with("_firestore_"));
        }
        Ok(StoredDocument { id, data })
    }

    async fn fetch(
        client: &firestore::FirestoreDb,
        collection: &str,
        scope: &Scope,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let select = client.fluent().select().from(collection);
        let select = match scope {
            Scope::Parent(parent) => select.parent(parent.as_str()),
            Scope::Group => select.all_descendants(),
        };
        let docs = select.query().await.map_err(backend)?;
        docs.iter().map(Self::to_stored).collect()
    }

    async fn spawn_watch(
        &self,
        collection: &str,
        scope: Scope,
    ) -> Result<SnapshotStream, StoreError> {
        let client = self.get_client()?.clone();

        let mut listener = client
            .create_listener(FirestoreMemListenStateStorage::new())
            .await
            .map_err(backend)?;

        let select = client.fluent().select().from(collection);
        let select = match &scope {
            Scope::Parent(parent) => select.parent(parent.as_str()),
            Scope::Group => select.all_descendants(),
        };
        select
            .listen()
            .add_target(FirestoreListenerTarget::new(LISTEN_TARGET), &mut listener)
            .map_err(backend)?;

        let (dirty_tx, mut dirty_rx) = mpsc::unbounded_channel::<()>();
        listener
            .start(move |event| {
                let dirty_tx = dirty_tx.clone();
                async move {
                    if matches!(
                        event,
                        FirestoreListenEvent::DocumentChange(_)
                            | FirestoreListenEvent::DocumentDelete(_)
                            | FirestoreListenEvent::DocumentRemove(_)
                    ) {
                        let _ = dirty_tx.send(());
                    }
                    Ok(())
                }
            })
            .await
            .map_err(backend)?;

        let (tx, rx) = mpsc::channel(SNAPSHOT_CHANNEL_CAPACITY);
        let collection = collection.to_string();

        tokio::spawn(async move {
            loop {
                let snapshot = Self::fetch(&client, &collection, &scope).await;
                if tx.send(snapshot).await.is_err() {
                    break;
                }
                tokio::select! {
                    _ = tx.closed() => break,
                    dirty = dirty_rx.recv() => {
                        if dirty.is_none() {
                            break;
                        }
                        // Coalesce bursts into one re-query.
                        while dirty_rx.try_recv().is_ok() {}
                    }
                }
            }

            if let Err(e) = listener.shutdown().await {
                tracing::warn!(collection = %collection, error = %e, "Failed to stop Firestore listener");
            } else {
                tracing::debug!(collection = %collection, "Firestore listener stopped");
            }
        });

        Ok(receiver_stream(rx))
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn add(&self, path: &CollectionPath, data: Value) -> Result<String, StoreError> {
        let id = super::generate_document_id()?;
        self.set(path, &id, data).await?;
        Ok(id)
    }

    async fn set(&self, path: &CollectionPath, id: &str, data: Value) -> Result<(), StoreError> {
        ensure_document_id("set", path, id)?;
        ensure_object(&data)?;
        let client = self.get_client()?;
        let _: () = client
            .fluent()
            .update()
            .in_col(path.collection())
            .document_id(id)
            .parent(Self::parent_for(client, path))
            .object(&data)
            .execute()
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn get(
        &self,
        path: &CollectionPath,
        id: &str,
    ) -> Result<Option<StoredDocument>, StoreError> {
        ensure_document_id("get", path, id)?;
        let client = self.get_client()?;
        let doc = client
            .fluent()
            .select()
            .by_id_in(path.collection())
            .parent(Self::parent_for(client, path))
            .one(id)
            .await
            .map_err(backend)?;
        doc.as_ref().map(Self::to_stored).transpose()
    }

    async fn list(&self, path: &CollectionPath) -> Result<Vec<StoredDocument>, StoreError> {
        let client = self.get_client()?;
        let scope = Scope::Parent(Self::parent_for(client, path));
        Self::fetch(client, path.collection(), &scope).await
    }

    async fn list_group(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        Self::fetch(self.get_client()?, collection, &Scope::Group).await
    }

    async fn delete(&self, path: &CollectionPath, id: &str) -> Result<(), StoreError> {
        ensure_document_id("delete", path, id)?;
        let client = self.get_client()?;
        client
            .fluent()
            .delete()
            .from(path.collection())
            .document_id(id)
            .parent(Self::parent_for(client, path))
            .execute()
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn watch(&self, path: &CollectionPath) -> Result<SnapshotStream, StoreError> {
        let scope = Scope::Parent(Self::parent_for(self.get_client()?, path));
        self.spawn_watch(path.collection(), scope).await
    }

    async fn watch_group(&self, collection: &str) -> Result<SnapshotStream, StoreError> {
        self.spawn_watch(collection, Scope::Group).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offline_store_fails_every_call() {
        let store = FirestoreStore::new_mock();
        let path = CollectionPath::root("speeches");

        assert!(matches!(
            store.list(&path).await.unwrap_err(),
            StoreError::Offline
        ));
        assert!(matches!(
            store.set(&path, "1", serde_json::json!({})).await.unwrap_err(),
            StoreError::Offline
        ));
        assert!(matches!(
            store.watch_group("speakers").await.err(),
            Some(StoreError::Offline)
        ));
    }

    #[tokio::test]
    async fn test_blank_id_checked_before_connection() {
        let store = FirestoreStore::new_mock();
        let err = store
            .delete(&CollectionPath::root("speeches"), "")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::BlankDocumentId { .. }));
    }
}
