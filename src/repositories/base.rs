// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Generic typed repository over a [`DocumentStore`].

use crate::db::{CollectionPath, DocumentStore, PathError, StoreError, StoredDocument};
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

/// Placeholder used in error messages for entities without an id yet.
const NEW_ENTITY: &str = "[new]";

/// A record that lives in one named collection.
///
/// The id is the document id; it is stripped from the stored fields and
/// filled back in on read.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Leaf collection name.
    const COLLECTION: &'static str;
    /// Name of the id field in the serialized record.
    const ID_FIELD: &'static str = "id";

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("cannot {operation} entity with blank id in {location}")]
    BlankId {
        operation: &'static str,
        location: String,
    },

    #[error("Failed to {operation} entity '{id}' in {location}: {source}")]
    Store {
        operation: &'static str,
        id: String,
        location: String,
        #[source]
        source: StoreError,
    },

    #[error("Failed to decode entity '{id}' in {location}: {source}")]
    Decode {
        id: String,
        location: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Live stream of full, decoded collection snapshots.
pub type EntityStream<T> = BoxStream<'static, Result<Vec<T>, RepositoryError>>;

pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    fn encode(entity: &T, location: &str) -> Result<Value, RepositoryError> {
        let id = display_id(entity.id());
        let mut data = serde_json::to_value(entity).map_err(|source| RepositoryError::Decode {
            id: id.to_string(),
            location: location.to_string(),
            source,
        })?;
        if let Value::Object(fields) = &mut data {
            fields.remove(T::ID_FIELD);
        }
        Ok(data)
    }

    fn decode(doc: StoredDocument, location: &str) -> Result<T, RepositoryError> {
        let StoredDocument { id, mut data } = doc;
        if let Value::Object(fields) = &mut data {
            fields.insert(T::ID_FIELD.to_string(), Value::String(id.clone()));
        }
        serde_json::from_value(data).map_err(|source| RepositoryError::Decode {
            id,
            location: location.to_string(),
            source,
        })
    }

    fn decode_all(docs: Vec<StoredDocument>, location: &str) -> Result<Vec<T>, RepositoryError> {
        docs.into_iter()
            .map(|doc| Self::decode(doc, location))
            .collect()
    }

    /// Insert when the id is blank, overwrite otherwise. Returns the id the
    /// entity is stored under.
    pub async fn save(&self, path: &CollectionPath, entity: &T) -> Result<String, RepositoryError> {
        let location = path.describe();
        let data = Self::encode(entity, &location)?;
        let id = entity.id().trim();

        let result = if id.is_empty() {
            self.store.add(path, data).await
        } else {
            self.store.set(path, id, data).await.map(|()| id.to_string())
        };

        result.map_err(|source| {
            tracing::warn!(path = %path, id = display_id(id), error = %source, "Save failed");
            RepositoryError::Store {
                operation: "save",
                id: display_id(id).to_string(),
                location,
                source,
            }
        })
    }

    /// Fetch by id. A blank id finds nothing without touching the store.
    pub async fn get(&self, path: &CollectionPath, id: &str) -> Result<Option<T>, RepositoryError> {
        if id.trim().is_empty() {
            return Ok(None);
        }
        let location = path.describe();
        let doc = self
            .store
            .get(path, id)
            .await
            .map_err(|source| RepositoryError::Store {
                operation: "get",
                id: id.to_string(),
                location: location.clone(),
                source,
            })?;
        doc.map(|doc| Self::decode(doc, &location)).transpose()
    }

    pub async fn list(&self, path: &CollectionPath) -> Result<Vec<T>, RepositoryError> {
        let location = path.describe();
        let docs = self
            .store
            .list(path)
            .await
            .map_err(|source| RepositoryError::Store {
                operation: "list",
                id: "*".to_string(),
                location: location.clone(),
                source,
            })?;
        Self::decode_all(docs, &location)
    }

    /// Every document in any collection named `T::COLLECTION`.
    pub async fn list_group(&self) -> Result<Vec<T>, RepositoryError> {
        let location = group_location::<T>();
        let docs = self
            .store
            .list_group(T::COLLECTION)
            .await
            .map_err(|source| RepositoryError::Store {
                operation: "list",
                id: "*".to_string(),
                location: location.clone(),
                source,
            })?;
        Self::decode_all(docs, &location)
    }

    /// Delete by id. A blank id is rejected without touching the store.
    pub async fn delete(&self, path: &CollectionPath, id: &str) -> Result<(), RepositoryError> {
        let location = path.describe();
        if id.trim().is_empty() {
            return Err(RepositoryError::BlankId {
                operation: "delete",
                location,
            });
        }
        self.store
            .delete(path, id)
            .await
            .map_err(|source| RepositoryError::Store {
                operation: "delete",
                id: id.to_string(),
                location,
                source,
            })
    }

    pub async fn watch(&self, path: &CollectionPath) -> Result<EntityStream<T>, RepositoryError> {
        let location = path.describe();
        let stream = self
            .store
            .watch(path)
            .await
            .map_err(|source| RepositoryError::Store {
                operation: "watch",
                id: "*".to_string(),
                location: location.clone(),
                source,
            })?;
        Ok(Self::decode_stream(stream, location))
    }

    pub async fn watch_group(&self) -> Result<EntityStream<T>, RepositoryError> {
        let location = group_location::<T>();
        let stream = self
            .store
            .watch_group(T::COLLECTION)
            .await
            .map_err(|source| RepositoryError::Store {
                operation: "watch",
                id: "*".to_string(),
                location: location.clone(),
                source,
            })?;
        Ok(Self::decode_stream(stream, location))
    }

    fn decode_stream(stream: crate::db::SnapshotStream, location: String) -> EntityStream<T> {
        stream
            .map(move |snapshot| match snapshot {
                Ok(docs) => Self::decode_all(docs, &location),
                Err(source) => Err(RepositoryError::Store {
                    operation: "watch",
                    id: "*".to_string(),
                    location: location.clone(),
                    source,
                }),
            })
            .boxed()
    }
}

fn display_id(id: &str) -> &str {
    if id.trim().is_empty() {
        NEW_ENTITY
    } else {
        id
    }
}

fn group_location<T: Entity>() -> String {
    format!("collection group '{}'", T::COLLECTION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
    #[serde(default)]
    struct Note {
        id: String,
        text: String,
    }

    impl Entity for Note {
        const COLLECTION: &'static str = "notes";

        fn id(&self) -> &str {
            &self.id
        }

        fn set_id(&mut self, id: String) {
            self.id = id;
        }
    }

    fn notes_under(parent: &str) -> CollectionPath {
        CollectionPath::root("boards").child(parent, "notes").unwrap()
    }

    #[tokio::test]
    async fn test_save_blank_id_adds() {
        let store = Arc::new(MemoryStore::new());
        let repo = Repository::<Note>::new(store.clone());
        let path = notes_under("B1");

        let id = repo
            .save(
                &path,
                &Note {
                    id: String::new(),
                    text: "hello".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(id.len(), 20);

        let stored = store.get(&path, &id).await.unwrap().unwrap();
        assert!(stored.data.get("id").is_none(), "id is not a stored field");

        let loaded = repo.get(&path, &id).await.unwrap().unwrap();
        assert_eq!(loaded.id, id);
        assert_eq!(loaded.text, "hello");
    }

    #[tokio::test]
    async fn test_save_existing_id_overwrites() {
        let repo = Repository::<Note>::new(Arc::new(MemoryStore::new()));
        let path = notes_under("B1");
        let mut note = Note {
            id: "N1".to_string(),
            text: "one".to_string(),
        };
        assert_eq!(repo.save(&path, &note).await.unwrap(), "N1");
        note.text = "two".to_string();
        repo.save(&path, &note).await.unwrap();

        let all = repo.list(&path).await.unwrap();
        assert_eq!(all, vec![note]);
    }

    #[tokio::test]
    async fn test_blank_ids_short_circuit() {
        let store = Arc::new(MemoryStore::new());
        let repo = Repository::<Note>::new(store.clone());
        let path = notes_under("B1");

        assert!(repo.get(&path, "  ").await.unwrap().is_none());
        let err = repo.delete(&path, "").await.unwrap_err();
        assert!(matches!(err, RepositoryError::BlankId { operation: "delete", .. }));
        assert_eq!(store.operation_count(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_names_location() {
        let store = Arc::new(MemoryStore::new());
        store.fail_with("unavailable");
        let repo = Repository::<Note>::new(store);

        let err = repo
            .save(&notes_under("B7"), &Note::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to save entity '[new]' in subcollection 'notes' under parent 'B7' in 'boards': document store error: unavailable"
        );
    }

    #[tokio::test]
    async fn test_watch_group_decodes() {
        let store = Arc::new(MemoryStore::new());
        let repo = Repository::<Note>::new(store);
        repo.save(
            &notes_under("B1"),
            &Note {
                id: "N1".to_string(),
                text: "x".to_string(),
            },
        )
        .await
        .unwrap();

        let mut stream = repo.watch_group().await.unwrap();
        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, "N1");
    }
}
