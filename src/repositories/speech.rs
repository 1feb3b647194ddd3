// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use super::base::{Entity, EntityStream, Repository, RepositoryError};
use crate::db::{collections, CollectionPath, DocumentStore};
use crate::models::Speech;
use std::sync::Arc;

impl Entity for Speech {
    const COLLECTION: &'static str = collections::SPEECHES;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// `speeches/{number}`
#[derive(Clone)]
pub struct SpeechRepository {
    inner: Repository<Speech>,
}

impl SpeechRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: Repository::new(store),
        }
    }

    pub fn path() -> CollectionPath {
        CollectionPath::root(collections::SPEECHES)
    }

    /// Speeches are keyed by their number; any incoming id is replaced.
    pub async fn save(&self, speech: &Speech) -> Result<String, RepositoryError> {
        let mut keyed = speech.clone();
        keyed.set_id(speech.number.trim().to_string());
        self.inner.save(&Self::path(), &keyed).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Speech>, RepositoryError> {
        self.inner.get(&Self::path(), id).await
    }

    pub async fn list(&self) -> Result<Vec<Speech>, RepositoryError> {
        self.inner.list(&Self::path()).await
    }

    pub async fn active_speeches(&self) -> Result<Vec<Speech>, RepositoryError> {
        let mut speeches = self.list().await?;
        speeches.retain(|s| s.active);
        Ok(speeches)
    }

    pub async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        self.inner.delete(&Self::path(), id).await
    }

    pub async fn watch(&self) -> Result<EntityStream<Speech>, RepositoryError> {
        self.inner.watch(&Self::path()).await
    }
}
