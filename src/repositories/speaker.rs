// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use super::base::{Entity, EntityStream, Repository, RepositoryError};
use super::congregation::CongregationRepository;
use crate::db::{collections, CollectionPath, DocumentStore};
use crate::models::Speaker;
use std::sync::Arc;

impl Entity for Speaker {
    const COLLECTION: &'static str = collections::SPEAKERS;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// `districts/{districtId}/congregations/{congregationId}/speakers/{speakerId}`
#[derive(Clone)]
pub struct SpeakerRepository {
    inner: Repository<Speaker>,
}

impl SpeakerRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: Repository::new(store),
        }
    }

    pub fn path(district_id: &str, congregation_id: &str) -> Result<CollectionPath, RepositoryError> {
        Ok(CongregationRepository::path(district_id)?
            .child(congregation_id, collections::SPEAKERS)?)
    }

    pub async fn save(
        &self,
        district_id: &str,
        congregation_id: &str,
        speaker: &Speaker,
    ) -> Result<String, RepositoryError> {
        self.inner
            .save(&Self::path(district_id, congregation_id)?, speaker)
            .await
    }

    pub async fn get(
        &self,
        district_id: &str,
        congregation_id: &str,
        id: &str,
    ) -> Result<Option<Speaker>, RepositoryError> {
        self.inner
            .get(&Self::path(district_id, congregation_id)?, id)
            .await
    }

    pub async fn list(
        &self,
        district_id: &str,
        congregation_id: &str,
    ) -> Result<Vec<Speaker>, RepositoryError> {
        self.inner
            .list(&Self::path(district_id, congregation_id)?)
            .await
    }

    /// Speakers of every congregation.
    pub async fn list_all(&self) -> Result<Vec<Speaker>, RepositoryError> {
        self.inner.list_group().await
    }

    pub async fn delete(
        &self,
        district_id: &str,
        congregation_id: &str,
        id: &str,
    ) -> Result<(), RepositoryError> {
        self.inner
            .delete(&Self::path(district_id, congregation_id)?, id)
            .await
    }

    pub async fn watch(
        &self,
        district_id: &str,
        congregation_id: &str,
    ) -> Result<EntityStream<Speaker>, RepositoryError> {
        self.inner
            .watch(&Self::path(district_id, congregation_id)?)
            .await
    }

    pub async fn watch_all(&self) -> Result<EntityStream<Speaker>, RepositoryError> {
        self.inner.watch_group().await
    }
}
