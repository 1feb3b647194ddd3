// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use super::base::{Entity, EntityStream, Repository, RepositoryError};
use super::congregation::CongregationRepository;
use crate::db::{collections, CollectionPath, DocumentStore};
use crate::models::CongregationEvent;
use std::sync::Arc;

impl Entity for CongregationEvent {
    const COLLECTION: &'static str = collections::CONGREGATION_EVENTS;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// `districts/{districtId}/congregations/{congregationId}/congregationEvents/{eventId}`
#[derive(Clone)]
pub struct CongregationEventRepository {
    inner: Repository<CongregationEvent>,
}

impl CongregationEventRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: Repository::new(store),
        }
    }

    pub fn path(district_id: &str, congregation_id: &str) -> Result<CollectionPath, RepositoryError> {
        Ok(CongregationRepository::path(district_id)?
            .child(congregation_id, collections::CONGREGATION_EVENTS)?)
    }

    pub async fn save(
        &self,
        district_id: &str,
        congregation_id: &str,
        event: &CongregationEvent,
    ) -> Result<String, RepositoryError> {
        self.inner
            .save(&Self::path(district_id, congregation_id)?, event)
            .await
    }

    pub async fn get(
        &self,
        district_id: &str,
        congregation_id: &str,
        id: &str,
    ) -> Result<Option<CongregationEvent>, RepositoryError> {
        self.inner
            .get(&Self::path(district_id, congregation_id)?, id)
            .await
    }

    pub async fn list(
        &self,
        district_id: &str,
        congregation_id: &str,
    ) -> Result<Vec<CongregationEvent>, RepositoryError> {
        self.inner
            .list(&Self::path(district_id, congregation_id)?)
            .await
    }

    pub async fn list_all(&self) -> Result<Vec<CongregationEvent>, RepositoryError> {
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
    ) -> Result<EntityStream<CongregationEvent>, RepositoryError> {
        self.inner
            .watch(&Self::path(district_id, congregation_id)?)
            .await
    }

    pub async fn watch_all(&self) -> Result<EntityStream<CongregationEvent>, RepositoryError> {
        self.inner.watch_group().await
    }
}
