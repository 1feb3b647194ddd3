// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use super::base::{Entity, EntityStream, Repository, RepositoryError};
use super::district::DistrictRepository;
use crate::db::{collections, CollectionPath, DocumentStore};
use crate::models::Congregation;
use std::sync::Arc;

impl Entity for Congregation {
    const COLLECTION: &'static str = collections::CONGREGATIONS;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// `districts/{districtId}/congregations/{congregationId}`
#[derive(Clone)]
pub struct CongregationRepository {
    inner: Repository<Congregation>,
}

impl CongregationRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: Repository::new(store),
        }
    }

    pub fn path(district_id: &str) -> Result<CollectionPath, RepositoryError> {
        Ok(DistrictRepository::path().child(district_id, collections::CONGREGATIONS)?)
    }

    pub async fn save(
        &self,
        district_id: &str,
        congregation: &Congregation,
    ) -> Result<String, RepositoryError> {
        self.inner.save(&Self::path(district_id)?, congregation).await
    }

    pub async fn get(
        &self,
        district_id: &str,
        id: &str,
    ) -> Result<Option<Congregation>, RepositoryError> {
        self.inner.get(&Self::path(district_id)?, id).await
    }

    pub async fn list(&self, district_id: &str) -> Result<Vec<Congregation>, RepositoryError> {
        self.inner.list(&Self::path(district_id)?).await
    }

    /// Congregations of every district.
    pub async fn list_all(&self) -> Result<Vec<Congregation>, RepositoryError> {
        self.inner.list_group().await
    }

    pub async fn delete(&self, district_id: &str, id: &str) -> Result<(), RepositoryError> {
        self.inner.delete(&Self::path(district_id)?, id).await
    }

    pub async fn watch(
        &self,
        district_id: &str,
    ) -> Result<EntityStream<Congregation>, RepositoryError> {
        self.inner.watch(&Self::path(district_id)?).await
    }

    pub async fn watch_all(&self) -> Result<EntityStream<Congregation>, RepositoryError> {
        self.inner.watch_group().await
    }
}
