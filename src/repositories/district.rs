// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use super::base::{Entity, EntityStream, Repository, RepositoryError};
use crate::db::{collections, CollectionPath, DocumentStore};
use crate::models::District;
use std::sync::Arc;

impl Entity for District {
    const COLLECTION: &'static str = collections::DISTRICTS;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// `districts/{districtId}`
#[derive(Clone)]
pub struct DistrictRepository {
    inner: Repository<District>,
}

impl DistrictRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: Repository::new(store),
        }
    }

    pub fn path() -> CollectionPath {
        CollectionPath::root(collections::DISTRICTS)
    }

    pub async fn save(&self, district: &District) -> Result<String, RepositoryError> {
        self.inner.save(&Self::path(), district).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<District>, RepositoryError> {
        self.inner.get(&Self::path(), id).await
    }

    pub async fn list(&self) -> Result<Vec<District>, RepositoryError> {
        self.inner.list(&Self::path()).await
    }

    pub async fn active_districts(&self) -> Result<Vec<District>, RepositoryError> {
        let mut districts = self.list().await?;
        districts.retain(|d| d.active);
        Ok(districts)
    }

    pub async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        self.inner.delete(&Self::path(), id).await
    }

    pub async fn watch(&self) -> Result<EntityStream<District>, RepositoryError> {
        self.inner.watch(&Self::path()).await
    }
}
