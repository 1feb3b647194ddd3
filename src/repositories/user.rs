// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use super::base::{Entity, EntityStream, Repository, RepositoryError};
use crate::db::{collections, CollectionPath, DocumentStore};
use crate::models::{AppUser, Identity};
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use std::sync::Arc;

impl Entity for AppUser {
    const COLLECTION: &'static str = collections::USERS;
    const ID_FIELD: &'static str = "uid";

    fn id(&self) -> &str {
        &self.uid
    }

    fn set_id(&mut self, id: String) {
        self.uid = id;
    }
}

/// `users/{uid}`
#[derive(Clone)]
pub struct UserRepository {
    inner: Repository<AppUser>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: Repository::new(store),
        }
    }

    pub fn path() -> CollectionPath {
        CollectionPath::root(collections::USERS)
    }

    /// Load the user record for `identity`, creating an unapproved one on
    /// first sign-in. Existing records are returned unchanged.
    pub async fn get_or_create(&self, identity: &Identity) -> Result<AppUser, RepositoryError> {
        if let Some(user) = self.get(&identity.uid).await? {
            return Ok(user);
        }

        let user = AppUser::new_unapproved(identity);
        self.inner.save(&Self::path(), &user).await?;
        tracing::info!(uid = %user.uid, "Created user record awaiting approval");
        Ok(user)
    }

    pub async fn get(&self, uid: &str) -> Result<Option<AppUser>, RepositoryError> {
        self.inner.get(&Self::path(), uid).await
    }

    /// Overwrite the whole user document.
    pub async fn update(&self, user: &AppUser) -> Result<(), RepositoryError> {
        if user.uid.trim().is_empty() {
            return Err(RepositoryError::BlankId {
                operation: "update",
                location: Self::path().describe(),
            });
        }
        self.inner.save(&Self::path(), user).await.map(|_| ())
    }

    pub async fn list(&self) -> Result<Vec<AppUser>, RepositoryError> {
        self.inner.list(&Self::path()).await
    }

    /// Follow one user document; yields `None` while it does not exist.
    pub async fn watch_user(
        &self,
        uid: &str,
    ) -> Result<BoxStream<'static, Result<Option<AppUser>, RepositoryError>>, RepositoryError> {
        let uid = uid.to_string();
        let users: EntityStream<AppUser> = self.inner.watch(&Self::path()).await?;
        Ok(users
            .map(move |snapshot| {
                snapshot.map(|users| users.into_iter().find(|u| u.uid == uid))
            })
            .boxed())
    }
}
