// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use super::ensure;
use crate::error::{AppError, Result};
use crate::models::{AppUser, UserRole};
use crate::repositories::UserRepository;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use serde::Deserialize;

#[derive(Clone)]
pub struct GetUser {
    repository: UserRepository,
}

impl GetUser {
    pub fn new(repository: UserRepository) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, uid: &str) -> Result<Option<AppUser>> {
        ensure(!uid.trim().is_empty(), "User ID cannot be blank.")?;
        Ok(self.repository.get(uid).await?)
    }

    /// Follow one user record; `None` while it does not exist.
    pub async fn observe(&self, uid: &str) -> Result<BoxStream<'static, Result<Option<AppUser>>>> {
        ensure(!uid.trim().is_empty(), "User ID cannot be blank.")?;
        let stream = self.repository.watch_user(uid).await?;
        Ok(stream.map(|user| user.map_err(AppError::from)).boxed())
    }
}

#[derive(Clone)]
pub struct ListUsers {
    repository: UserRepository,
}

impl ListUsers {
    pub fn new(repository: UserRepository) -> Self {
        Self { repository }
    }

    /// Pending approvals first, then by email.
    pub async fn execute(&self) -> Result<Vec<AppUser>> {
        let mut users = self.repository.list().await?;
        users.sort_by(|a, b| {
            a.approved
                .cmp(&b.approved)
                .then_with(|| a.email.cmp(&b.email))
                .then_with(|| a.uid.cmp(&b.uid))
        });
        Ok(users)
    }
}

/// Fields an administrator may change on a user record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccessUpdate {
    pub role: Option<UserRole>,
    pub approved: Option<bool>,
}

#[derive(Clone)]
pub struct UpdateUserAccess {
    repository: UserRepository,
}

impl UpdateUserAccess {
    pub fn new(repository: UserRepository) -> Self {
        Self { repository }
    }

    /// Apply `update` to user `uid` on behalf of `actor`.
    ///
    /// Only administrators may grant the admin role or change an
    /// administrator's record.
    pub async fn execute(
        &self,
        actor: &AppUser,
        uid: &str,
        update: UserAccessUpdate,
    ) -> Result<AppUser> {
        ensure(!uid.trim().is_empty(), "User ID cannot be blank.")?;
        if !actor.can_manage_users() {
            return Err(AppError::Forbidden("cannot manage users".to_string()));
        }
        if update.role == Some(UserRole::Admin) && actor.role != UserRole::Admin {
            return Err(AppError::Forbidden(
                "only administrators can grant the admin role".to_string(),
            ));
        }

        let mut user = self
            .repository
            .get(uid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{uid}'")))?;
        if user.role == UserRole::Admin && actor.role != UserRole::Admin {
            return Err(AppError::Forbidden(
                "only administrators can change an administrator".to_string(),
            ));
        }

        if let Some(role) = update.role {
            user.role = role;
        }
        if let Some(approved) = update.approved {
            user.approved = approved;
        }
        self.repository.update(&user).await?;

        tracing::info!(
            actor = %actor.uid,
            uid = %user.uid,
            role = user.role.as_str(),
            approved = user.approved,
            "Updated user access"
        );
        Ok(user)
    }
}
