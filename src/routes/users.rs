// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User administration: approval and roles.

use super::{authorize, found};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::AppUser;
use crate::usecases::users::UserAccessUpdate;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", get(list_users))
        .route("/api/users/{uid}", get(get_user).put(update_user))
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<AppUser>>> {
    authorize(auth.user.can_manage_users(), "cannot manage users")?;
    Ok(Json(state.use_cases.list_users.execute().await?))
}

/// Any user may read their own record; others need user management rights.
async fn get_user(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(uid): Path<String>,
) -> Result<Json<AppUser>> {
    authorize(
        auth.user.uid == uid || auth.user.can_manage_users(),
        "cannot manage users",
    )?;
    let user = state.use_cases.get_user.execute(&uid).await?;
    Ok(Json(found(user, format!("user '{uid}'"))?))
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(uid): Path<String>,
    Json(update): Json<UserAccessUpdate>,
) -> Result<Json<AppUser>> {
    Ok(Json(
        state
            .use_cases
            .update_user_access
            .execute(&auth.user, &uid, update)
            .await?,
    ))
}
