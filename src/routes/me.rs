// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The signed-in user and what they may do.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{AppUser, Congregation, CongregationEvent, District, Speaker, Speech};
use crate::permissions::{Capabilities, PermissionPolicy};
use crate::AppState;
use axum::{routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/me", get(get_me))
}

/// Per-entity capabilities, for enabling UI actions.
#[derive(Debug, Serialize)]
pub struct CapabilitySet {
    pub speeches: Capabilities,
    pub congregation_events: Capabilities,
    pub speakers: Capabilities,
    pub districts: Capabilities,
    pub congregations: Capabilities,
    pub can_manage_users: bool,
    pub can_view_internal_notes: bool,
}

impl CapabilitySet {
    pub fn for_user(user: &AppUser) -> Self {
        Self {
            speeches: PermissionPolicy::<Speech>::new().capabilities(user),
            congregation_events: PermissionPolicy::<CongregationEvent>::new().capabilities(user),
            speakers: PermissionPolicy::<Speaker>::new().capabilities(user),
            districts: PermissionPolicy::<District>::new().capabilities(user),
            congregations: PermissionPolicy::<Congregation>::new().capabilities(user),
            can_manage_users: user.can_manage_users(),
            can_view_internal_notes: user.can_view_internal_notes(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: AppUser,
    pub capabilities: CapabilitySet,
}

async fn get_me(Extension(auth): Extension<AuthUser>) -> Result<Json<MeResponse>> {
    let capabilities = CapabilitySet::for_user(&auth.user);
    Ok(Json(MeResponse {
        user: auth.user,
        capabilities,
    }))
}
