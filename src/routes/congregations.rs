// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Congregation routes, nested under their district.

use super::{authorize, found, snapshot_events};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::Congregation;
use crate::permissions::PermissionPolicy;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use std::sync::Arc;

const POLICY: PermissionPolicy<Congregation> = PermissionPolicy::new();

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/congregations", get(list_all_congregations))
        .route("/api/congregations/stream", get(stream_all_congregations))
        .route(
            "/api/districts/{district_id}/congregations",
            get(list_congregations).post(create_congregation),
        )
        .route(
            "/api/districts/{district_id}/congregations/{congregation_id}",
            get(get_congregation)
                .put(update_congregation)
                .delete(delete_congregation),
        )
}

/// Congregations of every district, ordered by name.
async fn list_all_congregations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Congregation>>> {
    Ok(Json(state.use_cases.get_all_congregations.execute().await?))
}

async fn stream_all_congregations(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse> {
    let snapshots = state.use_cases.observe_all_congregations.execute().await?;
    Ok(snapshot_events(snapshots))
}

async fn list_congregations(
    State(state): State<Arc<AppState>>,
    Path(district_id): Path<String>,
) -> Result<Json<Vec<Congregation>>> {
    Ok(Json(
        state.use_cases.get_congregations.execute(&district_id).await?,
    ))
}

async fn get_congregation(
    State(state): State<Arc<AppState>>,
    Path((district_id, congregation_id)): Path<(String, String)>,
) -> Result<Json<Congregation>> {
    let congregation = state
        .use_cases
        .get_congregation
        .execute(&district_id, &congregation_id)
        .await?;
    Ok(Json(found(
        congregation,
        format!("congregation '{congregation_id}' in district '{district_id}'"),
    )?))
}

async fn create_congregation(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(district_id): Path<String>,
    Json(congregation): Json<Congregation>,
) -> Result<(StatusCode, Json<Congregation>)> {
    authorize(POLICY.can_create(&auth.user), "cannot create congregations")?;
    let saved = state
        .use_cases
        .save_congregation
        .execute(Congregation {
            district_id,
            ..congregation
        })
        .await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn update_congregation(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((district_id, congregation_id)): Path<(String, String)>,
    Json(congregation): Json<Congregation>,
) -> Result<Json<Congregation>> {
    let congregation = Congregation {
        id: congregation_id,
        district_id,
        ..congregation
    };
    authorize(
        POLICY.can_edit(&auth.user, &congregation),
        "cannot edit congregations",
    )?;
    Ok(Json(
        state.use_cases.save_congregation.execute(congregation).await?,
    ))
}

async fn delete_congregation(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((district_id, congregation_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    let target = Congregation {
        id: congregation_id.clone(),
        district_id: district_id.clone(),
        ..Default::default()
    };
    authorize(
        POLICY.can_delete(&auth.user, &target),
        "cannot delete congregations",
    )?;
    state
        .use_cases
        .delete_congregation
        .execute(&district_id, &congregation_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
