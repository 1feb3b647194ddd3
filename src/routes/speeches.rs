// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Speech catalogue routes.

use super::districts::ListQuery;
use super::{authorize, snapshot_events};
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::Speech;
use crate::permissions::PermissionPolicy;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use std::sync::Arc;

const POLICY: PermissionPolicy<Speech> = PermissionPolicy::new();

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/speeches", get(list_speeches).post(create_speech))
        .route("/api/speeches/stream", get(stream_speeches))
        .route(
            "/api/speeches/{speech_id}",
            put(update_speech).delete(delete_speech),
        )
}

/// Speeches ordered by number. A stored non-numeric number fails the list.
async fn list_speeches(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Speech>>> {
    Ok(Json(
        state.use_cases.get_speeches.execute(query.active_only).await?,
    ))
}

async fn stream_speeches(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse> {
    let snapshots = state.use_cases.observe_speeches.execute().await?;
    Ok(snapshot_events(snapshots))
}

async fn create_speech(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(speech): Json<Speech>,
) -> Result<(StatusCode, Json<Speech>)> {
    authorize(POLICY.can_create(&auth.user), "cannot create speeches")?;
    let saved = state.use_cases.save_speech.execute(speech).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn update_speech(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(speech_id): Path<String>,
    Json(speech): Json<Speech>,
) -> Result<Json<Speech>> {
    authorize(POLICY.can_edit(&auth.user, &speech), "cannot edit speeches")?;
    // The number is the key; renumbering means delete and create.
    if speech.number.trim() != speech_id {
        return Err(AppError::bad_request(format!(
            "speech number '{}' does not match '{speech_id}'",
            speech.number
        )));
    }
    Ok(Json(state.use_cases.save_speech.execute(speech).await?))
}

async fn delete_speech(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(speech_id): Path<String>,
) -> Result<StatusCode> {
    let target = Speech {
        id: speech_id.clone(),
        number: speech_id.clone(),
        ..Default::default()
    };
    authorize(
        POLICY.can_delete(&auth.user, &target),
        "cannot delete speeches",
    )?;
    state.use_cases.delete_speech.execute(&speech_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
