// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Speaker routes, nested under their congregation.

use super::{authorize, found, snapshot_events};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::Speaker;
use crate::permissions::PermissionPolicy;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

const POLICY: PermissionPolicy<Speaker> = PermissionPolicy::new();

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/speakers", get(list_all_speakers))
        .route("/api/speakers/stream", get(stream_all_speakers))
        .route(
            "/api/districts/{district_id}/congregations/{congregation_id}/speakers",
            get(list_speakers).post(create_speaker),
        )
        .route(
            "/api/districts/{district_id}/congregations/{congregation_id}/speakers/{speaker_id}",
            get(get_speaker).put(update_speaker).delete(delete_speaker),
        )
        .route(
            "/api/districts/{district_id}/congregations/{congregation_id}/speakers/{speaker_id}/move",
            post(move_speaker),
        )
}

async fn list_all_speakers(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Speaker>>> {
    Ok(Json(state.use_cases.get_all_speakers.execute().await?))
}

async fn stream_all_speakers(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse> {
    let snapshots = state.use_cases.get_all_speakers.observe().await?;
    Ok(snapshot_events(snapshots))
}

async fn list_speakers(
    State(state): State<Arc<AppState>>,
    Path((district_id, congregation_id)): Path<(String, String)>,
) -> Result<Json<Vec<Speaker>>> {
    Ok(Json(
        state
            .use_cases
            .get_speakers
            .execute(&district_id, &congregation_id)
            .await?,
    ))
}

async fn get_speaker(
    State(state): State<Arc<AppState>>,
    Path((district_id, congregation_id, speaker_id)): Path<(String, String, String)>,
) -> Result<Json<Speaker>> {
    let speaker = state
        .use_cases
        .get_speaker
        .execute(&district_id, &congregation_id, &speaker_id)
        .await?;
    Ok(Json(found(speaker, format!("speaker '{speaker_id}'"))?))
}

async fn create_speaker(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((district_id, congregation_id)): Path<(String, String)>,
    Json(speaker): Json<Speaker>,
) -> Result<(StatusCode, Json<Speaker>)> {
    authorize(POLICY.can_create(&auth.user), "cannot create speakers")?;
    let saved = state
        .use_cases
        .save_speaker
        .execute(Speaker {
            district_id,
            congregation_id,
            ..speaker
        })
        .await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn update_speaker(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((district_id, congregation_id, speaker_id)): Path<(String, String, String)>,
    Json(speaker): Json<Speaker>,
) -> Result<Json<Speaker>> {
    let speaker = Speaker {
        id: speaker_id,
        district_id,
        congregation_id,
        ..speaker
    };
    authorize(POLICY.can_edit(&auth.user, &speaker), "cannot edit speakers")?;
    Ok(Json(state.use_cases.save_speaker.execute(speaker).await?))
}

/// Target location of a move.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub district_id: String,
    pub congregation_id: String,
}

/// Move the speaker to another congregation, keeping its id.
async fn move_speaker(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((district_id, congregation_id, speaker_id)): Path<(String, String, String)>,
    Json(target): Json<MoveRequest>,
) -> Result<Json<Speaker>> {
    let target_speaker = Speaker {
        id: speaker_id.clone(),
        ..Default::default()
    };
    authorize(
        POLICY.can_edit(&auth.user, &target_speaker),
        "cannot move speakers",
    )?;
    let current = state
        .use_cases
        .get_speaker
        .execute(&district_id, &congregation_id, &speaker_id)
        .await?;
    let current = found(current, format!("speaker '{speaker_id}'"))?;

    let moved = Speaker {
        id: speaker_id,
        district_id: target.district_id,
        congregation_id: target.congregation_id,
        ..current
    };
    state
        .use_cases
        .move_speaker
        .execute(&moved, &district_id, &congregation_id)
        .await?;
    Ok(Json(moved))
}

async fn delete_speaker(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((district_id, congregation_id, speaker_id)): Path<(String, String, String)>,
) -> Result<StatusCode> {
    let target = Speaker {
        id: speaker_id.clone(),
        ..Default::default()
    };
    authorize(
        POLICY.can_delete(&auth.user, &target),
        "cannot delete speakers",
    )?;
    state
        .use_cases
        .delete_speaker
        .execute(&district_id, &congregation_id, &speaker_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
