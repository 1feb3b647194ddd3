// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Congregation calendar routes.

use super::{authorize, found, snapshot_events};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::CongregationEvent;
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

const POLICY: PermissionPolicy<CongregationEvent> = PermissionPolicy::new();

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/events", get(list_all_events))
        .route("/api/events/stream", get(stream_all_events))
        .route(
            "/api/districts/{district_id}/congregations/{congregation_id}/events",
            get(list_events).post(create_event),
        )
        .route(
            "/api/districts/{district_id}/congregations/{congregation_id}/events/stream",
            get(stream_events),
        )
        .route(
            "/api/districts/{district_id}/congregations/{congregation_id}/events/{event_id}",
            get(get_event).put(update_event).delete(delete_event),
        )
}

/// Events of every congregation, ordered by date.
async fn list_all_events(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CongregationEvent>>> {
    Ok(Json(state.use_cases.observe_all_events.snapshot().await?))
}

async fn stream_all_events(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse> {
    let snapshots = state.use_cases.observe_all_events.execute().await?;
    Ok(snapshot_events(snapshots))
}

async fn list_events(
    State(state): State<Arc<AppState>>,
    Path((district_id, congregation_id)): Path<(String, String)>,
) -> Result<Json<Vec<CongregationEvent>>> {
    Ok(Json(
        state
            .use_cases
            .get_events
            .execute(&district_id, &congregation_id)
            .await?,
    ))
}

async fn stream_events(
    State(state): State<Arc<AppState>>,
    Path((district_id, congregation_id)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let snapshots = state
        .use_cases
        .observe_events
        .execute(&district_id, &congregation_id)
        .await?;
    Ok(snapshot_events(snapshots))
}

async fn get_event(
    State(state): State<Arc<AppState>>,
    Path((district_id, congregation_id, event_id)): Path<(String, String, String)>,
) -> Result<Json<CongregationEvent>> {
    let event = state
        .use_cases
        .get_event
        .execute(&district_id, &congregation_id, &event_id)
        .await?;
    Ok(Json(found(event, format!("event '{event_id}'"))?))
}

async fn create_event(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((district_id, congregation_id)): Path<(String, String)>,
    Json(event): Json<CongregationEvent>,
) -> Result<(StatusCode, Json<CongregationEvent>)> {
    authorize(POLICY.can_create(&auth.user), "cannot create events")?;
    let saved = state
        .use_cases
        .save_event
        .execute(
            &district_id,
            CongregationEvent {
                congregation_id,
                ..event
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn update_event(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((district_id, congregation_id, event_id)): Path<(String, String, String)>,
    Json(event): Json<CongregationEvent>,
) -> Result<Json<CongregationEvent>> {
    let event = CongregationEvent {
        id: event_id,
        congregation_id,
        ..event
    };
    authorize(POLICY.can_edit(&auth.user, &event), "cannot edit events")?;
    Ok(Json(
        state.use_cases.save_event.execute(&district_id, event).await?,
    ))
}

async fn delete_event(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((district_id, congregation_id, event_id)): Path<(String, String, String)>,
) -> Result<StatusCode> {
    let target = CongregationEvent {
        id: event_id.clone(),
        congregation_id: congregation_id.clone(),
        ..Default::default()
    };
    authorize(POLICY.can_delete(&auth.user, &target), "cannot delete events")?;
    state
        .use_cases
        .delete_event
        .execute(&district_id, &congregation_id, &event_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
