// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! District routes.

use super::{authorize, found, snapshot_events};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::District;
use crate::permissions::PermissionPolicy;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

const POLICY: PermissionPolicy<District> = PermissionPolicy::new();

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/districts", get(list_districts).post(create_district))
        .route("/api/districts/stream", get(stream_districts))
        .route(
            "/api/districts/{district_id}",
            get(get_district).put(update_district).delete(delete_district),
        )
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListQuery {
    #[serde(default)]
    pub active_only: bool,
}

async fn list_districts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<District>>> {
    Ok(Json(
        state.use_cases.get_districts.execute(query.active_only).await?,
    ))
}

async fn stream_districts(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse> {
    let snapshots = state.use_cases.observe_districts.execute().await?;
    Ok(snapshot_events(snapshots))
}

async fn get_district(
    State(state): State<Arc<AppState>>,
    Path(district_id): Path<String>,
) -> Result<Json<District>> {
    let district = state.use_cases.get_district.execute(&district_id).await?;
    Ok(Json(found(district, format!("district '{district_id}'"))?))
}

async fn create_district(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(district): Json<District>,
) -> Result<(StatusCode, Json<District>)> {
    authorize(POLICY.can_create(&auth.user), "cannot create districts")?;
    let saved = state.use_cases.save_district.execute(district).await?;
    tracing::info!(uid = %auth.user.uid, district_id = %saved.id, "Created district");
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn update_district(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(district_id): Path<String>,
    Json(district): Json<District>,
) -> Result<Json<District>> {
    let district = District {
        id: district_id,
        ..district
    };
    authorize(
        POLICY.can_edit(&auth.user, &district),
        "cannot edit districts",
    )?;
    Ok(Json(state.use_cases.save_district.execute(district).await?))
}

async fn delete_district(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(district_id): Path<String>,
) -> Result<StatusCode> {
    let target = District {
        id: district_id.clone(),
        ..Default::default()
    };
    authorize(
        POLICY.can_delete(&auth.user, &target),
        "cannot delete districts",
    )?;
    state.use_cases.delete_district.execute(&district_id).await?;
    tracing::info!(uid = %auth.user.uid, %district_id, "Deleted district");
    Ok(StatusCode::NO_CONTENT)
}
