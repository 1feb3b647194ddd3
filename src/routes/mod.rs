// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod congregations;
pub mod districts;
pub mod events;
pub mod me;
pub mod speakers;
pub mod speeches;
pub mod users;

use crate::error::{AppError, Result};
use crate::middleware::auth::require_auth;
use crate::usecases::Observed;
use crate::AppState;
use axum::http::{header, Method};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{middleware, routing::get, Json, Router};
use futures_util::{Stream, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Turn a policy decision into `403 forbidden`.
pub(crate) fn authorize(allowed: bool, what: &str) -> Result<()> {
    if allowed {
        Ok(())
    } else {
        Err(AppError::Forbidden(what.to_string()))
    }
}

pub(crate) fn found<T>(value: Option<T>, what: impl Into<String>) -> Result<T> {
    value.ok_or_else(|| AppError::NotFound(what.into()))
}

/// Server-sent events: one `snapshot` event per ordered list, an `error`
/// event when a snapshot fails.
pub(crate) fn snapshot_events<T>(
    snapshots: Observed<T>,
) -> Sse<impl Stream<Item = std::result::Result<Event, axum::Error>>>
where
    T: Serialize + Send + 'static,
{
    let events = snapshots.map(|snapshot| match snapshot {
        Ok(items) => Event::default().event("snapshot").json_data(items),
        Err(e) => {
            tracing::warn!(error = %e, "Snapshot stream failure");
            Ok(Event::default().event("error").data(e.to_string()))
        }
    });
    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - allow requests from frontend URL and localhost (for dev)
    let frontend_url = state.config.frontend_url.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == frontend_url
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    let public_routes = Router::new().route("/health", get(health_check));

    // Every /api route needs an approved user
    let protected_routes = Router::new()
        .merge(me::routes())
        .merge(districts::routes())
        .merge(congregations::routes())
        .merge(speakers::routes())
        .merge(speeches::routes())
        .merge(events::routes())
        .merge(users::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
