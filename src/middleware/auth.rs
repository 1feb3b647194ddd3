// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase ID token authentication middleware.

use crate::error::AppError;
use crate::models::AppUser;
use crate::services::TokenError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Approved application user behind the request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: AppUser,
}

/// Middleware that requires a valid ID token from an approved user.
///
/// First-time users get an unapproved record and a `needs_approval` error
/// until an administrator approves them.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request.headers().get(header::AUTHORIZATION).cloned();
    let identity = state
        .token_verifier
        .verify_header(auth_header.as_ref())
        .await
        .map_err(|e| match e {
            TokenError::Unauthorized(reason) => {
                tracing::debug!(%reason, "Rejected request token");
                if auth_header.is_some() {
                    AppError::InvalidToken
                } else {
                    AppError::Unauthorized
                }
            }
            TokenError::Transient(reason) => {
                AppError::Internal(anyhow::anyhow!("token verification unavailable: {reason}"))
            }
        })?;

    let user = state.repositories.users.get_or_create(&identity).await?;
    if !user.approved {
        tracing::info!(uid = %user.uid, "Request from user awaiting approval");
        return Err(AppError::NeedsApproval);
    }

    request.extensions_mut().insert(AuthUser { user });
    Ok(next.run(request).await)
}
