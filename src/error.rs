// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::repositories::RepositoryError;
use crate::services::auth::AuthError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Failure result of every use case; converts to an HTTP response.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Account is waiting for approval")]
    NeedsApproval,

    #[error("Not allowed: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", None),
            AppError::NeedsApproval => (StatusCode::FORBIDDEN, "needs_approval", None),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", Some(msg.clone())),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::InvalidData(msg) => {
                tracing::warn!(error = %msg, "Stored data failed validation");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "invalid_data",
                    Some(msg.clone()),
                )
            }
            AppError::Auth(AuthError::InvalidCredentials(msg)) => {
                (StatusCode::UNAUTHORIZED, "auth_failed", Some(msg.clone()))
            }
            AppError::Auth(err) => {
                tracing::error!(error = %err, "Auth provider error");
                (StatusCode::BAD_GATEWAY, "auth_provider_error", None)
            }
            AppError::Repository(
                err @ (RepositoryError::BlankId { .. } | RepositoryError::Path(_)),
            ) => (StatusCode::BAD_REQUEST, "bad_request", Some(err.to_string())),
            AppError::Repository(err) => {
                tracing::error!(error = %err, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for use cases and handlers
pub type Result<T> = std::result::Result<T, AppError>;
