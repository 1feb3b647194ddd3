// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The auth provider port.

use crate::models::Identity;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::watch;

/// A signed-in provider session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub identity: Identity,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("No user is signed in")]
    NoSession,

    #[error("Sign-in rejected: {0}")]
    InvalidCredentials(String),

    #[error("Auth provider error: {0}")]
    Provider(String),
}

/// Remote identity provider.
///
/// Sign-in and sign-out publish on the [`watch`] channel returned by
/// [`AuthProvider::subscribe`]. Token refreshes update the session in place
/// without notifying.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    fn current_session(&self) -> Option<AuthSession>;

    fn subscribe(&self) -> watch::Receiver<Option<AuthSession>>;

    async fn sign_in_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError>;

    /// Exchange a Google ID token for a provider session.
    async fn sign_in_with_google(&self, google_id_token: &str) -> Result<AuthSession, AuthError>;

    async fn create_user_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError>;

    async fn update_display_name(&self, display_name: &str) -> Result<AuthSession, AuthError>;

    /// Get a fresh ID token. Without `force`, a token that is not close to
    /// expiry is returned as is.
    async fn refresh_id_token(&self, force: bool) -> Result<AuthSession, AuthError>;

    async fn sign_out(&self);
}
