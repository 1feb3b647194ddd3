// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase Authentication over the Identity Toolkit REST API.
//!
//! Handles:
//! - Email/password sign-in and sign-up
//! - Google sign-in (ID token exchange)
//! - Display name updates
//! - ID token refresh through the Secure Token API

use super::auth::{AuthError, AuthProvider, AuthSession};
use crate::models::Identity;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Deserialize;
use tokio::sync::watch;

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1/token";
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;
/// Tokens this close to expiry are refreshed even without `force`.
const REFRESH_MARGIN_SECS: i64 = 300;

/// Error codes Firebase returns for bad user input rather than outages.
const CREDENTIAL_ERRORS: &[&str] = &[
    "EMAIL_NOT_FOUND",
    "INVALID_PASSWORD",
    "INVALID_LOGIN_CREDENTIALS",
    "INVALID_EMAIL",
    "USER_DISABLED",
    "EMAIL_EXISTS",
    "WEAK_PASSWORD",
    "INVALID_IDP_RESPONSE",
    "TOKEN_EXPIRED",
    "INVALID_REFRESH_TOKEN",
    "USER_NOT_FOUND",
];

pub struct FirebaseAuthClient {
    http: reqwest::Client,
    api_key: String,
    identity_url: String,
    token_url: String,
    sessions: watch::Sender<Option<AuthSession>>,
}

impl FirebaseAuthClient {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoints(
            api_key,
            IDENTITY_TOOLKIT_URL.to_string(),
            SECURE_TOKEN_URL.to_string(),
        )
    }

    /// Client for the Firebase Auth emulator at `host` (e.g. `localhost:9099`).
    pub fn for_emulator(api_key: String, host: &str) -> Self {
        Self::with_endpoints(
            api_key,
            format!("http://{host}/identitytoolkit.googleapis.com/v1"),
            format!("http://{host}/securetoken.googleapis.com/v1/token"),
        )
    }

    pub fn with_endpoints(api_key: String, identity_url: String, token_url: String) -> Self {
        let (sessions, _) = watch::channel(None);
        Self {
            http: reqwest::Client::new(),
            api_key,
            identity_url,
            token_url,
            sessions,
        }
    }

    async fn post_accounts<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> Result<T, AuthError> {
        let url = format!("{}/accounts:{}", self.identity_url, method);
        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Provider(format!("{method} request failed: {e}")))?;

        check_response_json(response).await
    }

    /// Replace the session and notify subscribers.
    fn publish(&self, session: AuthSession) -> AuthSession {
        tracing::info!(uid = %session.identity.uid, "Signed in");
        self.sessions.send_replace(Some(session.clone()));
        session
    }
}

/// Check response status and parse JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AuthError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let code = serde_json::from_str::<FirebaseErrorBody>(&body)
            .map(|e| e.error.message)
            .unwrap_or_default();

        // Messages look like "WEAK_PASSWORD : Password should be at least 6 characters".
        let kind = code.split(':').next().unwrap_or_default().trim();
        if status.is_client_error() && CREDENTIAL_ERRORS.contains(&kind) {
            return Err(AuthError::InvalidCredentials(code));
        }

        return Err(AuthError::Provider(format!("HTTP {}: {}", status, body)));
    }

    response
        .json()
        .await
        .map_err(|e| AuthError::Provider(format!("Failed to parse response: {}", e)))
}

fn expires_at(expires_in: Option<&str>) -> chrono::DateTime<Utc> {
    let secs = expires_in
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(DEFAULT_EXPIRES_IN_SECS);
    Utc::now() + Duration::seconds(secs)
}

#[derive(Debug, Deserialize)]
struct FirebaseErrorBody {
    error: FirebaseErrorDetail,
}

#[derive(Debug, Deserialize)]
struct FirebaseErrorDetail {
    message: String,
}

/// Response of signInWithPassword, signUp and signInWithIdp.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
    id_token: String,
    refresh_token: String,
    expires_in: Option<String>,
}

impl From<SignInResponse> for AuthSession {
    fn from(r: SignInResponse) -> Self {
        AuthSession {
            expires_at: expires_at(r.expires_in.as_deref()),
            identity: Identity {
                uid: r.local_id,
                email: r.email,
                display_name: r.display_name.filter(|n| !n.is_empty()),
            },
            id_token: r.id_token,
            refresh_token: r.refresh_token,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateResponse {
    display_name: Option<String>,
    id_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<String>,
}

/// Secure Token API response (snake_case, unlike Identity Toolkit).
#[derive(Debug, Deserialize)]
struct TokenResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
    user_id: String,
}

#[async_trait]
impl AuthProvider for FirebaseAuthClient {
    fn current_session(&self) -> Option<AuthSession> {
        self.sessions.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<AuthSession>> {
        self.sessions.subscribe()
    }

    async fn sign_in_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        let response: SignInResponse = self
            .post_accounts(
                "signInWithPassword",
                serde_json::json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;
        Ok(self.publish(response.into()))
    }

    async fn sign_in_with_google(&self, google_id_token: &str) -> Result<AuthSession, AuthError> {
        let post_body = format!("id_token={google_id_token}&providerId=google.com");
        let response: SignInResponse = self
            .post_accounts(
                "signInWithIdp",
                serde_json::json!({
                    "postBody": post_body,
                    "requestUri": "http://localhost",
                    "returnIdpCredential": true,
                    "returnSecureToken": true,
                }),
            )
            .await?;
        Ok(self.publish(response.into()))
    }

    async fn create_user_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        let response: SignInResponse = self
            .post_accounts(
                "signUp",
                serde_json::json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;
        tracing::info!(uid = %response.local_id, "Created auth account");
        Ok(self.publish(response.into()))
    }

    async fn update_display_name(&self, display_name: &str) -> Result<AuthSession, AuthError> {
        let current = self.current_session().ok_or(AuthError::NoSession)?;
        let response: UpdateResponse = self
            .post_accounts(
                "update",
                serde_json::json!({
                    "idToken": current.id_token,
                    "displayName": display_name,
                    "returnSecureToken": true,
                }),
            )
            .await?;

        let mut updated = current;
        updated.identity.display_name = response.display_name.or(Some(display_name.to_string()));
        if let (Some(id_token), Some(refresh_token)) = (response.id_token, response.refresh_token) {
            updated.id_token = id_token;
            updated.refresh_token = refresh_token;
            updated.expires_at = expires_at(response.expires_in.as_deref());
        }

        let uid = updated.identity.uid.clone();
        let stored = updated.clone();
        self.sessions.send_if_modified(move |slot| {
            if slot.as_ref().is_some_and(|s| s.identity.uid == uid) {
                *slot = Some(stored);
            }
            false
        });
        Ok(updated)
    }

    async fn refresh_id_token(&self, force: bool) -> Result<AuthSession, AuthError> {
        let current = self.current_session().ok_or(AuthError::NoSession)?;
        if !force && current.expires_at - Duration::seconds(REFRESH_MARGIN_SECS) > Utc::now() {
            return Ok(current);
        }

        let response = self
            .http
            .post(&self.token_url)
            .query(&[("key", self.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", current.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AuthError::Provider(format!("Token refresh request failed: {}", e)))?;
        let token: TokenResponse = check_response_json(response).await?;

        if token.user_id != current.identity.uid {
            return Err(AuthError::Provider(format!(
                "refreshed token belongs to a different user: {}",
                token.user_id
            )));
        }

        let refreshed = AuthSession {
            identity: current.identity,
            id_token: token.id_token,
            refresh_token: token.refresh_token,
            expires_at: expires_at(Some(&token.expires_in)),
        };

        // In-place update; listeners only care about sign-in state.
        let uid = refreshed.identity.uid.clone();
        let stored = refreshed.clone();
        self.sessions.send_if_modified(move |slot| {
            if slot.as_ref().is_some_and(|s| s.identity.uid == uid) {
                *slot = Some(stored);
            }
            false
        });

        tracing::debug!(uid = %refreshed.identity.uid, "ID token refreshed");
        Ok(refreshed)
    }

    async fn sign_out(&self) {
        let previous = self.sessions.send_replace(None);
        if let Some(session) = previous {
            tracing::info!(uid = %session.identity.uid, "Signed out");
        }
    }
}
