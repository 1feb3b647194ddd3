// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header};
use serde::Serialize;
use serde_json::Value;
use speech_planning::config::Config;
use speech_planning::db::MemoryStore;
use speech_planning::models::{AppUser, Identity, UserRole};
use speech_planning::routes::create_router;
use speech_planning::services::{AuthError, AuthProvider, AuthSession, FirebaseTokenVerifier};
use speech_planning::AppState;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::watch;
use tower::ServiceExt;

pub const TEST_KID: &str = "test-kid";
pub const TEST_SECRET: &[u8] = b"integration-test-secret";

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test app over an in-memory store, verifying HS256 tokens
/// signed with [`TEST_SECRET`].
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, Arc<MemoryStore>) {
    let config = Config::test_default();
    let store = Arc::new(MemoryStore::new());
    let verifier = FirebaseTokenVerifier::new_with_static_key(
        &config,
        TEST_KID,
        Algorithm::HS256,
        DecodingKey::from_secret(TEST_SECRET),
    )
    .expect("static verifier");

    let state = Arc::new(AppState::new(config, store.clone(), verifier));
    (create_router(state.clone()), state, store)
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

#[derive(Serialize)]
struct IdTokenClaims<'a> {
    iss: String,
    aud: &'a str,
    sub: &'a str,
    iat: u64,
    exp: u64,
    email: String,
}

/// Mint a Firebase-style ID token for `uid` accepted by the test app.
#[allow(dead_code)]
pub fn id_token(uid: &str) -> String {
    id_token_for_audience(uid, "test-project")
}

#[allow(dead_code)]
pub fn id_token_for_audience(uid: &str, audience: &str) -> String {
    let now = now_secs();
    let claims = IdTokenClaims {
        iss: format!("https://securetoken.google.com/{audience}"),
        aud: audience,
        sub: uid,
        iat: now,
        exp: now + 3600,
        email: format!("{uid}@example.org"),
    };
    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(TEST_KID.to_string());
    encode(&header, &claims, &EncodingKey::from_secret(TEST_SECRET)).unwrap()
}

/// Store a user record directly and return a token for it.
#[allow(dead_code)]
pub async fn seed_user(state: &AppState, uid: &str, role: UserRole, approved: bool) -> String {
    state
        .repositories
        .users
        .update(&AppUser {
            uid: uid.to_string(),
            email: Some(format!("{uid}@example.org")),
            display_name: None,
            approved,
            role,
        })
        .await
        .unwrap();
    id_token(uid)
}

/// Send a request and return the status and JSON body (`Null` when empty).
#[allow(dead_code)]
pub async fn send(
    app: &axum::Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Scriptable auth provider for session tests.
#[allow(dead_code)]
pub struct FakeAuthProvider {
    sessions: watch::Sender<Option<AuthSession>>,
    pub fail_refresh: AtomicBool,
    pub refreshes: AtomicUsize,
}

#[allow(dead_code)]
impl FakeAuthProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sessions: watch::channel(None).0,
            fail_refresh: AtomicBool::new(false),
            refreshes: AtomicUsize::new(0),
        })
    }

    pub fn session(uid: &str) -> AuthSession {
        AuthSession {
            identity: Identity {
                uid: uid.to_string(),
                email: Some(format!("{uid}@example.org")),
                display_name: None,
            },
            id_token: format!("id-{uid}"),
            refresh_token: format!("refresh-{uid}"),
            expires_at: Utc::now(),
        }
    }

    /// Sign `uid` in as if the provider restored a session.
    pub fn sign_in_as(&self, uid: &str) {
        self.sessions.send_replace(Some(Self::session(uid)));
    }
}

#[async_trait]
impl AuthProvider for FakeAuthProvider {
    fn current_session(&self) -> Option<AuthSession> {
        self.sessions.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<AuthSession>> {
        self.sessions.subscribe()
    }

    async fn sign_in_with_email_and_password(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<AuthSession, AuthError> {
        let uid = email.split('@').next().unwrap_or(email);
        self.sign_in_as(uid);
        Ok(Self::session(uid))
    }

    async fn sign_in_with_google(&self, google_id_token: &str) -> Result<AuthSession, AuthError> {
        self.sign_in_as(google_id_token);
        Ok(Self::session(google_id_token))
    }

    async fn create_user_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        self.sign_in_with_email_and_password(email, password).await
    }

    async fn update_display_name(&self, display_name: &str) -> Result<AuthSession, AuthError> {
        let mut session = self.current_session().ok_or(AuthError::NoSession)?;
        session.identity.display_name = Some(display_name.to_string());
        Ok(session)
    }

    async fn refresh_id_token(&self, _force: bool) -> Result<AuthSession, AuthError> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        if self.fail_refresh.load(Ordering::SeqCst) {
            return Err(AuthError::Provider("refresh failed".to_string()));
        }
        self.current_session().ok_or(AuthError::NoSession)
    }

    async fn sign_out(&self) {
        self.sessions.send_replace(None);
    }
}
