// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in, sign-up and sign-out.
//!
//! Credentials are validated before the provider is contacted. After a
//! successful sign-in the user record is loaded, or created unapproved.

use super::ensure;
use crate::error::{AppError, Result};
use crate::models::AppUser;
use crate::repositories::UserRepository;
use crate::services::auth::AuthProvider;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;
use validator::{Validate, ValidationError, ValidationErrors};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignInCredentials {
    #[validate(email(message = "The email address is badly formatted."))]
    pub email: String,
    #[validate(custom(function = "not_blank"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUpCredentials {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(regex(path = *SIMPLE_EMAIL, message = "The email address is badly formatted."))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: String,
}

fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}

/// `local@domain.tld`: local part `[A-Za-z0-9._-]+`, then lowercase letters,
/// one or more dots, lowercase letters. Subdomains are not accepted.
static SIMPLE_EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._-]+@[a-z]+\.+[a-z]+$").expect("valid email regex")
});

fn invalid(errors: ValidationErrors) -> AppError {
    AppError::BadRequest(errors.to_string())
}

#[derive(Clone)]
pub struct SignInWithEmailAndPassword {
    provider: Arc<dyn AuthProvider>,
    users: UserRepository,
}

impl SignInWithEmailAndPassword {
    pub fn new(provider: Arc<dyn AuthProvider>, users: UserRepository) -> Self {
        Self { provider, users }
    }

    pub async fn execute(&self, credentials: &SignInCredentials) -> Result<AppUser> {
        credentials.validate().map_err(invalid)?;
        let session = self
            .provider
            .sign_in_with_email_and_password(credentials.email.trim(), &credentials.password)
            .await?;
        Ok(self.users.get_or_create(&session.identity).await?)
    }
}

#[derive(Clone)]
pub struct SignUpWithEmailAndPassword {
    provider: Arc<dyn AuthProvider>,
    users: UserRepository,
}

impl SignUpWithEmailAndPassword {
    pub fn new(provider: Arc<dyn AuthProvider>, users: UserRepository) -> Self {
        Self { provider, users }
    }

    /// Create the account, set its display name, then create the
    /// (unapproved) user record.
    pub async fn execute(&self, credentials: &SignUpCredentials) -> Result<AppUser> {
        credentials.validate().map_err(invalid)?;
        let created = self
            .provider
            .create_user_with_email_and_password(credentials.email.trim(), &credentials.password)
            .await?;
        let named = self
            .provider
            .update_display_name(credentials.name.trim())
            .await
            .map_err(|e| {
                tracing::warn!(uid = %created.identity.uid, error = %e, "Failed to set display name");
                e
            })?;
        Ok(self.users.get_or_create(&named.identity).await?)
    }
}

#[derive(Clone)]
pub struct GoogleSignIn {
    provider: Arc<dyn AuthProvider>,
    users: UserRepository,
}

impl GoogleSignIn {
    pub fn new(provider: Arc<dyn AuthProvider>, users: UserRepository) -> Self {
        Self { provider, users }
    }

    pub async fn execute(&self, google_id_token: &str) -> Result<AppUser> {
        ensure(
            !google_id_token.trim().is_empty(),
            "Google ID token cannot be blank.",
        )?;
        let session = self.provider.sign_in_with_google(google_id_token).await?;
        Ok(self.users.get_or_create(&session.identity).await?)
    }
}

#[derive(Clone)]
pub struct SignOut {
    provider: Arc<dyn AuthProvider>,
}

impl SignOut {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self { provider }
    }

    pub async fn execute(&self) -> Result<()> {
        self.provider.sign_out().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{Identity, UserRole};
    use crate::services::auth::{AuthError, AuthSession};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::watch;

    struct StubProvider {
        sessions: watch::Sender<Option<AuthSession>>,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                sessions: watch::channel(None).0,
                calls: AtomicUsize::new(0),
            })
        }

        fn session(uid: &str, email: &str, name: Option<&str>) -> AuthSession {
            AuthSession {
                identity: Identity {
                    uid: uid.to_string(),
                    email: Some(email.to_string()),
                    display_name: name.map(str::to_string),
                },
                id_token: "id".to_string(),
                refresh_token: "refresh".to_string(),
                expires_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl AuthProvider for StubProvider {
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
        ) -> std::result::Result<AuthSession, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if password != "secret" {
                return Err(AuthError::InvalidCredentials("INVALID_PASSWORD".to_string()));
            }
            let session = Self::session("uid-1", email, None);
            self.sessions.send_replace(Some(session.clone()));
            Ok(session)
        }

        async fn sign_in_with_google(
            &self,
            _google_id_token: &str,
        ) -> std::result::Result<AuthSession, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Self::session("google-1", "g@gmail.com", Some("G")))
        }

        async fn create_user_with_email_and_password(
            &self,
            email: &str,
            _password: &str,
        ) -> std::result::Result<AuthSession, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let session = Self::session("new-1", email, None);
            self.sessions.send_replace(Some(session.clone()));
            Ok(session)
        }

        async fn update_display_name(
            &self,
            display_name: &str,
        ) -> std::result::Result<AuthSession, AuthError> {
            let mut session = self.current_session().ok_or(AuthError::NoSession)?;
            session.identity.display_name = Some(display_name.to_string());
            Ok(session)
        }

        async fn refresh_id_token(&self, _force: bool) -> std::result::Result<AuthSession, AuthError> {
            self.current_session().ok_or(AuthError::NoSession)
        }

        async fn sign_out(&self) {
            self.sessions.send_replace(None);
        }
    }

    fn users() -> UserRepository {
        UserRepository::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_simple_email_pattern() {
        assert!(SIMPLE_EMAIL.is_match("max.muster@example.de"));
        assert!(SIMPLE_EMAIL.is_match("a_b-c@mail..de"));
        assert!(!SIMPLE_EMAIL.is_match("max@sub.example.de"));
        assert!(!SIMPLE_EMAIL.is_match("max@Example.de"));
        assert!(!SIMPLE_EMAIL.is_match("max@example"));
        assert!(!SIMPLE_EMAIL.is_match("@example.de"));
        assert!(!SIMPLE_EMAIL.is_match("max+tag@example.de"));
        assert!(!SIMPLE_EMAIL.is_match("max@example."));
    }

    #[tokio::test]
    async fn test_sign_in_rejects_bad_input_without_provider_call() {
        let provider = StubProvider::new();
        let sign_in = SignInWithEmailAndPassword::new(provider.clone(), users());

        let err = sign_in
            .execute(&SignInCredentials {
                email: "not-an-email".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = sign_in
            .execute(&SignInCredentials {
                email: "a@b.de".to_string(),
                password: "   ".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sign_in_creates_unapproved_user() {
        let provider = StubProvider::new();
        let user = SignInWithEmailAndPassword::new(provider, users())
            .execute(&SignInCredentials {
                email: "a@b.de".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(user.uid, "uid-1");
        assert!(!user.approved);
        assert_eq!(user.role, UserRole::SpeakingAssistant);
    }

    #[tokio::test]
    async fn test_wrong_password_is_auth_error() {
        let provider = StubProvider::new();
        let err = SignInWithEmailAndPassword::new(provider, users())
            .execute(&SignInCredentials {
                email: "a@b.de".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Auth(AuthError::InvalidCredentials(_))
        ));
    }

    #[tokio::test]
    async fn test_sign_up_validation() {
        let provider = StubProvider::new();
        let sign_up = SignUpWithEmailAndPassword::new(provider.clone(), users());
        let cases = [
            ("", "a@b.de", "123456"),
            ("Max", "a@sub.b.de", "123456"),
            ("Max", "max+tag@b.de", "123456"),
            ("Max", "a@b.de", "12345"),
        ];
        for (name, email, password) in cases {
            let result = sign_up
                .execute(&SignUpCredentials {
                    name: name.to_string(),
                    email: email.to_string(),
                    password: password.to_string(),
                })
                .await;
            assert!(matches!(result, Err(AppError::BadRequest(_))), "{name}/{email}");
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sign_up_records_display_name() {
        let provider = StubProvider::new();
        let repository = users();
        let user = SignUpWithEmailAndPassword::new(provider, repository.clone())
            .execute(&SignUpCredentials {
                name: " Max Muster ".to_string(),
                email: "max@example.de".to_string(),
                password: "123456".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(user.display_name.as_deref(), Some("Max Muster"));
        assert!(repository.get("new-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_google_sign_in_requires_token() {
        let provider = StubProvider::new();
        let google = GoogleSignIn::new(provider.clone(), users());
        assert!(matches!(
            google.execute("").await,
            Err(AppError::BadRequest(_))
        ));
        let user = google.execute("google-token").await.unwrap();
        assert_eq!(user.uid, "google-1");
    }

    #[tokio::test]
    async fn test_sign_out_clears_session() {
        let provider = StubProvider::new();
        SignInWithEmailAndPassword::new(provider.clone(), users())
            .execute(&SignInCredentials {
                email: "a@b.de".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();
        SignOut::new(provider.clone()).execute().await.unwrap();
        assert!(provider.current_session().is_none());
    }
}
