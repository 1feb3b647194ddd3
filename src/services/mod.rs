// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - integrations and long-running workers.

pub mod auth;
pub mod firebase_auth;
pub mod importer;
pub mod session;
pub mod token_verifier;

pub use auth::{AuthError, AuthProvider, AuthSession};
pub use firebase_auth::FirebaseAuthClient;
pub use importer::{ImportBatch, ImportError, ImportReport};
pub use session::{AuthState, SessionManager};
pub use token_verifier::{FirebaseTokenVerifier, TokenError};
