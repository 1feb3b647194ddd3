// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Speech planning: schedule public talks across congregations
//!
//! This crate provides the backend for planning speakers, speeches and
//! congregation events, stored in Firestore and served over a JSON API.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod permissions;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod usecases;

use config::Config;
use db::DocumentStore;
use repositories::Repositories;
use services::FirebaseTokenVerifier;
use std::sync::Arc;
use usecases::UseCases;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn DocumentStore>,
    pub repositories: Repositories,
    pub use_cases: UseCases,
    pub token_verifier: FirebaseTokenVerifier,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn DocumentStore>,
        token_verifier: FirebaseTokenVerifier,
    ) -> Self {
        let repositories = Repositories::new(store.clone());
        let use_cases = UseCases::new(&repositories);
        Self {
            config,
            store,
            repositories,
            use_cases,
            token_verifier,
        }
    }
}
