// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;

/// Which document store backs the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Firestore,
    /// Process-local, lost on exit. For local development only.
    Memory,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// GCP / Firebase project ID; also the expected ID token audience
    pub gcp_project_id: String,
    /// Firebase Web API key, needed only for signing in from the CLI
    pub firebase_api_key: Option<String>,
    /// Firebase Auth emulator host (`FIREBASE_AUTH_EMULATOR_HOST`)
    pub auth_emulator_host: Option<String>,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Force an ID token refresh before resolving the app user
    pub force_token_refresh: bool,
    pub store_backend: StoreBackend,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            gcp_project_id: "test-project".to_string(),
            firebase_api_key: None,
            auth_emulator_host: None,
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            force_token_refresh: true,
            store_backend: StoreBackend::Memory,
        }
    }

    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            firebase_api_key: non_empty_var("FIREBASE_API_KEY"),
            auth_emulator_host: non_empty_var("FIREBASE_AUTH_EMULATOR_HOST"),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            force_token_refresh: match non_empty_var("FORCE_TOKEN_REFRESH") {
                Some(value) => parse_bool("FORCE_TOKEN_REFRESH", &value)?,
                None => true,
            },
            store_backend: match non_empty_var("DOCUMENT_STORE").as_deref() {
                None | Some("firestore") => StoreBackend::Firestore,
                Some("memory") => StoreBackend::Memory,
                Some(other) => {
                    return Err(ConfigError::Invalid {
                        var: "DOCUMENT_STORE",
                        value: other.to_string(),
                    })
                }
            },
        })
    }

    pub fn require_firebase_api_key(&self) -> Result<&str, ConfigError> {
        self.firebase_api_key
            .as_deref()
            .ok_or(ConfigError::Missing("FIREBASE_API_KEY"))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: value.to_string(),
        }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("GCP_PROJECT_ID", "speech-test");
        env::set_var("FORCE_TOKEN_REFRESH", "off");
        env::set_var("DOCUMENT_STORE", "memory");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.gcp_project_id, "speech-test");
        assert!(!config.force_token_refresh);
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.port, 8080);

        env::remove_var("FORCE_TOKEN_REFRESH");
        env::remove_var("DOCUMENT_STORE");
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("X", "TRUE").unwrap());
        assert!(!parse_bool("X", "0").unwrap());
        assert!(matches!(
            parse_bool("X", "maybe"),
            Err(ConfigError::Invalid { var: "X", .. })
        ));
    }

    #[test]
    fn test_missing_api_key() {
        let config = Config::test_default();
        assert!(matches!(
            config.require_firebase_api_key(),
            Err(ConfigError::Missing("FIREBASE_API_KEY"))
        ));
    }
}
