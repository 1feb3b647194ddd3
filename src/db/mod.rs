// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Document store layer.
//!
//! Repositories talk to a [`DocumentStore`]; production uses Firestore,
//! tests and local runs can use the in-memory backend.

pub mod firestore;
pub mod memory;
pub mod path;
pub mod store;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;
pub use path::{CollectionPath, PathError};
pub use store::{DocumentStore, SnapshotStream, StoreError, StoredDocument};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use ring::rand::{SecureRandom, SystemRandom};

/// Collection names.
pub mod collections {
    pub const DISTRICTS: &str = "districts";
    pub const CONGREGATIONS: &str = "congregations";
    pub const SPEAKERS: &str = "speakers";
    pub const CONGREGATION_EVENTS: &str = "congregationEvents";
    pub const SPEECHES: &str = "speeches";
    pub const USERS: &str = "users";
}

/// Random 20-character document id, same alphabet size as Firestore auto-ids.
pub fn generate_document_id() -> Result<String, StoreError> {
    let mut bytes = [0u8; 15];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| StoreError::Backend("system random source failed".to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique_and_url_safe() {
        let a = generate_document_id().unwrap();
        let b = generate_document_id().unwrap();
        assert_eq!(a.len(), 20);
        assert_ne!(a, b);
        assert!(a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
