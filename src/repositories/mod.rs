// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed repositories, one per entity.
//!
//! Each repository knows where its entity lives in the collection tree and
//! turns parent ids into a [`CollectionPath`](crate::db::CollectionPath).

pub mod base;
pub mod congregation;
pub mod district;
pub mod event;
pub mod speaker;
pub mod speech;
pub mod user;

pub use base::{Entity, EntityStream, Repository, RepositoryError};
pub use congregation::CongregationRepository;
pub use district::DistrictRepository;
pub use event::CongregationEventRepository;
pub use speaker::SpeakerRepository;
pub use speech::SpeechRepository;
pub use user::UserRepository;

use crate::db::DocumentStore;
use std::sync::Arc;

/// All repositories over one store.
#[derive(Clone)]
pub struct Repositories {
    pub districts: DistrictRepository,
    pub congregations: CongregationRepository,
    pub speakers: SpeakerRepository,
    pub speeches: SpeechRepository,
    pub events: CongregationEventRepository,
    pub users: UserRepository,
}

impl Repositories {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            districts: DistrictRepository::new(store.clone()),
            congregations: CongregationRepository::new(store.clone()),
            speakers: SpeakerRepository::new(store.clone()),
            speeches: SpeechRepository::new(store.clone()),
            events: CongregationEventRepository::new(store.clone()),
            users: UserRepository::new(store),
        }
    }
}
