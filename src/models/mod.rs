// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Domain records stored in Firestore and exchanged over the API.
//!
//! Field names are camelCase in both places. Every struct is
//! `#[serde(default)]` so partially populated documents still load.

pub mod congregation;
pub mod district;
pub mod event;
pub mod speaker;
pub mod speech;
pub mod user;

pub use congregation::Congregation;
pub use district::District;
pub use event::{CongregationEvent, EventType};
pub use speaker::{Speaker, SpiritualStatus};
pub use speech::Speech;
pub use user::{AppUser, Identity, UserRole};
