// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Role-based permission decisions.
//!
//! All decisions come from one table keyed by entity kind and action.
//! Anything not listed is denied. The target entity is accepted by the
//! typed policy but does not currently influence the result.

use crate::models::{
    AppUser, Congregation, CongregationEvent, District, Speaker, Speech, UserRole,
};
use serde::Serialize;
use std::marker::PhantomData;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Speech,
    Speaker,
    District,
    Congregation,
    CongregationEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Edit,
    Delete,
    ManageGeneral,
}

const PLANNERS: &[UserRole] = &[UserRole::Admin, UserRole::SpeakingPlaner];
const ADMINS: &[UserRole] = &[UserRole::Admin];

const PERMISSIONS: &[(EntityKind, Action, &[UserRole])] = &[
    (EntityKind::Speech, Action::Create, PLANNERS),
    (EntityKind::Speech, Action::Edit, PLANNERS),
    (EntityKind::Speech, Action::Delete, PLANNERS),
    (EntityKind::Speech, Action::ManageGeneral, PLANNERS),
    (EntityKind::CongregationEvent, Action::Create, PLANNERS),
    (EntityKind::CongregationEvent, Action::Edit, PLANNERS),
    (EntityKind::CongregationEvent, Action::Delete, PLANNERS),
    (EntityKind::CongregationEvent, Action::ManageGeneral, PLANNERS),
    (EntityKind::Speaker, Action::Create, ADMINS),
    (EntityKind::Speaker, Action::Edit, ADMINS),
    (EntityKind::Speaker, Action::Delete, ADMINS),
    (EntityKind::Speaker, Action::ManageGeneral, ADMINS),
    (EntityKind::District, Action::Create, ADMINS),
    (EntityKind::District, Action::Edit, ADMINS),
    (EntityKind::District, Action::Delete, ADMINS),
    (EntityKind::District, Action::ManageGeneral, ADMINS),
    (EntityKind::Congregation, Action::Create, ADMINS),
    (EntityKind::Congregation, Action::Edit, ADMINS),
    (EntityKind::Congregation, Action::Delete, ADMINS),
    (EntityKind::Congregation, Action::ManageGeneral, ADMINS),
];

/// Look up whether `role` may perform `action` on `kind`.
pub fn is_allowed(role: UserRole, kind: EntityKind, action: Action) -> bool {
    PERMISSIONS
        .iter()
        .find(|(k, a, _)| *k == kind && *a == action)
        .is_some_and(|(_, _, roles)| roles.contains(&role))
}

/// Entities that have a row set in the permission table.
pub trait Guarded {
    const KIND: EntityKind;
}

impl Guarded for Speech {
    const KIND: EntityKind = EntityKind::Speech;
}

impl Guarded for Speaker {
    const KIND: EntityKind = EntityKind::Speaker;
}

impl Guarded for District {
    const KIND: EntityKind = EntityKind::District;
}

impl Guarded for Congregation {
    const KIND: EntityKind = EntityKind::Congregation;
}

impl Guarded for CongregationEvent {
    const KIND: EntityKind = EntityKind::CongregationEvent;
}

/// Typed view of the table for one entity type.
#[derive(Debug, Clone, Copy)]
pub struct PermissionPolicy<T> {
    _entity: PhantomData<fn(&T)>,
}

impl<T: Guarded> Default for PermissionPolicy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Guarded> PermissionPolicy<T> {
    pub const fn new() -> Self {
        Self {
            _entity: PhantomData,
        }
    }

    pub fn can_create(&self, user: &AppUser) -> bool {
        is_allowed(user.role, T::KIND, Action::Create)
    }

    pub fn can_edit(&self, user: &AppUser, _entity: &T) -> bool {
        is_allowed(user.role, T::KIND, Action::Edit)
    }

    pub fn can_delete(&self, user: &AppUser, _entity: &T) -> bool {
        is_allowed(user.role, T::KIND, Action::Delete)
    }

    pub fn can_manage_general(&self, user: &AppUser) -> bool {
        is_allowed(user.role, T::KIND, Action::ManageGeneral)
    }

    /// Entity-free flags for clients that gate whole screens.
    pub fn capabilities(&self, user: &AppUser) -> Capabilities {
        Capabilities {
            can_create: is_allowed(user.role, T::KIND, Action::Create),
            can_edit: is_allowed(user.role, T::KIND, Action::Edit),
            can_delete: is_allowed(user.role, T::KIND, Action::Delete),
            can_manage_general: is_allowed(user.role, T::KIND, Action::ManageGeneral),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Capabilities {
    pub can_create: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_manage_general: bool,
}
