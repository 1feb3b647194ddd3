// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application users and roles.

use serde::{Deserialize, Serialize};

/// Role stored on the user document. Unknown values load as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    SpeakingPlaner,
    SpeakingAssistant,
    #[default]
    #[serde(other)]
    None,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::SpeakingPlaner => "SPEAKING_PLANER",
            UserRole::SpeakingAssistant => "SPEAKING_ASSISTANT",
            UserRole::None => "NONE",
        }
    }
}

/// Application-level user record, keyed by the auth provider uid.
///
/// This is distinct from the provider's session: it carries the role and
/// the approval flag an administrator controls.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppUser {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub approved: bool,
    pub role: UserRole,
}

impl AppUser {
    /// Record written the first time a uid signs in.
    pub fn new_unapproved(identity: &Identity) -> Self {
        Self {
            uid: identity.uid.clone(),
            email: identity.email.clone(),
            display_name: identity.display_name.clone(),
            approved: false,
            role: UserRole::SpeakingAssistant,
        }
    }

    pub fn can_edit_speeches(&self) -> bool {
        matches!(self.role, UserRole::Admin | UserRole::SpeakingPlaner)
    }

    pub fn can_manage_users(&self) -> bool {
        matches!(self.role, UserRole::Admin | UserRole::SpeakingPlaner)
    }

    pub fn can_view_internal_notes(&self) -> bool {
        self.role != UserRole::SpeakingAssistant
    }
}

/// Who the auth provider says is signed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole) -> AppUser {
        AppUser {
            uid: "u1".to_string(),
            role,
            ..Default::default()
        }
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(
            serde_json::to_value(UserRole::SpeakingPlaner).unwrap(),
            "SPEAKING_PLANER"
        );
        let role: UserRole = serde_json::from_value("ADMIN".into()).unwrap();
        assert_eq!(role, UserRole::Admin);
        assert_eq!(UserRole::SpeakingAssistant.as_str(), "SPEAKING_ASSISTANT");
    }

    #[test]
    fn test_unknown_or_missing_role_is_none() {
        let role: UserRole = serde_json::from_value("SUPERUSER".into()).unwrap();
        assert_eq!(role, UserRole::None);

        let user: AppUser = serde_json::from_value(serde_json::json!({"uid": "u1"})).unwrap();
        assert_eq!(user.role, UserRole::None);
        assert!(!user.approved);
    }

    #[test]
    fn test_new_user_is_unapproved_assistant() {
        let identity = Identity {
            uid: "abc".to_string(),
            email: Some("a@b.de".to_string()),
            display_name: None,
        };
        let user = AppUser::new_unapproved(&identity);
        assert_eq!(user.uid, "abc");
        assert!(!user.approved);
        assert_eq!(user.role, UserRole::SpeakingAssistant);
    }

    #[test]
    fn test_convenience_checks() {
        assert!(user(UserRole::Admin).can_edit_speeches());
        assert!(user(UserRole::SpeakingPlaner).can_manage_users());
        assert!(!user(UserRole::SpeakingAssistant).can_edit_speeches());
        assert!(!user(UserRole::None).can_manage_users());

        assert!(user(UserRole::Admin).can_view_internal_notes());
        assert!(user(UserRole::None).can_view_internal_notes());
        assert!(!user(UserRole::SpeakingAssistant).can_view_internal_notes());
    }
}
