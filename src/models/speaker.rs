// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpiritualStatus {
    MinisterialServant,
    Elder,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A person who gives talks, stored under their congregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Speaker {
    pub id: String,
    pub district_id: String,
    pub congregation_id: String,
    pub first_name: String,
    pub last_name: String,
    pub mobile: String,
    pub phone: String,
    pub email: String,
    pub spiritual_status: SpiritualStatus,
    /// Speech numbers this speaker is qualified to give
    pub speech_number_ids: Vec<String>,
    pub active: bool,
}

impl Default for Speaker {
    fn default() -> Self {
        Self {
            id: String::new(),
            district_id: String::new(),
            congregation_id: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            mobile: String::new(),
            phone: String::new(),
            email: String::new(),
            spiritual_status: SpiritualStatus::Unknown,
            speech_number_ids: Vec::new(),
            active: true,
        }
    }
}

impl Speaker {
    /// "First Last", falling back to whichever part is present.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_uses_defaults() {
        let speaker: Speaker = serde_json::from_value(serde_json::json!({
            "lastName": "Muster",
            "spiritualStatus": "PIONEER"
        }))
        .unwrap();
        assert_eq!(speaker.last_name, "Muster");
        assert!(speaker.active);
        assert_eq!(speaker.spiritual_status, SpiritualStatus::Unknown);
        assert!(speaker.speech_number_ids.is_empty());
        assert_eq!(speaker.display_name(), "Muster");
    }

    #[test]
    fn test_spiritual_status_values() {
        let parse = |v: &str| -> SpiritualStatus {
            serde_json::from_value(serde_json::Value::String(v.to_string())).unwrap()
        };
        assert_eq!(parse("ELDER"), SpiritualStatus::Elder);
        assert_eq!(parse("MINISTERIAL_SERVANT"), SpiritualStatus::MinisterialServant);
        assert_eq!(parse("UNKNOWN"), SpiritualStatus::Unknown);
        assert_eq!(parse("PIONEER"), SpiritualStatus::Unknown);
        assert_eq!(
            serde_json::to_value(SpiritualStatus::Unknown).unwrap(),
            "UNKNOWN"
        );
    }

    #[test]
    fn test_camel_case_fields() {
        let speaker = Speaker {
            congregation_id: "C1".to_string(),
            spiritual_status: SpiritualStatus::MinisterialServant,
            ..Default::default()
        };
        let value = serde_json::to_value(&speaker).unwrap();
        assert_eq!(value["congregationId"], "C1");
        assert_eq!(value["spiritualStatus"], "MINISTERIAL_SERVANT");
    }
}
