// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar entries for a congregation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    CircuitAssemblyWithCircuitOverseer,
    CircuitOverseerCongregationVisit,
    Convention,
    Memorial,
    SpecialLecture,
    Miscellaneous,
    #[default]
    #[serde(other)]
    Unknown,
}

/// One calendar entry: a public talk, a visit, an assembly, ...
///
/// Speech and speaker names are denormalized so a calendar can be shown
/// without extra reads.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CongregationEvent {
    pub id: String,
    pub congregation_id: String,
    /// ISO date (`YYYY-MM-DD`)
    pub date_string: Option<String>,
    pub event_type: EventType,
    pub speech_id: Option<String>,
    pub speech_number: Option<String>,
    pub speech_subject: Option<String>,
    pub speaker_id: Option<String>,
    pub speaker_name: Option<String>,
    pub speaker_congregation_id: Option<String>,
    pub speaker_congregation_name: Option<String>,
    pub chairman_id: Option<String>,
    pub notes: Option<String>,
}

impl CongregationEvent {
    /// Parsed `date_string`; `None` when absent or malformed.
    pub fn date(&self) -> Option<NaiveDate> {
        self.date_string
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
    }
}
