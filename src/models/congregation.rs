// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use serde::{Deserialize, Serialize};

/// A congregation, stored under its district.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Congregation {
    pub id: String,
    pub district_id: String,
    pub name: String,
    pub address: String,
    pub meeting_time: String,
    pub active: bool,
}

impl Default for Congregation {
    fn default() -> Self {
        Self {
            id: String::new(),
            district_id: String::new(),
            name: String::new(),
            address: String::new(),
            meeting_time: String::new(),
            active: true,
        }
    }
}
