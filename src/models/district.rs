// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use serde::{Deserialize, Serialize};

/// Top-level grouping of congregations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct District {
    pub id: String,
    pub name: String,
    /// Speaker id of the circuit overseer
    pub circuit_overseer_id: String,
    /// Speaker id of the district leader
    pub district_leader_id: String,
    pub district_leader_congregation_id: String,
    pub active: bool,
}

impl Default for District {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            circuit_overseer_id: String::new(),
            district_leader_id: String::new(),
            district_leader_congregation_id: String::new(),
            active: true,
        }
    }
}
