// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use serde::{Deserialize, Serialize};

/// A numbered talk outline. The document id is the number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Speech {
    pub id: String,
    /// Integer stored as a string, e.g. "100"
    pub number: String,
    pub subject: String,
    pub active: bool,
}

impl Default for Speech {
    fn default() -> Self {
        Self {
            id: String::new(),
            number: String::new(),
            subject: String::new(),
            active: true,
        }
    }
}

impl Speech {
    /// Numeric value of `number`, used for ordering.
    pub fn parsed_number(&self) -> Result<i64, std::num::ParseIntError> {
        self.number.trim().parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_number() {
        let speech = Speech {
            number: " 42".to_string(),
            ..Default::default()
        };
        assert_eq!(speech.parsed_number(), Ok(42));

        let bad = Speech {
            number: "4a".to_string(),
            ..Default::default()
        };
        assert!(bad.parsed_number().is_err());
    }
}
