// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Key mode metadata as reported by the score collaborator.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::pitch::Semitones;

/// Mode of a detected key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyMode {
    Major,
    Minor,
    /// Any other mode string (dorian, lydian, ...)
    Other(String),
}

impl KeyMode {
    /// Parse a mode string, case-insensitively
    pub fn parse(mode: &str) -> Self {
        match mode.trim().to_lowercase().as_str() {
            "major" | "ionian" => KeyMode::Major,
            "minor" | "aeolian" => KeyMode::Minor,
            other => KeyMode::Other(other.to_string()),
        }
    }

    /// Offset from the tonic to the pitch that gets aligned when
    /// transposing to a target key. Minor keys align their relative major.
    pub fn transposition_anchor(&self) -> Option<Semitones> {
        match self {
            KeyMode::Major => Some(0),
            KeyMode::Minor => Some(3),
            KeyMode::Other(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            KeyMode::Major => "major",
            KeyMode::Minor => "minor",
            KeyMode::Other(name) => name,
        }
    }
}

impl fmt::Display for KeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode() {
        assert_eq!(KeyMode::parse("major"), KeyMode::Major);
        assert_eq!(KeyMode::parse(" Minor "), KeyMode::Minor);
        assert_eq!(KeyMode::parse("dorian"), KeyMode::Other("dorian".to_string()));
    }

    #[test]
    fn test_transposition_anchor() {
        assert_eq!(KeyMode::Major.transposition_anchor(), Some(0));
        assert_eq!(KeyMode::Minor.transposition_anchor(), Some(3));
        assert_eq!(KeyMode::parse("lydian").transposition_anchor(), None);
    }
}
