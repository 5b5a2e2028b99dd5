// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Notes, rests and the payload an event carries.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::pitch::Pitch;
use crate::error::Result;
use crate::timing::Time;

/// A pitched note with a duration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pitch: Pitch,
    duration: Time,
}

impl Note {
    pub fn new(pitch: Pitch, duration: impl Into<Time>) -> Self {
        Self {
            pitch,
            duration: duration.into(),
        }
    }

    /// Create a note from a pitch name, e.g. `Note::from_name("C#4", 1.0)`
    pub fn from_name(name: &str, duration: impl Into<Time>) -> Result<Self> {
        Ok(Self::new(Pitch::from_name(name)?, duration))
    }

    pub fn pitch(&self) -> Pitch {
        self.pitch
    }

    pub fn duration(&self) -> Time {
        self.duration
    }

    /// Explicit `(pitch, duration)` accessor pair
    pub fn parts(&self) -> (Pitch, Time) {
        (self.pitch, self.duration)
    }

    pub fn set_pitch(&mut self, pitch: Pitch) {
        self.pitch = pitch;
    }

    pub fn set_duration(&mut self, duration: impl Into<Time>) {
        self.duration = duration.into();
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Note[{}, {}]", self.pitch, self.duration.in_beats())
    }
}

/// A silent duration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rest {
    duration: Time,
}

impl Rest {
    pub fn new(duration: impl Into<Time>) -> Self {
        Self {
            duration: duration.into(),
        }
    }

    pub fn duration(&self) -> Time {
        self.duration
    }

    pub fn set_duration(&mut self, duration: impl Into<Time>) {
        self.duration = duration.into();
    }
}

impl fmt::Display for Rest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rest[{}]", self.duration.in_beats())
    }
}

/// What an event carries: a note or a rest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notation {
    Note(Note),
    Rest(Rest),
}

impl Notation {
    pub fn duration(&self) -> Time {
        match self {
            Notation::Note(note) => note.duration(),
            Notation::Rest(rest) => rest.duration(),
        }
    }

    pub fn set_duration(&mut self, duration: impl Into<Time>) {
        match self {
            Notation::Note(note) => note.set_duration(duration),
            Notation::Rest(rest) => rest.set_duration(duration),
        }
    }

    /// Pitch of a note; rests have none
    pub fn pitch(&self) -> Option<Pitch> {
        match self {
            Notation::Note(note) => Some(note.pitch()),
            Notation::Rest(_) => None,
        }
    }

    pub fn is_note(&self) -> bool {
        matches!(self, Notation::Note(_))
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, Notation::Rest(_))
    }

    /// Mutable access to the duration for in-place quantization
    pub fn duration_mut(&mut self) -> &mut Time {
        match self {
            Notation::Note(note) => &mut note.duration,
            Notation::Rest(rest) => &mut rest.duration,
        }
    }
}

impl From<Note> for Notation {
    fn from(note: Note) -> Self {
        Notation::Note(note)
    }
}

impl From<Rest> for Notation {
    fn from(rest: Rest) -> Self {
        Notation::Rest(rest)
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notation::Note(note) => write!(f, "{}", note),
            Notation::Rest(rest) => write!(f, "{}", rest),
        }
    }
}
