// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch representation.
//!
//! A [`Pitch`] is a relative pitch class (0-11) with an optional octave.
//! Pitches without an octave are class-only and have no absolute MIDI code.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Relative pitch class type (0-11)
pub type PitchClass = u8;

/// Semitone offset type
pub type Semitones = i32;

/// Names used when formatting a relative pitch
pub const PITCH_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Look up the pitch class of a spelled name without octave
fn spelled_pitch_class(name: &str) -> Option<PitchClass> {
    match name {
        "C" => Some(0),
        "C#" | "Db" | "D-" => Some(1),
        "D" => Some(2),
        "D#" | "Eb" | "E-" => Some(3),
        "E" => Some(4),
        "F" => Some(5),
        "F#" | "Gb" | "G-" => Some(6),
        "G" => Some(7),
        "G#" | "Ab" | "A-" => Some(8),
        "A" => Some(9),
        "A#" | "Bb" | "B-" => Some(10),
        "B" => Some(11),
        _ => None,
    }
}

/// Parse a pitch class spelling, wrapping uncommon spellings like `E#` or `Cb`
fn parse_pitch_class(name: &str) -> Result<PitchClass> {
    if let Some(pc) = spelled_pitch_class(name) {
        return Ok(pc);
    }

    let invalid = || Error::construction(format!("invalid pitch string '{}'", name));

    let mut chars = name.chars();
    let accidental = chars.next_back().ok_or_else(invalid)?;
    let base = spelled_pitch_class(chars.as_str()).ok_or_else(invalid)? as i32;
    let shifted = match accidental {
        '#' => base + 1,
        'b' | '-' => base - 1,
        _ => return Err(invalid()),
    };
    Ok(shifted.rem_euclid(12) as PitchClass)
}

/// A musical pitch, e.g. `C#` or `Bb4`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pitch {
    relative: PitchClass,
    octave: Option<u8>,
}

impl Pitch {
    /// Create a pitch from a relative pitch (0-11) and optional octave
    pub fn new(relative: PitchClass, octave: Option<u8>) -> Result<Self> {
        if relative > 11 {
            return Err(Error::construction(format!(
                "relative pitch must be between 0 and 11, got {}",
                relative
            )));
        }
        Ok(Self { relative, octave })
    }

    /// Parse a pitch name such as `C#`, `Db4` or `B-3`
    pub fn from_name(name: &str) -> Result<Self> {
        let name = name.trim();
        let split = name
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(name.len());
        let (pitch_part, octave_part) = name.split_at(split);

        let relative = parse_pitch_class(pitch_part)?;
        let octave = if octave_part.is_empty() {
            None
        } else {
            Some(octave_part.parse::<u8>().map_err(|_| {
                Error::construction(format!("invalid octave in pitch string '{}'", name))
            })?)
        };

        Self::new(relative, octave)
    }

    /// Parse a pitch name and attach an explicit octave.
    ///
    /// Fails if the name already carries an octave.
    pub fn from_name_with_octave(name: &str, octave: u8) -> Result<Self> {
        Self::from_name(name)?.with_octave(octave)
    }

    /// Pitch for an absolute MIDI code (C4 = 60).
    ///
    /// Codes 0-11 sit in octave -1, which has no representation here.
    pub fn from_midi(code: u8) -> Result<Self> {
        if code < 12 {
            return Err(Error::construction(format!(
                "MIDI code {} is below octave 0",
                code
            )));
        }
        Ok(Self {
            relative: code % 12,
            octave: Some(code / 12 - 1),
        })
    }

    /// The same relative pitch in the given octave.
    ///
    /// Fails if this pitch already has an octave.
    pub fn with_octave(self, octave: u8) -> Result<Self> {
        if self.octave.is_some() {
            return Err(Error::construction(format!(
                "ambiguous octave: {} already has an octave, got explicit octave {}",
                self, octave
            )));
        }
        Ok(Self {
            relative: self.relative,
            octave: Some(octave),
        })
    }

    /// Relative pitch (0-11)
    pub fn relative_pitch(&self) -> PitchClass {
        self.relative
    }

    pub fn octave(&self) -> Option<u8> {
        self.octave
    }

    /// Drop the octave information
    pub fn strip_octave(&self) -> Self {
        Self {
            relative: self.relative,
            octave: None,
        }
    }

    /// Absolute MIDI code. Class-only pitches use `assumed_octave`, and fail
    /// if none is given.
    pub fn midi_pitch(&self, assumed_octave: Option<u8>) -> Result<i32> {
        let octave = self.octave.or(assumed_octave).ok_or_else(|| {
            Error::construction(format!("pitch {} has no octave and no MIDI code", self))
        })?;
        Ok(Self::to_midi_pitch(self.relative, octave))
    }

    /// Convert a relative pitch and octave into a MIDI code (C-1 = 0, C4 = 60)
    pub fn to_midi_pitch(relative: PitchClass, octave: u8) -> i32 {
        relative as i32 + (octave as i32 + 1) * 12
    }

    /// Transpose by semitones, carrying into the octave when there is one
    pub fn transpose(&self, semitones: Semitones) -> Result<Self> {
        match self.octave {
            None => Ok(Self {
                relative: (self.relative as i32 + semitones).rem_euclid(12) as PitchClass,
                octave: None,
            }),
            Some(octave) => {
                // Absolute index counted from C0
                let absolute = self.relative as i32 + octave as i32 * 12 + semitones;
                if absolute < 0 || absolute / 12 > u8::MAX as i32 {
                    return Err(Error::construction(format!(
                        "transposing {} by {} semitones leaves the octave range",
                        self, semitones
                    )));
                }
                Ok(Self {
                    relative: absolute.rem_euclid(12) as PitchClass,
                    octave: Some((absolute / 12) as u8),
                })
            }
        }
    }

    /// Display name, e.g. `Db4`
    pub fn name(&self) -> String {
        match self.octave {
            Some(octave) => format!("{}{}", PITCH_NAMES[self.relative as usize], octave),
            None => PITCH_NAMES[self.relative as usize].to_string(),
        }
    }
}

impl FromStr for Pitch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
