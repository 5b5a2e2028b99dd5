// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Score collaborator contract.
//!
//! A [`ScoreParser`] turns a file into a [`Score`]: ordered measures of
//! note and rest tuples plus optional key metadata. Notation formats such
//! as MusicXML or MIDI plug in behind the trait; [`YamlScoreParser`] reads
//! the contract itself serialized as YAML or TOML.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::music::{Pitch, Semitones};

/// One note or rest inside a measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub is_note: bool,
    /// Pitch name with octave, e.g. `F#4`; `None` for rests
    #[serde(default)]
    pub pitch: Option<String>,
    /// Duration in beats
    pub duration: f64,
    /// Onset within the measure, in beats
    #[serde(default)]
    pub offset: f64,
}

impl ScoreEvent {
    pub fn note(pitch: impl Into<String>, duration: f64, offset: f64) -> Self {
        Self {
            is_note: true,
            pitch: Some(pitch.into()),
            duration,
            offset,
        }
    }

    pub fn rest(duration: f64, offset: f64) -> Self {
        Self {
            is_note: false,
            pitch: None,
            duration,
            offset,
        }
    }
}

/// A measure and its events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    /// Offset of the measure within the score, in beats
    #[serde(default)]
    pub offset: f64,
    #[serde(default)]
    pub events: Vec<ScoreEvent>,
}

/// Detected key of a score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreKey {
    /// Tonic pitch name, e.g. `D`
    pub tonic: String,
    /// Mode string, e.g. `major`
    pub mode: String,
}

/// A parsed score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    #[serde(default)]
    pub measures: Vec<Measure>,
    #[serde(default)]
    pub key: Option<ScoreKey>,
}

impl Score {
    /// Transpose every note and the key tonic by `semitones`
    pub fn transpose(&mut self, semitones: Semitones) -> Result<()> {
        for measure in &mut self.measures {
            for event in &mut measure.events {
                if let Some(name) = event.pitch.as_mut() {
                    *name = Pitch::from_name(name)?.transpose(semitones)?.name();
                }
            }
        }
        if let Some(key) = self.key.as_mut() {
            key.tonic = Pitch::from_name(&key.tonic)?.transpose(semitones)?.name();
        }
        Ok(())
    }

    pub fn num_events(&self) -> usize {
        self.measures.iter().map(|m| m.events.len()).sum()
    }
}

/// Parses score files into [`Score`]s
pub trait ScoreParser {
    /// Parse the score at `path`
    fn parse(&self, path: &Path) -> Result<Score>;
}

/// Reads scores stored as YAML (`.yaml`, `.yml`) or TOML (`.toml`)
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlScoreParser;

impl YamlScoreParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse score text, choosing the format from `path`'s extension
    pub fn parse_str(&self, path: &Path, contents: &str) -> Result<Score> {
        let parse_error = |reason: String| Error::ScoreParse {
            path: path.to_path_buf(),
            reason,
        };
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(contents).map_err(|e| parse_error(e.to_string()))
            }
            Some("toml") => toml::from_str(contents).map_err(|e| parse_error(e.to_string())),
            _ => Err(parse_error("unsupported score format".to_string())),
        }
    }
}

impl ScoreParser for YamlScoreParser {
    fn parse(&self, path: &Path) -> Result<Score> {
        let contents = fs::read_to_string(path)?;
        self.parse_str(path, &contents)
    }
}
