// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pieces of music.
//!
//! A [`Piece`] is an ordered list of bars (spans) plus optional key
//! metadata. Pieces are built from a parsed [`Score`] or directly from spans.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::score::{Score, ScoreParser};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::music::{KeyMode, Notation, Note, Pitch, Rest, Semitones};
use crate::sequencer::{Event, Span};
use crate::timing::Time;

/// Per-piece options applied while converting a score
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadOptions {
    /// Keep the detected key on the piece
    pub save_key: bool,
    /// Transpose so the key lands on this tonic
    pub transpose_to: Option<Pitch>,
}

/// Shortest signed interval moving `from` onto `to`, in [-5, 6]
fn interval_between(from: Semitones, to: Semitones) -> Semitones {
    let up = (to - from).rem_euclid(12);
    if up > 6 {
        up - 12
    } else {
        up
    }
}

/// A piece: bars of events plus optional key
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Piece {
    name: String,
    bars: Vec<Span>,
    tonic: Option<Pitch>,
    mode: Option<KeyMode>,
}

impl Piece {
    /// Create an empty piece
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build a piece from bars, in order
    pub fn from_spans(name: impl Into<String>, spans: impl IntoIterator<Item = Span>) -> Self {
        Self {
            name: name.into(),
            bars: spans.into_iter().collect(),
            tonic: None,
            mode: None,
        }
    }

    /// Convert a parsed score. Each measure becomes one bar with times
    /// snapped to the settings' resolution.
    pub fn from_score(
        name: impl Into<String>,
        mut score: Score,
        options: &LoadOptions,
        settings: &Settings,
    ) -> Result<Self> {
        let mut piece = Self::new(name);

        let key = match &score.key {
            Some(key) => Some((
                Pitch::from_name(&key.tonic)?.strip_octave(),
                KeyMode::parse(&key.mode),
            )),
            None => None,
        };

        let key = match (options.transpose_to, key) {
            (Some(target), Some((tonic, mode))) => {
                let anchor = mode.transposition_anchor().ok_or_else(|| {
                    Error::Unsupported(format!("transposing a piece in {} mode", mode))
                })?;
                let interval = interval_between(
                    tonic.relative_pitch() as Semitones + anchor,
                    target.relative_pitch() as Semitones,
                );
                score.transpose(interval)?;
                Some((tonic.transpose(interval)?, mode))
            }
            (Some(_), None) => {
                return Err(Error::Unsupported(
                    "transposing a piece with no key".to_string(),
                ))
            }
            (None, key) => key,
        };

        if options.save_key || options.transpose_to.is_some() {
            if let Some((tonic, mode)) = key {
                piece.tonic = Some(tonic);
                piece.mode = Some(mode);
            }
        }

        let resolution = settings.resolution;
        for measure in &score.measures {
            let mut bar = Span::with_grid(resolution, settings.assumed_octave);
            bar.set_offset(Time::quantized(measure.offset, resolution)?);
            for event in &measure.events {
                let duration = Time::quantized(event.duration, resolution)?;
                let notation: Notation = if event.is_note {
                    let name = event.pitch.as_deref().ok_or_else(|| {
                        Error::construction(format!(
                            "note at offset {} has no pitch",
                            event.offset
                        ))
                    })?;
                    Note::new(Pitch::from_name(name)?, duration).into()
                } else {
                    Rest::new(duration).into()
                };
                bar.append_event(Event::new(
                    notation,
                    Time::quantized(event.offset, resolution)?,
                ));
            }
            bar.sort();
            piece.bars.push(bar);
        }

        Ok(piece)
    }

    /// Parse `path` and convert it. The path becomes the piece name.
    ///
    /// Malformed notes inside an otherwise readable file are reported as
    /// parse errors for that file.
    pub fn load(
        parser: &dyn ScoreParser,
        path: &Path,
        options: &LoadOptions,
        settings: &Settings,
    ) -> Result<Self> {
        let score = parser.parse(path)?;
        let piece = Self::from_score(path.display().to_string(), score, options, settings)
            .map_err(|err| match err {
                Error::Construction(reason) => Error::ScoreParse {
                    path: path.to_path_buf(),
                    reason,
                },
                other => other,
            })?;
        debug!(
            path = %path.display(),
            bars = piece.num_bars(),
            events = piece.count_events(),
            "Loaded piece"
        );
        Ok(piece)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bars(&self) -> &[Span] {
        &self.bars
    }

    pub fn tonic(&self) -> Option<Pitch> {
        self.tonic
    }

    pub fn mode(&self) -> Option<&KeyMode> {
        self.mode.as_ref()
    }

    /// Key as `"<tonic> <mode>"`, e.g. `"C major"`
    pub fn key(&self) -> Option<String> {
        match (&self.tonic, &self.mode) {
            (Some(tonic), Some(mode)) => Some(format!("{} {}", tonic, mode)),
            _ => None,
        }
    }

    /// Every bar merged into one timeline at offset zero
    pub fn as_span(&self) -> Span {
        Span::overlay(self.bars.iter())
    }

    /// All events with piece-absolute times, sorted
    pub fn events(&self) -> Vec<Event> {
        self.as_span().events().to_vec()
    }

    pub fn count_events(&self) -> usize {
        self.bars.iter().map(Span::num_events).sum()
    }

    pub fn num_bars(&self) -> usize {
        self.bars.len()
    }

    pub fn length_in_beats(&self) -> f64 {
        self.bars.iter().map(|bar| bar.length().in_beats()).sum()
    }

    /// Transpose every note and the tonic by `semitones`
    pub fn transpose(&mut self, semitones: Semitones) -> Result<()> {
        for bar in &mut self.bars {
            bar.transpose(semitones)?;
        }
        if let Some(tonic) = self.tonic.as_mut() {
            *tonic = tonic.transpose(semitones)?;
        }
        Ok(())
    }

    /// Snap every event to `resolution`; returns the largest snapping error
    pub fn quantize_events(&mut self, resolution: f64) -> Result<f64> {
        let mut max_error: f64 = 0.0;
        for bar in &mut self.bars {
            max_error = max_error.max(bar.quantize_events(resolution)?);
        }
        Ok(max_error)
    }

    /// Remove rests from every bar, keeping bar lengths
    pub fn discard_rests(&mut self) {
        for bar in &mut self.bars {
            bar.discard_rests();
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pad = "    ";
        writeln!(f, "Piece[{}", self.name)?;
        match &self.tonic {
            Some(tonic) => writeln!(f, "{}tonic: {},", pad, tonic)?,
            None => writeln!(f, "{}tonic: none,", pad)?,
        }
        match &self.mode {
            Some(mode) => writeln!(f, "{}mode: {},", pad, mode)?,
            None => writeln!(f, "{}mode: none,", pad)?,
        }
        for (i, bar) in self.bars.iter().enumerate() {
            writeln!(f, "{}[{}] {},", pad, i, bar)?;
        }
        write!(f, "]")
    }
}
