// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Labellers.
//!
//! A [`Labeller`] maps an event to one of `num_labels()` discrete labels,
//! or to `None` when the label does not apply. `get_value_of` inverts the
//! mapping so model outputs can be decoded back to musical values.

use std::fmt;

use super::EncodeArgs;
use crate::error::{Error, Result};
use crate::music::{Pitch, PitchClass, PITCH_NAMES};
use crate::sequencer::EventView;

/// A decoded label
#[derive(Debug, Clone, PartialEq)]
pub enum LabelValue {
    Pitch(Pitch),
    Rest,
    Flag(bool),
    /// A time or duration in beats
    Beats(f64),
}

/// Maps events to discrete labels
pub trait Labeller: fmt::Debug {
    /// Unique name used to look the labeller up in a builder
    fn identifier(&self) -> &str;

    /// Size of the label space
    fn num_labels(&self) -> usize;

    /// Label of `event`, or `None` if not applicable
    fn get_event_label(&self, event: &dyn EventView, args: &EncodeArgs) -> Result<Option<usize>>;

    /// Value a label stands for
    fn get_value_of(&self, label: usize) -> Result<LabelValue>;
}

fn unknown_label(identifier: &str, label: usize) -> Error {
    Error::lookup(format!("label {} is not known to {}", label, identifier))
}

fn flag_value(identifier: &str, label: usize) -> Result<LabelValue> {
    match label {
        0 => Ok(LabelValue::Flag(false)),
        1 => Ok(LabelValue::Flag(true)),
        _ => Err(unknown_label(identifier, label)),
    }
}

/// Absolute pitch labels over an inclusive octave range.
///
/// Labels run octave by octave, `pitches` in order within each octave.
/// With `include_rest`, rests take the label after the last pitch.
#[derive(Debug, Clone, PartialEq)]
pub struct PitchLabels {
    low: u8,
    high: u8,
    pitches: Vec<PitchClass>,
    include_rest: bool,
}

impl PitchLabels {
    /// All twelve pitch classes in every octave of `octave_range`
    pub fn new(octave_range: (u8, u8)) -> Result<Self> {
        Self::with_pitch_classes(octave_range, (0..12).collect())
    }

    /// Only the named pitch classes (e.g. `["C", "E", "G"]`)
    pub fn with_pitches(octave_range: (u8, u8), pitches: &[&str]) -> Result<Self> {
        let mut classes = Vec::with_capacity(pitches.len());
        for name in pitches {
            let pitch = Pitch::from_name(name)?;
            if pitch.octave().is_some() {
                return Err(Error::construction(format!(
                    "pitch label {} must not carry an octave",
                    name
                )));
            }
            classes.push(pitch.relative_pitch());
        }
        Self::with_pitch_classes(octave_range, classes)
    }

    fn with_pitch_classes(octave_range: (u8, u8), pitches: Vec<PitchClass>) -> Result<Self> {
        let (low, high) = octave_range;
        if low > high {
            return Err(Error::construction(format!(
                "invalid octave range ({}, {})",
                low, high
            )));
        }
        if pitches.is_empty() {
            return Err(Error::construction("pitch labels need at least one pitch"));
        }
        if let Some(repeated) = pitches
            .iter()
            .enumerate()
            .find_map(|(i, pc)| pitches[..i].contains(pc).then_some(pc))
        {
            return Err(Error::construction(format!(
                "pitch class {} appears more than once in pitch labels",
                PITCH_NAMES[usize::from(*repeated)]
            )));
        }
        Ok(Self {
            low,
            high,
            pitches,
            include_rest: false,
        })
    }

    /// Give rests their own label
    pub fn include_rest(mut self, include_rest: bool) -> Self {
        self.include_rest = include_rest;
        self
    }

    /// Number of pitch labels, excluding any rest label
    pub fn num_pitch_labels(&self) -> usize {
        (usize::from(self.high - self.low) + 1) * self.pitches.len()
    }

    /// Label of the rest category, if rests are included
    pub fn rest_label(&self) -> Option<usize> {
        self.include_rest.then(|| self.num_pitch_labels())
    }

    /// Label of a pitch with octave
    pub fn label_of(&self, pitch: &Pitch) -> Result<usize> {
        let out_of_range = || Error::lookup(format!("pitch {} has no PitchLabels label", pitch));
        let octave = pitch.octave().ok_or_else(out_of_range)?;
        if octave < self.low || octave > self.high {
            return Err(out_of_range());
        }
        let index = self
            .pitches
            .iter()
            .position(|&pc| pc == pitch.relative_pitch())
            .ok_or_else(out_of_range)?;
        Ok((octave - self.low) as usize * self.pitches.len() + index)
    }

    /// Label of a pitch name such as `C#4`
    pub fn get_label_of(&self, name: &str) -> Result<usize> {
        self.label_of(&Pitch::from_name(name)?)
    }
}

impl Labeller for PitchLabels {
    fn identifier(&self) -> &str {
        "PitchLabels"
    }

    fn num_labels(&self) -> usize {
        self.num_pitch_labels() + usize::from(self.include_rest)
    }

    fn get_event_label(&self, event: &dyn EventView, _args: &EncodeArgs) -> Result<Option<usize>> {
        match event.event().pitch() {
            Some(pitch) => self.label_of(&pitch).map(Some),
            None => Ok(self.rest_label()),
        }
    }

    fn get_value_of(&self, label: usize) -> Result<LabelValue> {
        if self.rest_label() == Some(label) {
            return Ok(LabelValue::Rest);
        }
        if label >= self.num_pitch_labels() {
            return Err(unknown_label(self.identifier(), label));
        }
        let per_octave = self.pitches.len();
        let octave = self.low + (label / per_octave) as u8;
        let pitch = Pitch::new(self.pitches[label % per_octave], Some(octave))?;
        Ok(LabelValue::Pitch(pitch))
    }
}

/// Pitch class labels 0-11, plus 12 for rests with `include_rest`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelativePitchLabels {
    include_rest: bool,
}

impl RelativePitchLabels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_rest(mut self, include_rest: bool) -> Self {
        self.include_rest = include_rest;
        self
    }
}

impl Labeller for RelativePitchLabels {
    fn identifier(&self) -> &str {
        "RelativePitchLabels"
    }

    fn num_labels(&self) -> usize {
        12 + usize::from(self.include_rest)
    }

    fn get_event_label(&self, event: &dyn EventView, _args: &EncodeArgs) -> Result<Option<usize>> {
        Ok(match event.event().pitch() {
            Some(pitch) => Some(pitch.relative_pitch() as usize),
            None => self.include_rest.then_some(12),
        })
    }

    fn get_value_of(&self, label: usize) -> Result<LabelValue> {
        match label {
            0..=11 => Ok(LabelValue::Pitch(Pitch::new(label as PitchClass, None)?)),
            12 if self.include_rest => Ok(LabelValue::Rest),
            _ => Err(unknown_label(self.identifier(), label)),
        }
    }
}

/// 1 for notes, 0 for rests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsNoteLabel;

impl Labeller for IsNoteLabel {
    fn identifier(&self) -> &str {
        "IsNote"
    }

    fn num_labels(&self) -> usize {
        2
    }

    fn get_event_label(&self, event: &dyn EventView, _args: &EncodeArgs) -> Result<Option<usize>> {
        Ok(Some(usize::from(event.event().is_note())))
    }

    fn get_value_of(&self, label: usize) -> Result<LabelValue> {
        flag_value(self.identifier(), label)
    }
}

/// 1 when the event started before its window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContinuingPreviousEventLabel;

impl Labeller for ContinuingPreviousEventLabel {
    fn identifier(&self) -> &str {
        "ContinuingPreviousEvent"
    }

    fn num_labels(&self) -> usize {
        2
    }

    fn get_event_label(&self, event: &dyn EventView, _args: &EncodeArgs) -> Result<Option<usize>> {
        Ok(Some(usize::from(event.pre_continue())))
    }

    fn get_value_of(&self, label: usize) -> Result<LabelValue> {
        flag_value(self.identifier(), label)
    }
}

/// 1 when the event runs past its window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContinuesNextEventLabel;

impl Labeller for ContinuesNextEventLabel {
    fn identifier(&self) -> &str {
        "ContinuesNextEvent"
    }

    fn num_labels(&self) -> usize {
        2
    }

    fn get_event_label(&self, event: &dyn EventView, _args: &EncodeArgs) -> Result<Option<usize>> {
        Ok(Some(usize::from(event.post_continue())))
    }

    fn get_value_of(&self, label: usize) -> Result<LabelValue> {
        flag_value(self.identifier(), label)
    }
}

/// Position of the event start within a span, in grid steps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpanPosition {
    resolution: f64,
    span_length: f64,
}

impl SpanPosition {
    pub fn new(resolution: f64, span_length: f64) -> Result<Self> {
        check_grid(resolution, span_length)?;
        Ok(Self {
            resolution,
            span_length,
        })
    }
}

impl Labeller for SpanPosition {
    fn identifier(&self) -> &str {
        "SpanPosition"
    }

    fn num_labels(&self) -> usize {
        (self.span_length / self.resolution).round() as usize
    }

    fn get_event_label(&self, event: &dyn EventView, _args: &EncodeArgs) -> Result<Option<usize>> {
        let time = event.event().start_beats();
        grid_label(self.identifier(), time, self.resolution, self.num_labels()).map(Some)
    }

    fn get_value_of(&self, label: usize) -> Result<LabelValue> {
        if label >= self.num_labels() {
            return Err(unknown_label(self.identifier(), label));
        }
        Ok(LabelValue::Beats(label as f64 * self.resolution))
    }
}

/// Event duration in grid steps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteLength {
    resolution: f64,
    max_length: f64,
}

impl NoteLength {
    pub fn new(resolution: f64, max_length: f64) -> Result<Self> {
        check_grid(resolution, max_length)?;
        Ok(Self {
            resolution,
            max_length,
        })
    }
}

impl Labeller for NoteLength {
    fn identifier(&self) -> &str {
        "NoteLength"
    }

    fn num_labels(&self) -> usize {
        (self.max_length / self.resolution).round() as usize
    }

    fn get_event_label(&self, event: &dyn EventView, _args: &EncodeArgs) -> Result<Option<usize>> {
        let duration = event.event().duration().in_beats();
        grid_label(self.identifier(), duration, self.resolution, self.num_labels()).map(Some)
    }

    fn get_value_of(&self, label: usize) -> Result<LabelValue> {
        if label >= self.num_labels() {
            return Err(unknown_label(self.identifier(), label));
        }
        Ok(LabelValue::Beats(label as f64 * self.resolution))
    }
}

fn check_grid(resolution: f64, length: f64) -> Result<()> {
    if !(resolution.is_finite() && resolution > 0.0) {
        return Err(Error::construction(format!(
            "label resolution must be positive, got {}",
            resolution
        )));
    }
    if !(length.is_finite() && length >= resolution) {
        return Err(Error::construction(format!(
            "label length {} is shorter than resolution {}",
            length, resolution
        )));
    }
    Ok(())
}

fn grid_label(identifier: &str, beats: f64, resolution: f64, num_labels: usize) -> Result<usize> {
    let steps = (beats / resolution).round();
    if steps < 0.0 || steps >= num_labels as f64 {
        return Err(Error::lookup(format!(
            "{} beats falls outside the {} labels of {}",
            beats, num_labels, identifier
        )));
    }
    Ok(steps as usize)
}

/// Reads the same-named entry of [`EncodeArgs`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanFlagLabel {
    name: String,
}

impl BooleanFlagLabel {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Labeller for BooleanFlagLabel {
    fn identifier(&self) -> &str {
        &self.name
    }

    fn num_labels(&self) -> usize {
        2
    }

    fn get_event_label(&self, _event: &dyn EventView, args: &EncodeArgs) -> Result<Option<usize>> {
        Ok(Some(usize::from(args.flag(&self.name))))
    }

    fn get_value_of(&self, label: usize) -> Result<LabelValue> {
        flag_value(self.identifier(), label)
    }
}
