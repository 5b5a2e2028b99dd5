// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Feature encoders.
//!
//! Each [`Feature`] turns an event into a subvector of fixed length
//! `dim()`. Pitch-dependent features yield zeros for rests unless their
//! label space includes a rest category.

use std::fmt;

use super::label::{Labeller, PitchLabels, RelativePitchLabels};
use super::EncodeArgs;
use crate::error::{Error, Result};
use crate::sequencer::EventView;

/// Encodes an event as a fixed-size numeric subvector
pub trait Feature: fmt::Debug {
    /// Length of every subvector this feature produces
    fn dim(&self) -> usize;

    /// Encode `event`; the result has exactly `dim()` entries
    fn make_subvector(&self, event: &dyn EventView, args: &EncodeArgs) -> Result<Vec<f64>>;
}

/// A zero vector of `length` with ones at `indices`
pub(crate) fn binvec(length: usize, indices: &[usize]) -> Vec<f64> {
    let mut v = vec![0.0; length];
    for &i in indices {
        v[i] = 1.0;
    }
    v
}

fn indicator(on: bool) -> Vec<f64> {
    vec![if on { 1.0 } else { 0.0 }]
}

/// One-hot over a labeller's label space; zeros when there is no label
fn one_hot(labeller: &dyn Labeller, event: &dyn EventView, args: &EncodeArgs) -> Result<Vec<f64>> {
    let dim = labeller.num_labels();
    Ok(match labeller.get_event_label(event, args)? {
        Some(label) => binvec(dim, &[label]),
        None => vec![0.0; dim],
    })
}

/// `[1]` for notes, `[0]` for rests
#[derive(Debug, Clone, Copy, Default)]
pub struct IsNote;

impl Feature for IsNote {
    fn dim(&self) -> usize {
        1
    }

    fn make_subvector(&self, event: &dyn EventView, _args: &EncodeArgs) -> Result<Vec<f64>> {
        Ok(indicator(event.event().is_note()))
    }
}

/// `[1]` for rests, `[0]` for notes
#[derive(Debug, Clone, Copy, Default)]
pub struct IsRest;

impl Feature for IsRest {
    fn dim(&self) -> usize {
        1
    }

    fn make_subvector(&self, event: &dyn EventView, _args: &EncodeArgs) -> Result<Vec<f64>> {
        Ok(indicator(event.event().is_rest()))
    }
}

/// One-hot absolute pitch over a [`PitchLabels`] space
#[derive(Debug, Clone)]
pub struct NotePitch {
    labels: PitchLabels,
}

impl NotePitch {
    pub fn new(labels: PitchLabels) -> Self {
        Self { labels }
    }
}

impl Feature for NotePitch {
    fn dim(&self) -> usize {
        self.labels.num_labels()
    }

    fn make_subvector(&self, event: &dyn EventView, args: &EncodeArgs) -> Result<Vec<f64>> {
        one_hot(&self.labels, event, args)
    }
}

/// One-hot pitch class
#[derive(Debug, Clone, Default)]
pub struct NoteRelativePitch {
    labels: RelativePitchLabels,
}

impl NoteRelativePitch {
    pub fn new(labels: RelativePitchLabels) -> Self {
        Self { labels }
    }
}

impl Feature for NoteRelativePitch {
    fn dim(&self) -> usize {
        self.labels.num_labels()
    }

    fn make_subvector(&self, event: &dyn EventView, args: &EncodeArgs) -> Result<Vec<f64>> {
        one_hot(&self.labels, event, args)
    }
}

/// One-hot octave over an inclusive range
#[derive(Debug, Clone, Copy)]
pub struct NoteOctave {
    low: u8,
    high: u8,
}

impl NoteOctave {
    pub fn new(octave_range: (u8, u8)) -> Result<Self> {
        let (low, high) = octave_range;
        if low > high {
            return Err(Error::construction(format!(
                "invalid octave range ({}, {})",
                low, high
            )));
        }
        Ok(Self { low, high })
    }
}

impl Feature for NoteOctave {
    fn dim(&self) -> usize {
        usize::from(self.high - self.low) + 1
    }

    fn make_subvector(&self, event: &dyn EventView, _args: &EncodeArgs) -> Result<Vec<f64>> {
        match event.event().pitch().and_then(|pitch| pitch.octave()) {
            None => Ok(vec![0.0; self.dim()]),
            Some(octave) if (self.low..=self.high).contains(&octave) => {
                Ok(binvec(self.dim(), &[(octave - self.low) as usize]))
            }
            Some(octave) => Err(Error::lookup(format!(
                "octave {} outside NoteOctave range {}..={}",
                octave, self.low, self.high
            ))),
        }
    }
}

/// The octave as a raw number; `[0]` for rests
#[derive(Debug, Clone, Copy, Default)]
pub struct NoteOctaveContinuous;

impl Feature for NoteOctaveContinuous {
    fn dim(&self) -> usize {
        1
    }

    fn make_subvector(&self, event: &dyn EventView, _args: &EncodeArgs) -> Result<Vec<f64>> {
        let octave = event
            .event()
            .pitch()
            .and_then(|pitch| pitch.octave())
            .map_or(0.0, f64::from);
        Ok(vec![octave])
    }
}

/// `[1]` when the event started before its window
#[derive(Debug, Clone, Copy, Default)]
pub struct ContinuingPreviousEvent;

impl Feature for ContinuingPreviousEvent {
    fn dim(&self) -> usize {
        1
    }

    fn make_subvector(&self, event: &dyn EventView, _args: &EncodeArgs) -> Result<Vec<f64>> {
        Ok(indicator(event.pre_continue()))
    }
}

/// `[1]` when the event runs past its window
#[derive(Debug, Clone, Copy, Default)]
pub struct ContinuesNextEvent;

impl Feature for ContinuesNextEvent {
    fn dim(&self) -> usize {
        1
    }

    fn make_subvector(&self, event: &dyn EventView, _args: &EncodeArgs) -> Result<Vec<f64>> {
        Ok(indicator(event.post_continue()))
    }
}

/// Reads the same-named entry of [`EncodeArgs`]
#[derive(Debug, Clone)]
pub struct BooleanFlag {
    name: String,
}

impl BooleanFlag {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Feature for BooleanFlag {
    fn dim(&self) -> usize {
        1
    }

    fn make_subvector(&self, _event: &dyn EventView, args: &EncodeArgs) -> Result<Vec<f64>> {
        Ok(indicator(args.flag(&self.name)))
    }
}
