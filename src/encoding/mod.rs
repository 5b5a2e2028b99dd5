// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Feature and label encoding.
//!
//! Encoders turn one (possibly sliced) event into a fixed-size numeric
//! subvector ([`Feature`]) or a discrete label ([`Labeller`]). An
//! [`EventDataBuilder`] concatenates them in registration order, and the
//! data types in [`data`] apply a builder to whole pieces and corpora.

pub mod builder;
pub mod data;
pub mod feature;
pub mod label;

pub use builder::EventDataBuilder;
pub use data::{BarData, DataCorpus, EventData, PieceData, TimeSliceData};
pub use feature::{
    BooleanFlag, ContinuesNextEvent, ContinuingPreviousEvent, Feature, IsNote, IsRest, NoteOctave,
    NoteOctaveContinuous, NotePitch, NoteRelativePitch,
};
pub use label::{
    BooleanFlagLabel, ContinuesNextEventLabel, ContinuingPreviousEventLabel, IsNoteLabel,
    LabelValue, Labeller, NoteLength, PitchLabels, RelativePitchLabels, SpanPosition,
};

use std::collections::HashMap;

/// Keyword context passed to encoders at call time.
///
/// Boolean-flag encoders read their value from here; a missing flag
/// reads as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeArgs {
    flags: HashMap<String, bool>,
}

impl EncodeArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style flag setter
    pub fn with_flag(mut self, name: impl Into<String>, value: bool) -> Self {
        self.set_flag(name, value);
        self
    }

    pub fn set_flag(&mut self, name: impl Into<String>, value: bool) {
        self.flags.insert(name.into(), value);
    }

    /// Value of `name`, `false` when absent
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }
}
