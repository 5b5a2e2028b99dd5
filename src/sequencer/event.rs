// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timed events.
//!
//! An [`Event`] is a note or rest plus a start time relative to its
//! containing span. Events own their payload by value.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::music::{Notation, Pitch, Semitones};
use crate::timing::{Time, TimeWindow};

/// A note or rest at a start time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    notation: Notation,
    time: Time,
}

impl Event {
    /// Create an event from a note or rest and its start time
    pub fn new(notation: impl Into<Notation>, time: impl Into<Time>) -> Self {
        Self {
            notation: notation.into(),
            time: time.into(),
        }
    }

    pub fn notation(&self) -> &Notation {
        &self.notation
    }

    pub fn notation_mut(&mut self) -> &mut Notation {
        &mut self.notation
    }

    /// Start time relative to the containing span
    pub fn time(&self) -> Time {
        self.time
    }

    pub fn set_time(&mut self, time: impl Into<Time>) {
        self.time = time.into();
    }

    pub fn duration(&self) -> Time {
        self.notation.duration()
    }

    pub fn pitch(&self) -> Option<Pitch> {
        self.notation.pitch()
    }

    pub fn is_note(&self) -> bool {
        self.notation.is_note()
    }

    pub fn is_rest(&self) -> bool {
        self.notation.is_rest()
    }

    /// Explicit `(payload, start time)` accessor pair
    pub fn parts(&self) -> (Notation, Time) {
        (self.notation, self.time)
    }

    /// Start time in beats
    pub fn start_beats(&self) -> f64 {
        self.time.in_beats()
    }

    /// End time (`start + duration`) in beats
    pub fn end_beats(&self) -> f64 {
        self.time.in_beats() + self.duration().in_beats()
    }

    /// End time as an unquantized [`Time`]
    pub fn end_time(&self) -> Time {
        self.time + self.duration()
    }

    /// Whether this event shares any time with `window`
    pub fn overlaps(&self, window: &TimeWindow) -> bool {
        window.overlaps(self.start_beats(), self.end_beats())
    }

    /// Range form of [`Event::overlaps`]; fails if `start >= end`
    pub fn in_span_range(&self, start: f64, end: f64) -> Result<bool> {
        let window = TimeWindow::new(start, end)?;
        Ok(self.overlaps(&window))
    }

    /// A copy of this event moved later by `by`
    pub fn shifted(&self, by: Time) -> Self {
        Self {
            notation: self.notation,
            time: self.time + by,
        }
    }

    /// Snap start time and duration to `resolution`, returning the larger
    /// of the two snapping errors
    pub fn quantize(&mut self, resolution: f64) -> Result<f64> {
        let time_error = self.time.quantize_in_place(resolution)?;
        let duration_error = self.notation.duration_mut().quantize_in_place(resolution)?;
        Ok(time_error.max(duration_error))
    }

    /// Transpose a note's pitch; rests are left alone
    pub fn transpose(&mut self, semitones: Semitones) -> Result<()> {
        if let Notation::Note(note) = &mut self.notation {
            note.set_pitch(note.pitch().transpose(semitones)?);
        }
        Ok(())
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event[{}, time={}]", self.notation, self.time.in_beats())
    }
}

/// Read access shared by plain and sliced events.
///
/// Encoders take this so they work on both; plain events never continue
/// across a window boundary.
pub trait EventView {
    /// The (possibly clipped) event
    fn event(&self) -> &Event;

    /// The underlying event started before the slicing window
    fn pre_continue(&self) -> bool {
        false
    }

    /// The underlying event ends after the slicing window
    fn post_continue(&self) -> bool {
        false
    }

    fn is_note_start(&self) -> bool {
        !self.pre_continue()
    }

    fn is_note_end(&self) -> bool {
        !self.post_continue()
    }
}

impl EventView for Event {
    fn event(&self) -> &Event {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::{Note, Rest};

    #[test]
    fn test_creation() {
        let note = Note::from_name("G#6", 2.0).unwrap();
        let event = Event::new(note, 2.0);
        assert_eq!(event.notation(), &Notation::Note(note));
        assert_eq!(event.time(), Time::from(2.0));
        assert_eq!(event.time(), Time::quantized(2.0, 0.5).unwrap());
        assert!(event.is_note());
        assert_eq!(event.end_beats(), 4.0);

        let (payload, time) = event.parts();
        assert_eq!(payload, Notation::Note(note));
        assert_eq!(time, Time::from(2.0));
    }

    #[test]
    fn test_copy_is_independent() {
        let event = Event::new(Note::from_name("D5", 0.5).unwrap(), 2.0);
        let mut copy = event.clone();
        copy.notation_mut().set_duration(1.0);
        assert_eq!(event.duration().in_beats(), 0.5);
        assert_ne!(event, copy);
    }

    #[test]
    fn test_in_span_range() {
        // Event covers 2.0..2.5
        let event = Event::new(Note::from_name("D5", 0.5).unwrap(), 2.0);
        assert!(event.in_span_range(2.0, 2.5).unwrap());
        assert!(event.in_span_range(2.5, 2.3).is_err());
        assert!(event.in_span_range(1.5, 2.5).unwrap());
        assert!(event.in_span_range(2.0, 4.0).unwrap());
        assert!(event.in_span_range(0.0, 3.0).unwrap());
        assert!(event.in_span_range(2.3, 2.4).unwrap());
        assert!(event.in_span_range(2.3, 3.1).unwrap());
        assert!(event.in_span_range(1.8, 2.4).unwrap());
        assert!(!event.in_span_range(1.8, 1.9).unwrap());
        assert!(!event.in_span_range(2.6, 5.0).unwrap());
    }

    #[test]
    fn test_quantize() {
        let mut event = Event::new(Rest::new(0.98), 1.01);
        let err = event.quantize(0.25).unwrap();
        assert_eq!(event.time().in_beats(), 1.0);
        assert_eq!(event.duration().in_beats(), 1.0);
        assert!((err - 0.02).abs() < 1e-9);
    }

    #[test]
    fn test_transpose_skips_rests() {
        let mut rest = Event::new(Rest::new(1.0), 0.0);
        rest.transpose(5).unwrap();
        assert!(rest.is_rest());

        let mut note = Event::new(Note::from_name("A4", 1.0).unwrap(), 0.0);
        note.transpose(3).unwrap();
        assert_eq!(note.pitch(), Some(Pitch::from_name("C5").unwrap()));
    }

    #[test]
    fn test_plain_event_never_continues() {
        let event = Event::new(Note::from_name("A6", 4.0).unwrap(), 0.0);
        assert!(!event.pre_continue());
        assert!(!event.post_continue());
        assert!(event.is_note_start());
        assert!(event.is_note_end());
    }
}
