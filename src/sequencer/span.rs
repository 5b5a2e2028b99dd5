// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Spans of events.
//!
//! A [`Span`] is one bar's worth of events, anchored at an offset within
//! the piece. Event times are relative to that offset. Spans can be padded,
//! concatenated, overlaid and cut into fixed-width [`TimeSlice`]s.

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use super::event::Event;
use super::slice::{Slices, TimeSlice};
use crate::error::Result;
use crate::music::{Rest, Semitones};
use crate::timing::{Time, TimeWindow};

/// Default grid used to order events (1/16 beat)
pub const DEFAULT_RESOLUTION: f64 = 1.0 / 16.0;

/// Octave assumed when ordering pitches that have none
pub const DEFAULT_ASSUMED_OCTAVE: u8 = 4;

/// An offset-anchored, ordered list of events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Span {
    /// Anchor of this span within the piece
    offset: Time,
    /// Events, with times relative to `offset`
    events: Vec<Event>,
    /// Explicit length, dropped once an event runs past it
    padded_length: Option<f64>,
    /// Grid used for the time component of the sort key
    resolution: f64,
    /// Octave used for the pitch component of the sort key
    assumed_octave: u8,
}

impl Default for Span {
    fn default() -> Self {
        Self::new()
    }
}

impl Span {
    /// Create an empty span at offset zero
    pub fn new() -> Self {
        Self::with_grid(DEFAULT_RESOLUTION, DEFAULT_ASSUMED_OCTAVE)
    }

    /// Create an empty span ordering events on the given grid and octave
    pub fn with_grid(resolution: f64, assumed_octave: u8) -> Self {
        Self {
            offset: Time::zero(),
            events: Vec::new(),
            padded_length: None,
            resolution,
            assumed_octave,
        }
    }

    /// Build a sorted span from events, an offset and an optional fixed length
    pub fn from_events(
        events: impl IntoIterator<Item = Event>,
        offset: impl Into<Time>,
        length: Option<f64>,
    ) -> Self {
        let mut span = Self::new();
        span.offset = offset.into();
        span.padded_length = length;
        for event in events {
            span.append_event(event);
        }
        span.sort();
        span
    }

    /// Set the anchor of this span
    pub fn set_offset(&mut self, offset: impl Into<Time>) {
        self.offset = offset.into();
    }

    pub fn offset(&self) -> Time {
        self.offset
    }

    /// Grid step used for ordering
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn assumed_octave(&self) -> u8 {
        self.assumed_octave
    }

    /// Append an event. Events of zero duration are dropped and `false`
    /// is returned. An explicit length the event runs past is invalidated.
    pub fn append_event(&mut self, event: Event) -> bool {
        if event.duration().is_zero() {
            return false;
        }
        self.events.push(event);
        if let Some(padded) = self.padded_length {
            if self.natural_length() > padded {
                self.padded_length = None;
            }
        }
        true
    }

    /// Latest event end, ignoring any explicit length
    pub fn natural_length(&self) -> f64 {
        self.events
            .iter()
            .map(Event::end_beats)
            .fold(0.0, f64::max)
    }

    /// The explicit length if still valid, otherwise the natural length
    pub fn length(&self) -> Time {
        Time::unquantized(self.padded_length.unwrap_or_else(|| self.natural_length()))
    }

    /// Fill the span up to `length` with a trailing rest.
    ///
    /// Does nothing if the span is already at least that long.
    pub fn pad_to_length(&mut self, length: f64) {
        let actual = self.natural_length();
        let to_pad = length - actual;
        if to_pad <= 0.0 {
            return;
        }
        self.append_event(Event::new(Rest::new(to_pad), actual));
    }

    pub fn num_events(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    /// Whether no two events share any time. Events that only touch
    /// (one ends where the next starts) do not overlap.
    pub fn is_monophonic(&self) -> bool {
        for (i, a) in self.events.iter().enumerate() {
            for b in &self.events[i + 1..] {
                if a.start_beats() < b.end_beats() && b.start_beats() < a.end_beats() {
                    return false;
                }
            }
        }
        true
    }

    /// Fold the offset into every event time and reset it to zero.
    /// An explicit length moves with the events.
    pub fn move_offset_to_events(&mut self) {
        let offset = self.offset;
        for event in &mut self.events {
            event.set_time(event.time() + offset);
        }
        if let Some(padded) = self.padded_length.as_mut() {
            *padded += offset.in_beats();
        }
        self.offset = Time::zero();
    }

    /// Stable sort by grid step, then MIDI pitch. Rests order as pitch 0.
    pub fn sort(&mut self) {
        let resolution = self.resolution;
        let octave = self.assumed_octave;
        self.events.sort_by_key(|event| {
            let step = (event.start_beats() / resolution).round() as i64;
            let pitch = event
                .pitch()
                .and_then(|pitch| pitch.midi_pitch(Some(octave)).ok())
                .unwrap_or(0);
            (step, pitch)
        });
    }

    /// The events overlapping `window`
    pub fn get_slice(&self, window: TimeWindow) -> TimeSlice<'_> {
        TimeSlice::new(self, window)
    }

    /// Range form of [`Span::get_slice`]; fails if `start >= end`
    pub fn get_slice_range(&self, start: f64, end: f64) -> Result<TimeSlice<'_>> {
        TimeSlice::from_range(self, start, end)
    }

    /// Tile `[0, length)` with windows of width `resolution`.
    ///
    /// The sequence is lazy and restartable by calling again. The last window
    /// may be narrower. Fails for a non-positive resolution.
    pub fn generate_slices(&self, resolution: f64) -> Result<Slices<'_>> {
        Slices::new(self, resolution)
    }

    /// Remove every rest, keeping the current length as the explicit
    /// length. Returns the number of rests removed.
    pub fn discard_rests(&mut self) -> usize {
        if self.padded_length.is_none() {
            self.padded_length = Some(self.length().in_beats());
        }
        let before = self.events.len();
        self.events.retain(|event| !event.is_rest());
        let removed = before - self.events.len();
        debug_assert!(self.events.iter().all(Event::is_note));
        removed
    }

    /// Play spans back to back. The result sits at offset zero and its
    /// length is the sum of the input lengths.
    pub fn concat<'a>(spans: impl IntoIterator<Item = &'a Span>) -> Span {
        let mut spans = spans.into_iter();
        let mut result = match spans.next() {
            Some(first) => first.clone(),
            None => return Span::new(),
        };
        result.offset = Time::zero();

        let mut total = result.length().in_beats();
        for span in spans {
            let shift = Time::unquantized(total);
            for event in span.iter() {
                result.events.push(event.shifted(shift));
            }
            total += span.length().in_beats();
        }
        result.padded_length = Some(total);
        result
    }

    /// Merge spans into one timeline at offset zero. The first span's offset
    /// is folded into its events; each later span is shifted by its own
    /// offset. The result is re-sorted.
    pub fn overlay<'a>(spans: impl IntoIterator<Item = &'a Span>) -> Span {
        let mut spans = spans.into_iter();
        let mut result = match spans.next() {
            Some(first) => first.clone(),
            None => return Span::new(),
        };
        result.move_offset_to_events();

        for span in spans {
            for event in span.iter() {
                result.append_event(event.shifted(span.offset()));
            }
        }
        result.sort();
        result
    }

    /// Snap every event to `resolution`; returns the largest snapping error
    pub fn quantize_events(&mut self, resolution: f64) -> Result<f64> {
        let mut max_error: f64 = 0.0;
        for event in &mut self.events {
            max_error = max_error.max(event.quantize(resolution)?);
        }
        Ok(max_error)
    }

    /// Transpose every note by `semitones`
    pub fn transpose(&mut self, semitones: Semitones) -> Result<()> {
        for event in &mut self.events {
            event.transpose(semitones)?;
        }
        Ok(())
    }
}

impl Index<usize> for Span {
    type Output = Event;

    fn index(&self, index: usize) -> &Event {
        &self.events[index]
    }
}

impl<'a> IntoIterator for &'a Span {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Span[length={}, offset={}, (",
            self.natural_length(),
            self.offset.in_beats()
        )?;
        for (i, event) in self.events.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", event)?;
        }
        write!(f, ")]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::{Note, Pitch};

    fn note(name: &str, beats: f64, time: f64) -> Event {
        Event::new(Note::from_name(name, beats).unwrap(), time)
    }

    fn rest(beats: f64, time: f64) -> Event {
        Event::new(Rest::new(beats), time)
    }

    fn test_events() -> Vec<Event> {
        vec![
            note("C4", 1.0, 0.0),
            note("G5", 1.0, 0.0),
            rest(1.0, 1.0),
            note("C4", 2.0, 2.0),
            note("A4", 2.0, 2.0),
        ]
    }

    #[test]
    fn test_length_and_offset() {
        let span = Span::from_events(test_events(), 0.0, None);
        assert_eq!(span.length(), Time::from(4.0));
        assert_eq!(span.offset(), Time::zero());
        assert_eq!(span.num_events(), 5);

        let span = Span::from_events(test_events(), 8.0, Some(6.0));
        assert_eq!(span.length(), Time::from(6.0));
        assert_eq!(span.offset(), Time::from(8.0));
    }

    #[test]
    fn test_zero_duration_is_dropped() {
        let mut span = Span::new();
        assert!(!span.append_event(note("C4", 0.0, 0.0)));
        assert!(!span.append_event(rest(1e-9, 1.0)));
        assert!(span.append_event(note("C4", 0.5, 0.0)));
        assert_eq!(span.num_events(), 1);
    }

    #[test]
    fn test_padded_length_invalidation() {
        let mut span = Span::from_events(vec![note("C4", 1.0, 0.0)], 0.0, Some(4.0));
        assert_eq!(span.length().in_beats(), 4.0);
        span.append_event(note("D4", 1.0, 3.0));
        assert_eq!(span.length().in_beats(), 4.0);
        span.append_event(note("E4", 1.0, 3.5));
        assert_eq!(span.length().in_beats(), 4.5);
    }

    #[test]
    fn test_pad_to_length() {
        let mut span = Span::from_events(vec![note("C4", 1.0, 0.0)], 0.0, None);
        span.pad_to_length(4.0);
        assert_eq!(span.num_events(), 2);
        assert!(span[1].is_rest());
        assert_eq!(span[1].time().in_beats(), 1.0);
        assert_eq!(span[1].duration().in_beats(), 3.0);
        assert_eq!(span.length().in_beats(), 4.0);

        span.pad_to_length(2.0);
        assert_eq!(span.num_events(), 2);
    }

    #[test]
    fn test_sort_order() {
        let span = Span::from_events(
            vec![
                note("A4", 1.0, 1.0),
                rest(1.0, 0.0),
                note("E", 1.0, 0.0),
                note("C5", 1.0, 0.0),
                note("D3", 1.0, 0.0),
            ],
            0.0,
            None,
        );
        let order: Vec<String> = span
            .iter()
            .map(|e| e.pitch().map(|p| p.name()).unwrap_or_else(|| "rest".into()))
            .collect();
        assert_eq!(order, vec!["rest", "D3", "E", "C5", "A4"]);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let span = Span::from_events(
            vec![rest(1.0, 0.0), rest(2.0, 0.0), note("C4", 1.0, 0.01)],
            0.0,
            None,
        );
        assert_eq!(span[0].duration().in_beats(), 1.0);
        assert_eq!(span[1].duration().in_beats(), 2.0);
        assert!(span[2].is_note());
    }

    #[test]
    fn test_is_monophonic() {
        let span = Span::from_events(test_events(), 0.0, None);
        assert!(!span.is_monophonic());

        let span = Span::from_events(
            vec![note("C4", 1.0, 0.0), rest(1.0, 1.0), note("D4", 2.0, 2.0)],
            0.0,
            None,
        );
        assert!(span.is_monophonic());
    }

    #[test]
    fn test_discard_rests_keeps_length() {
        let mut span = Span::from_events(
            vec![note("C4", 1.0, 0.0), rest(3.0, 1.0)],
            0.0,
            None,
        );
        assert_eq!(span.discard_rests(), 1);
        assert_eq!(span.num_events(), 1);
        assert_eq!(span.length().in_beats(), 4.0);
        assert_eq!(span.natural_length(), 1.0);
    }

    #[test]
    fn test_concat_length_law() {
        let a = Span::from_events(test_events(), 0.0, None);
        let b = Span::from_events(vec![note("D4", 1.0, 0.0)], 4.0, Some(3.0));
        let c = Span::concat([&a, &b]);

        assert_eq!(c.length().in_beats(), a.length().in_beats() + b.length().in_beats());
        assert_eq!(c.num_events(), a.num_events() + b.num_events());
        assert_eq!(c.offset(), Time::zero());
        assert_eq!(c[5].time().in_beats(), 4.0);
        assert_eq!(c[5].pitch(), Some(Pitch::from_name("D4").unwrap()));

        let triple = Span::concat([&a, &a, &a]);
        assert_eq!(triple.length().in_beats(), 12.0);
    }

    #[test]
    fn test_overlay_uses_each_offset() {
        let a = Span::from_events(vec![note("C4", 1.0, 0.0)], 2.0, None);
        let b = Span::from_events(vec![note("E4", 1.0, 0.0)], 1.0, None);
        let merged = Span::overlay([&a, &b]);

        assert_eq!(merged.offset(), Time::zero());
        assert_eq!(merged.num_events(), 2);
        // Re-sorted: E4 lands at 1.0, C4 at 2.0
        assert_eq!(merged[0].pitch(), Some(Pitch::from_name("E4").unwrap()));
        assert_eq!(merged[0].time().in_beats(), 1.0);
        assert_eq!(merged[1].time().in_beats(), 2.0);
    }

    #[test]
    fn test_move_offset_to_events() {
        let mut span = Span::from_events(vec![note("C4", 1.0, 0.5)], 4.0, Some(4.0));
        span.move_offset_to_events();
        assert_eq!(span.offset(), Time::zero());
        assert_eq!(span[0].time().in_beats(), 4.5);
        assert_eq!(span.length().in_beats(), 8.0);
    }

    #[test]
    fn test_quantize_and_transpose() {
        let mut span = Span::from_events(vec![note("B3", 0.98, 0.01)], 0.0, None);
        let err = span.quantize_events(0.25).unwrap();
        assert!((err - 0.02).abs() < 1e-9);
        assert_eq!(span[0].duration().in_beats(), 1.0);

        span.transpose(1).unwrap();
        assert_eq!(span[0].pitch(), Some(Pitch::from_name("C4").unwrap()));
    }

    #[test]
    fn test_display() {
        let span = Span::from_events(vec![rest(1.0, 0.0)], 0.0, None);
        assert_eq!(span.to_string(), "Span[length=1, offset=0, (Event[Rest[1], time=0])]");
    }
}
