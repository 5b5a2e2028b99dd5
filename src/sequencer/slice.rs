// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Windowing engine.
//!
//! A [`TimeSlice`] selects the events of a span that overlap a half-open
//! window. Each selected event can be materialized as a [`SlicedEvent`]:
//! a copy clipped to the window and flagged with whether the original
//! started before it or ends after it.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::event::{Event, EventView};
use super::span::Span;
use crate::error::{Error, Result};
use crate::music::Pitch;
use crate::timing::{Time, TimeWindow, ZERO_EPSILON};

/// Tolerance for the clipped-duration post-condition
const CLIP_EPSILON: f64 = 1e-5;

/// An event clipped to a window, with continuation flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlicedEvent {
    event: Event,
    window: TimeWindow,
    pre_continue: bool,
    post_continue: bool,
}

impl SlicedEvent {
    /// Clip `event` to `window`. Fails if the event does not overlap it.
    pub fn new(window: TimeWindow, event: &Event) -> Result<Self> {
        if !event.overlaps(&window) {
            return Err(Error::invariant(format!(
                "{} does not overlap window {}",
                event, window
            )));
        }
        Ok(Self::clip(window, event.clone(), false, false))
    }

    /// Clip an already-sliced event again, keeping its continuation flags.
    /// Re-slicing to the same window is a no-op.
    pub fn reslice(&self, window: TimeWindow) -> Result<Self> {
        if !self.event.overlaps(&window) {
            return Err(Error::invariant(format!(
                "{} does not overlap window {}",
                self.event, window
            )));
        }
        Ok(Self::clip(
            window,
            self.event.clone(),
            self.pre_continue,
            self.post_continue,
        ))
    }

    /// Clip an event known to overlap `window`. The clipped range is the
    /// intersection of the event and the window, so it never exceeds the
    /// window and equals it when both ends are clipped.
    fn clip(
        window: TimeWindow,
        mut event: Event,
        pre_continue: bool,
        post_continue: bool,
    ) -> Self {
        let start = event.start_beats();
        let end = event.end_beats();
        let clips_start = start < window.start();
        let clips_end = end > window.end();

        if clips_start || clips_end {
            let clipped_start = start.max(window.start());
            let clipped_end = end.min(window.end());
            let clipped_duration = clipped_end - clipped_start;

            if clips_start {
                event.set_time(Time::unquantized(window.start()));
            }
            event
                .notation_mut()
                .set_duration(Time::unquantized(clipped_duration));

            let width = window.width();
            debug_assert!(clipped_duration <= width + CLIP_EPSILON);
            debug_assert!(
                !(clips_start && clips_end) || (clipped_duration - width).abs() < CLIP_EPSILON
            );
        }

        Self {
            event,
            window,
            pre_continue: pre_continue || clips_start,
            post_continue: post_continue || clips_end,
        }
    }

    /// The window this event was clipped to
    pub fn window(&self) -> TimeWindow {
        self.window
    }

    /// Clipped start time
    pub fn time(&self) -> Time {
        self.event.time()
    }

    /// Clipped duration
    pub fn duration(&self) -> Time {
        self.event.duration()
    }

    pub fn pitch(&self) -> Option<Pitch> {
        self.event.pitch()
    }

    pub fn is_note(&self) -> bool {
        self.event.is_note()
    }

    pub fn is_rest(&self) -> bool {
        self.event.is_rest()
    }

    /// Whether either side was clipped
    pub fn is_clipped(&self) -> bool {
        self.pre_continue || self.post_continue
    }

    /// Drop the flags and keep the clipped event
    pub fn into_event(self) -> Event {
        self.event
    }
}

impl EventView for SlicedEvent {
    fn event(&self) -> &Event {
        &self.event
    }

    fn pre_continue(&self) -> bool {
        self.pre_continue
    }

    fn post_continue(&self) -> bool {
        self.post_continue
    }
}

impl PartialEq for SlicedEvent {
    fn eq(&self, other: &Self) -> bool {
        self.pre_continue == other.pre_continue
            && self.post_continue == other.post_continue
            && self.event == other.event
    }
}

/// A sliced event equals a plain event only when nothing was clipped
impl PartialEq<Event> for SlicedEvent {
    fn eq(&self, other: &Event) -> bool {
        !self.is_clipped() && self.event == *other
    }
}

impl fmt::Display for SlicedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SlicedEvent[{}, start={}, end={}]",
            self.event,
            self.is_note_start(),
            self.is_note_end()
        )
    }
}

/// The raw events of a span overlapping one window
#[derive(Debug, Clone)]
pub struct TimeSlice<'a> {
    window: TimeWindow,
    events: Vec<&'a Event>,
}

impl<'a> TimeSlice<'a> {
    /// Select the events of `span` that overlap `window`
    pub fn new(span: &'a Span, window: TimeWindow) -> Self {
        let events = span
            .iter()
            .filter(|event| event.overlaps(&window))
            .collect();
        Self { window, events }
    }

    /// Range form of [`TimeSlice::new`]; fails if `start >= end`
    pub fn from_range(span: &'a Span, start: f64, end: f64) -> Result<Self> {
        Ok(Self::new(span, TimeWindow::new(start, end)?))
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn start(&self) -> f64 {
        self.window.start()
    }

    pub fn end(&self) -> f64 {
        self.window.end()
    }

    pub fn num_events(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The overlapping events, unclipped
    pub fn raw_events(&self) -> &[&'a Event] {
        &self.events
    }

    /// The overlapping events clipped to the window, lazily.
    /// Call again to restart.
    pub fn sliced_events(&self) -> impl Iterator<Item = SlicedEvent> + '_ {
        let window = self.window;
        self.events
            .iter()
            .map(move |event| SlicedEvent::clip(window, (*event).clone(), false, false))
    }

    /// Whether every event covers the whole window, i.e. no event starts
    /// or ends strictly inside it. Empty slices are atomic.
    pub fn is_atomic_slice(&self) -> bool {
        self.sliced_events().all(|sliced| {
            let start = sliced.event().start_beats();
            let end = sliced.event().end_beats();
            start <= self.start() + ZERO_EPSILON && end >= self.end() - ZERO_EPSILON
        })
    }

    /// Whether every slice event is a rest
    pub fn is_all_rests(&self) -> bool {
        self.events.iter().all(|event| event.is_rest())
    }
}

/// Lazy sequence of fixed-width slices tiling a span.
///
/// Created by [`Span::generate_slices`]. Windows start at `i * resolution`;
/// the last one is cut at the span length.
#[derive(Debug, Clone)]
pub struct Slices<'a> {
    span: &'a Span,
    resolution: f64,
    length: f64,
    index: usize,
}

impl<'a> Slices<'a> {
    pub(crate) fn new(span: &'a Span, resolution: f64) -> Result<Self> {
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(Error::construction(format!(
                "slice resolution must be positive, got {}",
                resolution
            )));
        }
        Ok(Self {
            span,
            resolution,
            length: span.length().in_beats(),
            index: 0,
        })
    }

    fn total(&self) -> usize {
        if self.length <= 0.0 {
            0
        } else {
            (self.length / self.resolution).ceil() as usize
        }
    }
}

impl<'a> Iterator for Slices<'a> {
    type Item = TimeSlice<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.index as f64 * self.resolution;
        if start >= self.length {
            return None;
        }
        let end = (start + self.resolution).min(self.length);
        let window = TimeWindow::new(start, end).ok()?;
        self.index += 1;
        Some(TimeSlice::new(self.span, window))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}
