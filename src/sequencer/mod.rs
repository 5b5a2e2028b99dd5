// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Event timeline and windowing engine.
//!
//! This module provides the core timeline infrastructure:
//! - Timed note and rest events
//! - Spans (bars) with padding, concatenation and overlay
//! - Fixed-width slicing with continuation tracking

pub mod event;
pub mod slice;
pub mod span;

pub use event::{Event, EventView};
pub use slice::{SlicedEvent, Slices, TimeSlice};
pub use span::{Span, DEFAULT_ASSUMED_OCTAVE, DEFAULT_RESOLUTION};
