// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music primitives for notegrid.
//!
//! This module provides pitches, notes, rests and key metadata.

pub mod key;
pub mod notation;
pub mod pitch;

pub use key::KeyMode;
pub use notation::{Notation, Note, Rest};
pub use pitch::{Pitch, PitchClass, Semitones, PITCH_NAMES};
