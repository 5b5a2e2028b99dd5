// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! notegrid - quantized note timelines for sequence models.
//!
//! A piece of music is modelled as bars of note and rest events on a
//! quantized time grid. Bars are cut into fixed-width windows, events
//! crossing a window boundary are clipped and flagged, and each clipped
//! event is encoded into a flat feature vector plus a tuple of labels.
//!
//! Pipeline: score parser -> [`Piece`] -> [`Span::generate_slices`] ->
//! [`TimeSlice`] -> [`SlicedEvent`] -> [`EventDataBuilder`].

pub mod arrangement;
pub mod config;
pub mod encoding;
pub mod error;
pub mod music;
pub mod sequencer;
pub mod timing;

pub use arrangement::{Corpus, LoadOptions, Piece, PieceFilter, Score, ScoreParser, YamlScoreParser};
pub use config::{CorpusOptions, Settings};
pub use encoding::{DataCorpus, EncodeArgs, EventDataBuilder, Feature, Labeller, PieceData};
pub use error::{Error, Result};
pub use music::{KeyMode, Notation, Note, Pitch, Rest};
pub use sequencer::{Event, EventView, SlicedEvent, Span, TimeSlice};
pub use timing::{Time, TimeWindow};
