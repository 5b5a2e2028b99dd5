// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pieces and corpora.
//!
//! This module provides:
//! - Score: The contract a score file parser fulfils
//! - Piece: Bars of events plus key metadata
//! - Filters: Predicates deciding corpus admission
//! - Corpus: Loading, snapshotting and splitting collections of pieces

pub mod corpus;
pub mod filter;
pub mod piece;
pub mod score;

pub use corpus::{Corpus, Rejection};
pub use filter::{AtomicSlicable, MaxBars, NotesWithinRange, PieceFilter};
pub use piece::{LoadOptions, Piece};
pub use score::{Measure, Score, ScoreEvent, ScoreKey, ScoreParser, YamlScoreParser};
