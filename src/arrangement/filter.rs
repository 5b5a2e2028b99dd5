// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Piece filters.
//!
//! Filters decide which pieces are admitted to a corpus. Any
//! `Fn(&Piece) -> bool` closure is a filter too.

use super::piece::Piece;
use crate::error::Result;

/// A predicate over pieces with a diagnostic for rejections
pub trait PieceFilter {
    /// Whether `piece` passes
    fn test(&self, piece: &Piece) -> Result<bool>;

    /// Why a piece failed this filter
    fn failure_reason(&self) -> String;
}

impl<F> PieceFilter for F
where
    F: Fn(&Piece) -> bool,
{
    fn test(&self, piece: &Piece) -> Result<bool> {
        Ok(self(piece))
    }

    fn failure_reason(&self) -> String {
        "rejected by custom filter".to_string()
    }
}

/// Passes when every slice of every bar at `resolution` is atomic,
/// i.e. no event starts or ends strictly inside a slice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtomicSlicable {
    resolution: f64,
}

impl AtomicSlicable {
    pub fn new(resolution: f64) -> Self {
        Self { resolution }
    }
}

impl PieceFilter for AtomicSlicable {
    fn test(&self, piece: &Piece) -> Result<bool> {
        for bar in piece.bars() {
            for slice in bar.generate_slices(self.resolution)? {
                if !slice.is_atomic_slice() {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    fn failure_reason(&self) -> String {
        format!("not atomic-slicable at resolution {}", self.resolution)
    }
}

/// Passes when every note lies within an inclusive octave range.
/// Notes without an octave use the bar's assumed octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotesWithinRange {
    low: u8,
    high: u8,
}

impl NotesWithinRange {
    pub fn new(octave_range: (u8, u8)) -> Self {
        Self {
            low: octave_range.0,
            high: octave_range.1,
        }
    }
}

impl PieceFilter for NotesWithinRange {
    fn test(&self, piece: &Piece) -> Result<bool> {
        Ok(piece.bars().iter().all(|bar| {
            bar.iter().filter_map(|event| event.pitch()).all(|pitch| {
                let octave = pitch.octave().unwrap_or(bar.assumed_octave());
                (self.low..=self.high).contains(&octave)
            })
        }))
    }

    fn failure_reason(&self) -> String {
        format!("notes outside octaves {}..={}", self.low, self.high)
    }
}

/// Passes pieces with at most `max` bars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxBars(pub usize);

impl PieceFilter for MaxBars {
    fn test(&self, piece: &Piece) -> Result<bool> {
        Ok(piece.num_bars() <= self.0)
    }

    fn failure_reason(&self) -> String {
        format!("more than {} bars", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::{Note, Rest};
    use crate::sequencer::{Event, Span};

    fn test_piece() -> Piece {
        let span = Span::from_events(
            vec![
                Event::new(Note::from_name("C4", 1.0).unwrap(), 0.0),
                Event::new(Note::from_name("G5", 1.0).unwrap(), 0.0),
                Event::new(Rest::new(1.0), 1.0),
                Event::new(Note::from_name("C4", 2.0).unwrap(), 2.0),
                Event::new(Note::from_name("A4", 2.0).unwrap(), 2.0),
            ],
            0.0,
            None,
        );
        Piece::from_spans("test", vec![span])
    }

    #[test]
    fn test_atomic_slicable() {
        let piece = test_piece();
        assert!(AtomicSlicable::new(0.25).test(&piece).unwrap());
        assert!(AtomicSlicable::new(1.0).test(&piece).unwrap());
        assert!(!AtomicSlicable::new(1.5).test(&piece).unwrap());
        assert!(AtomicSlicable::new(0.0).test(&piece).is_err());
        assert_eq!(
            AtomicSlicable::new(1.5).failure_reason(),
            "not atomic-slicable at resolution 1.5"
        );
    }

    #[test]
    fn test_notes_within_range() {
        let piece = test_piece();
        assert!(NotesWithinRange::new((4, 5)).test(&piece).unwrap());
        assert!(!NotesWithinRange::new((4, 4)).test(&piece).unwrap());
        assert!(!NotesWithinRange::new((5, 6)).test(&piece).unwrap());
    }

    #[test]
    fn test_closure_filter() {
        let piece = test_piece();
        let is_short = |p: &Piece| p.num_bars() <= 16;
        assert!(is_short.test(&piece).unwrap());
        assert_eq!(is_short.failure_reason(), "rejected by custom filter");

        assert!(MaxBars(1).test(&piece).unwrap());
        assert!(!MaxBars(0).test(&piece).unwrap());
    }
}
