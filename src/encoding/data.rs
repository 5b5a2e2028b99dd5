// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Training data.
//!
//! Encoded data mirrors the shape of a piece: [`PieceData`] holds one
//! [`BarData`] per bar, each bar one [`TimeSliceData`] per window, each
//! window one [`EventData`] per sliced event.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::builder::EventDataBuilder;
use super::EncodeArgs;
use crate::arrangement::corpus::{read_snapshot, write_snapshot};
use crate::arrangement::{Corpus, Piece};
use crate::error::Result;
use crate::sequencer::{EventView, Span, TimeSlice};

/// Vector and labels of one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    pub vec: Vec<f64>,
    pub labels: Vec<Option<usize>>,
}

impl EventData {
    pub fn new(event: &dyn EventView, builder: &EventDataBuilder) -> Result<Self> {
        let args = EncodeArgs::default();
        Ok(Self {
            vec: builder.make_vector(event, &args)?,
            labels: builder.make_labels(event, &args)?,
        })
    }
}

/// Encoded events of one window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSliceData {
    pub events: Vec<EventData>,
}

impl TimeSliceData {
    /// Encode the sliced events of `slice`. With `discard_rests`, a slice
    /// holding nothing but rests encodes as empty.
    pub fn new(slice: &TimeSlice<'_>, builder: &EventDataBuilder, discard_rests: bool) -> Result<Self> {
        if discard_rests && slice.is_all_rests() {
            return Ok(Self::default());
        }
        let events = slice
            .sliced_events()
            .map(|sliced| EventData::new(&sliced, builder))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { events })
    }
}

/// Encoded windows of one bar
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarData {
    pub timeslices: Vec<TimeSliceData>,
}

impl BarData {
    pub fn new(
        bar: &Span,
        builder: &EventDataBuilder,
        slice_resolution: f64,
        discard_rests: bool,
    ) -> Result<Self> {
        let timeslices = bar
            .generate_slices(slice_resolution)?
            .map(|slice| TimeSliceData::new(&slice, builder, discard_rests))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { timeslices })
    }
}

/// Encoded bars of one piece
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PieceData {
    pub name: String,
    pub bars: Vec<BarData>,
}

impl PieceData {
    pub fn new(
        piece: &Piece,
        builder: &EventDataBuilder,
        slice_resolution: f64,
        discard_rests: bool,
    ) -> Result<Self> {
        let bars = piece
            .bars()
            .iter()
            .map(|bar| BarData::new(bar, builder, slice_resolution, discard_rests))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name: piece.name().to_string(),
            bars,
        })
    }

    /// Total encoded events across all bars
    pub fn num_events(&self) -> usize {
        self.bars
            .iter()
            .flat_map(|bar| &bar.timeslices)
            .map(|slice| slice.events.len())
            .sum()
    }
}

/// Encoded data for a whole corpus, one entry per piece
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataCorpus {
    data: Vec<PieceData>,
}

impl DataCorpus {
    pub fn new(
        corpus: &Corpus,
        builder: &EventDataBuilder,
        slice_resolution: f64,
        discard_rests: bool,
    ) -> Result<Self> {
        let data = corpus
            .pieces()
            .iter()
            .map(|piece| PieceData::new(piece, builder, slice_resolution, discard_rests))
            .collect::<Result<Vec<_>>>()?;
        let corpus = Self { data };
        info!(
            pieces = corpus.size(),
            events = corpus.data.iter().map(PieceData::num_events).sum::<usize>(),
            dim = builder.dim(),
            slice_resolution,
            "Formatted corpus data"
        );
        Ok(corpus)
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[PieceData] {
        &self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PieceData> {
        self.data.iter()
    }

    /// Write a snapshot to `path`, replacing it atomically
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_snapshot(path.as_ref(), self)
    }

    pub fn from_snapshot<P: AsRef<Path>>(path: P) -> Result<Self> {
        read_snapshot(path.as_ref())
    }
}

impl<'a> IntoIterator for &'a DataCorpus {
    type Item = &'a PieceData;
    type IntoIter = std::slice::Iter<'a, PieceData>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::feature::{ContinuesNextEvent, IsNote, IsRest, NoteRelativePitch};
    use crate::encoding::label::{IsNoteLabel, RelativePitchLabels};
    use crate::music::{Note, Rest};
    use crate::sequencer::Event;
    use tempfile::tempdir;

    fn builder() -> EventDataBuilder {
        EventDataBuilder::new()
            .with_feature(IsNote)
            .with_feature(IsRest)
            .with_feature(NoteRelativePitch::default())
            .with_feature(ContinuesNextEvent)
            .with_label(IsNoteLabel)
            .with_label(RelativePitchLabels::new())
    }

    fn bar(offset: f64) -> Span {
        Span::from_events(
            vec![
                Event::new(Note::from_name("A6", 1.0).unwrap(), 0.0),
                Event::new(Rest::new(1.0), 1.0),
            ],
            offset,
            None,
        )
    }

    #[test]
    fn test_piece_data_shape() {
        let piece = Piece::from_spans("p", vec![bar(0.0), bar(2.0)]);
        let data = PieceData::new(&piece, &builder(), 0.5, false).unwrap();

        assert_eq!(data.name, "p");
        assert_eq!(data.bars.len(), 2);
        assert_eq!(data.bars[0].timeslices.len(), 4);
        assert_eq!(data.num_events(), 8);

        let first = &data.bars[0].timeslices[0].events[0];
        assert_eq!(first.vec.len(), 15);
        assert_eq!(first.vec[14], 1.0);
        assert_eq!(first.labels, vec![Some(1), Some(9)]);

        let second = &data.bars[0].timeslices[1].events[0];
        assert_eq!(second.vec[14], 0.0);
    }

    #[test]
    fn test_discard_rest_slices() {
        let piece = Piece::from_spans("p", vec![bar(0.0)]);
        let data = PieceData::new(&piece, &builder(), 0.5, true).unwrap();
        let counts: Vec<usize> = data.bars[0]
            .timeslices
            .iter()
            .map(|ts| ts.events.len())
            .collect();
        assert_eq!(counts, vec![1, 1, 0, 0]);
    }

    #[test]
    fn test_data_corpus_snapshot() {
        let corpus = Corpus::from_pieces(vec![
            Piece::from_spans("a", vec![bar(0.0)]),
            Piece::from_spans("b", vec![bar(0.0), bar(2.0), bar(4.0)]),
        ]);
        let data = corpus.format_data(&builder(), 0.25, false).unwrap();
        assert_eq!(data.size(), 2);
        assert_eq!(data.data()[1].bars.len(), 3);
        assert_eq!((&data).into_iter().count(), 2);

        let dir = tempdir().unwrap();
        let path = dir.path().join("data.yaml");
        data.save(&path).unwrap();
        let loaded = DataCorpus::from_snapshot(&path).unwrap();
        assert_eq!(loaded, data);
    }

    #[test]
    fn test_bad_resolution_fails() {
        let piece = Piece::from_spans("p", vec![bar(0.0)]);
        assert!(PieceData::new(&piece, &builder(), 0.0, false).is_err());
    }
}
