// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Corpus of pieces.
//!
//! A [`Corpus`] loads score files in input order, admits the pieces that
//! pass every filter and keeps a record of what was rejected or skipped.
//! Snapshots are written atomically as YAML.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::filter::PieceFilter;
use super::piece::{LoadOptions, Piece};
use super::score::ScoreParser;
use crate::config::Settings;
use crate::encoding::{DataCorpus, EventDataBuilder};
use crate::error::{Error, Result};

/// Per-file messages go to info when verbose, debug otherwise
macro_rules! report {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            info!($($arg)+)
        } else {
            debug!($($arg)+)
        }
    };
}

/// A file that did not make it into the corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    pub path: PathBuf,
    pub reason: String,
}

/// A collection of loaded pieces
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    pieces: Vec<Piece>,
    /// Pieces turned away by filters
    num_rejected: usize,
    #[serde(default)]
    rejections: Vec<Rejection>,
    /// Files that failed to load and were skipped
    #[serde(default)]
    skipped: Vec<Rejection>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pieces(pieces: impl IntoIterator<Item = Piece>) -> Self {
        Self {
            pieces: pieces.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Load every file in `paths`, in order.
    ///
    /// Pieces failing a filter are counted and recorded. Files that fail to
    /// parse abort the load unless `ignore_load_errors` is set, in which case
    /// they are skipped with a reason. Loading stops once `max_len` pieces
    /// have been admitted.
    pub fn load<P: AsRef<Path>>(
        paths: impl IntoIterator<Item = P>,
        parser: &dyn ScoreParser,
        filters: &[&dyn PieceFilter],
        settings: &Settings,
    ) -> Result<Self> {
        let options = &settings.corpus;
        let load_options = options
            .load_options()
            .map_err(|e| Error::construction(format!("{:#}", e)))?;
        let verbose = options.verbose;

        let mut corpus = Self::new();
        for path in paths {
            let path = path.as_ref();
            let piece = match Piece::load(parser, path, &load_options, settings) {
                Ok(piece) => piece,
                Err(err) if options.ignore_load_errors && err.is_load_error() => {
                    report!(verbose, path = %path.display(), error = %err, "Skipping file");
                    corpus.skipped.push(Rejection {
                        path: path.to_path_buf(),
                        reason: err.to_string(),
                    });
                    continue;
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Failed to load file");
                    return Err(err);
                }
            };

            match corpus.passes_filters(&piece, filters)? {
                None => {
                    report!(verbose, path = %path.display(), "Loaded");
                    corpus.pieces.push(piece);
                }
                Some(reason) => {
                    report!(verbose, path = %path.display(), reason = %reason, "Rejected");
                    corpus.rejections.push(Rejection {
                        path: path.to_path_buf(),
                        reason,
                    });
                }
            }

            if options.max_len.is_some_and(|max| corpus.size() >= max) {
                break;
            }
        }

        if options.discard_rests {
            corpus.discard_rests();
        }

        info!(
            pieces = corpus.size(),
            rejected = corpus.num_rejected,
            skipped = corpus.skipped.len(),
            "Corpus loaded"
        );
        Ok(corpus)
    }

    /// Run `piece` through `filters`, counting a rejection on the first
    /// failure. Returns the failing filter's reason, or `None` on success.
    pub fn passes_filters(
        &mut self,
        piece: &Piece,
        filters: &[&dyn PieceFilter],
    ) -> Result<Option<String>> {
        let verdict = first_failure(piece, filters)?;
        if verdict.is_some() {
            self.num_rejected += 1;
        }
        Ok(verdict)
    }

    /// Drop every piece failing any of `filters`; returns how many were removed.
    ///
    /// Every piece is tested before any is removed, so a filter error leaves
    /// the corpus untouched.
    pub fn filter(&mut self, filters: &[&dyn PieceFilter]) -> Result<usize> {
        let verdicts = self
            .pieces
            .iter()
            .map(|piece| first_failure(piece, filters))
            .collect::<Result<Vec<_>>>()?;

        let before = self.pieces.len();
        let mut kept = Vec::with_capacity(before);
        for (piece, verdict) in self.pieces.drain(..).zip(verdicts) {
            match verdict {
                None => kept.push(piece),
                Some(reason) => {
                    debug!(piece = piece.name(), reason = %reason, "Filtered out");
                    self.rejections.push(Rejection {
                        path: PathBuf::from(piece.name()),
                        reason,
                    });
                }
            }
        }
        self.pieces = kept;
        let removed = before - self.pieces.len();
        self.num_rejected += removed;
        Ok(removed)
    }

    /// Remove rests from every piece
    pub fn discard_rests(&mut self) {
        for piece in &mut self.pieces {
            piece.discard_rests();
        }
    }

    /// Number of pieces
    pub fn size(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn num_rejected(&self) -> usize {
        self.num_rejected
    }

    pub fn rejections(&self) -> &[Rejection] {
        &self.rejections
    }

    pub fn skipped(&self) -> &[Rejection] {
        &self.skipped
    }

    /// Write a snapshot to `path`, replacing it atomically
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        write_snapshot(path, self)?;
        info!(path = %path.display(), pieces = self.size(), "Saved corpus snapshot");
        Ok(())
    }

    /// Read a snapshot written by [`Corpus::save`]
    pub fn from_snapshot<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let corpus: Self = read_snapshot(path)?;
        info!(path = %path.display(), pieces = corpus.size(), "Loaded corpus snapshot");
        Ok(corpus)
    }

    /// Slice and encode every piece
    pub fn format_data(
        &self,
        builder: &EventDataBuilder,
        slice_resolution: f64,
        discard_rests: bool,
    ) -> Result<DataCorpus> {
        DataCorpus::new(self, builder, slice_resolution, discard_rests)
    }

    /// Shuffle with `seed` and split into (train, validation) corpora.
    ///
    /// The same seed always yields the same split for the same corpus.
    pub fn split(&self, train_fraction: f64, seed: u64) -> Result<(Corpus, Corpus)> {
        if !(0.0..=1.0).contains(&train_fraction) {
            return Err(Error::construction(format!(
                "train fraction must be within [0, 1], got {}",
                train_fraction
            )));
        }
        let mut order: Vec<usize> = (0..self.pieces.len()).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        order.shuffle(&mut rng);

        let num_train = (self.pieces.len() as f64 * train_fraction).round() as usize;
        let pick = |indices: &[usize]| {
            Corpus::from_pieces(indices.iter().map(|&i| self.pieces[i].clone()))
        };
        let (train, validation) = order.split_at(num_train);
        debug!(
            train = train.len(),
            validation = validation.len(),
            seed,
            "Split corpus"
        );
        Ok((pick(train), pick(validation)))
    }
}

/// Reason of the first filter `piece` fails, if any
fn first_failure(piece: &Piece, filters: &[&dyn PieceFilter]) -> Result<Option<String>> {
    for filter in filters {
        if !filter.test(piece)? {
            return Ok(Some(filter.failure_reason()));
        }
    }
    Ok(None)
}

/// Serialize `value` as YAML to a temp file beside `path`, then move it
/// over `path`
pub(crate) fn write_snapshot<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let yaml = serde_yaml::to_string(value).map_err(|e| Error::Snapshot(e.to_string()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(yaml.as_bytes())?;
    file.flush()?;
    file.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

pub(crate) fn read_snapshot<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)?;
    serde_yaml::from_str(&contents).map_err(|e| Error::Snapshot(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrangement::filter::{AtomicSlicable, MaxBars};
    use crate::arrangement::score::YamlScoreParser;
    use tempfile::tempdir;

    const ONE_BAR: &str = r#"
measures:
  - offset: 0.0
    events:
      - { is_note: true, pitch: Db4, duration: 4.0, offset: 0.0 }
"#;

    fn many_bars(n: usize) -> String {
        let mut yaml = String::from("key: { tonic: D, mode: major }\nmeasures:\n");
        for i in 0..n {
            yaml.push_str(&format!(
                "  - offset: {}\n    events:\n      - {{ is_note: true, pitch: D5, duration: 1.5, offset: 0.0 }}\n      - {{ is_note: true, pitch: A4, duration: 2.5, offset: 1.5 }}\n",
                i * 4
            ));
        }
        yaml
    }

    fn write_files(dir: &Path) -> Vec<PathBuf> {
        let long = dir.join("canon.yaml");
        fs::write(&long, many_bars(27)).unwrap();
        let short = dir.join("piece.yaml");
        fs::write(&short, ONE_BAR).unwrap();
        vec![long, short]
    }

    #[test]
    fn test_load() {
        let dir = tempdir().unwrap();
        let files = write_files(dir.path());
        let corpus = Corpus::load(&files, &YamlScoreParser, &[], &Settings::default()).unwrap();

        assert_eq!(corpus.size(), 2);
        assert_eq!(corpus.pieces()[0].num_bars(), 27);
        assert_eq!(corpus.pieces()[1].num_bars(), 1);
        assert_eq!(corpus.pieces()[1].name(), files[1].display().to_string());
        assert_eq!(corpus.num_rejected(), 0);
    }

    #[test]
    fn test_load_with_filters() {
        let dir = tempdir().unwrap();
        let files = write_files(dir.path());
        let is_short = |p: &Piece| p.num_bars() <= 16;
        let corpus =
            Corpus::load(&files, &YamlScoreParser, &[&is_short], &Settings::default()).unwrap();

        assert_eq!(corpus.size(), 1);
        assert_eq!(corpus.pieces()[0].num_bars(), 1);
        assert_eq!(corpus.num_rejected(), 1);
        assert_eq!(corpus.rejections()[0].path, files[0]);
        assert_eq!(corpus.rejections()[0].reason, "rejected by custom filter");

        // D5 for 1.5 beats straddles the 1-beat grid
        let atomic = AtomicSlicable::new(1.0);
        let corpus =
            Corpus::load(&files, &YamlScoreParser, &[&atomic], &Settings::default()).unwrap();
        assert_eq!(corpus.size(), 1);
        assert_eq!(corpus.pieces()[0].num_bars(), 1);
    }

    #[test]
    fn test_max_len() {
        let dir = tempdir().unwrap();
        let files = write_files(dir.path());
        let mut settings = Settings::default();
        settings.corpus.max_len = Some(1);
        let corpus = Corpus::load(&files, &YamlScoreParser, &[], &settings).unwrap();
        assert_eq!(corpus.size(), 1);
        assert_eq!(corpus.pieces()[0].num_bars(), 27);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();
        let mut files = write_files(dir.path());
        let broken = dir.path().join("broken.yaml");
        fs::write(&broken, "measures: [").unwrap();
        files.insert(1, broken.clone());

        let result = Corpus::load(&files, &YamlScoreParser, &[], &Settings::default());
        assert!(matches!(result, Err(Error::ScoreParse { .. })));

        let mut settings = Settings::default();
        settings.corpus.ignore_load_errors = true;
        let corpus = Corpus::load(&files, &YamlScoreParser, &[], &settings).unwrap();
        assert_eq!(corpus.size(), 2);
        assert_eq!(corpus.skipped().len(), 1);
        assert_eq!(corpus.skipped()[0].path, broken);
        assert_eq!(corpus.num_rejected(), 0);
    }

    #[test]
    fn test_bad_pitch_is_a_load_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad_pitch.yaml");
        fs::write(
            &path,
            "measures:\n  - events:\n      - { is_note: true, pitch: H2, duration: 1.0 }\n",
        )
        .unwrap();
        let mut settings = Settings::default();
        settings.corpus.ignore_load_errors = true;
        let corpus = Corpus::load([&path], &YamlScoreParser, &[], &settings).unwrap();
        assert!(corpus.is_empty());
        assert_eq!(corpus.skipped().len(), 1);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let dir = tempdir().unwrap();
        let files = write_files(dir.path());
        let corpus = Corpus::load(&files, &YamlScoreParser, &[], &Settings::default()).unwrap();

        let snapshot = dir.path().join("corpus.yaml");
        corpus.save(&snapshot).unwrap();
        assert!(snapshot.exists());
        // Saving again replaces the file in place
        corpus.save(&snapshot).unwrap();

        let loaded = Corpus::from_snapshot(&snapshot).unwrap();
        assert_eq!(loaded.size(), corpus.size());
        for (piece, expected) in loaded.pieces().iter().zip(&files) {
            assert_eq!(piece.name(), expected.display().to_string());
        }
        for (a, b) in loaded.pieces().iter().zip(corpus.pieces()) {
            assert_eq!(a.num_bars(), b.num_bars());
            assert_eq!(a.count_events(), b.count_events());
        }

        fs::write(&snapshot, "pieces: 7").unwrap();
        assert!(matches!(Corpus::from_snapshot(&snapshot), Err(Error::Snapshot(_))));
    }

    #[test]
    fn test_filter_and_discard_rests() {
        let dir = tempdir().unwrap();
        let files = write_files(dir.path());
        let mut corpus =
            Corpus::load(&files, &YamlScoreParser, &[], &Settings::default()).unwrap();

        let removed = corpus.filter(&[&MaxBars(10)]).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(corpus.size(), 1);
        assert_eq!(corpus.num_rejected(), 1);
        assert_eq!(corpus.rejections().len(), 1);
        assert_eq!(corpus.rejections()[0].path, files[0]);
        assert_eq!(corpus.rejections()[0].reason, MaxBars(10).failure_reason());

        corpus.discard_rests();
        assert_eq!(corpus.pieces()[0].count_events(), 1);
    }

    #[test]
    fn test_filter_error_keeps_corpus() {
        let dir = tempdir().unwrap();
        let files = write_files(dir.path());
        let mut corpus =
            Corpus::load(&files, &YamlScoreParser, &[], &Settings::default()).unwrap();

        assert!(corpus.filter(&[&MaxBars(10), &AtomicSlicable::new(0.0)]).is_err());
        assert_eq!(corpus.size(), 2);
        assert_eq!(corpus.num_rejected(), 0);
        assert!(corpus.rejections().is_empty());
    }

    #[test]
    fn test_split_is_reproducible() {
        let pieces = (0..10).map(|i| Piece::new(format!("piece-{}", i)));
        let corpus = Corpus::from_pieces(pieces);

        let (train, validation) = corpus.split(0.8, 42).unwrap();
        assert_eq!(train.size(), 8);
        assert_eq!(validation.size(), 2);

        let (again, _) = corpus.split(0.8, 42).unwrap();
        let names: Vec<&str> = train.pieces().iter().map(Piece::name).collect();
        let names_again: Vec<&str> = again.pieces().iter().map(Piece::name).collect();
        assert_eq!(names, names_again);

        assert!(corpus.split(1.5, 0).is_err());
    }
}
