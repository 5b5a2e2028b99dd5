// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error taxonomy for notegrid.
//!
//! Every failure is raised synchronously where the violation happens.
//! Nothing in the pipeline is transient, so nothing is retried.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the notegrid library
#[derive(Debug, Error)]
pub enum Error {
    /// Ambiguous or out-of-range constructor arguments (pitches, times, windows)
    #[error("invalid construction: {0}")]
    Construction(String),

    /// A label or value is not part of a labeller's bijection
    #[error("lookup failed: {0}")]
    Lookup(String),

    /// A structural invariant does not hold (e.g. a window with start >= end)
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// Operation reserved for future work
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// The score collaborator could not produce a score for a file
    #[error("failed to parse score {}: {reason}", path.display())]
    ScoreParse { path: PathBuf, reason: String },

    /// Corpus or data snapshot could not be (de)serialized
    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn construction(message: impl Into<String>) -> Self {
        Error::Construction(message.into())
    }

    pub(crate) fn lookup(message: impl Into<String>) -> Self {
        Error::Lookup(message.into())
    }

    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        Error::InvariantViolation(message.into())
    }

    /// Whether this error came from reading a score file, as opposed to a
    /// bug in the data or pipeline. Corpus loading may skip these.
    pub fn is_load_error(&self) -> bool {
        matches!(self, Error::ScoreParse { .. } | Error::Io(_))
    }
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;
