// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Half-open time windows used for slicing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A half-open window `[start, end)` in beats, relative to a span
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: f64,
    end: f64,
}

impl TimeWindow {
    /// Create a window; fails unless `start < end`
    pub fn new(start: f64, end: f64) -> Result<Self> {
        // Written so NaN bounds are rejected too.
        if !(start < end) {
            return Err(Error::invariant(format!(
                "invalid window {} to {}: start must be before end",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// Width of the window in beats
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    /// Whether the range `[start, end)` shares any time with this window.
    ///
    /// Ranges that only touch a boundary do not overlap.
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        if start <= self.start && end <= self.start {
            return false;
        }
        if start >= self.end && end >= self.end {
            return false;
        }
        true
    }
}

impl TryFrom<(f64, f64)> for TimeWindow {
    type Error = Error;

    fn try_from((start, end): (f64, f64)) -> Result<Self> {
        Self::new(start, end)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
