// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Quantized musical time.
//!
//! A [`Time`] is a number of beats, optionally snapped to a resolution grid.
//! Quantized times compare by grid-step count rather than by raw float, so two
//! values recorded at different resolutions can still be reconciled.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Magnitude below which a time counts as zero
pub const ZERO_EPSILON: f64 = 1e-6;

/// A time or duration in beats
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Time {
    /// Value in beats (already snapped when `resolution` is set)
    beats: f64,
    /// Grid step in beats, if quantized
    resolution: Option<f64>,
}

fn check_resolution(resolution: f64) -> Result<()> {
    if resolution.is_finite() && resolution > 0.0 {
        Ok(())
    } else {
        Err(Error::construction(format!(
            "resolution must be positive, got {}",
            resolution
        )))
    }
}

fn snap(beats: f64, resolution: f64) -> f64 {
    resolution * (beats / resolution).round()
}

fn steps_at(beats: f64, resolution: f64) -> i64 {
    (beats / resolution).round() as i64
}

impl Time {
    /// A raw time with no grid
    pub fn unquantized(beats: f64) -> Self {
        Self {
            beats,
            resolution: None,
        }
    }

    /// A time snapped to the nearest multiple of `resolution`
    pub fn quantized(beats: f64, resolution: f64) -> Result<Self> {
        check_resolution(resolution)?;
        Ok(Self {
            beats: snap(beats, resolution),
            resolution: Some(resolution),
        })
    }

    /// Create a time, quantizing only when a resolution is given
    pub fn new(beats: f64, resolution: Option<f64>) -> Result<Self> {
        match resolution {
            Some(resolution) => Self::quantized(beats, resolution),
            None => Ok(Self::unquantized(beats)),
        }
    }

    /// Time zero, unquantized
    pub fn zero() -> Self {
        Self::unquantized(0.0)
    }

    /// Value in beats
    pub fn in_beats(&self) -> f64 {
        self.beats
    }

    /// Grid step, if quantized
    pub fn resolution(&self) -> Option<f64> {
        self.resolution
    }

    pub fn is_quantized(&self) -> bool {
        self.resolution.is_some()
    }

    /// Number of grid steps this time spans
    pub fn in_resolution_steps(&self) -> Result<i64> {
        match self.resolution {
            Some(resolution) => Ok(steps_at(self.beats, resolution)),
            None => Err(Error::invariant(
                "unquantized time has no resolution steps",
            )),
        }
    }

    /// Return a copy snapped to `resolution` together with the absolute
    /// snapping error in beats. `self` is left untouched.
    pub fn as_quantized(&self, resolution: f64) -> Result<(Time, f64)> {
        let quantized = Time::quantized(self.beats, resolution)?;
        let error = (self.beats - quantized.beats).abs();
        Ok((quantized, error))
    }

    /// Snap this time to `resolution` and return the absolute error
    pub fn quantize_in_place(&mut self, resolution: f64) -> Result<f64> {
        let (quantized, error) = self.as_quantized(resolution)?;
        *self = quantized;
        Ok(error)
    }

    pub fn is_zero(&self) -> bool {
        self.beats.abs() < ZERO_EPSILON
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<f64> for Time {
    fn from(beats: f64) -> Self {
        Self::unquantized(beats)
    }
}

impl PartialEq for Time {
    fn eq(&self, other: &Self) -> bool {
        match (self.resolution, other.resolution) {
            (None, None) => self.beats == other.beats,
            // One side has a grid; compare on that grid.
            (Some(resolution), None) | (None, Some(resolution)) => {
                steps_at(self.beats, resolution) == steps_at(other.beats, resolution)
            }
            // Differing grids are reconciled on the coarser one.
            (Some(a), Some(b)) => {
                let resolution = a.max(b);
                steps_at(self.beats, resolution) == steps_at(other.beats, resolution)
            }
        }
    }
}

impl Add for Time {
    type Output = Time;

    fn add(self, rhs: Time) -> Time {
        Time::unquantized(self.beats + rhs.beats)
    }
}

impl Sub for Time {
    type Output = Time;

    fn sub(self, rhs: Time) -> Time {
        Time::unquantized(self.beats - rhs.beats)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resolution {
            Some(resolution) => write!(
                f,
                "{} (resolution {}, {} steps)",
                self.beats,
                resolution,
                steps_at(self.beats, resolution)
            ),
            None => write!(f, "{}", self.beats),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantized_construction_snaps() {
        let t = Time::quantized(0.3, 0.25).unwrap();
        assert_eq!(t.in_beats(), 0.25);
        assert_eq!(t.in_resolution_steps().unwrap(), 1);

        let t = Time::quantized(2.0 + 1.0 / 48.0, 1.0 / 16.0).unwrap();
        assert!((t.in_beats() - 2.0).abs() < 1e-9);
        assert_eq!(t.in_resolution_steps().unwrap(), 32);
    }

    #[test]
    fn test_snapping_law() {
        let resolutions = [0.5, 0.25, 1.0 / 16.0, 1.0 / 3.0];
        let raws = [0.0, 0.1, 0.49, 1.77, 3.3333, 7.9];
        for &r in &resolutions {
            for &raw in &raws {
                let t = Time::quantized(raw, r).unwrap();
                assert!((t.in_beats() - (raw / r).round() * r).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_invalid_resolution() {
        assert!(matches!(Time::quantized(1.0, 0.0), Err(Error::Construction(_))));
        assert!(matches!(Time::quantized(1.0, -0.5), Err(Error::Construction(_))));
        assert!(Time::new(1.0, Some(f64::NAN)).is_err());
    }

    #[test]
    fn test_steps_require_resolution() {
        let t = Time::unquantized(1.5);
        assert!(t.in_resolution_steps().is_err());
    }

    #[test]
    fn test_as_quantized_is_pure() {
        let t = Time::unquantized(1.1);
        let (q, err) = t.as_quantized(0.5).unwrap();
        assert_eq!(q.in_beats(), 1.0);
        assert!((err - 0.1).abs() < 1e-9);
        assert_eq!(t.in_beats(), 1.1);
        assert!(!t.is_quantized());
    }

    #[test]
    fn test_quantize_in_place() {
        let mut t = Time::unquantized(0.76);
        let err = t.quantize_in_place(0.25).unwrap();
        assert_eq!(t.in_beats(), 0.75);
        assert!((err - 0.01).abs() < 1e-9);
        assert_eq!(t.resolution(), Some(0.25));
    }

    #[test]
    fn test_equality_same_resolution_compares_steps() {
        let a = Time::quantized(1.0, 0.25).unwrap();
        let b = Time::quantized(1.1, 0.25).unwrap();
        assert_eq!(a, b);
        let c = Time::quantized(1.25, 0.25).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_equality_across_resolutions_uses_coarser_grid() {
        let fine = Time::quantized(2.0625, 1.0 / 16.0).unwrap();
        let coarse = Time::quantized(2.0, 0.5).unwrap();
        assert_eq!(fine, coarse);
        assert_eq!(coarse, fine);

        let fine = Time::quantized(2.375, 1.0 / 16.0).unwrap();
        assert_ne!(fine, coarse);
    }

    #[test]
    fn test_equality_mixed_quantization() {
        let q = Time::quantized(2.5, 1.0 / 16.0).unwrap();
        assert_eq!(q, Time::from(2.5));
        assert_eq!(Time::from(2.5), q);
        assert_ne!(q, Time::from(3.0));
    }

    #[test]
    fn test_unquantized_equality_is_raw() {
        assert_eq!(Time::from(0.5), Time::from(0.5));
        assert_ne!(Time::from(0.5), Time::from(0.5000001));
    }

    #[test]
    fn test_add_is_unquantized() {
        let a = Time::quantized(1.0, 0.5).unwrap();
        let b = Time::quantized(0.5, 0.5).unwrap();
        let sum = a + b;
        assert!(!sum.is_quantized());
        assert_eq!(sum.in_beats(), 1.5);
        assert_eq!((a - b).in_beats(), 0.5);
    }

    #[test]
    fn test_is_zero() {
        assert!(Time::from(0.0000001).is_zero());
        assert!(Time::from(-0.0000001).is_zero());
        assert!(!Time::from(0.001).is_zero());
    }
}
