// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timing module.
//!
//! This module provides the quantized time algebra and the half-open
//! windows the slicing engine works with.

pub mod time;
pub mod window;

pub use time::{Time, ZERO_EPSILON};
pub use window::TimeWindow;
