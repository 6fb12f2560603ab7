//! Conversion between local (pixel-like) coordinates and genomic positions.
//!
//! The selection core works purely in genomic space; only the entry points
//! that start or extend an interactive drag, and the renderable bounds of an
//! interval, go through a [`SegmentGeometry`].

use serde::Serialize;

use crate::core::segment::Segment;

/// Maps local coordinates along a drawn segment to genomic positions and back
pub trait SegmentGeometry {
    /// Genomic position under a local coordinate, honoring orientation
    fn to_genomic(&self, segment: &Segment, local: f64) -> i64;

    /// Local coordinate of a genomic position
    fn to_local(&self, segment: &Segment, position: i64) -> f64;
}

/// Segment drawn linearly over `extent` local units, from `drawing_start` at 0
/// to `drawing_stop` at `extent`.
#[derive(Debug, Clone, Copy)]
pub struct LinearGeometry {
    pub extent: f64,
}

impl LinearGeometry {
    #[must_use]
    pub fn new(extent: f64) -> Self {
        Self { extent }
    }
}

impl SegmentGeometry for LinearGeometry {
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn to_genomic(&self, segment: &Segment, local: f64) -> i64 {
        if self.extent <= 0.0 || !local.is_finite() {
            return segment.drawing_start;
        }
        let fraction = (local / self.extent).clamp(0.0, 1.0);
        let span = (segment.drawing_stop - segment.drawing_start) as f64;
        segment.drawing_start + (fraction * span).round() as i64
    }

    #[allow(clippy::cast_precision_loss)]
    fn to_local(&self, segment: &Segment, position: i64) -> f64 {
        let span = segment.drawing_stop - segment.drawing_start;
        if span == 0 {
            return 0.0;
        }
        (position - segment.drawing_start) as f64 / span as f64 * self.extent
    }
}

/// Renderable local span of an interval. `EMPTY` means "not yet drawable".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelSpan {
    pub top: f64,
    pub bottom: f64,
}

impl PixelSpan {
    pub const EMPTY: PixelSpan = PixelSpan {
        top: 0.0,
        bottom: 0.0,
    };

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bottom <= self.top
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        (self.bottom - self.top).max(0.0)
    }
}
