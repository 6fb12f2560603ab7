//! Core data types for selection management.
//!
//! - [`DisplayMap`], [`Chromosome`], [`Segment`]: what is on screen
//! - [`Annotation`]: a feature with external link identifiers
//! - [`Interval`]: one selected genomic range, root or propagated child
//! - [`SegmentGeometry`]: local coordinate to genomic position conversion
//! - ids and small enums in [`types`]
//!
//! ## Coordinates
//!
//! All positions are integers in the owning chromosome's coordinate space.
//! A segment whose `drawing_start` exceeds its `drawing_stop` is drawn in
//! reverse; intervals are always stored with `start <= stop` regardless.
//!
//! [`DisplayMap`]: segment::DisplayMap
//! [`Chromosome`]: segment::Chromosome
//! [`Segment`]: segment::Segment
//! [`Annotation`]: annotation::Annotation
//! [`Interval`]: interval::Interval
//! [`SegmentGeometry`]: geometry::SegmentGeometry

pub mod annotation;
pub mod geometry;
pub mod interval;
pub mod segment;
pub mod types;
