use serde::Serialize;

use crate::core::annotation::Annotation;
use crate::core::geometry::{PixelSpan, SegmentGeometry};
use crate::core::segment::Segment;
use crate::core::types::{AnnotationId, ChromosomeId, IntervalId, IntervalState, SegmentId};

/// Where an interval is in its definition lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum IntervalPhase {
    /// Not yet anchored to a segment
    Unset,
    /// A drag is in progress; `anchor` is the fixed end
    BeingSet { anchor: i64 },
    /// Defined; eligible for propagation and reconciliation
    Final,
}

/// One genomic range selection anchored to a segment.
///
/// Roots are user selections; children are propagated onto homologous
/// segments and point back at their root through `parent`. Parent and
/// children are arena slots, kept consistent by the selection arena.
#[derive(Debug, Clone, Serialize)]
pub struct Interval {
    id: IntervalId,
    segment: Option<SegmentId>,
    chromosome: Option<ChromosomeId>,
    start: i64,
    stop: i64,
    phase: IntervalPhase,
    state: IntervalState,

    #[serde(skip_serializing_if = "Option::is_none")]
    annotation_start: Option<AnnotationId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    annotation_stop: Option<AnnotationId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<IntervalId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<IntervalId>,
}

impl Interval {
    /// A fresh, unanchored interval
    #[must_use]
    pub fn unset(id: IntervalId) -> Self {
        Self {
            id,
            segment: None,
            chromosome: None,
            start: 0,
            stop: 0,
            phase: IntervalPhase::Unset,
            state: IntervalState::Active,
            annotation_start: None,
            annotation_stop: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Start an interactive selection at a local coordinate.
    ///
    /// The interval has zero width until [`Interval::set_end`] moves the free end.
    pub fn begin(&mut self, segment: &Segment, geometry: &dyn SegmentGeometry, local: f64) {
        let position = segment.clamp(geometry.to_genomic(segment, local));
        self.anchor_to(segment);
        self.start = position;
        self.stop = position;
        self.phase = IntervalPhase::BeingSet { anchor: position };
    }

    /// Move the free end of an in-progress selection.
    ///
    /// Returns false (and changes nothing) unless a drag on `segment` is in progress.
    pub fn set_end(
        &mut self,
        segment: &Segment,
        geometry: &dyn SegmentGeometry,
        local: f64,
    ) -> bool {
        let IntervalPhase::BeingSet { anchor } = self.phase else {
            return false;
        };
        if self.segment != Some(segment.id) {
            return false;
        }
        let position = segment.clamp(geometry.to_genomic(segment, local));
        self.start = anchor.min(position);
        self.stop = anchor.max(position);
        true
    }

    /// End an interactive definition, widening a zero-width drag to one unit.
    ///
    /// Returns false if no drag was in progress.
    pub fn stop_setting(&mut self, segment: &Segment) -> bool {
        if !self.is_being_set() || self.segment != Some(segment.id) {
            return false;
        }
        let (start, stop) = (self.start, self.stop);
        self.set_range(segment, start, stop);
        true
    }

    /// Define the range directly, clamped to the segment's drawn span.
    pub fn set_range(&mut self, segment: &Segment, start: i64, stop: i64) {
        let (start, stop) = normalized(segment, start, stop);
        self.anchor_to(segment);
        self.start = start;
        self.stop = stop;
        self.phase = IntervalPhase::Final;
    }

    /// Define the range as the span of an annotation on `segment`
    pub fn set_annotation(&mut self, segment: &Segment, annotation: &Annotation) {
        self.set_range(segment, annotation.start, annotation.stop);
        self.annotation_start = Some(annotation.id);
        self.annotation_stop = Some(annotation.id);
    }

    fn anchor_to(&mut self, segment: &Segment) {
        self.segment = Some(segment.id);
        self.chromosome = Some(segment.chromosome);
    }

    /// True iff `annotation` is on this interval's chromosome and one of its
    /// endpoints falls within `[start, stop]`.
    #[must_use]
    pub fn contains_annotation(&self, annotation: &Annotation) -> bool {
        self.chromosome == Some(annotation.chromosome) && annotation.touches(self.start, self.stop)
    }

    /// Range containment, ignoring segment identity
    #[must_use]
    pub fn contains_range(&self, other: &Interval) -> bool {
        self.start <= other.start && other.stop <= self.stop
    }

    /// Whether the ranges share at least one position
    #[must_use]
    pub fn intersects(&self, other: &Interval) -> bool {
        self.start <= other.stop && other.start <= self.stop
    }

    /// Local span for drawing on `segment`, or [`PixelSpan::EMPTY`] when the
    /// interval is not anchored there yet.
    #[must_use]
    pub fn drawing_bounds(&self, segment: &Segment, geometry: &dyn SegmentGeometry) -> PixelSpan {
        if self.phase == IntervalPhase::Unset || self.segment != Some(segment.id) {
            return PixelSpan::EMPTY;
        }
        let a = geometry.to_local(segment, self.start);
        let b = geometry.to_local(segment, self.stop);
        PixelSpan {
            top: a.min(b),
            bottom: a.max(b),
        }
    }

    #[must_use]
    pub fn id(&self) -> IntervalId {
        self.id
    }

    #[must_use]
    pub fn segment(&self) -> Option<SegmentId> {
        self.segment
    }

    #[must_use]
    pub fn chromosome(&self) -> Option<ChromosomeId> {
        self.chromosome
    }

    #[must_use]
    pub fn start(&self) -> i64 {
        self.start
    }

    #[must_use]
    pub fn stop(&self) -> i64 {
        self.stop
    }

    #[must_use]
    pub fn width(&self) -> i64 {
        self.stop - self.start
    }

    #[must_use]
    pub fn phase(&self) -> IntervalPhase {
        self.phase
    }

    #[must_use]
    pub fn is_final(&self) -> bool {
        self.phase == IntervalPhase::Final
    }

    #[must_use]
    pub fn is_being_set(&self) -> bool {
        matches!(self.phase, IntervalPhase::BeingSet { .. })
    }

    #[must_use]
    pub fn state(&self) -> IntervalState {
        self.state
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state == IntervalState::Active
    }

    pub(crate) fn set_state(&mut self, state: IntervalState) {
        self.state = state;
    }

    #[must_use]
    pub fn annotation_bounds(&self) -> (Option<AnnotationId>, Option<AnnotationId>) {
        (self.annotation_start, self.annotation_stop)
    }

    pub(crate) fn set_annotation_bounds(
        &mut self,
        start: Option<AnnotationId>,
        stop: Option<AnnotationId>,
    ) {
        self.annotation_start = start;
        self.annotation_stop = stop;
    }

    #[must_use]
    pub fn parent(&self) -> Option<IntervalId> {
        self.parent
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    #[must_use]
    pub fn children(&self) -> &[IntervalId] {
        &self.children
    }

    pub(crate) fn set_parent(&mut self, parent: Option<IntervalId>) {
        self.parent = parent;
    }

    /// Returns false if `child` was already present
    pub(crate) fn push_child(&mut self, child: IntervalId) -> bool {
        if self.children.contains(&child) {
            return false;
        }
        self.children.push(child);
        true
    }

    /// Returns false if `child` was not present
    pub(crate) fn drop_child(&mut self, child: IntervalId) -> bool {
        let before = self.children.len();
        self.children.retain(|&c| c != child);
        self.children.len() != before
    }

    pub(crate) fn take_children(&mut self) -> Vec<IntervalId> {
        std::mem::take(&mut self.children)
    }
}

/// Clamp to the segment, order the ends, and widen a point to one unit
fn normalized(segment: &Segment, start: i64, stop: i64) -> (i64, i64) {
    let a = segment.clamp(start);
    let b = segment.clamp(stop);
    let (start, stop) = (a.min(b), a.max(b));
    if start != stop {
        (start, stop)
    } else if stop < segment.upper() || start <= segment.lower() {
        (start, stop + 1)
    } else {
        (start - 1, stop)
    }
}
