use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;
use tracing::debug;

use crate::catalog::store::DisplayCatalog;
use crate::core::geometry::SegmentGeometry;
use crate::core::annotation::Annotation;
use crate::core::interval::Interval;
use crate::core::segment::Segment;
use crate::core::types::{AnnotationId, IntervalId, IntervalState, ReconcileMode, SegmentId};
use crate::selection::arena::IntervalArena;
use crate::selection::correspondence::CorrespondenceBuilder;
use crate::selection::instrument::{InstrumentationSink, NoopSink};
use crate::selection::reconcile::{IntervalReconciler, ReconcileReport, DEFAULT_COALESCE_FRACTION};

/// Configuration for a selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Gaps below this fraction of the chromosome length are coalesced
    pub coalesce_fraction: f64,
    /// Propagate finalized selections onto homologous segments
    pub propagate: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            coalesce_fraction: DEFAULT_COALESCE_FRACTION,
            propagate: true,
        }
    }
}

/// Everything the user has selected over one display.
///
/// Owns all intervals (in an [`IntervalArena`]), the selected-feature index,
/// and the list of wholly selected segments. Finalizing an interval
/// propagates it to sibling segments and reconciles what changed.
pub struct Selection<'a> {
    catalog: &'a DisplayCatalog,
    config: SelectionConfig,
    arena: IntervalArena,

    /// Selected annotations and the segment each was selected on
    annotations: BTreeMap<AnnotationId, SegmentId>,

    /// Wholly selected segments, in selection order
    segments: Vec<SegmentId>,

    last_annotation: Option<AnnotationId>,
    sink: Box<dyn InstrumentationSink>,
}

impl<'a> Selection<'a> {
    /// Create an empty selection with default configuration
    pub fn new(catalog: &'a DisplayCatalog) -> Self {
        Self::with_config(catalog, SelectionConfig::default())
    }

    /// Create an empty selection with custom configuration
    pub fn with_config(catalog: &'a DisplayCatalog, config: SelectionConfig) -> Self {
        Self {
            catalog,
            config,
            arena: IntervalArena::new(),
            annotations: BTreeMap::new(),
            segments: Vec::new(),
            last_annotation: None,
            sink: Box::new(NoopSink),
        }
    }

    /// Send operation timings to `sink`
    #[must_use]
    pub fn with_sink(mut self, sink: impl InstrumentationSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn catalog(&self) -> &'a DisplayCatalog {
        self.catalog
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    // === Queries ===

    /// All registered intervals, by segment then start
    pub fn intervals(&self) -> Vec<&Interval> {
        let mut all: Vec<&Interval> = self.arena.registered().collect();
        all.sort_by_key(|i| (i.segment(), i.start(), i.stop(), i.id()));
        all
    }

    /// Registered intervals that are not suppressed
    pub fn visible_intervals(&self) -> Vec<&Interval> {
        self.intervals()
            .into_iter()
            .filter(|i| i.is_visible())
            .collect()
    }

    /// Intervals on one segment, by start; empty for an unknown segment
    pub fn intervals_on(&self, segment: SegmentId) -> Vec<&Interval> {
        let mut on: Vec<&Interval> = self
            .arena
            .on_segment(segment)
            .iter()
            .filter_map(|&id| self.arena.get(id))
            .collect();
        on.sort_by_key(|i| (i.start(), i.stop(), i.id()));
        on
    }

    /// Any interval still held, registered or not
    pub fn interval(&self, id: IntervalId) -> Option<&Interval> {
        self.arena.get(id)
    }

    /// Selected annotations, by id
    pub fn annotations(&self) -> Vec<AnnotationId> {
        self.annotations.keys().copied().collect()
    }

    /// Annotations selected on `segment`
    pub fn annotations_on(&self, segment: SegmentId) -> Vec<AnnotationId> {
        self.annotations
            .iter()
            .filter(|(_, s)| **s == segment)
            .map(|(&a, _)| a)
            .collect()
    }

    /// Segment an annotation was selected on
    pub fn segment_for(&self, annotation: AnnotationId) -> Option<SegmentId> {
        self.annotations.get(&annotation).copied()
    }

    pub fn last_annotation(&self) -> Option<AnnotationId> {
        self.last_annotation
    }

    /// Wholly selected segments
    pub fn segments(&self) -> &[SegmentId] {
        &self.segments
    }

    pub fn contains_interval(&self, id: IntervalId) -> bool {
        self.arena.is_registered(id)
    }

    pub fn contains_annotation(&self, annotation: AnnotationId) -> bool {
        self.annotations.contains_key(&annotation)
    }

    pub fn contains_segment(&self, segment: SegmentId) -> bool {
        self.segments.contains(&segment)
    }

    /// True for an empty slice
    pub fn contains_all(&self, annotations: &[AnnotationId]) -> bool {
        annotations.iter().all(|a| self.contains_annotation(*a))
    }

    /// False for an empty slice
    pub fn contains_any(&self, annotations: &[AnnotationId]) -> bool {
        annotations.iter().any(|a| self.contains_annotation(*a))
    }

    pub fn is_empty(&self) -> bool {
        self.arena.registered_count() == 0 && self.annotations.is_empty() && self.segments.is_empty()
    }

    // === Mutation ===

    /// Select an annotation on a segment and the range it spans.
    ///
    /// No-op (returns `None`) if the segment or annotation is unknown, the
    /// annotation is not on the segment's chromosome, or it is already selected
    /// there and still covered by an interval.
    pub fn add_annotation(
        &mut self,
        segment: SegmentId,
        annotation: AnnotationId,
    ) -> Option<IntervalId> {
        let seg = self.catalog.segment(segment)?;
        let feature = self.catalog.annotation(annotation)?;
        if feature.chromosome != seg.chromosome {
            return None;
        }
        if self.segment_for(annotation) == Some(segment)
            && covered(&self.arena, segment, feature)
        {
            return None;
        }

        self.annotations.insert(annotation, segment);
        self.last_annotation = Some(annotation);

        let id = self.arena.allocate();
        if let Some(interval) = self.arena.get_mut(id) {
            interval.set_annotation(seg, feature);
        }
        self.arena.register(id);
        self.finalize(id);
        Some(id)
    }

    /// Select a run of annotations (sorted by position) as a single interval
    /// from the first start to the furthest stop.
    ///
    /// Annotations that are unknown or not on the segment's chromosome are skipped.
    pub fn add_all_annotations(
        &mut self,
        segment: SegmentId,
        sorted: &[AnnotationId],
    ) -> Option<IntervalId> {
        let seg = self.catalog.segment(segment)?;
        let features: Vec<_> = sorted
            .iter()
            .filter_map(|&a| self.catalog.annotation(a))
            .filter(|a| a.chromosome == seg.chromosome)
            .collect();
        let first = features.first()?;
        let furthest = features.iter().max_by_key(|a| a.stop)?;

        for feature in &features {
            self.annotations.insert(feature.id, segment);
        }
        self.last_annotation = features.last().map(|a| a.id);

        let id = self.arena.allocate();
        if let Some(interval) = self.arena.get_mut(id) {
            interval.set_range(seg, first.start, furthest.stop);
            interval.set_annotation_bounds(Some(first.id), Some(furthest.id));
        }
        self.arena.register(id);
        self.finalize(id);
        Some(id)
    }

    /// Deselect an annotation. Intervals it produced are kept.
    pub fn remove_annotation(&mut self, annotation: AnnotationId) -> bool {
        let removed = self.annotations.remove(&annotation).is_some();
        if removed && self.last_annotation == Some(annotation) {
            self.last_annotation = None;
        }
        removed
    }

    /// Select `[start, stop]` on a segment directly
    pub fn add_interval(&mut self, segment: SegmentId, start: i64, stop: i64) -> Option<IntervalId> {
        let seg = self.catalog.segment(segment)?;
        let id = self.arena.allocate();
        if let Some(interval) = self.arena.get_mut(id) {
            interval.set_range(seg, start, stop);
        }
        self.arena.register(id);
        self.finalize(id);
        Some(id)
    }

    /// Start an interactive selection at a local coordinate on `segment`
    pub fn begin_interval(
        &mut self,
        segment: SegmentId,
        geometry: &dyn SegmentGeometry,
        local: f64,
    ) -> Option<IntervalId> {
        let seg = self.catalog.segment(segment)?;
        let id = self.arena.allocate();
        if let Some(interval) = self.arena.get_mut(id) {
            interval.begin(seg, geometry, local);
        }
        self.arena.register(id);
        Some(id)
    }

    /// Move the free end of an in-progress selection
    pub fn extend_interval(
        &mut self,
        id: IntervalId,
        geometry: &dyn SegmentGeometry,
        local: f64,
    ) -> bool {
        let Some(seg) = self.anchor(id) else {
            return false;
        };
        self.arena
            .get_mut(id)
            .is_some_and(|i| i.set_end(seg, geometry, local))
    }

    /// Finish an interactive selection, then propagate and reconcile it
    pub fn stop_setting(&mut self, id: IntervalId) -> bool {
        let Some(seg) = self.anchor(id) else {
            return false;
        };
        let finished = self
            .arena
            .get_mut(id)
            .is_some_and(|i| i.stop_setting(seg));
        if finished {
            self.finalize(id);
        }
        finished
    }

    fn anchor(&self, id: IntervalId) -> Option<&'a Segment> {
        let catalog = self.catalog;
        self.arena
            .get(id)
            .and_then(Interval::segment)
            .and_then(|s| catalog.segment(s))
    }

    /// Discard an in-progress selection without propagating it
    pub fn cancel_interval(&mut self, id: IntervalId) -> bool {
        if !self.arena.get(id).is_some_and(Interval::is_being_set) {
            return false;
        }
        self.arena.release(id).is_some()
    }

    /// Remove an interval together with everything propagated from it
    pub fn remove_interval(&mut self, id: IntervalId) -> bool {
        if !self.arena.is_registered(id) {
            return false;
        }
        for descendant in self.arena.descendants(id).into_iter().rev() {
            self.arena.release(descendant);
        }

        // Deselect annotations nothing covers any more
        let catalog = self.catalog;
        let arena = &self.arena;
        self.annotations.retain(|&annotation, &mut segment| {
            catalog
                .annotation(annotation)
                .is_some_and(|feature| covered(arena, segment, feature))
        });
        if self
            .last_annotation
            .is_some_and(|a| !self.annotations.contains_key(&a))
        {
            self.last_annotation = None;
        }
        true
    }

    /// Mark a whole segment as selected
    pub fn add_segment(&mut self, segment: SegmentId) -> bool {
        if self.catalog.segment(segment).is_none() || self.segments.contains(&segment) {
            return false;
        }
        self.segments.push(segment);
        true
    }

    pub fn remove_segment(&mut self, segment: SegmentId) -> bool {
        let before = self.segments.len();
        self.segments.retain(|&s| s != segment);
        self.segments.len() != before
    }

    pub fn clear(&mut self) {
        self.clear_intervals();
        self.clear_annotations();
        self.clear_segments();
    }

    pub fn clear_intervals(&mut self) {
        self.arena.clear();
    }

    pub fn clear_annotations(&mut self) {
        self.annotations.clear();
        self.last_annotation = None;
    }

    pub fn clear_segments(&mut self) {
        self.segments.clear();
    }

    /// Reconcile every segment
    pub fn verify(&mut self, mode: ReconcileMode) -> ReconcileReport {
        let started = Instant::now();
        let report = self.reconciler().verify(&mut self.arena, mode);
        self.sink.record("verify", started.elapsed());
        report
    }

    fn reconciler(&self) -> IntervalReconciler<'a> {
        IntervalReconciler::new(self.catalog).with_coalesce_fraction(self.config.coalesce_fraction)
    }

    /// Propagate a freshly finalized interval, reconcile its segment's roots,
    /// then the children on that segment and wherever its roots have children.
    fn finalize(&mut self, id: IntervalId) {
        let Some(owner) = self.arena.get(id).and_then(Interval::segment) else {
            return;
        };

        if self.config.propagate {
            let started = Instant::now();
            let children = CorrespondenceBuilder::new(self.catalog).build(&mut self.arena, id);
            debug!("propagated {} to {} sibling interval(s)", id, children.len());
            self.sink.record("correspondence", started.elapsed());
        }

        let started = Instant::now();
        let reconciler = self.reconciler();
        let mut report = reconciler.verify_segment(&mut self.arena, owner, ReconcileMode::Roots);

        let mut touched: BTreeSet<SegmentId> = self
            .arena
            .on_segment(owner)
            .iter()
            .filter_map(|&root| self.arena.get(root))
            .flat_map(|root| root.children().to_vec())
            .filter_map(|child| self.arena.get(child).and_then(Interval::segment))
            .collect();
        touched.insert(owner);
        for segment in touched {
            report += reconciler.verify_segment(&mut self.arena, segment, ReconcileMode::Children);
        }
        debug!(
            merged = report.merged,
            dropped = report.dropped,
            suppressed = report.suppressed,
            "reconciled after finalizing {}",
            id
        );
        self.sink.record("reconcile", started.elapsed());
    }

    /// Serializable view of the current selection
    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            created_at: chrono::Utc::now().to_rfc3339(),
            intervals: self
                .intervals()
                .into_iter()
                .map(|i| IntervalView {
                    id: i.id(),
                    segment: i
                        .segment()
                        .map(|s| self.catalog.segment_label(s))
                        .unwrap_or_default(),
                    start: i.start(),
                    stop: i.stop(),
                    state: i.state(),
                    parent: i.parent(),
                    children: i.children().to_vec(),
                })
                .collect(),
            annotations: self
                .annotations
                .iter()
                .filter_map(|(&a, &s)| {
                    self.catalog.annotation(a).map(|feature| AnnotationView {
                        name: feature.name.clone(),
                        segment: self.catalog.segment_label(s),
                    })
                })
                .collect(),
            segments: self
                .segments
                .iter()
                .map(|&s| self.catalog.segment_label(s))
                .collect(),
        }
    }
}

/// Whether a final interval on `segment` still spans `annotation`
fn covered(arena: &IntervalArena, segment: SegmentId, annotation: &Annotation) -> bool {
    arena
        .on_segment(segment)
        .iter()
        .filter_map(|&id| arena.get(id))
        .any(|i| i.is_final() && i.contains_annotation(annotation))
}

/// One interval as reported to collaborators
#[derive(Debug, Clone, Serialize)]
pub struct IntervalView {
    pub id: IntervalId,
    pub segment: String,
    pub start: i64,
    pub stop: i64,
    pub state: IntervalState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<IntervalId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<IntervalId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnotationView {
    pub name: String,
    pub segment: String,
}

/// Point-in-time export of a selection
#[derive(Debug, Clone, Serialize)]
pub struct SelectionSnapshot {
    pub created_at: String,
    pub intervals: Vec<IntervalView>,
    pub annotations: Vec<AnnotationView>,
    pub segments: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::annotation::Annotation;
    use crate::core::geometry::LinearGeometry;
    use crate::core::segment::DisplayMap;
    use crate::core::types::MapId;
    use crate::selection::instrument::testing::RecordingSink;

    /// rat:1 [0, 100M] (segment 0), human:7 [0, 100M] (segment 1)
    fn catalog() -> DisplayCatalog {
        let mut catalog = DisplayCatalog::new();
        catalog.add_map(DisplayMap::new("rat", "Rat")).unwrap();
        catalog.add_map(DisplayMap::new("human", "Human")).unwrap();
        let rat = catalog
            .add_chromosome(&MapId::new("rat"), "1", 100_000_000)
            .unwrap();
        let human = catalog
            .add_chromosome(&MapId::new("human"), "7", 100_000_000)
            .unwrap();
        catalog.add_segment(rat, 0, 100_000_000).unwrap();
        catalog.add_segment(human, 0, 100_000_000).unwrap();
        for (name, chrom, start, stop, link) in [
            ("Egfr", rat, 500, 600, Some("7")),
            ("EGFR", human, 1_500, 1_600, Some("7")),
            ("Sec61g", rat, 700, 800, Some("8")),
            ("SEC61G", human, 1_700, 1_800, Some("8")),
            ("Orphan", rat, 5_000_000, 5_000_100, None),
        ] {
            catalog
                .add_annotation(
                    Annotation::new(AnnotationId(0), name, chrom, start, stop)
                        .with_links(link.into_iter()),
                )
                .unwrap();
        }
        catalog
    }

    #[test]
    fn test_add_annotation_propagates() {
        let catalog = catalog();
        let mut selection = Selection::new(&catalog);
        let root = selection
            .add_annotation(SegmentId(0), AnnotationId(0))
            .unwrap();

        assert!(selection.contains_annotation(AnnotationId(0)));
        assert_eq!(selection.segment_for(AnnotationId(0)), Some(SegmentId(0)));
        assert_eq!(selection.last_annotation(), Some(AnnotationId(0)));

        let on_human = selection.intervals_on(SegmentId(1));
        assert_eq!(on_human.len(), 1);
        assert_eq!((on_human[0].start(), on_human[0].stop()), (1_500, 1_600));
        assert_eq!(on_human[0].parent(), Some(root));
    }

    #[test]
    fn test_add_annotation_rejects_wrong_segment_and_duplicates() {
        let catalog = catalog();
        let mut selection = Selection::new(&catalog);
        assert!(selection
            .add_annotation(SegmentId(1), AnnotationId(0))
            .is_none());
        assert!(selection
            .add_annotation(SegmentId(7), AnnotationId(0))
            .is_none());
        assert!(selection.is_empty());

        assert!(selection
            .add_annotation(SegmentId(0), AnnotationId(0))
            .is_some());
        assert!(selection
            .add_annotation(SegmentId(0), AnnotationId(0))
            .is_none());
    }

    #[test]
    fn test_add_all_annotations_makes_one_interval() {
        let catalog = catalog();
        let mut selection = Selection::new(&catalog);
        let id = selection
            .add_all_annotations(SegmentId(0), &[AnnotationId(0), AnnotationId(2)])
            .unwrap();

        let interval = selection.interval(id).unwrap();
        assert_eq!((interval.start(), interval.stop()), (500, 800));
        assert_eq!(
            interval.annotation_bounds(),
            (Some(AnnotationId(0)), Some(AnnotationId(2)))
        );
        assert!(selection.contains_all(&[AnnotationId(0), AnnotationId(2)]));
        assert_eq!(selection.last_annotation(), Some(AnnotationId(2)));

        // EGFR [1500,1600] and SEC61G [1700,1800] coalesce under the one parent
        let on_human = selection.intervals_on(SegmentId(1));
        assert_eq!(on_human.len(), 1);
        assert_eq!((on_human[0].start(), on_human[0].stop()), (1_500, 1_800));
        assert_eq!(on_human[0].parent(), Some(id));
    }

    #[test]
    fn test_add_all_annotations_with_nothing_usable() {
        let catalog = catalog();
        let mut selection = Selection::new(&catalog);
        assert!(selection
            .add_all_annotations(SegmentId(0), &[AnnotationId(1)])
            .is_none());
        assert!(selection.add_all_annotations(SegmentId(0), &[]).is_none());
        assert!(selection.is_empty());
    }

    #[test]
    fn test_interactive_lifecycle() {
        let catalog = catalog();
        let sink = RecordingSink::default();
        let labels = sink.labels.clone();
        let mut selection = Selection::new(&catalog).with_sink(sink);
        // 100 local units over 100M: one unit is 1M
        let geometry = LinearGeometry::new(100.0);

        let id = selection
            .begin_interval(SegmentId(0), &geometry, 0.0)
            .unwrap();
        assert!(selection.interval(id).unwrap().is_being_set());
        assert!(selection.extend_interval(id, &geometry, 1.0));
        assert!(labels.borrow().is_empty());

        assert!(selection.stop_setting(id));
        let interval = selection.interval(id).unwrap();
        assert!(interval.is_final());
        assert_eq!((interval.start(), interval.stop()), (0, 1_000_000));

        // Egfr and Sec61g fall inside; both siblings land on human:7
        let on_human = selection.intervals_on(SegmentId(1));
        assert_eq!(on_human.len(), 1);
        assert_eq!((on_human[0].start(), on_human[0].stop()), (1_500, 1_800));
        assert_eq!(
            *labels.borrow(),
            vec!["correspondence".to_string(), "reconcile".to_string()]
        );

        assert!(!selection.extend_interval(id, &geometry, 50.0));
        assert!(!selection.stop_setting(id));
    }

    #[test]
    fn test_cancel_interval() {
        let catalog = catalog();
        let mut selection = Selection::new(&catalog);
        let geometry = LinearGeometry::new(100.0);
        let id = selection
            .begin_interval(SegmentId(0), &geometry, 10.0)
            .unwrap();
        assert!(selection.contains_interval(id));
        assert!(selection.cancel_interval(id));
        assert!(!selection.contains_interval(id));
        assert!(selection.is_empty());

        let fixed = selection.add_interval(SegmentId(0), 10, 20).unwrap();
        assert!(!selection.cancel_interval(fixed));
    }

    #[test]
    fn test_remove_interval_takes_children() {
        let catalog = catalog();
        let mut selection = Selection::new(&catalog);
        let root = selection
            .add_annotation(SegmentId(0), AnnotationId(0))
            .unwrap();
        assert_eq!(selection.intervals().len(), 2);

        assert!(selection.remove_interval(root));
        assert!(selection.intervals().is_empty());
        assert!(!selection.remove_interval(root));
        assert!(!selection.contains_annotation(AnnotationId(0)));
        assert_eq!(selection.last_annotation(), None);
    }

    #[test]
    fn test_annotation_can_be_reselected_after_its_interval_is_removed() {
        let catalog = catalog();
        let mut selection = Selection::new(&catalog);
        let first = selection
            .add_annotation(SegmentId(0), AnnotationId(0))
            .unwrap();
        selection.remove_interval(first);

        let again = selection.add_annotation(SegmentId(0), AnnotationId(0));
        assert!(again.is_some());
        assert!(selection.contains_annotation(AnnotationId(0)));
        assert_eq!(selection.intervals_on(SegmentId(0)).len(), 1);
        assert_eq!(selection.intervals_on(SegmentId(1)).len(), 1);
    }

    #[test]
    fn test_remove_interval_keeps_annotations_still_covered() {
        let catalog = catalog();
        let mut selection = Selection::new(&catalog);
        selection.add_annotation(SegmentId(0), AnnotationId(4));
        let extra = selection
            .add_interval(SegmentId(0), 90_000_000, 90_001_000)
            .unwrap();
        assert!(selection.remove_interval(extra));
        assert!(selection.contains_annotation(AnnotationId(4)));
    }

    #[test]
    fn test_selecting_a_homolog_leaves_no_duplicate_ranges() {
        let catalog = catalog();
        let mut selection = Selection::new(&catalog);
        selection.add_annotation(SegmentId(0), AnnotationId(0));
        selection.add_annotation(SegmentId(1), AnnotationId(1));

        for segment in [SegmentId(0), SegmentId(1)] {
            let ranges: Vec<(i64, i64)> = selection
                .intervals_on(segment)
                .iter()
                .map(|i| (i.start(), i.stop()))
                .collect();
            assert_eq!(ranges.len(), 1, "{segment}: {ranges:?}");
            assert!(selection.intervals_on(segment)[0].is_root());
        }
    }

    #[test]
    fn test_segments_and_clear() {
        let catalog = catalog();
        let mut selection = Selection::new(&catalog);
        assert!(selection.add_segment(SegmentId(1)));
        assert!(!selection.add_segment(SegmentId(1)));
        assert!(!selection.add_segment(SegmentId(9)));
        assert!(selection.contains_segment(SegmentId(1)));

        let stale = selection.add_interval(SegmentId(0), 100, 200).unwrap();
        selection.add_annotation(SegmentId(0), AnnotationId(4));
        assert!(!selection.is_empty());

        selection.clear_segments();
        assert!(!selection.contains_segment(SegmentId(1)));
        selection.clear_annotations();
        assert!(selection.annotations().is_empty());
        assert_eq!(selection.last_annotation(), None);
        assert!(!selection.is_empty());
        selection.clear();
        assert!(selection.is_empty());

        let fresh = selection.add_interval(SegmentId(0), 100, 200).unwrap();
        assert_ne!(fresh, stale);
        assert!(selection.interval(stale).is_none());
        assert!(!selection.remove_interval(stale));
    }

    #[test]
    fn test_remove_annotation() {
        let catalog = catalog();
        let mut selection = Selection::new(&catalog);
        selection.add_annotation(SegmentId(0), AnnotationId(4));
        assert!(selection.remove_annotation(AnnotationId(4)));
        assert!(!selection.remove_annotation(AnnotationId(4)));
        assert_eq!(selection.last_annotation(), None);
        assert!(!selection.contains_any(&[AnnotationId(4)]));
        assert_eq!(selection.intervals_on(SegmentId(0)).len(), 1);
    }

    #[test]
    fn test_propagation_can_be_disabled() {
        let catalog = catalog();
        let config = SelectionConfig {
            propagate: false,
            ..SelectionConfig::default()
        };
        let mut selection = Selection::with_config(&catalog, config);
        selection.add_annotation(SegmentId(0), AnnotationId(0));
        assert!(selection.intervals_on(SegmentId(1)).is_empty());
    }

    #[test]
    fn test_snapshot_uses_labels() {
        let catalog = catalog();
        let mut selection = Selection::new(&catalog);
        selection.add_annotation(SegmentId(0), AnnotationId(0));
        selection.add_segment(SegmentId(1));

        let snapshot = selection.snapshot();
        assert_eq!(snapshot.intervals.len(), 2);
        assert_eq!(snapshot.intervals[0].segment, "rat:1");
        assert_eq!(snapshot.intervals[1].segment, "human:7");
        assert_eq!(snapshot.annotations[0].name, "Egfr");
        assert_eq!(snapshot.segments, vec!["human:7".to_string()]);

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"state\":\"active\""));
    }
}
