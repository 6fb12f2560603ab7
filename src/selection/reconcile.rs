use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::catalog::store::DisplayCatalog;
use crate::core::annotation::Annotation;
use crate::core::interval::Interval;
use crate::core::segment::Segment;
use crate::core::types::{
    AnnotationId, ChromosomeId, IntervalId, IntervalState, ReconcileMode, SegmentId,
};
use crate::selection::arena::IntervalArena;

/// Default coalescing threshold as a fraction of the chromosome length
pub const DEFAULT_COALESCE_FRACTION: f64 = 0.01;

/// What a reconciliation changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Pairs merged because they overlapped or sat closer than the threshold
    pub merged: usize,
    /// Intervals dropped because another contained them
    pub dropped: usize,
    /// Intervals kept but hidden because a container came from another parent
    pub suppressed: usize,
}

impl ReconcileReport {
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.merged == 0 && self.dropped == 0
    }
}

impl std::ops::AddAssign for ReconcileReport {
    fn add_assign(&mut self, other: Self) {
        self.merged += other.merged;
        self.dropped += other.dropped;
        self.suppressed += other.suppressed;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Roots,
    Children,
}

/// Range and parent of an interval, copied out of the arena for comparison
#[derive(Debug, Clone, Copy)]
struct Span {
    start: i64,
    stop: i64,
    parent: Option<IntervalId>,
}

impl Span {
    fn of(interval: &Interval) -> Self {
        Self {
            start: interval.start(),
            stop: interval.stop(),
            parent: interval.parent(),
        }
    }
}

/// Two intervals propagated from different roots are never merged or dropped
/// into one another.
fn parents_conflict(a: Option<IntervalId>, b: Option<IntervalId>) -> bool {
    matches!((a, b), (Some(x), Some(y)) if x != y)
}

/// Normalizes the intervals of each segment: drops contained duplicates,
/// merges overlapping or nearly adjacent ranges, and keeps parent/child
/// links pointing at the survivors.
pub struct IntervalReconciler<'a> {
    catalog: &'a DisplayCatalog,
    coalesce_fraction: f64,
}

impl<'a> IntervalReconciler<'a> {
    pub fn new(catalog: &'a DisplayCatalog) -> Self {
        Self {
            catalog,
            coalesce_fraction: DEFAULT_COALESCE_FRACTION,
        }
    }

    #[must_use]
    pub fn with_coalesce_fraction(mut self, fraction: f64) -> Self {
        self.coalesce_fraction = fraction.max(0.0);
        self
    }

    /// Largest gap (exclusive) that is still coalesced on `segment`
    #[allow(clippy::cast_precision_loss)]
    pub fn coalesce_threshold(&self, segment: &Segment) -> f64 {
        self.catalog
            .chromosome(segment.chromosome)
            .map_or(0.0, |c| c.length as f64 * self.coalesce_fraction)
    }

    /// Reconcile every segment holding intervals
    pub fn verify(&self, arena: &mut IntervalArena, mode: ReconcileMode) -> ReconcileReport {
        let segments: Vec<SegmentId> = arena.segments().collect();
        let mut report = ReconcileReport::default();
        if mode.includes_roots() {
            for &segment in &segments {
                report += self.pass(arena, segment, Pass::Roots);
            }
        }
        if mode.includes_children() {
            for &segment in &segments {
                report += self.pass(arena, segment, Pass::Children);
            }
        }
        report
    }

    /// Reconcile a single segment
    pub fn verify_segment(
        &self,
        arena: &mut IntervalArena,
        segment: SegmentId,
        mode: ReconcileMode,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        if mode.includes_roots() {
            report += self.pass(arena, segment, Pass::Roots);
        }
        if mode.includes_children() {
            report += self.pass(arena, segment, Pass::Children);
        }
        report
    }

    fn pass(&self, arena: &mut IntervalArena, segment_id: SegmentId, pass: Pass) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        let Some(segment) = self.catalog.segment(segment_id) else {
            return report;
        };
        let threshold = self.coalesce_threshold(segment);

        let mut ids: Vec<IntervalId> = arena
            .on_segment(segment_id)
            .iter()
            .copied()
            .filter(|&id| {
                arena.get(id).is_some_and(|i| {
                    i.is_final()
                        && match pass {
                            Pass::Roots => i.is_root(),
                            Pass::Children => !i.is_root(),
                        }
                })
            })
            .collect();

        // Suppression is recomputed from scratch on every pass
        for &id in &ids {
            if let Some(interval) = arena.get_mut(id) {
                interval.set_state(IntervalState::Active);
            }
        }

        // A child landing exactly on a root of this segment adds nothing
        if pass == Pass::Children {
            let roots: HashSet<(i64, i64)> = arena
                .on_segment(segment_id)
                .iter()
                .filter_map(|&id| arena.get(id))
                .filter(|i| i.is_final() && i.is_root())
                .map(|i| (i.start(), i.stop()))
                .collect();
            let (shadowed, kept): (Vec<IntervalId>, Vec<IntervalId>) =
                ids.into_iter().partition(|&id| {
                    arena
                        .get(id)
                        .is_some_and(|i| roots.contains(&(i.start(), i.stop())))
                });
            for id in shadowed {
                debug!(segment = %segment_id, "dropped {} duplicating a root", id);
                arena.release(id);
                report.dropped += 1;
            }
            ids = kept;
        }

        if ids.len() < 2 {
            return report;
        }

        // Ascending start; on ties the wider interval first so it can contain the rest
        ids.sort_by_key(|&id| {
            arena
                .get(id)
                .map(|i| (i.start(), std::cmp::Reverse(i.stop()), id))
        });

        let mut removed: Vec<IntervalId> = Vec::new();
        let mut created: Vec<IntervalId> = Vec::new();
        let mut current = ids[0];

        for &next in &ids[1..] {
            let (Some(cur), Some(nxt)) = (
                arena.get(current).map(Span::of),
                arena.get(next).map(Span::of),
            ) else {
                continue;
            };

            // Containment
            if cur.start <= nxt.start && nxt.stop <= cur.stop {
                let identical = cur.start == nxt.start && cur.stop == nxt.stop;
                if parents_conflict(cur.parent, nxt.parent) && !identical {
                    if let Some(interval) = arena.get_mut(next) {
                        interval.set_state(IntervalState::Suppressed);
                    }
                    report.suppressed += 1;
                } else if parents_conflict(cur.parent, nxt.parent) {
                    removed.push(next);
                    report.dropped += 1;
                } else {
                    arena.move_children(next, current);
                    removed.push(next);
                    report.dropped += 1;
                }
                continue;
            }

            if !parents_conflict(cur.parent, nxt.parent) {
                let overlaps = nxt.start <= cur.stop;
                #[allow(clippy::cast_precision_loss)]
                let near = !overlaps
                    && ((nxt.start - cur.stop) as f64) < threshold
                    && !self.gap_contradicts(arena, segment, current, next);

                if overlaps || near {
                    let merged = self.merge(arena, segment, current, next);
                    debug!(
                        segment = %segment_id,
                        "merged [{}, {}] and [{}, {}]",
                        cur.start, cur.stop, nxt.start, nxt.stop
                    );
                    for old in [current, next] {
                        if let Some(pos) = created.iter().position(|&c| c == old) {
                            // Synthesized earlier in this sweep; never registered
                            created.swap_remove(pos);
                            arena.release(old);
                        } else {
                            removed.push(old);
                        }
                    }
                    created.push(merged);
                    current = merged;
                    report.merged += 1;
                    continue;
                }
            }

            if nxt.stop > cur.stop {
                current = next;
            }
        }

        for id in removed {
            arena.release(id);
        }
        for id in created {
            arena.register(id);
        }
        report
    }

    /// Synthesize the union of two intervals, taking over their children and parent
    fn merge(
        &self,
        arena: &mut IntervalArena,
        segment: &Segment,
        a: IntervalId,
        b: IntervalId,
    ) -> IntervalId {
        let (first, second) = match (arena.get(a), arena.get(b)) {
            (Some(x), Some(y)) => (x.clone(), y.clone()),
            _ => return a,
        };

        let (start_a, stop_a) = first.annotation_bounds();
        let (start_b, stop_b) = second.annotation_bounds();
        let annotation_start = self.widest(start_a, start_b, |s, o| s.start < o.start);
        let annotation_stop = self.widest(stop_a, stop_b, |s, o| s.stop > o.stop);

        let merged = arena.allocate();
        if let Some(interval) = arena.get_mut(merged) {
            interval.set_range(
                segment,
                first.start().min(second.start()),
                first.stop().max(second.stop()),
            );
            interval.set_annotation_bounds(annotation_start, annotation_stop);
        }

        if let Some(parent) = first.parent().or(second.parent()) {
            arena.add_child(parent, merged);
        }
        arena.move_children(a, merged);
        arena.move_children(b, merged);
        merged
    }

    /// Pick whichever annotation bound reaches further
    fn widest(
        &self,
        a: Option<AnnotationId>,
        b: Option<AnnotationId>,
        further: impl Fn(&Annotation, &Annotation) -> bool,
    ) -> Option<AnnotationId> {
        match (a, b) {
            (Some(x), Some(y)) => match (self.catalog.annotation(x), self.catalog.annotation(y)) {
                (Some(ax), Some(ay)) if further(ay, ax) => Some(y),
                _ => Some(x),
            },
            (x, y) => x.or(y),
        }
    }

    /// Whether a feature lying in the gap between two intervals has a homolog
    /// that breaks the correspondence the merge would imply.
    ///
    /// For children the homolog is expected inside the parent. For roots it is
    /// expected within the hull of their children on the homolog's chromosome.
    /// A homolog on a chromosome with no counterpart says nothing.
    fn gap_contradicts(
        &self,
        arena: &IntervalArena,
        segment: &Segment,
        current: IntervalId,
        next: IntervalId,
    ) -> bool {
        let (Some(cur), Some(nxt)) = (arena.get(current), arena.get(next)) else {
            return false;
        };
        let between = self
            .catalog
            .features_between(segment.chromosome, cur.stop(), nxt.start());
        if between.is_empty() {
            return false;
        }

        // Expected span per chromosome
        let mut expected: BTreeMap<ChromosomeId, (i64, i64)> = BTreeMap::new();
        let mut note = |interval: &Interval| {
            if let Some(chromosome) = interval.chromosome() {
                let entry = expected
                    .entry(chromosome)
                    .or_insert((interval.start(), interval.stop()));
                entry.0 = entry.0.min(interval.start());
                entry.1 = entry.1.max(interval.stop());
            }
        };
        match cur.parent() {
            Some(parent) => {
                if let Some(parent) = arena.get(parent) {
                    note(parent);
                }
            }
            None => {
                let mut seen = HashSet::new();
                for child in cur.children().iter().chain(nxt.children()) {
                    if seen.insert(*child) {
                        if let Some(child) = arena.get(*child) {
                            note(child);
                        }
                    }
                }
            }
        }
        if expected.is_empty() {
            return false;
        }

        let siblings = self.catalog.siblings();
        for feature in between {
            for sibling in siblings.siblings(feature) {
                let Some(annotation) = self.catalog.annotation(sibling) else {
                    continue;
                };
                if let Some(&(start, stop)) = expected.get(&annotation.chromosome) {
                    if !annotation.touches(start, stop) {
                        debug!(
                            "gap feature {} has homolog {} outside the expected span",
                            feature, annotation.name
                        );
                        return true;
                    }
                }
            }
        }
        false
    }
}
