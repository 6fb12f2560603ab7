use tracing::trace;

use crate::catalog::store::DisplayCatalog;
use crate::core::annotation::Annotation;
use crate::core::interval::Interval;
use crate::core::types::{AnnotationId, IntervalId, SegmentId};
use crate::selection::arena::IntervalArena;

/// Where a sibling of a selected annotation is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Annotation inside the root interval
    pub source: AnnotationId,
    /// Its homolog
    pub sibling: AnnotationId,
    /// First displayed segment showing the homolog
    pub segment: SegmentId,
}

/// Propagates a root interval onto the segments showing homologs of the
/// annotations it covers.
pub struct CorrespondenceBuilder<'a> {
    catalog: &'a DisplayCatalog,
}

impl<'a> CorrespondenceBuilder<'a> {
    pub fn new(catalog: &'a DisplayCatalog) -> Self {
        Self { catalog }
    }

    /// First displayed segment, in display order, on the annotation's
    /// chromosome whose drawn span overlaps it.
    pub fn placement_segment(&self, annotation: &Annotation) -> Option<SegmentId> {
        self.showing(annotation).next()
    }

    /// Displayed segments whose drawn span overlaps `annotation`, in display order
    fn showing<'b>(&'b self, annotation: &'b Annotation) -> impl Iterator<Item = SegmentId> + 'b {
        self.catalog
            .segments()
            .iter()
            .filter(|s| {
                s.chromosome == annotation.chromosome && s.overlaps(annotation.start, annotation.stop)
            })
            .map(|s| s.id)
    }

    /// Every sibling placement for the annotations contained by `root`.
    ///
    /// Siblings are placed on the first segment showing them other than the
    /// root's own; siblings with no such segment are skipped. Several siblings
    /// on the same segment each yield their own placement.
    pub fn placements(&self, root: &Interval) -> Vec<Placement> {
        let Some(segment) = root.segment() else {
            return Vec::new();
        };
        if !root.is_final() {
            return Vec::new();
        }

        let siblings = self.catalog.siblings();
        let mut placements = Vec::new();
        for source in self
            .catalog
            .segment_features(segment, root.start(), root.stop())
        {
            let Some(annotation) = self.catalog.annotation(source) else {
                continue;
            };
            if !root.contains_annotation(annotation) {
                continue;
            }
            for sibling in siblings.siblings(source) {
                let Some(target) = self.catalog.annotation(sibling) else {
                    continue;
                };
                match self.showing(target).find(|&s| s != segment) {
                    Some(segment) => placements.push(Placement {
                        source,
                        sibling,
                        segment,
                    }),
                    None => trace!(
                        sibling = %target.name,
                        "sibling of {} is not on any other displayed segment",
                        annotation.name
                    ),
                }
            }
        }
        placements
    }

    /// Create, link and register a child interval for every placement of `root`.
    ///
    /// Returns the new children; an unknown or non-final root yields none.
    pub fn build(&self, arena: &mut IntervalArena, root: IntervalId) -> Vec<IntervalId> {
        let placements = match arena.get(root) {
            Some(interval) => self.placements(interval),
            None => return Vec::new(),
        };

        let mut children = Vec::with_capacity(placements.len());
        for placement in placements {
            let (Some(segment), Some(sibling)) = (
                self.catalog.segment(placement.segment),
                self.catalog.annotation(placement.sibling),
            ) else {
                continue;
            };
            let child = arena.allocate();
            if let Some(interval) = arena.get_mut(child) {
                interval.set_annotation(segment, sibling);
            }
            arena.add_child(root, child);
            arena.register(child);
            children.push(child);
        }
        children
    }
}
