use std::collections::HashMap;

use crate::core::annotation::Annotation;
use crate::core::types::{AnnotationId, ChromosomeId};

#[derive(Debug, Default, Clone)]
struct ChromosomeFeatures {
    /// (start, stop, id), sorted by start then id
    entries: Vec<(i64, i64, AnnotationId)>,

    /// Widest feature on the chromosome; bounds the backwards scan
    max_width: i64,
}

/// Positional index of annotations per chromosome
#[derive(Debug, Default, Clone)]
pub struct FeatureIndex {
    by_chromosome: HashMap<ChromosomeId, ChromosomeFeatures>,
}

impl FeatureIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one annotation in position order
    pub fn insert(&mut self, annotation: &Annotation) {
        let features = self.by_chromosome.entry(annotation.chromosome).or_default();
        let entry = (annotation.start, annotation.stop, annotation.id);
        let at = features
            .entries
            .partition_point(|&(s, _, id)| (s, id) < (entry.0, entry.2));
        features.entries.insert(at, entry);
        features.max_width = features.max_width.max(annotation.stop - annotation.start);
    }

    /// Append without ordering; call [`FeatureIndex::sort`] before querying.
    pub fn push(&mut self, annotation: &Annotation) {
        let features = self.by_chromosome.entry(annotation.chromosome).or_default();
        features
            .entries
            .push((annotation.start, annotation.stop, annotation.id));
        features.max_width = features.max_width.max(annotation.stop - annotation.start);
    }

    /// Restore position order after a run of [`FeatureIndex::push`]
    pub fn sort(&mut self) {
        for features in self.by_chromosome.values_mut() {
            features.entries.sort_unstable_by_key(|&(s, _, id)| (s, id));
        }
    }

    /// Annotations on `chromosome` with an endpoint inside `[start, stop]`,
    /// ordered by start position.
    pub fn touching(&self, chromosome: ChromosomeId, start: i64, stop: i64) -> Vec<AnnotationId> {
        let Some(features) = self.by_chromosome.get(&chromosome) else {
            return Vec::new();
        };
        if stop < start {
            return Vec::new();
        }
        let from = features
            .entries
            .partition_point(|&(s, _, _)| s < start.saturating_sub(features.max_width));
        features.entries[from..]
            .iter()
            .take_while(|&&(s, _, _)| s <= stop)
            .filter(|&&(s, e, _)| (start..=stop).contains(&s) || (start..=stop).contains(&e))
            .map(|&(_, _, id)| id)
            .collect()
    }

    /// Annotations lying entirely and strictly between `after` and `before`
    pub fn between(&self, chromosome: ChromosomeId, after: i64, before: i64) -> Vec<AnnotationId> {
        let Some(features) = self.by_chromosome.get(&chromosome) else {
            return Vec::new();
        };
        let from = features.entries.partition_point(|&(s, _, _)| s <= after);
        features.entries[from..]
            .iter()
            .take_while(|&&(s, _, _)| s < before)
            .filter(|&&(_, e, _)| e < before)
            .map(|&(_, _, id)| id)
            .collect()
    }

    pub fn count(&self, chromosome: ChromosomeId) -> usize {
        self.by_chromosome
            .get(&chromosome)
            .map_or(0, |f| f.entries.len())
    }
}
