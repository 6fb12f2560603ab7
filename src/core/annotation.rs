use serde::{Deserialize, Serialize};

use crate::core::types::{AnnotationId, ChromosomeId, LinkId};

/// A feature placed on a chromosome (gene, QTL, marker, ...)
///
/// Homology is never stored on the annotation itself; it is derived from
/// shared [`LinkId`]s by the sibling graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,

    /// Identifier from the source database, when one exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    pub name: String,
    pub chromosome: ChromosomeId,

    /// Name of the annotation set (track) this feature came from
    pub annotation_set: String,

    pub start: i64,
    pub stop: i64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkId>,
}

impl Annotation {
    pub fn new(
        id: AnnotationId,
        name: impl Into<String>,
        chromosome: ChromosomeId,
        start: i64,
        stop: i64,
    ) -> Self {
        Self {
            id,
            external_id: None,
            name: name.into(),
            chromosome,
            annotation_set: String::new(),
            start: start.min(stop),
            stop: start.max(stop),
            links: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    #[must_use]
    pub fn with_set(mut self, annotation_set: impl Into<String>) -> Self {
        self.annotation_set = annotation_set.into();
        self
    }

    #[must_use]
    pub fn with_links<I, S>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.links = links.into_iter().map(|l| LinkId::new(l)).collect();
        self
    }

    /// Identity comparison: by external id when both carry one, otherwise by
    /// name and position.
    #[must_use]
    pub fn same_feature(&self, other: &Annotation) -> bool {
        match (&self.external_id, &other.external_id) {
            (Some(a), Some(b)) => a == b,
            _ => self.name == other.name && self.start == other.start && self.stop == other.stop,
        }
    }

    /// True if either endpoint falls within `[start, stop]`
    #[must_use]
    pub fn touches(&self, start: i64, stop: i64) -> bool {
        (start..=stop).contains(&self.start) || (start..=stop).contains(&self.stop)
    }

    /// True if the whole feature lies strictly between `after` and `before`
    #[must_use]
    pub fn lies_between(&self, after: i64, before: i64) -> bool {
        self.start > after && self.stop < before
    }
}
