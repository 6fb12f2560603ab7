use std::collections::HashMap;

use crate::core::annotation::Annotation;
use crate::core::types::{AnnotationId, LinkId};

/// Homology relation between annotations, derived from shared link ids.
///
/// Annotations sharing any [`LinkId`] land in the same group, and groups
/// chain transitively: if A and B share one link and B and C share another,
/// all three are siblings of each other. Groups are kept in a union-find
/// keyed by annotation index, so the relation is symmetric by construction.
#[derive(Debug, Default, Clone)]
pub struct SiblingGraph {
    /// Union-find parent per annotation index
    parent: Vec<usize>,

    /// Members of each group, stored at the group's root index
    members: Vec<Vec<AnnotationId>>,

    /// First annotation seen carrying each link id
    link_owner: HashMap<LinkId, usize>,
}

impl SiblingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for a slice of annotations whose ids are their indices
    pub fn build(annotations: &[Annotation]) -> Self {
        let mut graph = Self::new();
        for annotation in annotations {
            graph.insert(annotation);
        }
        graph
    }

    /// Register an annotation and join it to every group sharing one of its links.
    ///
    /// Ids must be inserted densely; inserting an id beyond the next free slot
    /// creates empty singleton slots in between.
    pub fn insert(&mut self, annotation: &Annotation) {
        let index = annotation.id.index();
        while self.parent.len() <= index {
            let slot = self.parent.len();
            self.parent.push(slot);
            self.members.push(vec![AnnotationId(slot)]);
        }

        for link in &annotation.links {
            match self.link_owner.get(link) {
                Some(&owner) => self.union(owner, index),
                None => {
                    self.link_owner.insert(link.clone(), index);
                }
            }
        }
    }

    fn find(&self, mut index: usize) -> usize {
        while self.parent[index] != index {
            index = self.parent[index];
        }
        index
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        // Union by size keeps find() logarithmic without path compression
        let (big, small) = if self.members[ra].len() >= self.members[rb].len() {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[small] = big;
        let moved = std::mem::take(&mut self.members[small]);
        self.members[big].extend(moved);
    }

    fn group(&self, annotation: AnnotationId) -> &[AnnotationId] {
        if annotation.index() >= self.parent.len() {
            return &[];
        }
        &self.members[self.find(annotation.index())]
    }

    /// All siblings of `annotation`, excluding itself, sorted by id
    pub fn siblings(&self, annotation: AnnotationId) -> Vec<AnnotationId> {
        let mut siblings: Vec<AnnotationId> = self
            .group(annotation)
            .iter()
            .copied()
            .filter(|&a| a != annotation)
            .collect();
        siblings.sort_unstable();
        siblings
    }

    pub fn has_siblings(&self, annotation: AnnotationId) -> bool {
        self.group(annotation).len() > 1
    }

    pub fn are_siblings(&self, a: AnnotationId, b: AnnotationId) -> bool {
        a != b
            && a.index() < self.parent.len()
            && b.index() < self.parent.len()
            && self.find(a.index()) == self.find(b.index())
    }

    /// Number of groups with at least two members
    pub fn linked_group_count(&self) -> usize {
        self.members.iter().filter(|m| m.len() > 1).count()
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }
}
