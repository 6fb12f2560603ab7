use std::collections::BTreeMap;

use crate::core::interval::Interval;
use crate::core::types::{IntervalId, SegmentId};

/// Owns every interval of a selection.
///
/// Intervals live in slots addressed by [`IntervalId`]; parent/child links
/// are id pairs kept consistent in both directions by the methods here.
/// Registered intervals are additionally listed under their segment.
/// Ids are never reused, not even after [`IntervalArena::clear`].
#[derive(Debug, Default, Clone)]
pub struct IntervalArena {
    slots: Vec<Option<Interval>>,

    /// Id of `slots[0]`; advances on every clear
    first_id: usize,
    by_segment: BTreeMap<SegmentId, Vec<IntervalId>>,
}

impl IntervalArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unset interval in a fresh slot. It is not registered yet.
    pub fn allocate(&mut self) -> IntervalId {
        let id = IntervalId(self.first_id + self.slots.len());
        self.slots.push(Some(Interval::unset(id)));
        id
    }

    pub fn get(&self, id: IntervalId) -> Option<&Interval> {
        self.slots.get(self.slot(id)?).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: IntervalId) -> Option<&mut Interval> {
        let slot = self.slot(id)?;
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    fn slot(&self, id: IntervalId) -> Option<usize> {
        id.index().checked_sub(self.first_id)
    }

    /// List an anchored interval under its segment. Returns false if it is
    /// missing, unanchored, or already registered.
    pub fn register(&mut self, id: IntervalId) -> bool {
        let Some(segment) = self.get(id).and_then(Interval::segment) else {
            return false;
        };
        let listed = self.by_segment.entry(segment).or_default();
        if listed.contains(&id) {
            return false;
        }
        listed.push(id);
        true
    }

    pub fn is_registered(&self, id: IntervalId) -> bool {
        self.get(id)
            .and_then(Interval::segment)
            .and_then(|s| self.by_segment.get(&s))
            .is_some_and(|listed| listed.contains(&id))
    }

    /// Registered intervals on a segment, in registration order
    pub fn on_segment(&self, segment: SegmentId) -> &[IntervalId] {
        self.by_segment
            .get(&segment)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Segments with at least one registered interval, ascending
    pub fn segments(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.by_segment
            .iter()
            .filter(|(_, ids)| !ids.is_empty())
            .map(|(&s, _)| s)
    }

    /// All registered intervals, grouped by segment
    pub fn registered(&self) -> impl Iterator<Item = &Interval> + '_ {
        self.by_segment
            .values()
            .flatten()
            .filter_map(|&id| self.get(id))
    }

    pub fn registered_count(&self) -> usize {
        self.by_segment.values().map(Vec::len).sum()
    }

    fn is_ancestor(&self, candidate: IntervalId, of: IntervalId) -> bool {
        let mut cursor = self.get(of).and_then(Interval::parent);
        while let Some(id) = cursor {
            if id == candidate {
                return true;
            }
            cursor = self.get(id).and_then(Interval::parent);
        }
        false
    }

    /// Link `child` under `parent`, detaching it from any previous parent.
    ///
    /// No-op (returns false) if the link already exists, either side is
    /// missing, or the link would create a cycle.
    pub fn add_child(&mut self, parent: IntervalId, child: IntervalId) -> bool {
        if parent == child || self.get(parent).is_none() || self.get(child).is_none() {
            return false;
        }
        if self.is_ancestor(child, parent) {
            return false;
        }
        let previous = self.get(child).and_then(Interval::parent);
        if previous == Some(parent) {
            return false;
        }
        if let Some(previous) = previous {
            if let Some(old) = self.get_mut(previous) {
                old.drop_child(child);
            }
        }
        if let Some(c) = self.get_mut(child) {
            c.set_parent(Some(parent));
        }
        if let Some(p) = self.get_mut(parent) {
            p.push_child(child);
        }
        true
    }

    /// Unlink `child` from `parent`. No-op (returns false) if not linked.
    pub fn remove_child(&mut self, parent: IntervalId, child: IntervalId) -> bool {
        let removed = self
            .get_mut(parent)
            .is_some_and(|p| p.drop_child(child));
        if !removed {
            return false;
        }
        if let Some(c) = self.get_mut(child) {
            if c.parent() == Some(parent) {
                c.set_parent(None);
            }
        }
        true
    }

    /// Detach every child of `parent`
    pub fn clear_children(&mut self, parent: IntervalId) {
        let children = self
            .get_mut(parent)
            .map(Interval::take_children)
            .unwrap_or_default();
        for child in children {
            if let Some(c) = self.get_mut(child) {
                c.set_parent(None);
            }
        }
    }

    /// Re-parent every child of `from` under `to`
    pub fn move_children(&mut self, from: IntervalId, to: IntervalId) {
        let children: Vec<IntervalId> = self
            .get(from)
            .map(|i| i.children().to_vec())
            .unwrap_or_default();
        for child in children {
            if !self.add_child(to, child) {
                self.remove_child(from, child);
            }
        }
    }

    /// `id` and everything propagated from it, depth first
    pub fn descendants(&self, id: IntervalId) -> Vec<IntervalId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(interval) = self.get(current) {
                out.push(current);
                stack.extend(interval.children().iter().rev());
            }
        }
        out
    }

    /// Remove an interval: unlink it from its parent, orphan its children,
    /// unregister it and free its slot.
    pub fn release(&mut self, id: IntervalId) -> Option<Interval> {
        if let Some(parent) = self.get(id).and_then(Interval::parent) {
            self.remove_child(parent, id);
        }
        self.clear_children(id);
        let slot = self.slot(id)?;
        let interval = self.slots.get_mut(slot).and_then(Option::take)?;
        if let Some(segment) = interval.segment() {
            if let Some(listed) = self.by_segment.get_mut(&segment) {
                listed.retain(|&i| i != id);
            }
        }
        Some(interval)
    }

    pub fn clear(&mut self) {
        self.first_id += self.slots.len();
        self.slots.clear();
        self.by_segment.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::segment::Segment;
    use crate::core::types::{ChromosomeId, MapId};

    fn segment(id: usize) -> Segment {
        Segment {
            id: SegmentId(id),
            chromosome: ChromosomeId(id),
            map: MapId::new("rat"),
            drawing_start: 0,
            drawing_stop: 10_000,
        }
    }

    fn placed(arena: &mut IntervalArena, seg: usize, start: i64, stop: i64) -> IntervalId {
        let id = arena.allocate();
        arena
            .get_mut(id)
            .unwrap()
            .set_range(&segment(seg), start, stop);
        arena.register(id);
        id
    }

    #[test]
    fn test_clear_does_not_reuse_ids() {
        let mut arena = IntervalArena::new();
        let before = placed(&mut arena, 0, 10, 20);
        placed(&mut arena, 0, 30, 40);

        arena.clear();
        assert!(arena.get(before).is_none());
        assert!(arena.release(before).is_none());
        assert!(arena.on_segment(SegmentId(0)).is_empty());

        let after = placed(&mut arena, 0, 50, 60);
        assert_ne!(after, before);
        assert_eq!(after, IntervalId(2));
        assert!(arena.get(before).is_none());
        assert_eq!(arena.get(after).unwrap().start(), 50);

        // A second clear keeps counting
        arena.clear();
        assert_eq!(arena.allocate(), IntervalId(3));
    }

    #[test]
    fn test_add_child_is_bidirectional() {
        let mut arena = IntervalArena::new();
        let parent = placed(&mut arena, 0, 10, 20);
        let child = placed(&mut arena, 1, 30, 40);

        assert!(arena.add_child(parent, child));
        assert_eq!(arena.get(child).unwrap().parent(), Some(parent));
        assert_eq!(arena.get(parent).unwrap().children(), &[child]);

        // Adding again is a no-op
        assert!(!arena.add_child(parent, child));
        assert_eq!(arena.get(parent).unwrap().children().len(), 1);

        assert!(arena.remove_child(parent, child));
        assert_eq!(arena.get(child).unwrap().parent(), None);
        assert!(arena.get(parent).unwrap().children().is_empty());

        // Removing again is a no-op
        assert!(!arena.remove_child(parent, child));
    }

    #[test]
    fn test_add_child_detaches_previous_parent() {
        let mut arena = IntervalArena::new();
        let first = placed(&mut arena, 0, 10, 20);
        let second = placed(&mut arena, 0, 50, 60);
        let child = placed(&mut arena, 1, 30, 40);

        arena.add_child(first, child);
        arena.add_child(second, child);
        assert!(arena.get(first).unwrap().children().is_empty());
        assert_eq!(arena.get(second).unwrap().children(), &[child]);
        assert_eq!(arena.get(child).unwrap().parent(), Some(second));
    }

    #[test]
    fn test_add_child_rejects_cycles() {
        let mut arena = IntervalArena::new();
        let a = placed(&mut arena, 0, 10, 20);
        let b = placed(&mut arena, 1, 10, 20);
        assert!(arena.add_child(a, b));
        assert!(!arena.add_child(b, a));
        assert!(!arena.add_child(a, a));
    }

    #[test]
    fn test_move_children() {
        let mut arena = IntervalArena::new();
        let from = placed(&mut arena, 0, 10, 20);
        let to = placed(&mut arena, 0, 5, 50);
        let c1 = placed(&mut arena, 1, 1, 2);
        let c2 = placed(&mut arena, 2, 1, 2);
        arena.add_child(from, c1);
        arena.add_child(from, c2);

        arena.move_children(from, to);
        assert!(arena.get(from).unwrap().children().is_empty());
        assert_eq!(arena.get(to).unwrap().children(), &[c1, c2]);
        assert_eq!(arena.get(c2).unwrap().parent(), Some(to));
    }

    #[test]
    fn test_release_unlinks_everything() {
        let mut arena = IntervalArena::new();
        let root = placed(&mut arena, 0, 10, 20);
        let mid = placed(&mut arena, 1, 10, 20);
        let leaf = placed(&mut arena, 2, 10, 20);
        arena.add_child(root, mid);
        arena.add_child(mid, leaf);

        assert_eq!(arena.descendants(root), vec![root, mid, leaf]);

        assert!(arena.release(mid).is_some());
        assert!(arena.get(mid).is_none());
        assert!(arena.get(root).unwrap().children().is_empty());
        assert_eq!(arena.get(leaf).unwrap().parent(), None);
        assert!(arena.on_segment(SegmentId(1)).is_empty());
        assert!(arena.release(mid).is_none());
    }

    #[test]
    fn test_register_requires_anchor() {
        let mut arena = IntervalArena::new();
        let unset = arena.allocate();
        assert!(!arena.register(unset));
        let placed = placed(&mut arena, 3, 1, 5);
        assert!(arena.is_registered(placed));
        assert!(!arena.register(placed));
        assert_eq!(arena.registered_count(), 1);
        assert_eq!(arena.segments().collect::<Vec<_>>(), vec![SegmentId(3)]);
    }
}
