//! Selection behavior through the public API
//!
//! Covers propagation across maps, reconciliation invariants and the
//! parent/child bookkeeping of the interval arena.

use synteny_select::selection::arena::IntervalArena;
use synteny_select::{
    Annotation, AnnotationId, DisplayCatalog, DisplayMap, IntervalState, MapId, ReconcileMode,
    SegmentId, Selection, SiblingGraph,
};

/// rat:1 and human:7, both 100 Mb and fully displayed (segments 0 and 1).
/// Links are comma-separated
fn two_map_catalog(genes: &[(&str, &str, i64, i64, &str)]) -> DisplayCatalog {
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

    for &(name, map, start, stop, links) in genes {
        let chromosome = if map == "rat" { rat } else { human };
        catalog
            .add_annotation(
                Annotation::new(AnnotationId(0), name, chromosome, start, stop)
                    .with_links(links.split(',').filter(|l| !l.is_empty())),
            )
            .unwrap();
    }
    catalog
}

const RAT: SegmentId = SegmentId(0);
const HUMAN: SegmentId = SegmentId(1);

fn ranges_on(selection: &Selection<'_>, segment: SegmentId) -> Vec<(i64, i64)> {
    selection
        .intervals_on(segment)
        .iter()
        .map(|i| (i.start(), i.stop()))
        .collect()
}

#[test]
fn test_cross_map_propagation() {
    let catalog = two_map_catalog(&[
        ("A", "rat", 500, 600, "7"),
        ("B", "human", 1_500, 1_600, "7"),
    ]);
    let mut selection = Selection::new(&catalog);

    let root = selection.add_annotation(RAT, AnnotationId(0)).unwrap();
    selection.verify(ReconcileMode::Both);

    let children = selection.intervals_on(HUMAN);
    assert_eq!(children.len(), 1);
    assert_eq!((children[0].start(), children[0].stop()), (1_500, 1_600));
    assert_eq!(children[0].parent(), Some(root));
    assert!(selection
        .interval(root)
        .unwrap()
        .children()
        .contains(&children[0].id()));
}

#[test]
fn test_threshold_coalescing() {
    let catalog = two_map_catalog(&[]);
    let mut selection = Selection::new(&catalog);

    selection.add_interval(RAT, 10_000, 20_000);
    selection.add_interval(RAT, 20_500, 30_000);
    selection.verify(ReconcileMode::Both);
    assert_eq!(ranges_on(&selection, RAT), vec![(10_000, 30_000)]);
}

#[test]
fn test_gap_at_threshold_is_kept() {
    let catalog = two_map_catalog(&[]);
    let mut selection = Selection::new(&catalog);

    // Gap of exactly 1% of 100 Mb
    selection.add_interval(RAT, 10_000, 20_000);
    selection.add_interval(RAT, 1_020_000, 1_030_000);
    selection.verify(ReconcileMode::Both);
    assert_eq!(
        ranges_on(&selection, RAT),
        vec![(10_000, 20_000), (1_020_000, 1_030_000)]
    );
}

#[test]
fn test_contradicting_feature_blocks_coalescing() {
    // Mid sits in the gap and its homolog lies far outside the children's span
    let catalog = two_map_catalog(&[
        ("Left", "rat", 10_000, 10_100, "l"),
        ("Mid", "rat", 15_000, 15_100, "m"),
        ("Right", "rat", 20_000, 20_100, "r"),
        ("LEFT", "human", 50_000, 50_100, "l"),
        ("MID", "human", 90_000_000, 90_000_100, "m"),
        ("RIGHT", "human", 51_000, 51_100, "r"),
    ]);
    let mut selection = Selection::new(&catalog);

    selection.add_interval(RAT, 9_000, 11_000);
    selection.add_interval(RAT, 19_000, 21_000);
    assert_eq!(
        ranges_on(&selection, RAT),
        vec![(9_000, 11_000), (19_000, 21_000)]
    );
}

#[test]
fn test_containment_invariant() {
    let catalog = two_map_catalog(&[]);
    let mut selection = Selection::new(&catalog);

    for (start, stop) in [
        (5_000_000, 6_000_000),
        (5_100_000, 5_200_000),
        (20_000_000, 20_500_000),
        (4_000_000, 8_000_000),
        (20_100_000, 20_200_000),
        (60_000_000, 60_000_001),
    ] {
        selection.add_interval(RAT, start, stop);
    }
    selection.verify(ReconcileMode::Both);

    let roots: Vec<_> = selection
        .visible_intervals()
        .into_iter()
        .filter(|i| i.is_root() && i.segment() == Some(RAT))
        .collect();
    for a in &roots {
        for b in &roots {
            if a.id() != b.id() {
                assert!(
                    !a.contains_range(b),
                    "{} [{}, {}] contains {} [{}, {}]",
                    a.id(),
                    a.start(),
                    a.stop(),
                    b.id(),
                    b.start(),
                    b.stop()
                );
            }
        }
    }
    assert_eq!(
        ranges_on(&selection, RAT),
        vec![
            (4_000_000, 8_000_000),
            (20_000_000, 20_500_000),
            (60_000_000, 60_000_001)
        ]
    );
}

#[test]
fn test_reconcile_is_idempotent() {
    let catalog = two_map_catalog(&[
        ("A", "rat", 500, 600, "7"),
        ("B", "human", 1_500, 1_600, "7"),
        ("C", "rat", 40_000, 40_100, "8"),
        ("D", "human", 1_900, 2_000, "8"),
        ("E", "rat", 70_000, 70_100, "9"),
        ("F", "human", 1_700, 1_800, "9"),
    ]);
    let mut selection = Selection::new(&catalog);
    selection.add_annotation(RAT, AnnotationId(0));
    selection.add_interval(RAT, 39_000, 41_000);
    selection.add_interval(RAT, 69_000, 71_000);
    selection.verify(ReconcileMode::Both);

    let state = |s: &Selection<'_>| {
        s.intervals()
            .iter()
            .map(|i| (i.id(), i.start(), i.stop(), i.state(), i.parent()))
            .collect::<Vec<_>>()
    };
    let first = state(&selection);
    let report = selection.verify(ReconcileMode::Both);
    assert!(report.is_unchanged());
    assert_eq!(state(&selection), first);
}

#[test]
fn test_normalization() {
    let catalog = two_map_catalog(&[]);
    let mut selection = Selection::new(&catalog);

    let reversed = selection.add_interval(RAT, 9_000, 3_000).unwrap();
    let interval = selection.interval(reversed).unwrap();
    assert_eq!((interval.start(), interval.stop()), (3_000, 9_000));

    let point = selection.add_interval(RAT, 50_000_000, 50_000_000).unwrap();
    let interval = selection.interval(point).unwrap();
    assert_eq!((interval.start(), interval.stop()), (50_000_000, 50_000_001));
}

#[test]
fn test_sibling_symmetry() {
    let catalog = two_map_catalog(&[
        ("A", "rat", 500, 600, "7"),
        ("B", "human", 1_500, 1_600, "7,12"),
        ("C", "human", 9_000, 9_100, "12"),
        ("D", "rat", 700, 800, ""),
    ]);
    let graph: &SiblingGraph = catalog.siblings();

    for a in catalog.annotations() {
        for b in graph.siblings(a.id) {
            assert!(
                graph.siblings(b).contains(&a.id),
                "{} lists {} but not the reverse",
                a.name,
                b
            );
        }
    }
    // Transitive through B
    assert!(graph.are_siblings(AnnotationId(0), AnnotationId(2)));
    assert!(graph.siblings(AnnotationId(3)).is_empty());
}

#[test]
fn test_parent_child_bidirectionality() {
    let catalog = two_map_catalog(&[]);
    let rat = catalog.segment(RAT).unwrap();
    let human = catalog.segment(HUMAN).unwrap();

    let mut arena = IntervalArena::new();
    let parent = arena.allocate();
    arena.get_mut(parent).unwrap().set_range(rat, 100, 200);
    let child = arena.allocate();
    arena.get_mut(child).unwrap().set_range(human, 300, 400);

    assert!(arena.add_child(parent, child));
    assert_eq!(arena.get(child).unwrap().parent(), Some(parent));
    assert!(arena.get(parent).unwrap().children().contains(&child));

    assert!(arena.remove_child(parent, child));
    assert_eq!(arena.get(child).unwrap().parent(), None);
    assert!(!arena.get(parent).unwrap().children().contains(&child));
}

#[test]
fn test_remove_interval_takes_propagated_children() {
    let catalog = two_map_catalog(&[
        ("A", "rat", 500, 600, "7"),
        ("B", "human", 1_500, 1_600, "7"),
    ]);
    let mut selection = Selection::new(&catalog);
    let root = selection.add_annotation(RAT, AnnotationId(0)).unwrap();
    assert_eq!(selection.intervals().len(), 2);

    assert!(selection.remove_interval(root));
    assert!(selection.intervals_on(RAT).is_empty());
    assert!(selection.intervals_on(HUMAN).is_empty());
}

#[test]
fn test_overlapping_children_of_different_roots_are_suppressed_not_merged() {
    // B and D are homologs of two separate rat selections; D falls inside B
    let catalog = two_map_catalog(&[
        ("A", "rat", 1_500, 1_600, "x"),
        ("B", "human", 10_000, 20_000, "x"),
        ("C", "rat", 50_000_000, 50_000_100, "y"),
        ("D", "human", 12_000, 13_000, "y"),
    ]);
    let mut selection = Selection::new(&catalog);

    let first = selection.add_interval(RAT, 1_000, 2_000).unwrap();
    let second = selection
        .add_interval(RAT, 50_000_000, 50_001_000)
        .unwrap();
    selection.verify(ReconcileMode::Both);

    assert_eq!(
        ranges_on(&selection, RAT),
        vec![(1_000, 2_000), (50_000_000, 50_001_000)]
    );
    assert_eq!(
        ranges_on(&selection, HUMAN),
        vec![(10_000, 20_000), (12_000, 13_000)]
    );

    let all = selection.intervals();
    let visible = selection.visible_intervals();
    assert_eq!(all.len(), 4);
    assert_eq!(visible.len(), 3);

    let hidden: Vec<_> = all
        .iter()
        .filter(|i| !visible.iter().any(|v| v.id() == i.id()))
        .collect();
    assert_eq!(hidden.len(), 1);
    assert_eq!((hidden[0].start(), hidden[0].stop()), (12_000, 13_000));
    assert_eq!(hidden[0].state(), IntervalState::Suppressed);
    assert_eq!(hidden[0].parent(), Some(second));

    let container = selection.intervals_on(HUMAN)[0];
    assert_eq!(container.state(), IntervalState::Active);
    assert_eq!(container.parent(), Some(first));
}
