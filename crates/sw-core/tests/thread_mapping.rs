//! Integration tests: points → grouping → line map → thread assignment.
//!
//! Exercises the full `sw-core` derivation pipeline on branching and
//! merging story graphs.

use chrono::Utc;
use pretty_assertions::assert_eq;
use std::collections::{BTreeMap, BTreeSet};
use sw_core::grid::points_by_step;
use sw_core::threads::{MappedLineStep, apply_threads, build_line_map, map_threads};
use sw_core::{Action, Point, PointId, Story, StoryId, StoryWithScenes, UserId};

fn story() -> StoryWithScenes {
    StoryWithScenes {
        story: Story {
            id: StoryId::intern("it-story"),
            user_id: UserId::intern("it-user"),
            name: "Branches".into(),
            description: String::new(),
            created_at: Utc::now(),
        },
        scenes: Vec::new(),
    }
}

fn point(id: &str, row: usize, col: usize, targets: &[&str]) -> Point {
    Point {
        id: PointId::intern(id),
        story_id: StoryId::intern("it-story"),
        user_id: UserId::intern("it-user"),
        scene_id: None,
        row,
        col,
        actions: targets
            .iter()
            .map(|t| Action::linked(*t, PointId::intern(t)))
            .collect(),
        created_at: Utc::now(),
    }
}

fn thread_of(map: &[MappedLineStep], from: &str, to: &str) -> Option<u32> {
    map.iter()
        .flat_map(|s| s.points.iter())
        .filter(|p| p.point_id.as_str() == from)
        .flat_map(|p| p.actions.iter())
        .find(|a| a.to_point_id.as_str() == to)
        .and_then(|a| a.thread_id)
}

/// Edges grouped by thread, independent of the numeric ids.
fn grouping(map: &[MappedLineStep]) -> BTreeSet<BTreeSet<(String, usize)>> {
    let mut groups: BTreeMap<u32, BTreeSet<(String, usize)>> = BTreeMap::new();
    for step in map {
        for p in &step.points {
            for a in &p.actions {
                if let Some(t) = a.thread_id {
                    groups
                        .entry(t)
                        .or_default()
                        .insert((p.point_id.as_str().to_string(), a.action_index));
                }
            }
        }
    }
    groups.into_values().collect()
}

// ─── Forks and merges ───────────────────────────────────────────────────

#[test]
fn fork_assigns_distinct_threads() {
    let points = vec![
        point("p1", 0, 0, &["p2", "p3"]),
        point("p2", 1, 0, &[]),
        point("p3", 1, 1, &[]),
    ];
    let map = map_threads(&points_by_step(&points, &story()), |_| false);

    let t2 = thread_of(&map, "p1", "p2").expect("p1 -> p2 mapped");
    let t3 = thread_of(&map, "p1", "p3").expect("p1 -> p3 mapped");
    assert_ne!(t2, t3);
}

#[test]
fn merge_continues_only_the_first_arrival() {
    let points = vec![
        point("p1", 0, 0, &["p3"]),
        point("p2", 0, 1, &["p3"]),
        point("p3", 1, 0, &["p4"]),
        point("p4", 2, 0, &[]),
    ];
    let map = map_threads(&points_by_step(&points, &story()), |_| false);

    let first = thread_of(&map, "p1", "p3").unwrap();
    let second = thread_of(&map, "p2", "p3").unwrap();
    let onward = thread_of(&map, "p3", "p4").unwrap();

    assert_eq!(first, onward, "p1's thread runs through p3 to p4");
    assert_ne!(second, onward, "p2's edge into p3 stops there");
}

#[test]
fn arrival_order_within_a_step_decides_the_merge() {
    // p2 arrives before p1 in step 0, so p2's thread continues past p3.
    let points = vec![
        point("p2", 0, 1, &["p3"]),
        point("p1", 0, 0, &["p3"]),
        point("p3", 1, 0, &["p4"]),
        point("p4", 2, 0, &[]),
    ];
    let map = map_threads(&points_by_step(&points, &story()), |_| false);
    assert_eq!(
        thread_of(&map, "p2", "p3"),
        thread_of(&map, "p3", "p4")
    );
}

#[test]
fn later_step_root_continues_into_earlier_step() {
    // A back-edge from a later step into an already-walked point starts its
    // own thread and does not re-walk the target's edges.
    let points = vec![
        point("a", 0, 0, &["b"]),
        point("b", 1, 0, &["c"]),
        point("c", 2, 0, &[]),
        point("x", 2, 1, &["b"]),
    ];
    let map = map_threads(&points_by_step(&points, &story()), |_| false);

    assert_eq!(thread_of(&map, "a", "b"), Some(0));
    assert_eq!(thread_of(&map, "b", "c"), Some(0));
    assert_eq!(thread_of(&map, "x", "b"), Some(1));
}

// ─── Safety and determinism ─────────────────────────────────────────────

#[test]
fn every_resolvable_edge_mapped_at_most_once() {
    let points = vec![
        point("a", 0, 0, &["b", "c"]),
        point("b", 1, 0, &["d", "a"]),
        point("c", 1, 1, &["d"]),
        point("d", 2, 0, &["a", "b"]),
    ];
    let map = map_threads(&points_by_step(&points, &story()), |_| false);

    let mut seen = BTreeSet::new();
    for step in &map {
        for p in &step.points {
            for a in &p.actions {
                if a.thread_id.is_some() {
                    assert!(
                        seen.insert((p.point_id.as_str(), a.to_point_id.as_str())),
                        "edge {} -> {} mapped twice",
                        p.point_id,
                        a.to_point_id
                    );
                }
            }
        }
    }
    // Every edge here resolves and is distinct, so each is mapped exactly once.
    assert_eq!(seen.len(), 7);
}

#[test]
fn cycle_terminates_and_skips_the_repeat() {
    let points = vec![point("a", 0, 0, &["b"]), point("b", 1, 0, &["a"])];
    let map = map_threads(&points_by_step(&points, &story()), |_| false);
    assert_eq!(thread_of(&map, "a", "b"), Some(0));
    assert_eq!(thread_of(&map, "b", "a"), Some(0));
}

#[test]
fn repeated_passes_are_identical() {
    let points = vec![
        point("a", 0, 0, &["b", "c"]),
        point("b", 1, 0, &["d"]),
        point("c", 1, 1, &["d"]),
        point("d", 2, 0, &[]),
    ];
    let by_step = points_by_step(&points, &story());

    let first = map_threads(&by_step, |_| false);
    let second = map_threads(&by_step, |_| false);
    assert_eq!(first, second, "ids restart at 0 on every pass");
    assert_eq!(grouping(&first), grouping(&second));
}

#[test]
fn mapping_does_not_touch_the_source_points() {
    let points = vec![point("a", 0, 0, &["b"]), point("b", 1, 0, &[])];
    let before = points.clone();
    let mut map = build_line_map(&points_by_step(&points, &story()), |_| false);
    apply_threads(&mut map);
    assert_eq!(points, before);
}

#[test]
fn long_chain_is_walked_without_exhausting_the_stack() {
    const LEN: usize = 50_000;
    let ids: Vec<String> = (0..LEN).map(|i| format!("chain-{i}")).collect();
    let points: Vec<Point> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| match ids.get(i + 1) {
            Some(next) => point(id, i, 0, &[next.as_str()]),
            None => point(id, i, 0, &[]),
        })
        .collect();

    let mut map = build_line_map(&points_by_step(&points, &story()), |_| false);
    let threads = apply_threads(&mut map);

    assert_eq!(map.len(), LEN);
    assert_eq!(threads, 1, "a straight chain is one thread");
    assert!(
        map.iter()
            .flat_map(|s| s.points.iter())
            .flat_map(|p| p.actions.iter())
            .all(|a| a.thread_id == Some(0))
    );
}

#[test]
fn fork_resumes_after_the_first_branch_is_walked() {
    let points = vec![
        point("root", 0, 0, &["deep", "side"]),
        point("deep", 1, 0, &["deeper"]),
        point("side", 1, 1, &["deeper"]),
        point("deeper", 2, 0, &[]),
    ];
    let map = map_threads(&points_by_step(&points, &story()), |_| false);

    assert_eq!(thread_of(&map, "root", "deep"), Some(0));
    assert_eq!(thread_of(&map, "deep", "deeper"), Some(0));
    assert_eq!(thread_of(&map, "root", "side"), Some(1));
    assert_eq!(thread_of(&map, "side", "deeper"), Some(1));
}
