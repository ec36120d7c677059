//! Thread mapping: group action edges into visually continuous lines.
//!
//! The renderer draws a line for every linked action. Edges forming one
//! straight path (A → B → C …) share a **thread id** so they can be drawn in
//! one color; every fork starts a new thread.
//!
//! The pass is a depth-first walk over owned line records, never over the
//! store's points:
//!
//! 1. Steps are visited in ascending row order, points in arrival order
//!    within a step. A point becomes a thread root unless it has already
//!    been walked as a source.
//! 2. For each action of a walked point (index order), the edge is taken
//!    only if it has a target, no thread yet, has not been walked from this
//!    point before, and the target exists in the map.
//! 3. The first taken edge of a point reached through a thread continues
//!    that thread. Every other taken edge (all edges of a root, and the
//!    second and later edges of a fork) gets a fresh id.
//! 4. The edge is recorded before its target is walked, so cycles terminate and a
//!    target reached from several predecessors only continues the first
//!    thread that arrives.
//!
//! Thread ids start at 0 on every call. Edges left with `thread_id: None`
//! were skipped (duplicate, already walked, or dangling target).

use crate::grid::PointsByStep;
use crate::id::PointId;
use serde::Serialize;
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

/// A thread identifier, unique within one mapping pass.
pub type ThreadId = u32;

/// A linked action as seen by the line renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedLineAction {
    /// Index of the action within its point.
    pub action_index: usize,
    pub to_point_id: PointId,
    pub thread_id: Option<ThreadId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedLinePoint {
    pub point_id: PointId,
    pub expanded: bool,
    pub actions: SmallVec<[MappedLineAction; 4]>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedLineStep {
    pub step_index: usize,
    pub points: Vec<MappedLinePoint>,
}

/// Reduce grouped points to line records: one step per occupied row, each
/// point carrying only its linked actions.
pub fn build_line_map(
    by_step: &PointsByStep,
    is_expanded: impl Fn(PointId) -> bool,
) -> Vec<MappedLineStep> {
    by_step
        .iter()
        .map(|(&step_index, points)| MappedLineStep {
            step_index,
            points: points
                .iter()
                .map(|p| MappedLinePoint {
                    point_id: p.point.id,
                    expanded: is_expanded(p.point.id),
                    actions: p
                        .point
                        .links()
                        .map(|(action_index, to_point_id)| MappedLineAction {
                            action_index,
                            to_point_id,
                            thread_id: None,
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect()
}

/// Assign thread ids in place. Returns the number of threads allocated.
pub fn apply_threads(map: &mut [MappedLineStep]) -> ThreadId {
    let mut mapper = ThreadMapper::new(map);

    for step in 0..map.len() {
        for point in 0..map[step].points.len() {
            let id = map[step].points[point].point_id;
            if mapper.walked.contains_key(&id) {
                // already walked as part of another thread
                continue;
            }
            mapper.follow(map, (step, point), None);
        }
    }

    mapper.next_thread
}

/// Build the line map and assign threads in one go.
pub fn map_threads(
    by_step: &PointsByStep,
    is_expanded: impl Fn(PointId) -> bool,
) -> Vec<MappedLineStep> {
    let mut map = build_line_map(by_step, is_expanded);
    apply_threads(&mut map);
    map
}

/// Location of a point inside the line map: `(step, point)` indexes.
type Slot = (usize, usize);

struct ThreadMapper {
    lookup: HashMap<PointId, Slot>,
    /// source → targets already walked from it.
    walked: HashMap<PointId, HashSet<PointId>>,
    next_thread: ThreadId,
}

impl ThreadMapper {
    fn new(map: &[MappedLineStep]) -> Self {
        let lookup = map
            .iter()
            .enumerate()
            .flat_map(|(s, step)| {
                step.points
                    .iter()
                    .enumerate()
                    .map(move |(p, point)| (point.point_id, (s, p)))
            })
            .collect();
        Self {
            lookup,
            walked: HashMap::new(),
            next_thread: 0,
        }
    }

    fn allocate(&mut self) -> ThreadId {
        let id = self.next_thread;
        self.next_thread += 1;
        id
    }

    /// Walk every edge reachable from `start`. Depth-first with an explicit
    /// stack: a frame resumes its action loop once the walk below its last
    /// taken edge is finished.
    fn follow(&mut self, map: &mut [MappedLineStep], start: Slot, inbound: Option<ThreadId>) {
        let mut stack = vec![Frame::new(start, inbound)];

        while let Some(frame) = stack.last_mut() {
            let (s, p) = frame.slot;
            let Some(action) = map[s].points[p].actions.get(frame.next_action) else {
                stack.pop();
                continue;
            };
            let a = frame.next_action;
            frame.next_action += 1;
            if action.thread_id.is_some() {
                continue;
            }
            let source = map[s].points[p].point_id;
            let target = action.to_point_id;

            let walked = self.walked.entry(source).or_default();
            if walked.contains(&target) {
                log::trace!("edge {source} -> {target} already walked");
                continue;
            }
            let Some(&next) = self.lookup.get(&target) else {
                log::trace!("edge {source} -> {target} has no target point, skipped");
                continue;
            };
            walked.insert(target);

            let thread = match frame.inbound {
                Some(thread) if !frame.continued => {
                    frame.continued = true;
                    thread
                }
                _ => self.allocate(),
            };
            log::trace!("edge {source} -> {target} on thread {thread}");

            map[s].points[p].actions[a].thread_id = Some(thread);
            stack.push(Frame::new(next, Some(thread)));
        }
    }
}

/// A point being walked, with the position of its action loop.
struct Frame {
    slot: Slot,
    next_action: usize,
    inbound: Option<ThreadId>,
    /// Whether an edge of this point already continued `inbound`.
    continued: bool,
}

impl Frame {
    fn new(slot: Slot, inbound: Option<ThreadId>) -> Self {
        Self {
            slot,
            next_action: 0,
            inbound,
            continued: false,
        }
    }
}
