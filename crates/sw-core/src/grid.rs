//! Grid layout: flat point collection → `step × slot` grid.
//!
//! Points are partitioned by `row` (arrival order kept within a row) and
//! joined with their scene. The dense grid holds `None` for empty cells so
//! the renderer can place "add point" affordances in gaps.

use crate::model::{Point, PointWithScene, StoryWithScenes};
use std::collections::BTreeMap;

/// Lower bound on the number of slots per step shown in the grid.
pub const MIN_STEP_POINTS: usize = 4;

/// Points grouped by step, in arrival order within each step.
pub type PointsByStep = BTreeMap<usize, Vec<PointWithScene>>;

/// Dense `num_steps × num_step_points` grid.
pub type PointsGrid = Vec<Vec<Option<PointWithScene>>>;

/// Group points by row, resolving each point's scene against the story.
pub fn points_by_step(points: &[Point], story: &StoryWithScenes) -> PointsByStep {
    let mut by_step = PointsByStep::new();
    for point in points {
        by_step
            .entry(point.row)
            .or_default()
            .push(PointWithScene::resolve(point, story));
    }
    by_step
}

/// Build the dense grid. Cell `[i][j]` is the first point at `(i, j)`.
pub fn points_grid(by_step: &PointsByStep, num_steps: usize, num_step_points: usize) -> PointsGrid {
    (0..num_steps)
        .map(|row| {
            let step = by_step.get(&row);
            (0..num_step_points)
                .map(|col| {
                    step.and_then(|points| points.iter().find(|p| p.point.col == col))
                        .cloned()
                })
                .collect()
        })
        .collect()
}

/// Points in a given step, in arrival order.
pub fn step_points(points: &[Point], row: usize) -> impl Iterator<Item = &Point> {
    points.iter().filter(move |p| p.row == row)
}

/// Number of steps spanned by the points: `max(1, max(row) + 1)`.
pub fn num_steps_for(points: &[Point]) -> usize {
    points.iter().map(|p| p.row + 1).max().unwrap_or(0).max(1)
}

/// Tallest step among rows `0..num_steps`, never below [`MIN_STEP_POINTS`].
pub fn num_step_points_for(points: &[Point], num_steps: usize, min_step_points: usize) -> usize {
    (0..num_steps)
        .map(|row| step_points(points, row).count())
        .max()
        .unwrap_or(0)
        .max(min_step_points)
}

/// First free column in `row` at or after `min_col`.
///
/// Linear probe over occupied columns; gaps left by deleted points are
/// reused only if the probe reaches them.
pub fn next_col_by_row(points: &[Point], row: usize, min_col: usize) -> usize {
    let mut col = min_col;
    while step_points(points, row).any(|p| p.col == col) {
        col += 1;
    }
    col
}

/// Every point in a later step than `from`, sorted by `(row, col)`.
pub fn future_points(points: &[Point], from: &Point, story: &StoryWithScenes) -> Vec<PointWithScene> {
    let mut future: Vec<PointWithScene> = points
        .iter()
        .filter(|p| p.row > from.row)
        .map(|p| PointWithScene::resolve(p, story))
        .collect();
    future.sort_by_key(|p| (p.point.row, p.point.col));
    future
}
