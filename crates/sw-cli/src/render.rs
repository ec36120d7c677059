//! Plain-text rendering of timeline views.
//!
//! Layout mirrors the editor: one column per visible step, one line per
//! slot. Threads are listed per edge below the grid.

use std::fmt::Write;
use sw_core::{MappedLineStep, PointsGrid};

/// Width of one rendered cell, in characters.
const CELL: usize = 18;

pub struct View<'a> {
    pub grid: &'a PointsGrid,
    pub visible: &'a [usize],
    pub page: usize,
    pub pages: usize,
    pub lines: &'a [MappedLineStep],
}

pub fn render(view: &View<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "page {}/{}", view.page, view.pages);

    if view.visible.is_empty() {
        out.push_str("(no steps fit the viewport)\n");
        return out;
    }

    for &step in view.visible {
        let _ = write!(out, "{:<width$}", format!("step {step}"), width = CELL);
    }
    out.push('\n');

    let slots = view
        .visible
        .iter()
        .filter_map(|&s| view.grid.get(s))
        .map(Vec::len)
        .max()
        .unwrap_or(0);

    for slot in 0..slots {
        for &step in view.visible {
            let cell = view
                .grid
                .get(step)
                .and_then(|row| row.get(slot))
                .and_then(Option::as_ref);
            let label = match cell {
                Some(p) => {
                    let scene = p.scene.as_ref().map(|s| s.name.as_str()).unwrap_or("-");
                    truncate(&format!("{} [{}]", p.point.id, scene), CELL - 1)
                }
                None => "·".to_string(),
            };
            let _ = write!(out, "{label:<width$}", width = CELL);
        }
        out.push('\n');
    }

    out.push_str("\nthreads:\n");
    for step in view.lines {
        for point in &step.points {
            for action in &point.actions {
                let thread = action
                    .thread_id
                    .map_or_else(|| "-".to_string(), |t| t.to_string());
                let _ = writeln!(
                    out,
                    "  {} #{} -> {}  thread {thread}",
                    point.point_id, action.action_index, action.to_point_id
                );
            }
        }
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
