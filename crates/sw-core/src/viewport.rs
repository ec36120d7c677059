//! Step viewport arithmetic: how many steps fit a container, and which page
//! keeps the scroll position when that number changes.

/// Horizontal step geometry, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepMetrics {
    pub step_width: f32,
    pub gap_x: f32,
}

impl Default for StepMetrics {
    fn default() -> Self {
        Self {
            step_width: 150.0,
            gap_x: 8.0,
        }
    }
}

impl StepMetrics {
    /// Number of whole steps that fit in `container_width`.
    pub fn steps_per_page(&self, container_width: f32) -> usize {
        let per_page = ((container_width - self.gap_x) / (self.step_width + self.gap_x)).floor();
        if per_page.is_finite() && per_page > 0.0 {
            per_page as usize
        } else {
            0
        }
    }
}

/// Page to show after the page size changes, keeping roughly the same
/// first visible step.
pub fn repage(prev_offset: usize, new_per_page: usize) -> usize {
    if new_per_page == 0 {
        return 1;
    }
    prev_offset.div_ceil(new_per_page).max(1)
}
