//! Timeline configuration.

use crate::debounce::RESIZE_DEBOUNCE;
use std::time::Duration;
use sw_core::{MIN_STEP_POINTS, StepMetrics};

/// Configuration for [`Timeline`](crate::timeline::Timeline).
///
/// Defaults match the stock editor layout: 150px steps with an 8px gap,
/// one trailing "add step" column, and four slots per step at minimum.
#[derive(Debug, Clone)]
pub struct TimelineConfig {
    /// Step geometry used to derive steps per page from container width.
    pub metrics: StepMetrics,

    /// Columns that always count towards the page total but hold no step.
    pub static_items: usize,

    /// `num_steps` before the first load.
    pub initial_num_steps: usize,

    /// `num_step_points` before the first load.
    pub initial_num_step_points: usize,

    /// Lower bound for `num_step_points` after a recount.
    pub min_step_points: usize,

    /// Quiescence window applied to resize measurements.
    pub resize_debounce: Duration,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            metrics: StepMetrics::default(),
            static_items: 1,
            initial_num_steps: 4,
            initial_num_step_points: 3,
            min_step_points: MIN_STEP_POINTS,
            resize_debounce: RESIZE_DEBOUNCE,
        }
    }
}

impl TimelineConfig {
    pub fn with_step_width(mut self, step_width: f32) -> Self {
        self.metrics.step_width = step_width;
        self
    }
}
