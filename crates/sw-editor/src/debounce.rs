//! Trailing-edge debouncer for container resize measurements.
//!
//! Resize observers fire continuously while the user drags a window edge.
//! The debouncer keeps only the latest width and releases it once no new
//! measurement has arrived for the quiescence window. Callers pass the
//! clock in, so behavior is deterministic.

use std::time::{Duration, Instant};

/// Default quiescence window for resize events.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    window: Duration,
    pending: Option<(f32, Instant)>,
}

impl Default for ResizeDebouncer {
    fn default() -> Self {
        Self::new(RESIZE_DEBOUNCE)
    }
}

impl ResizeDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Record a measurement, replacing any pending one.
    pub fn push(&mut self, width: f32, at: Instant) {
        self.pending = Some((width, at));
    }

    /// Release the pending width if the window has elapsed since it arrived.
    pub fn poll(&mut self, now: Instant) -> Option<f32> {
        match self.pending {
            Some((width, at)) if now.saturating_duration_since(at) >= self.window => {
                self.pending = None;
                Some(width)
            }
            _ => None,
        }
    }

    /// Instant at which the pending measurement becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(_, at)| at + self.window)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
