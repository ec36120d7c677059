//! Story timeline editor engine.
//!
//! [`Timeline`] owns a story's points, keeps them in sync with the backend
//! through a [`PointApi`], and derives the views the timeline renderer
//! consumes: the step grid, the thread map, and the pagination window.

pub mod api;
pub mod config;
pub mod debounce;
pub mod error;
pub mod http;
pub mod memory;
pub mod timeline;

pub use api::{ApiError, ApiResult, PointApi};
pub use config::TimelineConfig;
pub use error::{TimelineError, TimelineResult};
pub use http::HttpPointApi;
pub use memory::MemoryPointApi;
pub use timeline::Timeline;
