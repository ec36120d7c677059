pub mod grid;
pub mod id;
pub mod model;
pub mod paginate;
pub mod threads;
pub mod viewport;

#[cfg(test)]
mod testing;

pub use grid::{MIN_STEP_POINTS, PointsByStep, PointsGrid};
pub use id::{PointId, SceneId, StoryId, UserId};
pub use model::*;
pub use paginate::Paginate;
pub use threads::{MappedLineAction, MappedLinePoint, MappedLineStep, ThreadId, map_threads};
pub use viewport::{StepMetrics, repage};
