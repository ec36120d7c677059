//! Error types for timeline operations.

use crate::api::ApiError;
use sw_core::PointId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimelineError {
    /// A remote call failed. Local state is left as it was before the call.
    #[error(transparent)]
    Remote(#[from] ApiError),

    /// The operation named a point that is not in the local collection.
    /// Raised before any request is sent.
    #[error("point not found: {0}")]
    PointNotFound(PointId),

    /// The point exists but has no action at the given index.
    #[error("point {point} has no action at index {index}")]
    ActionNotFound { point: PointId, index: usize },
}

pub type TimelineResult<T> = Result<T, TimelineError>;
