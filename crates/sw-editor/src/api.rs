//! Remote point API seam.
//!
//! The timeline talks to the backend only through [`PointApi`]. Every call
//! is one request/response round trip, and the response is taken as ground
//! truth for the affected point or action.

use async_trait::async_trait;
use sw_core::{Action, CreatePointData, Point, PointId, StoryId, UpdatePointData};
use thiserror::Error;

/// Failure of a remote call.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response (connection, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::Status {
            status: 404,
            message: what.into(),
        }
    }

    /// Whether the backend reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// CRUD operations on a story's points.
#[async_trait]
pub trait PointApi: Send + Sync {
    /// `GET /story/{story}/point`
    async fn list_points(&self, story: StoryId) -> ApiResult<Vec<Point>>;

    /// `POST /story/{story}/point`
    async fn create_point(&self, story: StoryId, data: CreatePointData) -> ApiResult<Point>;

    /// `PUT /story/{story}/point/{id}`
    async fn update_point(
        &self,
        story: StoryId,
        id: PointId,
        data: &UpdatePointData,
    ) -> ApiResult<Point>;

    /// `DELETE /story/{story}/point/{id}`
    async fn delete_point(&self, story: StoryId, id: PointId) -> ApiResult<()>;

    /// `POST /story/{story}/point/{id}/action`
    async fn add_point_action(&self, story: StoryId, id: PointId) -> ApiResult<Action>;
}
