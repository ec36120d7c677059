//! HTTP implementation of [`PointApi`] over `reqwest`.
//!
//! Routes and envelopes:
//!
//! | Call | Route | Response |
//! |------|-------|----------|
//! | list | `GET /story/{story}/point` | `{ rows: Point[] }` |
//! | create | `POST /story/{story}/point` | `{ row: Point }` |
//! | update | `PUT /story/{story}/point/{id}` | `{ row: Point }` |
//! | delete | `DELETE /story/{story}/point/{id}` | ignored |
//! | add action | `POST /story/{story}/point/{id}/action` | `{ row: Action }` |
//!
//! [`HttpPointApi::get_story`] additionally reads `GET /story/{story}`
//! (`{ row: StoryWithScenes }`) so callers can resolve point scenes.

use crate::api::{ApiError, ApiResult, PointApi};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use sw_core::{
    Action, CreatePointData, Point, PointId, StoryId, StoryWithScenes, UpdatePointData,
};

#[derive(Deserialize)]
struct Rows<T> {
    rows: Vec<T>,
}

#[derive(Deserialize)]
struct Row<T> {
    row: T,
}

/// Point API client bound to one API root, e.g. `https://host/api`.
#[derive(Debug, Clone)]
pub struct HttpPointApi {
    client: reqwest::Client,
    base: String,
}

impl HttpPointApi {
    /// Client for an API root URL. Trailing slashes are ignored.
    pub fn new(api_base: &str) -> Self {
        Self::with_client(reqwest::Client::new(), api_base)
    }

    /// Client for a server origin; requests go to `{origin}/api/...`.
    pub fn for_server(origin: &str) -> Self {
        Self::new(&format!("{}/api", origin.trim_end_matches('/')))
    }

    pub fn with_client(client: reqwest::Client, api_base: &str) -> Self {
        Self {
            client,
            base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Fetch a story together with its scenes.
    pub async fn get_story(&self, story: StoryId) -> ApiResult<StoryWithScenes> {
        let url = format!("{}/story/{story}", self.base);
        let body: Row<StoryWithScenes> = self.send_json(self.client.get(url)).await?;
        Ok(body.row)
    }

    fn points_url(&self, story: StoryId) -> String {
        format!("{}/story/{story}/point", self.base)
    }

    fn point_url(&self, story: StoryId, id: PointId) -> String {
        format!("{}/story/{story}/point/{id}", self.base)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> ApiResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        log::debug!("point API returned {status}: {message}");
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> ApiResult<T> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl PointApi for HttpPointApi {
    async fn list_points(&self, story: StoryId) -> ApiResult<Vec<Point>> {
        let body: Rows<Point> = self
            .send_json(self.client.get(self.points_url(story)))
            .await?;
        Ok(body.rows)
    }

    async fn create_point(&self, story: StoryId, data: CreatePointData) -> ApiResult<Point> {
        let body: Row<Point> = self
            .send_json(self.client.post(self.points_url(story)).json(&data))
            .await?;
        Ok(body.row)
    }

    async fn update_point(
        &self,
        story: StoryId,
        id: PointId,
        data: &UpdatePointData,
    ) -> ApiResult<Point> {
        let body: Row<Point> = self
            .send_json(self.client.put(self.point_url(story, id)).json(data))
            .await?;
        Ok(body.row)
    }

    async fn delete_point(&self, story: StoryId, id: PointId) -> ApiResult<()> {
        self.send(self.client.delete(self.point_url(story, id)))
            .await?;
        Ok(())
    }

    async fn add_point_action(&self, story: StoryId, id: PointId) -> ApiResult<Action> {
        let url = format!("{}/action", self.point_url(story, id));
        let body: Row<Action> = self.send_json(self.client.post(url)).await?;
        Ok(body.row)
    }
}
