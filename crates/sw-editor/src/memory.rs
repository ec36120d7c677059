//! In-process [`PointApi`] that emulates the backend.
//!
//! Used by tests and the offline demo. Mirrors the backend's behavior:
//! server-assigned IDs, `createdAt` stamped on creation, partial updates
//! that only touch present fields, "New Action" defaults, and 404 for
//! unknown points. Failures can be injected to exercise error paths.

use crate::api::{ApiError, ApiResult, PointApi};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use sw_core::{Action, CreatePointData, Point, PointId, StoryId, UpdatePointData, UserId};

/// A request received by [`MemoryPointApi`], in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCall {
    List,
    Create(CreatePointData),
    Update(PointId),
    Delete(PointId),
    AddAction(PointId),
}

#[derive(Default)]
struct State {
    stories: HashMap<StoryId, Vec<Point>>,
    calls: Vec<ApiCall>,
    /// Scripted outcomes for upcoming calls; `None` serves the call.
    failures: VecDeque<Option<ApiError>>,
}

pub struct MemoryPointApi {
    user: UserId,
    state: Mutex<State>,
}

impl Default for MemoryPointApi {
    fn default() -> Self {
        Self::new(UserId::intern("local"))
    }
}

impl MemoryPointApi {
    pub fn new(user: UserId) -> Self {
        Self {
            user,
            state: Mutex::new(State::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a point as if it had been persisted earlier.
    pub fn insert(&self, point: Point) {
        self.state()
            .stories
            .entry(point.story_id)
            .or_default()
            .push(point);
    }

    /// Make the next request fail with `error` instead of being served.
    pub fn fail_next(&self, error: ApiError) {
        self.state().failures.push_back(Some(error));
    }

    /// Serve the next request normally. Queued before [`fail_next`](Self::fail_next)
    /// to fail a later request of a multi-request flow.
    pub fn pass_next(&self) {
        self.state().failures.push_back(None);
    }

    /// Requests received so far.
    pub fn calls(&self) -> Vec<ApiCall> {
        self.state().calls.clone()
    }

    /// Current server-side points of a story.
    pub fn points(&self, story: StoryId) -> Vec<Point> {
        self.state().stories.get(&story).cloned().unwrap_or_default()
    }

    /// Record the call and pop an injected failure, if any.
    fn begin(&self, call: ApiCall) -> ApiResult<MutexGuard<'_, State>> {
        let mut state = self.state();
        state.calls.push(call);
        match state.failures.pop_front() {
            Some(Some(error)) => Err(error),
            _ => Ok(state),
        }
    }
}

fn find_mut(points: &mut [Point], id: PointId) -> ApiResult<&mut Point> {
    points
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| ApiError::not_found("point not found"))
}

#[async_trait]
impl PointApi for MemoryPointApi {
    async fn list_points(&self, story: StoryId) -> ApiResult<Vec<Point>> {
        let state = self.begin(ApiCall::List)?;
        Ok(state.stories.get(&story).cloned().unwrap_or_default())
    }

    async fn create_point(&self, story: StoryId, data: CreatePointData) -> ApiResult<Point> {
        let mut state = self.begin(ApiCall::Create(data))?;
        let point = Point {
            id: PointId::with_prefix("point"),
            story_id: story,
            user_id: self.user,
            scene_id: None,
            row: data.row,
            col: data.col,
            actions: Default::default(),
            created_at: Utc::now(),
        };
        state.stories.entry(story).or_default().push(point.clone());
        Ok(point)
    }

    async fn update_point(
        &self,
        story: StoryId,
        id: PointId,
        data: &UpdatePointData,
    ) -> ApiResult<Point> {
        let mut state = self.begin(ApiCall::Update(id))?;
        let points = state.stories.entry(story).or_default();
        let point = find_mut(points, id)?;

        if let Some(scene_id) = data.scene_id {
            point.scene_id = scene_id;
        }
        if let Some(row) = data.row {
            point.row = row;
        }
        if let Some(col) = data.col {
            point.col = col;
        }
        if let Some(actions) = &data.actions {
            point.actions = actions.clone();
        }
        Ok(point.clone())
    }

    async fn delete_point(&self, story: StoryId, id: PointId) -> ApiResult<()> {
        let mut state = self.begin(ApiCall::Delete(id))?;
        let points = state.stories.entry(story).or_default();
        let index = points
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ApiError::not_found("point not found"))?;
        points.remove(index);
        Ok(())
    }

    async fn add_point_action(&self, story: StoryId, id: PointId) -> ApiResult<Action> {
        let mut state = self.begin(ApiCall::AddAction(id))?;
        let points = state.stories.entry(story).or_default();
        let point = find_mut(points, id)?;
        let action = Action::default_new();
        point.actions.push(action.clone());
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story() -> StoryId {
        StoryId::intern("memory-story")
    }

    #[tokio::test]
    async fn create_then_list() {
        let api = MemoryPointApi::default();
        let created = api
            .create_point(story(), CreatePointData { row: 1, col: 2 })
            .await
            .unwrap();
        assert_eq!((created.row, created.col), (1, 2));
        assert!(created.actions.is_empty());

        let listed = api.list_points(story()).await.unwrap();
        assert_eq!(listed, vec![created]);
        assert_eq!(api.calls(), vec![ApiCall::Create(CreatePointData { row: 1, col: 2 }), ApiCall::List]);
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let api = MemoryPointApi::default();
        let p = api
            .create_point(story(), CreatePointData { row: 0, col: 0 })
            .await
            .unwrap();

        let updated = api
            .update_point(story(), p.id, &UpdatePointData::position(2, 3))
            .await
            .unwrap();
        assert_eq!((updated.row, updated.col), (2, 3));
        assert_eq!(updated.created_at, p.created_at);
    }

    #[tokio::test]
    async fn unknown_point_is_not_found() {
        let api = MemoryPointApi::default();
        let err = api
            .delete_point(story(), PointId::intern("missing"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn injected_failure_applies_once() {
        let api = MemoryPointApi::default();
        api.fail_next(ApiError::Transport("offline".into()));
        assert!(api.list_points(story()).await.is_err());
        assert!(api.list_points(story()).await.is_ok());
    }

    #[tokio::test]
    async fn passed_call_defers_the_failure() {
        let api = MemoryPointApi::default();
        api.pass_next();
        api.fail_next(ApiError::Transport("offline".into()));
        assert!(api.list_points(story()).await.is_ok());
        assert!(api.list_points(story()).await.is_err());
        assert!(api.list_points(story()).await.is_ok());
    }

    #[tokio::test]
    async fn new_actions_are_unlinked() {
        let api = MemoryPointApi::default();
        let p = api
            .create_point(story(), CreatePointData { row: 0, col: 0 })
            .await
            .unwrap();
        let action = api.add_point_action(story(), p.id).await.unwrap();
        assert_eq!(action, Action::default_new());
        assert_eq!(api.points(story())[0].actions.len(), 1);
    }
}
