//! Story-graph data model.
//!
//! A story is a directed graph of **points** (narrative beats) placed on a
//! `row × col` grid. Each point owns an ordered list of **actions**
//! (choices); an action may link to a downstream point. Action indexes are
//! significant: they identify an action within its point.
//!
//! Field names follow the backend's camelCase JSON representation.

use crate::id::{PointId, SceneId, StoryId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use smallvec::SmallVec;

// ─── Actions ─────────────────────────────────────────────────────────────

/// Label given to actions created through "add action".
pub const DEFAULT_ACTION_TEXT: &str = "New Action";

/// A labeled outgoing choice of a point, optionally linked to a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub text: String,
    /// `None` means the choice is not linked yet. The backend writes an empty
    /// string for fresh actions, which reads back as `None`.
    #[serde(
        default,
        deserialize_with = "deserialize_target",
        skip_serializing_if = "Option::is_none"
    )]
    pub to_point_id: Option<PointId>,
}

impl Action {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            to_point_id: None,
        }
    }

    /// The unlinked action the backend creates on "add action".
    pub fn default_new() -> Self {
        Self::new(DEFAULT_ACTION_TEXT)
    }

    pub fn linked(text: impl Into<String>, to: PointId) -> Self {
        Self {
            text: text.into(),
            to_point_id: Some(to),
        }
    }
}

fn deserialize_target<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<PointId>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()).map(|s| PointId::intern(&s)))
}

/// Actions are usually few per point; keep them inline.
pub type Actions = SmallVec<[Action; 4]>;

// ─── Points ──────────────────────────────────────────────────────────────

/// A node in the story graph.
///
/// At most one point occupies a `(row, col)` cell within a story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub id: PointId,
    pub story_id: StoryId,
    pub user_id: UserId,
    #[serde(default)]
    pub scene_id: Option<SceneId>,
    /// The step (horizontal stage).
    pub row: usize,
    /// Slot within the step.
    pub col: usize,
    #[serde(default)]
    pub actions: Actions,
    pub created_at: DateTime<Utc>,
}

impl Point {
    /// Iterate `(action_index, target)` for every linked action.
    pub fn links(&self) -> impl Iterator<Item = (usize, PointId)> + '_ {
        self.actions
            .iter()
            .enumerate()
            .filter_map(|(i, a)| a.to_point_id.map(|to| (i, to)))
    }
}

/// Body of a point creation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePointData {
    pub row: usize,
    pub col: usize,
}

/// Partial point update. Absent fields are left untouched by the backend.
///
/// `scene_id: Some(None)` sends an explicit `null` to detach the scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePointData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_id: Option<Option<SceneId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Actions>,
}

impl UpdatePointData {
    pub fn actions(actions: Actions) -> Self {
        Self {
            actions: Some(actions),
            ..Self::default()
        }
    }

    pub fn position(row: usize, col: usize) -> Self {
        Self {
            row: Some(row),
            col: Some(col),
            ..Self::default()
        }
    }

    pub fn scene(scene_id: Option<SceneId>) -> Self {
        Self {
            scene_id: Some(scene_id),
            ..Self::default()
        }
    }
}

// ─── Scenes & stories ────────────────────────────────────────────────────

/// A presentational scene that points may reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: SceneId,
    pub user_id: UserId,
    pub story_id: StoryId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: StoryId,
    pub user_id: UserId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A story together with the scenes its points may reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryWithScenes {
    #[serde(flatten)]
    pub story: Story,
    #[serde(default)]
    pub scenes: Vec<Scene>,
}

impl StoryWithScenes {
    pub fn id(&self) -> StoryId {
        self.story.id
    }

    /// Look up a scene by ID.
    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    /// Resolve a point's scene; `None` when unset or unknown.
    pub fn scene_for(&self, point: &Point) -> Option<&Scene> {
        point.scene_id.and_then(|id| self.scene(id))
    }
}

/// A point joined with its resolved scene, as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointWithScene {
    #[serde(flatten)]
    pub point: Point,
    pub scene: Option<Scene>,
}

impl PointWithScene {
    pub fn resolve(point: &Point, story: &StoryWithScenes) -> Self {
        Self {
            point: point.clone(),
            scene: story.scene_for(point).cloned(),
        }
    }
}
