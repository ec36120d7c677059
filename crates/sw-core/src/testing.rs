//! Fixture builders shared by unit tests.

use crate::id::{PointId, SceneId, StoryId, UserId};
use crate::model::{Action, Point, Scene, Story, StoryWithScenes};
use chrono::{DateTime, Utc};

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

pub fn point(id: &str, row: usize, col: usize) -> Point {
    Point {
        id: PointId::intern(id),
        story_id: StoryId::intern("story"),
        user_id: UserId::intern("user"),
        scene_id: None,
        row,
        col,
        actions: Default::default(),
        created_at: epoch(),
    }
}

/// A point whose actions link, in order, to the given targets.
pub fn linked(id: &str, row: usize, col: usize, targets: &[&str]) -> Point {
    let mut p = point(id, row, col);
    p.actions = targets
        .iter()
        .map(|t| Action::linked(format!("to {t}"), PointId::intern(t)))
        .collect();
    p
}

pub fn scene(name: &str) -> Scene {
    Scene {
        id: SceneId::intern(name),
        user_id: UserId::intern("user"),
        story_id: StoryId::intern("story"),
        name: name.to_string(),
        description: String::new(),
        image: String::new(),
        created_at: epoch(),
    }
}

pub fn story(scenes: Vec<Scene>) -> StoryWithScenes {
    StoryWithScenes {
        story: Story {
            id: StoryId::intern("story"),
            user_id: UserId::intern("user"),
            name: "Test Story".to_string(),
            description: String::new(),
            created_at: epoch(),
        },
        scenes,
    }
}
