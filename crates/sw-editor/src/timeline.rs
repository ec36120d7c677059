//! Timeline controller: the point store plus the views derived from it.
//!
//! The timeline holds the authoritative point collection of one story and
//! keeps it in step with the backend:
//!
//! - **Store → Backend**: every mutation is one [`PointApi`] round trip. The
//!   backend's response replaces the local copy; nothing is merged
//!   optimistically. A failed call leaves local state untouched.
//!
//! - **Store → Renderer**: the grid, the thread map and the pagination window
//!   are pure projections of the store. They are recomputed on read; the
//!   thread map is memoized against a revision counter that every state
//!   change bumps.
//!
//! Mutations take `&mut self`, so a reader always observes either the state
//! before a call or the state after it completed.

use crate::api::PointApi;
use crate::config::TimelineConfig;
use crate::debounce::ResizeDebouncer;
use crate::error::{TimelineError, TimelineResult};
use std::time::Instant;
use sw_core::grid::{self, PointsByStep, PointsGrid};
use sw_core::threads::{MappedLineStep, map_threads};
use sw_core::{
    Action, CreatePointData, Paginate, Point, PointId, PointWithScene, StoryWithScenes,
    UpdatePointData, repage,
};

pub struct Timeline<A: PointApi> {
    api: A,
    story: StoryWithScenes,
    config: TimelineConfig,

    /// Canonical point collection (arrival order).
    points: Vec<Point>,

    num_steps: usize,
    num_step_points: usize,
    steps_per_page: usize,
    /// 1-based.
    page: usize,

    /// Points whose action list is unfolded in the renderer.
    expanded: Vec<PointId>,

    resize: ResizeDebouncer,

    /// Bumped on every state change.
    revision: u64,
    /// Thread map and the revision it was computed at.
    line_map: Option<(u64, Vec<MappedLineStep>)>,
}

impl<A: PointApi> Timeline<A> {
    pub fn new(api: A, story: StoryWithScenes) -> Self {
        Self::with_config(api, story, TimelineConfig::default())
    }

    pub fn with_config(api: A, story: StoryWithScenes, config: TimelineConfig) -> Self {
        Self {
            api,
            story,
            num_steps: config.initial_num_steps,
            num_step_points: config.initial_num_step_points,
            steps_per_page: 0,
            page: 1,
            expanded: Vec::new(),
            resize: ResizeDebouncer::new(config.resize_debounce),
            config,
            points: Vec::new(),
            revision: 0,
            line_map: None,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn story(&self) -> &StoryWithScenes {
        &self.story
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn point(&self, id: PointId) -> Option<&Point> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    pub fn num_step_points(&self) -> usize {
        self.num_step_points
    }

    pub fn steps_per_page(&self) -> usize {
        self.steps_per_page
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn recount_steps(&mut self) {
        self.num_steps = grid::num_steps_for(&self.points);
    }

    fn recount_step_points(&mut self) {
        self.num_step_points =
            grid::num_step_points_for(&self.points, self.num_steps, self.config.min_step_points);
    }

    fn require(&self, id: PointId) -> TimelineResult<&Point> {
        self.point(id).ok_or(TimelineError::PointNotFound(id))
    }

    // ─── Loading ─────────────────────────────────────────────────────────

    /// Load the story's points and make sure the graph has a root.
    pub async fn init(&mut self) -> TimelineResult<()> {
        self.load_points().await?;
        self.ensure_initial_point().await?;
        Ok(())
    }

    /// Replace the local collection with the backend's and recount steps.
    pub async fn load_points(&mut self) -> TimelineResult<()> {
        let story = self.story.id();
        let points = self.api.list_points(story).await?;
        log::debug!("loaded {} points for story {story}", points.len());

        self.points = points;
        self.recount_steps();
        self.recount_step_points();
        self.touch();
        Ok(())
    }

    /// Create a point at `(0, 0)` if the story has none.
    pub async fn ensure_initial_point(&mut self) -> TimelineResult<Option<Point>> {
        if !self.points.is_empty() {
            return Ok(None);
        }
        let point = self.create_point(CreatePointData { row: 0, col: 0 }).await?;
        Ok(Some(point))
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Create a point and append the backend's copy.
    ///
    /// Step counts are left as they are; callers placing a point in a new
    /// step call [`add_step`](Self::add_step) first.
    pub async fn create_point(&mut self, data: CreatePointData) -> TimelineResult<Point> {
        let point = self.api.create_point(self.story.id(), data).await?;
        log::debug!("created point {} at ({}, {})", point.id, point.row, point.col);

        self.points.push(point.clone());
        self.touch();
        Ok(point)
    }

    /// Apply a partial update and overwrite the local point with the
    /// backend's representation. Only `num_step_points` is recounted.
    pub async fn update_point(
        &mut self,
        id: PointId,
        data: UpdatePointData,
    ) -> TimelineResult<Point> {
        self.require(id)?;
        let point = self.api.update_point(self.story.id(), id, &data).await?;

        if let Some(slot) = self.points.iter_mut().find(|p| p.id == id) {
            *slot = point.clone();
        }
        self.recount_step_points();
        self.touch();
        log::debug!("updated point {id}");
        Ok(point)
    }

    /// Delete a point. Only `num_step_points` is recounted.
    pub async fn delete_point(&mut self, id: PointId) -> TimelineResult<()> {
        self.require(id)?;
        self.api.delete_point(self.story.id(), id).await?;

        self.points.retain(|p| p.id != id);
        self.expanded.retain(|e| *e != id);
        self.recount_step_points();
        self.touch();
        log::debug!("deleted point {id}");
        Ok(())
    }

    /// Append a new unlinked action to a point.
    ///
    /// An unknown point fails before any request. A failed request is
    /// logged and yields `Ok(None)` so the rest of the graph view stays
    /// usable.
    pub async fn add_point_action(&mut self, id: PointId) -> TimelineResult<Option<Action>> {
        self.require(id)?;

        let action = match self.api.add_point_action(self.story.id(), id).await {
            Ok(action) => action,
            Err(err) => {
                log::error!("failed to add action to point {id}: {err}");
                return Ok(None);
            }
        };

        if let Some(point) = self.points.iter_mut().find(|p| p.id == id) {
            point.actions.push(action.clone());
        }
        self.touch();
        Ok(Some(action))
    }

    /// Create a point in the step after `point_id` and link the given action
    /// to it. Grows the timeline by one step when needed.
    pub async fn create_point_and_attach_to_action(
        &mut self,
        point_id: PointId,
        action_index: usize,
    ) -> TimelineResult<Point> {
        let source = self.require(point_id)?.clone();
        if action_index >= source.actions.len() {
            return Err(TimelineError::ActionNotFound {
                point: point_id,
                index: action_index,
            });
        }

        let next_row = source.row + 1;
        if next_row + 1 > self.num_steps {
            self.add_step();
        }

        let col = self.next_col_by_row(next_row, source.col);
        let created = self
            .create_point(CreatePointData { row: next_row, col })
            .await?;

        let mut actions = source.actions;
        actions[action_index].to_point_id = Some(created.id);
        self.update_point(point_id, UpdatePointData::actions(actions))
            .await?;

        Ok(created)
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// Points in one step, in arrival order.
    pub fn points_by_step(&self, row: usize) -> Vec<&Point> {
        grid::step_points(&self.points, row).collect()
    }

    /// First unoccupied column in `row`, probing upward from `min_col`.
    pub fn next_col_by_row(&self, row: usize, min_col: usize) -> usize {
        grid::next_col_by_row(&self.points, row, min_col)
    }

    /// Points in later steps than `point`, sorted by `(row, col)`.
    pub fn future_points(&self, point: &Point) -> Vec<PointWithScene> {
        grid::future_points(&self.points, point, &self.story)
    }

    /// All points grouped by step and joined with their scenes.
    pub fn step_map(&self) -> PointsByStep {
        grid::points_by_step(&self.points, &self.story)
    }

    /// Dense `num_steps × num_step_points` grid.
    pub fn points_grid(&self) -> PointsGrid {
        grid::points_grid(&self.step_map(), self.num_steps, self.num_step_points)
    }

    /// Line records with thread ids, covering every point regardless of the
    /// visible window. Recomputed only when the state changed.
    pub fn point_lines_map(&mut self) -> &[MappedLineStep] {
        let revision = self.revision;
        let stale = !matches!(&self.line_map, Some((at, _)) if *at == revision);
        if stale {
            let expanded = &self.expanded;
            let map = map_threads(&self.step_map(), |id| expanded.contains(&id));
            log::trace!("recomputed thread map at revision {revision}");
            self.line_map = Some((revision, map));
        }
        match &self.line_map {
            Some((_, map)) => map,
            None => &[],
        }
    }

    // ─── Expansion ───────────────────────────────────────────────────────

    pub fn set_point_expanded(&mut self, id: PointId, expanded: bool) {
        let index = self.expanded.iter().position(|e| *e == id);
        match (expanded, index) {
            (true, None) => self.expanded.push(id),
            (false, Some(i)) => {
                self.expanded.remove(i);
            }
            _ => return,
        }
        self.touch();
    }

    pub fn is_point_expanded(&self, id: PointId) -> bool {
        self.expanded.contains(&id)
    }

    // ─── Steps & pages ───────────────────────────────────────────────────

    pub fn add_step(&mut self) {
        self.num_steps += 1;
        self.touch();
    }

    pub fn paginate(&self) -> Paginate {
        Paginate::new(self.page, self.steps_per_page, self.num_steps)
            .with_static_items(self.config.static_items)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn pages(&self) -> usize {
        self.paginate().pages()
    }

    /// Steps the renderer should mount.
    pub fn visible_item_indexes(&self) -> Vec<usize> {
        self.paginate().visible_item_indexes()
    }

    /// Jump to a page, clamped to `1..=pages`.
    pub fn set_page(&mut self, page: usize) {
        let page = page.clamp(1, self.pages());
        if page != self.page {
            self.page = page;
            self.touch();
        }
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    // ─── Viewport ────────────────────────────────────────────────────────

    /// Apply a container width immediately.
    ///
    /// When the number of fitting steps changes, the page is re-derived so
    /// the first visible step stays roughly in place.
    pub fn resize(&mut self, container_width: f32) {
        let per_page = self.config.metrics.steps_per_page(container_width);
        if per_page == self.steps_per_page {
            return;
        }

        let prev_offset = self.paginate().offset();
        self.steps_per_page = per_page;
        self.page = repage(prev_offset, per_page);
        self.touch();
        log::debug!(
            "container {container_width}px fits {per_page} steps, page {}",
            self.page
        );
    }

    /// Record a resize measurement; it is applied by
    /// [`flush_resize`](Self::flush_resize) once resizing has settled.
    pub fn observe_resize(&mut self, container_width: f32, at: Instant) {
        self.resize.push(container_width, at);
    }

    /// Apply the latest settled measurement, if any. Returns whether one
    /// was applied.
    pub fn flush_resize(&mut self, now: Instant) -> bool {
        match self.resize.poll(now) {
            Some(width) => {
                self.resize(width);
                true
            }
            None => false,
        }
    }

    /// When the pending measurement becomes due.
    pub fn resize_deadline(&self) -> Option<Instant> {
        self.resize.deadline()
    }
}
