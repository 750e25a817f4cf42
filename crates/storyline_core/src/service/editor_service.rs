//! Story editor use-case service.
//!
//! # Responsibility
//! - Own the editor aggregate: scenes, categories, reset snapshot, viewport
//!   and the in-flight drag.
//! - Expose drag/drop as request/response calls (`begin_drag`,
//!   `resolve_drop`, `commit_placement`).
//! - Replace the scene collection wholesale on import and reset.
//!
//! # Invariants
//! - Every mutation runs to completion on `&mut self`; imports are therefore
//!   serialized by the borrow checker.
//! - Failed imports and resets leave scenes and categories unchanged.
//! - Drops without a dragged scene are ignored.
//! - Loglines are user content and never logged.

use crate::axis::convert::{position_to_tag, position_to_tag_for_row, AxisError, AxisResult};
use crate::axis::rows::{layout_cards, visible_rows, CardPlacement, RowLayout, TimelineRow};
use crate::axis::ruler::{ruler_markers, RulerMarker};
use crate::axis::viewport::{Viewport, ZoomChange};
use crate::config::EditorConfig;
use crate::exchange::markdown::{export_markdown, parse_markdown, ImportError};
use crate::exchange::sink::{deliver_with_fallback, ExportOutcome, ExportSink};
use crate::model::category::{CategoryPalette, CategorySet};
use crate::model::granularity::Granularity;
use crate::model::scene::{Scene, SceneId};
use crate::model::time_tag::TimeTag;
use crate::repo::scene_repo::{MemorySceneRepository, RepoError, SceneRepository};
use crate::service::placement::{self, stack_order};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for editor use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// Scene collection failure (unknown id, invalid scene).
    Repo(RepoError),
    /// Position or instant outside the calendar.
    Axis(AxisError),
    /// Import rejected; collection unchanged.
    Import(ImportError),
}

impl Display for EditorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Axis(err) => write!(f, "{err}"),
            Self::Import(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EditorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Axis(err) => Some(err),
            Self::Import(err) => Some(err),
        }
    }
}

impl From<RepoError> for EditorError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<AxisError> for EditorError {
    fn from(value: AxisError) -> Self {
        Self::Axis(value)
    }
}

impl From<ImportError> for EditorError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

/// Summary of a successful import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub scene_count: usize,
    /// Categories that were not known before the import.
    pub new_categories: Vec<String>,
    pub invalid_tags: usize,
    /// Timeline scenes without a usable time that were moved to the stack.
    pub restacked: usize,
}

impl ImportSummary {
    /// User-facing notice.
    pub fn notice(&self) -> String {
        format!("Successfully imported {} scenes!", self.scene_count)
    }
}

/// Story editor facade over a scene repository.
pub struct EditorService<R: SceneRepository = MemorySceneRepository> {
    repo: R,
    categories: CategorySet,
    palette: CategoryPalette,
    snapshot: Vec<Scene>,
    viewport: Viewport,
    layout: RowLayout,
    fallback_category: String,
    export_title: String,
    dragged: Option<SceneId>,
}

impl EditorService<MemorySceneRepository> {
    /// Creates an editor seeded with the config's starter scenes.
    pub fn from_config(config: &EditorConfig) -> Result<Self, EditorError> {
        let repo = MemorySceneRepository::try_from_scenes(config.seed_collection())?;
        Ok(Self::new(repo, config))
    }
}

impl<R: SceneRepository> EditorService<R> {
    /// Creates an editor over `repo`; its current scenes become the reset
    /// snapshot.
    pub fn new(repo: R, config: &EditorConfig) -> Self {
        let snapshot = repo.scenes().to_vec();
        info!(
            "event=editor_init module=editor status=ok scenes={} zoom={}",
            snapshot.len(),
            config.initial_granularity()
        );
        Self {
            repo,
            categories: CategorySet::from_names(config.categories.iter().map(|style| &style.name)),
            palette: config.palette(),
            snapshot,
            viewport: Viewport::new(config.initial_granularity()),
            layout: config.row_layout,
            fallback_category: config.fallback_category.clone(),
            export_title: config.export_title.clone(),
            dragged: None,
        }
    }

    pub fn scenes(&self) -> &[Scene] {
        self.repo.scenes()
    }

    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.repo.get(id)
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn row_layout(&self) -> &RowLayout {
        &self.layout
    }

    /// Display color of a category (fallback color when unknown).
    pub fn color_for(&self, category: &str) -> &str {
        self.palette.color_for(category)
    }

    /// Stacked scenes, front first.
    pub fn stack(&self) -> Vec<&Scene> {
        stack_order(self.repo.scenes())
    }

    /// Rows visible at the current zoom.
    pub fn visible_rows(&self) -> Vec<TimelineRow<'_>> {
        visible_rows(self.viewport.zoom(), self.repo.scenes())
    }

    /// Card placements for the visible rows.
    pub fn card_layout(&self) -> Vec<CardPlacement> {
        layout_cards(&self.visible_rows(), &self.viewport, &self.layout)
    }

    /// Ruler markers for a viewport `width` pixels wide.
    pub fn ruler(&self, width: i64) -> Vec<RulerMarker> {
        ruler_markers(self.viewport.offset(), width, self.viewport.zoom())
    }

    /// Timeline height needed for the visible rows.
    pub fn timeline_height(&self) -> i64 {
        self.layout
            .required_height(self.viewport.zoom().visible_prefix().len())
    }

    /// Adds a scene to the back of the stack.
    ///
    /// `category` defaults to the first known category. Blank loglines are
    /// rejected by scene validation.
    pub fn add_scene(
        &mut self,
        logline: &str,
        category: Option<&str>,
    ) -> Result<SceneId, EditorError> {
        let category = category
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .or_else(|| self.categories.first())
            .unwrap_or(self.fallback_category.as_str())
            .to_string();
        let id = self.repo.next_id();
        let stack_index = placement::next_stack_index(self.repo.scenes());
        let scene = Scene::stacked(id, logline.trim(), category, stack_index);
        let id = self.repo.insert(scene)?;
        info!("event=scene_added module=editor scene_id={id} stack_index={stack_index}");
        Ok(id)
    }

    /// Adds a category; blank or known names are ignored.
    pub fn add_category(&mut self, name: &str) -> bool {
        let added = self.categories.insert(name);
        debug!(
            "event=category_add module=editor added={added} total={}",
            self.categories.len()
        );
        added
    }

    /// Reassigns the category of scene `id`.
    pub fn set_scene_category(&mut self, id: SceneId, category: &str) -> Result<(), EditorError> {
        let scene = self.repo.get_mut(id)?;
        scene.category = category.trim().to_string();
        Ok(())
    }

    /// Starts dragging scene `id`.
    pub fn begin_drag(&mut self, id: SceneId) -> Result<(), EditorError> {
        if self.repo.get(id).is_none() {
            return Err(RepoError::NotFound(id).into());
        }
        self.dragged = Some(id);
        debug!("event=drag_begin module=editor scene_id={id}");
        Ok(())
    }

    pub fn cancel_drag(&mut self) {
        self.dragged = None;
    }

    pub fn dragged_scene(&self) -> Option<SceneId> {
        self.dragged
    }

    /// Row granularity under a viewport y coordinate, if any.
    pub fn row_at(&self, y: i64) -> Option<Granularity> {
        let visible = self.viewport.zoom().visible_prefix();
        self.layout
            .row_at(y, visible.len())
            .map(|index| visible[index])
    }

    /// Resolves a drop at axis `position`.
    ///
    /// With a target row the tag takes that row's granularity; without one
    /// it is generated at the current zoom.
    pub fn resolve_drop(
        &self,
        position: i64,
        target_row: Option<Granularity>,
    ) -> AxisResult<TimeTag> {
        let zoom = self.viewport.zoom();
        match target_row {
            Some(target) => position_to_tag_for_row(position, zoom, target),
            None => position_to_tag(position, zoom),
        }
    }

    /// Resolves a drop at viewport coordinates `(x, y)`.
    pub fn resolve_drop_point(&self, x: i64, y: i64) -> AxisResult<TimeTag> {
        self.resolve_drop(self.viewport.absolute_position(x), self.row_at(y))
    }

    /// Places scene `id` on the timeline at `tag`.
    pub fn commit_placement(&mut self, id: SceneId, tag: TimeTag) -> Result<(), EditorError> {
        placement::place_on_timeline(self.repo.scenes_mut(), id, tag)?;
        info!("event=scene_placed module=editor scene_id={id} tag={tag}");
        Ok(())
    }

    /// Drops the dragged scene on the timeline.
    ///
    /// Returns `Ok(None)` when nothing is being dragged.
    pub fn drop_on_timeline(
        &mut self,
        position: i64,
        target_row: Option<Granularity>,
    ) -> Result<Option<TimeTag>, EditorError> {
        let Some(id) = self.dragged else {
            debug!("event=drop_ignored module=editor target=timeline");
            return Ok(None);
        };
        let tag = self.resolve_drop(position, target_row)?;
        self.commit_placement(id, tag)?;
        self.dragged = None;
        Ok(Some(tag))
    }

    /// Drops the dragged scene on the back of the stack.
    ///
    /// Returns the new stack index, or `Ok(None)` when nothing is dragged.
    pub fn drop_on_stack(&mut self) -> Result<Option<u32>, EditorError> {
        let Some(id) = self.dragged else {
            debug!("event=drop_ignored module=editor target=stack");
            return Ok(None);
        };
        let stack_index = placement::move_to_stack(self.repo.scenes_mut(), id)?;
        self.dragged = None;
        info!("event=scene_stacked module=editor scene_id={id} stack_index={stack_index}");
        Ok(Some(stack_index))
    }

    /// Sends the front stack card to the back.
    pub fn cycle_stack(&mut self) -> Option<SceneId> {
        let cycled = placement::cycle_stack(self.repo.scenes_mut());
        if let Some(id) = cycled {
            debug!("event=stack_cycled module=editor scene_id={id}");
        }
        cycled
    }

    /// Restores the scene collection captured at construction.
    pub fn reset(&mut self) -> Result<(), EditorError> {
        self.repo.replace_all(self.snapshot.clone())?;
        self.dragged = None;
        info!(
            "event=editor_reset module=editor status=ok scenes={}",
            self.snapshot.len()
        );
        Ok(())
    }

    /// Changes zoom to `level` with context re-anchoring.
    pub fn change_zoom(&mut self, level: i32) -> Option<ZoomChange> {
        self.viewport.change_zoom(level)
    }

    pub fn zoom_in(&mut self) -> Option<ZoomChange> {
        self.viewport.zoom_in()
    }

    pub fn zoom_out(&mut self) -> Option<ZoomChange> {
        self.viewport.zoom_out()
    }

    pub fn pan(&mut self, delta_px: i64) {
        self.viewport.pan(delta_px);
    }

    /// Renders the current collection as a markdown document.
    pub fn export_markdown(&self) -> String {
        export_markdown(&self.export_title, self.repo.scenes())
    }

    /// Exports to `primary`, degrading to `fallback` on failure.
    pub fn export_to(
        &self,
        primary: &mut dyn ExportSink,
        fallback: &mut dyn ExportSink,
    ) -> ExportOutcome {
        deliver_with_fallback(&self.export_markdown(), primary, fallback)
    }

    /// Replaces scenes with the document's scenes and merges categories.
    pub fn import_markdown(&mut self, content: &str) -> Result<ImportSummary, EditorError> {
        let imported = match parse_markdown(content, &self.fallback_category) {
            Ok(imported) => imported,
            Err(err) => {
                warn!("event=import_rejected module=editor status=error error={err}");
                return Err(err.into());
            }
        };

        let new_categories: Vec<String> = imported
            .categories
            .iter()
            .filter(|name| !self.categories.contains(name.as_str()))
            .cloned()
            .collect();
        let scene_count = imported.scenes.len();

        self.repo.replace_all(imported.scenes)?;
        self.categories = self.categories.union(&imported.categories);
        self.dragged = None;

        info!(
            "event=import_applied module=editor status=ok scenes={} new_categories={} invalid_tags={} restacked={}",
            scene_count,
            new_categories.len(),
            imported.invalid_tags,
            imported.restacked
        );
        Ok(ImportSummary {
            scene_count,
            new_categories,
            invalid_tags: imported.invalid_tags,
            restacked: imported.restacked,
        })
    }
}
