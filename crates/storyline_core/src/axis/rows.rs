//! Row partition and vertical layout of timeline scenes.
//!
//! # Invariants
//! - Rows always appear in `YEAR, MONTH, WEEK, DAY, HOUR` order.
//! - The visible rows are the prefix up to and including the zoom's
//!   granularity; empty rows in that prefix are still returned.
//! - Only scenes with `stack_index == 0` and a tag are partitioned.

use crate::axis::viewport::Viewport;
use crate::model::granularity::Granularity;
use crate::model::scene::{Scene, SceneId};
use serde::{Deserialize, Serialize};

/// One visible timeline row and the scenes tagged at its granularity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineRow<'a> {
    pub granularity: Granularity,
    /// Index from the top, `0..=4`.
    pub row_index: usize,
    /// Scenes in collection order.
    pub scenes: Vec<&'a Scene>,
}

impl TimelineRow<'_> {
    /// Row header, e.g. `WEEKS`.
    pub fn label(&self) -> &'static str {
        self.granularity.plural_label()
    }
}

/// Groups timeline scenes by their tag granularity and returns the rows
/// visible at `zoom`.
pub fn visible_rows(zoom: Granularity, scenes: &[Scene]) -> Vec<TimelineRow<'_>> {
    zoom.visible_prefix()
        .iter()
        .enumerate()
        .map(|(row_index, granularity)| TimelineRow {
            granularity: *granularity,
            row_index,
            scenes: scenes
                .iter()
                .filter(|scene| {
                    scene
                        .timeline_tag()
                        .is_some_and(|tag| tag.granularity() == *granularity)
                })
                .collect(),
        })
        .collect()
}

/// Vertical sizing of timeline rows in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowLayout {
    /// Top of row 0.
    pub base_offset: i64,
    pub row_height: i64,
    /// Timeline never renders shorter than this.
    pub min_height: i64,
    /// Space below the last row.
    pub bottom_padding: i64,
}

impl Default for RowLayout {
    fn default() -> Self {
        Self {
            base_offset: 60,
            row_height: 120,
            min_height: 300,
            bottom_padding: 60,
        }
    }
}

impl RowLayout {
    /// Top y coordinate of row `row_index`.
    pub fn row_top(&self, row_index: usize) -> i64 {
        let index = i64::try_from(row_index).unwrap_or(i64::MAX);
        self.base_offset
            .saturating_add(index.saturating_mul(self.row_height))
    }

    /// Row index hit by a y coordinate, if it lands on one of `row_count`
    /// visible rows.
    pub fn row_at(&self, y: i64, row_count: usize) -> Option<usize> {
        if self.row_height <= 0 {
            return None;
        }
        let index = (y - self.base_offset).div_euclid(self.row_height);
        usize::try_from(index).ok().filter(|index| *index < row_count)
    }

    /// Total timeline height needed for `row_count` rows.
    pub fn required_height(&self, row_count: usize) -> i64 {
        self.row_top(row_count)
            .saturating_add(self.bottom_padding)
            .max(self.min_height)
    }
}

/// Screen placement of one timeline card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardPlacement {
    pub scene_id: SceneId,
    pub granularity: Granularity,
    /// Axis position re-projected at the viewing zoom.
    pub position: i64,
    /// Viewport-relative x (`position - offset`).
    pub left: i64,
    pub top: i64,
}

/// Computes card placements for every scene in `rows`.
pub fn layout_cards(
    rows: &[TimelineRow<'_>],
    viewport: &Viewport,
    layout: &RowLayout,
) -> Vec<CardPlacement> {
    rows.iter()
        .flat_map(|row| {
            let top = layout.row_top(row.row_index);
            row.scenes.iter().filter_map(move |scene| {
                let tag = scene.timeline_tag()?;
                let position = tag.position_at(viewport.zoom());
                Some(CardPlacement {
                    scene_id: scene.id,
                    granularity: row.granularity,
                    position,
                    left: viewport.viewport_x(position),
                    top,
                })
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{visible_rows, RowLayout};
    use crate::model::granularity::Granularity;
    use crate::model::scene::Scene;
    use crate::model::time_tag::TimeTag;

    fn scenes() -> Vec<Scene> {
        vec![
            Scene::placed(1, "a", "Setup", "YEAR:2003".parse::<TimeTag>().unwrap()),
            Scene::placed(2, "b", "Setup", "DAY:2000-01-08".parse::<TimeTag>().unwrap()),
            Scene::stacked(3, "c", "Setup", 1),
            Scene::placed(4, "d", "Setup", "YEAR:2001".parse::<TimeTag>().unwrap()),
        ]
    }

    #[test]
    fn year_zoom_shows_only_year_row() {
        let scenes = scenes();
        let rows = visible_rows(Granularity::Year, &scenes);
        assert_eq!(rows.len(), 1);
        let ids: Vec<_> = rows[0].scenes.iter().map(|scene| scene.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn empty_rows_in_prefix_are_kept() {
        let scenes = scenes();
        let rows = visible_rows(Granularity::Day, &scenes);
        let shape: Vec<_> = rows
            .iter()
            .map(|row| (row.granularity, row.row_index, row.scenes.len()))
            .collect();
        assert_eq!(
            shape,
            vec![
                (Granularity::Year, 0, 2),
                (Granularity::Month, 1, 0),
                (Granularity::Week, 2, 0),
                (Granularity::Day, 3, 1),
            ]
        );
    }

    #[test]
    fn row_hit_testing_uses_base_offset_and_height() {
        let layout = RowLayout::default();
        assert_eq!(layout.row_top(2), 300);
        assert_eq!(layout.row_at(59, 3), None);
        assert_eq!(layout.row_at(60, 3), Some(0));
        assert_eq!(layout.row_at(179, 3), Some(0));
        assert_eq!(layout.row_at(180, 3), Some(1));
        assert_eq!(layout.row_at(420, 3), None);
    }

    #[test]
    fn required_height_has_a_floor() {
        let layout = RowLayout::default();
        assert_eq!(layout.required_height(1), 300);
        assert_eq!(layout.required_height(5), 720);
    }
}
