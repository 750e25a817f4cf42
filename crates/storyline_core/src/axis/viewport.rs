//! Viewport state and zoom-context re-anchoring.
//!
//! # Responsibility
//! - Own `{ zoom, offset, context_date }` for one editor.
//! - Keep the same real-world instant at the left edge across zoom changes.
//!
//! # Invariants
//! - Zoom requests outside `0..=4` are no-ops.
//! - A zoom change commits zoom, offset and context date together or not at
//!   all.
//! - The stored context date is only recomputed from the offset when it no
//!   longer falls inside the unit under the offset (e.g. after panning).

use crate::axis::convert::{
    align_to_boundary, axis_epoch, instant_to_position, instant_to_unit, position_to_instant,
    unit_index, AxisResult,
};
use crate::model::granularity::Granularity;
use chrono::NaiveDateTime;
use log::{debug, info, warn};

/// Result of a committed zoom change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomChange {
    pub zoom: Granularity,
    /// New timeline offset in pixels.
    pub offset: i64,
    /// Aligned instant now anchored at the left edge.
    pub context_date: NaiveDateTime,
}

/// Horizontal viewport over the time axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    zoom: Granularity,
    offset: i64,
    context_date: NaiveDateTime,
}

impl Viewport {
    /// Viewport at `zoom`, offset 0, anchored at the axis epoch.
    pub fn new(zoom: Granularity) -> Self {
        Self {
            zoom,
            offset: 0,
            context_date: axis_epoch(),
        }
    }

    pub fn zoom(&self) -> Granularity {
        self.zoom
    }

    /// Current timeline offset in pixels (position at the left edge).
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Instant the viewport was last anchored to.
    pub fn context_date(&self) -> NaiveDateTime {
        self.context_date
    }

    /// Shifts the offset by `delta_px` (positive scrolls later in time).
    pub fn pan(&mut self, delta_px: i64) {
        self.offset = self.offset.saturating_add(delta_px);
        debug!(
            "event=viewport_pan module=axis offset={} zoom={}",
            self.offset, self.zoom
        );
    }

    /// Converts a viewport-relative x coordinate to an axis position.
    pub fn absolute_position(&self, viewport_x: i64) -> i64 {
        self.offset.saturating_add(viewport_x)
    }

    /// Converts an axis position to a viewport-relative x coordinate.
    pub fn viewport_x(&self, position: i64) -> i64 {
        position.saturating_sub(self.offset)
    }

    /// Changes zoom to `level`, re-anchoring offset and context date.
    ///
    /// Returns `None` and leaves state untouched for levels outside `0..=4`
    /// or when the anchor cannot be represented.
    pub fn change_zoom(&mut self, level: i32) -> Option<ZoomChange> {
        let Some(target) = Granularity::from_zoom_level(level) else {
            debug!("event=zoom_change module=axis status=ignored requested_level={level}");
            return None;
        };

        match self.plan_zoom(target) {
            Ok(change) => {
                info!(
                    "event=zoom_change module=axis status=ok from={} to={} offset={} context={}",
                    self.zoom, change.zoom, change.offset, change.context_date
                );
                self.zoom = change.zoom;
                self.offset = change.offset;
                self.context_date = change.context_date;
                Some(change)
            }
            Err(err) => {
                warn!("event=zoom_change module=axis status=error error={err}");
                None
            }
        }
    }

    /// Steps one level finer. No-op at HOUR.
    pub fn zoom_in(&mut self) -> Option<ZoomChange> {
        self.change_zoom(i32::from(self.zoom.zoom_level()) + 1)
    }

    /// Steps one level coarser. No-op at YEAR.
    pub fn zoom_out(&mut self) -> Option<ZoomChange> {
        self.change_zoom(i32::from(self.zoom.zoom_level()) - 1)
    }

    /// Context date implied by the current offset and zoom.
    pub fn current_context(&self) -> AxisResult<NaiveDateTime> {
        if instant_to_unit(self.context_date, self.zoom) == unit_index(self.offset) {
            return Ok(self.context_date);
        }
        position_to_instant(self.offset, self.zoom)
    }

    fn plan_zoom(&self, target: Granularity) -> AxisResult<ZoomChange> {
        let context = self.current_context()?;
        let aligned = align_to_boundary(context, target)?;
        Ok(ZoomChange {
            zoom: target,
            offset: instant_to_position(aligned, target),
            context_date: aligned,
        })
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Granularity::Week)
    }
}

#[cfg(test)]
mod tests {
    use super::Viewport;
    use crate::model::granularity::Granularity;
    use chrono::NaiveDate;

    #[test]
    fn out_of_range_levels_are_no_ops() {
        let mut viewport = Viewport::new(Granularity::Month);
        viewport.pan(1_250);
        let before = viewport.clone();

        assert_eq!(viewport.change_zoom(5), None);
        assert_eq!(viewport.change_zoom(-1), None);
        assert_eq!(viewport, before);
    }

    #[test]
    fn zoom_steps_stop_at_bounds() {
        let mut viewport = Viewport::new(Granularity::Hour);
        assert_eq!(viewport.zoom_in(), None);
        let mut viewport = Viewport::new(Granularity::Year);
        assert_eq!(viewport.zoom_out(), None);
        assert_eq!(viewport.zoom_in().unwrap().zoom, Granularity::Month);
    }

    #[test]
    fn panning_refreshes_context_from_offset() {
        let mut viewport = Viewport::new(Granularity::Year);
        viewport.pan(500);
        let change = viewport.change_zoom(1).unwrap();
        assert_eq!(
            change.context_date,
            NaiveDate::from_ymd_opt(2005, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
        assert_eq!(change.offset, 6_000);
    }

    #[test]
    fn viewport_coordinates_are_offset_relative() {
        let mut viewport = Viewport::new(Granularity::Day);
        viewport.pan(300);
        assert_eq!(viewport.absolute_position(50), 350);
        assert_eq!(viewport.viewport_x(350), 50);
    }
}
