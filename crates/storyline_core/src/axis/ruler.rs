//! Ruler markers drawn along the top of the timeline.

use crate::axis::convert::{unit_index, unit_position, unit_start_instant, UNIT_WIDTH_PX};
use crate::model::granularity::Granularity;
use crate::model::time_tag::{twelve_hour_label, MONTH_NAMES};
use chrono::{Datelike, NaiveDateTime, Timelike};

/// Extra units rendered past the right edge.
const TRAILING_UNITS: i64 = 2;
/// Widest viewport the ruler covers; wider requests are clamped.
pub const MAX_RULER_WIDTH_PX: i64 = 1_000 * UNIT_WIDTH_PX;

/// One labelled tick on the ruler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulerMarker {
    /// Axis position of the tick.
    pub position: i64,
    /// Viewport-relative x of the tick.
    pub left: i64,
    pub label: String,
}

/// Markers covering a viewport of `width` pixels starting at `offset`.
///
/// Ticks start at the unit boundary at or before `offset` and run through
/// `start + width + 2 units`. `width` is clamped to `0..=MAX_RULER_WIDTH_PX`.
/// Units outside the calendar are skipped.
pub fn ruler_markers(offset: i64, width: i64, zoom: Granularity) -> Vec<RulerMarker> {
    let first_unit = unit_index(offset);
    let start = unit_position(first_unit);
    let end = start
        .saturating_add(width.clamp(0, MAX_RULER_WIDTH_PX))
        .saturating_add(TRAILING_UNITS * UNIT_WIDTH_PX);
    let last_unit = unit_index(end);

    (first_unit..=last_unit)
        .filter_map(|unit| {
            let instant = unit_start_instant(unit, zoom)?;
            let position = unit_position(unit);
            Some(RulerMarker {
                position,
                left: position.saturating_sub(offset),
                label: marker_label(instant, zoom),
            })
        })
        .collect()
}

/// Short ruler label: `2003`, `JAN 2003`, `1/8/2000`, `1/2 3pm`.
pub fn marker_label(instant: NaiveDateTime, zoom: Granularity) -> String {
    let date = instant.date();
    match zoom {
        Granularity::Year => date.year().to_string(),
        Granularity::Month => format!("{} {}", MONTH_NAMES[date.month0() as usize], date.year()),
        Granularity::Week | Granularity::Day => {
            format!("{}/{}/{}", date.month(), date.day(), date.year())
        }
        Granularity::Hour => format!(
            "{}/{} {}",
            date.month(),
            date.day(),
            twelve_hour_label(instant.hour())
        ),
    }
}
