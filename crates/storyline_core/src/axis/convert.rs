//! Position <-> time conversions on the infinite horizontal axis.
//!
//! # Responsibility
//! - Map pixel positions to calendar instants and tags at a zoom level.
//! - Re-project tags of any granularity onto the viewing zoom's unit scale.
//! - Resolve drops on an explicit target row.
//!
//! # Invariants
//! - One unit is `UNIT_WIDTH_PX` pixels; `unit = floor(position / 100)`.
//! - Unit 0 of every zoom starts at the axis epoch, 2000-01-01 00:00.
//! - Generation uses the viewing zoom only; the inverse re-projects across
//!   zooms and floors fractional units.
//! - Plain WEEK generation anchors at epoch + 7*i days, while a drop on a WEEK
//!   row snaps to the preceding Sunday. Both behaviors are intentional.

use crate::model::granularity::Granularity;
use crate::model::time_tag::TimeTag;
use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};
use log::debug;
use once_cell::sync::Lazy;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Width of one axis unit in pixels.
pub const UNIT_WIDTH_PX: i64 = 100;
/// Calendar year of unit 0.
pub const EPOCH_YEAR: i32 = 2000;

const SECONDS_PER_HOUR: i64 = 60 * 60;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;
const SECONDS_PER_WEEK: i64 = 7 * SECONDS_PER_DAY;

static AXIS_EPOCH: Lazy<NaiveDateTime> = Lazy::new(|| {
    NaiveDate::from_ymd_opt(EPOCH_YEAR, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("valid axis epoch")
});

pub type AxisResult<T> = Result<T, AxisError>;

/// Errors from axis conversions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AxisError {
    /// The position maps outside the representable calendar.
    PositionOutOfRange {
        position: i64,
        granularity: Granularity,
    },
    /// An instant cannot be aligned without leaving the calendar.
    InstantOutOfRange(NaiveDateTime),
}

impl Display for AxisError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PositionOutOfRange {
                position,
                granularity,
            } => write!(
                f,
                "position {position} is outside the calendar at {granularity} zoom"
            ),
            Self::InstantOutOfRange(instant) => {
                write!(f, "instant {instant} cannot be aligned within the calendar")
            }
        }
    }
}

impl Error for AxisError {}

/// First instant of the axis (2000-01-01 00:00).
pub fn axis_epoch() -> NaiveDateTime {
    *AXIS_EPOCH
}

/// Unit index under a pixel position (floored, negative positions allowed).
pub fn unit_index(position: i64) -> i64 {
    position.div_euclid(UNIT_WIDTH_PX)
}

/// Left-edge pixel position of a unit.
pub fn unit_position(unit: i64) -> i64 {
    unit.saturating_mul(UNIT_WIDTH_PX)
}

/// First instant of `unit` at `zoom`.
///
/// Returns `None` when the unit lies outside the representable calendar.
pub fn unit_start_instant(unit: i64, zoom: Granularity) -> Option<NaiveDateTime> {
    let epoch = axis_epoch();
    match zoom {
        Granularity::Year => {
            let year = i32::try_from(i64::from(EPOCH_YEAR).checked_add(unit)?).ok()?;
            NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)
        }
        Granularity::Month => {
            let year =
                i32::try_from(i64::from(EPOCH_YEAR).checked_add(unit.div_euclid(12))?).ok()?;
            let month = u32::try_from(unit.rem_euclid(12)).ok()? + 1;
            NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)
        }
        Granularity::Week => epoch.checked_add_signed(TimeDelta::try_days(unit.checked_mul(7)?)?),
        Granularity::Day => epoch.checked_add_signed(TimeDelta::try_days(unit)?),
        Granularity::Hour => epoch.checked_add_signed(TimeDelta::try_hours(unit)?),
    }
}

/// Unit index of `instant` on the `zoom` scale (floored).
pub fn instant_to_unit(instant: NaiveDateTime, zoom: Granularity) -> i64 {
    let years = i64::from(instant.year()) - i64::from(EPOCH_YEAR);
    let seconds = (instant - axis_epoch()).num_seconds();
    match zoom {
        Granularity::Year => years,
        Granularity::Month => years * 12 + i64::from(instant.month0()),
        Granularity::Week => seconds.div_euclid(SECONDS_PER_WEEK),
        Granularity::Day => seconds.div_euclid(SECONDS_PER_DAY),
        Granularity::Hour => seconds.div_euclid(SECONDS_PER_HOUR),
    }
}

/// Forward offset formula: pixel position of `instant` at `zoom`.
pub fn instant_to_position(instant: NaiveDateTime, zoom: Granularity) -> i64 {
    unit_position(instant_to_unit(instant, zoom))
}

/// Absolute instant a pixel position stands for at `zoom`.
pub fn position_to_instant(position: i64, zoom: Granularity) -> AxisResult<NaiveDateTime> {
    unit_start_instant(unit_index(position), zoom).ok_or(AxisError::PositionOutOfRange {
        position,
        granularity: zoom,
    })
}

/// Generates the tag for a pixel position at `zoom`.
pub fn position_to_tag(position: i64, zoom: Granularity) -> AxisResult<TimeTag> {
    position_to_instant(position, zoom).map(|instant| TimeTag::new(zoom, instant))
}

/// Generates the tag of unit `unit` at `zoom`.
pub fn tag_for_unit(unit: i64, zoom: Granularity) -> AxisResult<TimeTag> {
    position_to_tag(unit_position(unit), zoom)
}

/// Pixel position of a tag string on the `viewing` zoom's axis.
///
/// Unparseable tags resolve to position 0.
pub fn tag_to_position(tag: &str, viewing: Granularity) -> i64 {
    match tag.parse::<TimeTag>() {
        Ok(parsed) => parsed.position_at(viewing),
        Err(err) => {
            debug!("event=tag_position_fallback module=axis status=recovered error={err}");
            0
        }
    }
}

/// Resolves a drop at `position` onto a row of granularity `target`.
///
/// The position is first read with the `viewing` zoom's unit semantics, then
/// re-expressed at `target`. WEEK targets snap to the preceding Sunday.
pub fn position_to_tag_for_row(
    position: i64,
    viewing: Granularity,
    target: Granularity,
) -> AxisResult<TimeTag> {
    let instant = position_to_instant(position, viewing)?;
    let instant = match target {
        Granularity::Week => week_start(instant).ok_or(AxisError::InstantOutOfRange(instant))?,
        _ => instant,
    };
    Ok(TimeTag::new(target, instant))
}

/// Same instant on the most recent Sunday (time of day is kept).
pub fn week_start(instant: NaiveDateTime) -> Option<NaiveDateTime> {
    let back = i64::from(instant.weekday().num_days_from_sunday());
    instant.checked_sub_signed(TimeDelta::try_days(back)?)
}

/// Aligns `instant` to the natural boundary of `zoom`.
///
/// YEAR -> Jan 1, MONTH -> day 1, WEEK -> most recent Sunday,
/// DAY -> midnight, HOUR -> unchanged.
pub fn align_to_boundary(instant: NaiveDateTime, zoom: Granularity) -> AxisResult<NaiveDateTime> {
    match zoom {
        Granularity::Year | Granularity::Month | Granularity::Day => {
            Ok(TimeTag::new(zoom, instant).instant())
        }
        Granularity::Week => week_start(instant).ok_or(AxisError::InstantOutOfRange(instant)),
        Granularity::Hour => Ok(instant),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        align_to_boundary, instant_to_unit, position_to_tag, tag_to_position, unit_index,
        unit_start_instant, week_start,
    };
    use crate::model::granularity::Granularity;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn unit_index_floors_toward_negative_infinity() {
        assert_eq!(unit_index(0), 0);
        assert_eq!(unit_index(99), 0);
        assert_eq!(unit_index(100), 1);
        assert_eq!(unit_index(-1), -1);
        assert_eq!(unit_index(-100), -1);
        assert_eq!(unit_index(-101), -2);
    }

    #[test]
    fn negative_month_units_wrap_into_previous_years() {
        assert_eq!(
            unit_start_instant(-1, Granularity::Month),
            Some(at(1999, 12, 1, 0))
        );
        assert_eq!(
            position_to_tag(-1, Granularity::Month).unwrap().to_string(),
            "MONTH:DEC-1999"
        );
    }

    #[test]
    fn hour_units_cross_day_boundaries() {
        assert_eq!(
            position_to_tag(2500, Granularity::Hour).unwrap().to_string(),
            "HOUR:2000-01-02 1am"
        );
    }

    #[test]
    fn inverse_floors_partial_units() {
        // 2000-01-10 is 9 days after epoch: week unit 1, not 2.
        assert_eq!(instant_to_unit(at(2000, 1, 10, 0), Granularity::Week), 1);
        assert_eq!(instant_to_unit(at(1999, 12, 31, 23), Granularity::Day), -1);
        assert_eq!(instant_to_unit(at(2000, 1, 2, 5), Granularity::Hour), 29);
    }

    #[test]
    fn malformed_tags_resolve_to_zero() {
        assert_eq!(tag_to_position("NOPE:2003", Granularity::Year), 0);
        assert_eq!(tag_to_position("YEAR:abc", Granularity::Year), 0);
        assert_eq!(tag_to_position("", Granularity::Day), 0);
    }

    #[test]
    fn week_start_lands_on_sunday_and_keeps_time() {
        // 2000-01-01 is a Saturday.
        assert_eq!(week_start(at(2000, 1, 1, 7)), Some(at(1999, 12, 26, 7)));
        // Sundays stay put.
        assert_eq!(week_start(at(2000, 1, 2, 0)), Some(at(2000, 1, 2, 0)));
    }

    #[test]
    fn align_to_boundary_per_granularity() {
        let instant = at(2005, 3, 17, 13);
        assert_eq!(
            align_to_boundary(instant, Granularity::Year).unwrap(),
            at(2005, 1, 1, 0)
        );
        assert_eq!(
            align_to_boundary(instant, Granularity::Month).unwrap(),
            at(2005, 3, 1, 0)
        );
        assert_eq!(
            align_to_boundary(instant, Granularity::Week).unwrap(),
            at(2005, 3, 13, 13)
        );
        assert_eq!(
            align_to_boundary(instant, Granularity::Day).unwrap(),
            at(2005, 3, 17, 0)
        );
        assert_eq!(align_to_boundary(instant, Granularity::Hour).unwrap(), instant);
    }

    #[test]
    fn far_out_positions_are_reported_not_panicking() {
        assert!(position_to_tag(i64::MAX, Granularity::Year).is_err());
        assert!(position_to_tag(i64::MIN, Granularity::Hour).is_err());
    }
}
