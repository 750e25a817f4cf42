//! Structured time tags and their text form.
//!
//! # Responsibility
//! - Represent a calendar anchor at one [`Granularity`].
//! - Format and parse the `GRANULARITY:value` exchange form.
//!
//! # Invariants
//! - The anchor is normalized to the first instant of its granularity:
//!   YEAR -> Jan 1 00:00, MONTH -> day 1 00:00, WEEK/DAY -> 00:00,
//!   HOUR -> minute 0.
//! - WEEK anchors are NOT snapped to a week start; the date is kept as given.
//! - `TimeTag::from_str(&tag.to_string()) == Ok(tag)` for every tag.

use crate::model::granularity::Granularity;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Three-letter month abbreviations used by `MONTH:` tags.
pub const MONTH_NAMES: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

static YEAR_VALUE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(-?\d+)$").expect("valid year regex"));
static MONTH_VALUE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]{3})-(-?\d+)$").expect("valid month regex"));
static DATE_VALUE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(-?\d+)-(\d{1,2})-(\d{1,2})$").expect("valid date regex"));
static HOUR_VALUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?\d+)-(\d{1,2})-(\d{1,2})(?:\s+(\d{1,2})\s*([AaPp][Mm]))?$")
        .expect("valid hour regex")
});

/// Error returned when a tag string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagParseError {
    /// Input is blank.
    Empty,
    /// Prefix before `:` is not one of the five granularities.
    UnknownPrefix(String),
    /// Prefix is known but the value does not describe a valid date.
    MalformedValue {
        granularity: Granularity,
        value: String,
    },
}

impl Display for TagParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "time tag must not be empty"),
            Self::UnknownPrefix(prefix) => write!(f, "unknown time tag prefix: `{prefix}`"),
            Self::MalformedValue { granularity, value } => {
                write!(f, "malformed {granularity} tag value: `{value}`")
            }
        }
    }
}

impl Error for TagParseError {}

/// Calendar anchor at a fixed granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeTag {
    granularity: Granularity,
    anchor: NaiveDateTime,
}

impl TimeTag {
    /// Builds a tag from any instant, normalizing it to `granularity`.
    pub fn new(granularity: Granularity, instant: NaiveDateTime) -> Self {
        let date = instant.date();
        let anchor = match granularity {
            Granularity::Year => first_instant(date.with_ordinal(1).unwrap_or(date)),
            Granularity::Month => first_instant(date.with_day(1).unwrap_or(date)),
            Granularity::Week | Granularity::Day => first_instant(date),
            Granularity::Hour => date.and_time(
                NaiveTime::from_hms_opt(instant.hour(), 0, 0).unwrap_or(NaiveTime::MIN),
            ),
        };
        Self {
            granularity,
            anchor,
        }
    }

    /// `YEAR:<year>` tag.
    pub fn year(year: i32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, 1, 1).map(|date| Self::new(Granularity::Year, first_instant(date)))
    }

    /// `MONTH:<MON>-<year>` tag; `month` is 1-based.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|date| Self::new(Granularity::Month, first_instant(date)))
    }

    /// `WEEK:<date>` tag anchored at exactly `date`.
    pub fn week(date: NaiveDate) -> Self {
        Self::new(Granularity::Week, first_instant(date))
    }

    /// `DAY:<date>` tag.
    pub fn day(date: NaiveDate) -> Self {
        Self::new(Granularity::Day, first_instant(date))
    }

    /// `HOUR:<date> <h>am|pm` tag; `hour` is 0-23.
    pub fn hour(date: NaiveDate, hour: u32) -> Option<Self> {
        date.and_hms_opt(hour, 0, 0)
            .map(|instant| Self::new(Granularity::Hour, instant))
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Absolute instant this tag resolves to (first instant of its span).
    pub fn instant(&self) -> NaiveDateTime {
        self.anchor
    }

    /// Pixel position of this tag on the axis of the `viewing` zoom.
    pub fn position_at(&self, viewing: Granularity) -> i64 {
        crate::axis::convert::instant_to_position(self.anchor, viewing)
    }
}

impl Display for TimeTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let date = self.anchor.date();
        match self.granularity {
            Granularity::Year => write!(f, "YEAR:{}", date.year()),
            Granularity::Month => write!(
                f,
                "MONTH:{}-{}",
                MONTH_NAMES[date.month0() as usize],
                date.year()
            ),
            Granularity::Week => write!(f, "WEEK:{}", format_tag_date(date)),
            Granularity::Day => write!(f, "DAY:{}", format_tag_date(date)),
            Granularity::Hour => write!(
                f,
                "HOUR:{} {}",
                format_tag_date(date),
                twelve_hour_label(self.anchor.hour())
            ),
        }
    }
}

impl FromStr for TimeTag {
    type Err = TagParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TagParseError::Empty);
        }

        let (prefix, value) = trimmed
            .split_once(':')
            .ok_or_else(|| TagParseError::UnknownPrefix(trimmed.to_string()))?;
        let granularity = Granularity::from_tag_prefix(prefix)
            .ok_or_else(|| TagParseError::UnknownPrefix(prefix.to_string()))?;
        let value = value.trim();

        parse_value(granularity, value).ok_or_else(|| TagParseError::MalformedValue {
            granularity,
            value: value.to_string(),
        })
    }
}

impl TryFrom<String> for TimeTag {
    type Error = TagParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeTag> for String {
    fn from(value: TimeTag) -> Self {
        value.to_string()
    }
}

/// 12-hour clock label for an hour of day: `12am`, `1am`..`11am`, `12pm`,
/// `1pm`..`11pm`.
pub fn twelve_hour_label(hour: u32) -> String {
    match hour {
        0 => "12am".to_string(),
        1..=11 => format!("{hour}am"),
        12 => "12pm".to_string(),
        _ => format!("{}pm", hour - 12),
    }
}

fn parse_value(granularity: Granularity, value: &str) -> Option<TimeTag> {
    match granularity {
        Granularity::Year => {
            let caps = YEAR_VALUE_RE.captures(value)?;
            TimeTag::year(caps[1].parse().ok()?)
        }
        Granularity::Month => {
            let caps = MONTH_VALUE_RE.captures(value)?;
            let name = caps[1].to_ascii_uppercase();
            let month0 = MONTH_NAMES.iter().position(|candidate| *candidate == name)?;
            TimeTag::month(caps[2].parse().ok()?, month0 as u32 + 1)
        }
        Granularity::Week | Granularity::Day => {
            let caps = DATE_VALUE_RE.captures(value)?;
            let date = NaiveDate::from_ymd_opt(
                caps[1].parse().ok()?,
                caps[2].parse().ok()?,
                caps[3].parse().ok()?,
            )?;
            Some(TimeTag::new(granularity, first_instant(date)))
        }
        Granularity::Hour => {
            let caps = HOUR_VALUE_RE.captures(value)?;
            let date = NaiveDate::from_ymd_opt(
                caps[1].parse().ok()?,
                caps[2].parse().ok()?,
                caps[3].parse().ok()?,
            )?;
            let hour = match (caps.get(4), caps.get(5)) {
                (Some(hour), Some(meridiem)) => {
                    hour_from_label(hour.as_str().parse().ok()?, meridiem.as_str())?
                }
                // Date-only HOUR tags resolve to midnight.
                _ => 0,
            };
            TimeTag::hour(date, hour)
        }
    }
}

fn hour_from_label(hour: u32, meridiem: &str) -> Option<u32> {
    if !(1..=12).contains(&hour) {
        return None;
    }
    let is_am = meridiem.eq_ignore_ascii_case("am");
    Some(match (is_am, hour) {
        (true, 12) => 0,
        (true, h) => h,
        (false, 12) => 12,
        (false, h) => h + 12,
    })
}

fn format_tag_date(date: NaiveDate) -> String {
    format!("{}-{:02}-{:02}", date.year(), date.month(), date.day())
}

fn first_instant(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::{twelve_hour_label, TagParseError, TimeTag};
    use crate::model::granularity::Granularity;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn formats_every_granularity() {
        assert_eq!(TimeTag::year(2003).unwrap().to_string(), "YEAR:2003");
        assert_eq!(TimeTag::month(2001, 1).unwrap().to_string(), "MONTH:JAN-2001");
        assert_eq!(TimeTag::week(date(2000, 1, 8)).to_string(), "WEEK:2000-01-08");
        assert_eq!(TimeTag::day(date(2005, 3, 17)).to_string(), "DAY:2005-03-17");
        assert_eq!(
            TimeTag::hour(date(2000, 1, 2), 0).unwrap().to_string(),
            "HOUR:2000-01-02 12am"
        );
        assert_eq!(
            TimeTag::hour(date(2000, 1, 2), 15).unwrap().to_string(),
            "HOUR:2000-01-02 3pm"
        );
    }

    #[test]
    fn hour_labels_follow_twelve_hour_clock() {
        let labels: Vec<String> = (0..24).map(twelve_hour_label).collect();
        assert_eq!(labels[0], "12am");
        assert_eq!(labels[11], "11am");
        assert_eq!(labels[12], "12pm");
        assert_eq!(labels[13], "1pm");
        assert_eq!(labels[23], "11pm");
    }

    #[test]
    fn parses_hour_labels_around_noon_and_midnight() {
        let midnight: TimeTag = "HOUR:2000-01-02 12am".parse().unwrap();
        let noon: TimeTag = "HOUR:2000-01-02 12pm".parse().unwrap();
        let evening: TimeTag = "HOUR:2000-01-02 11pm".parse().unwrap();
        assert_eq!(midnight, TimeTag::hour(date(2000, 1, 2), 0).unwrap());
        assert_eq!(noon, TimeTag::hour(date(2000, 1, 2), 12).unwrap());
        assert_eq!(evening, TimeTag::hour(date(2000, 1, 2), 23).unwrap());
    }

    #[test]
    fn hour_tag_without_label_is_midnight() {
        let tag: TimeTag = "HOUR:2000-01-02".parse().unwrap();
        assert_eq!(tag.to_string(), "HOUR:2000-01-02 12am");
    }

    #[test]
    fn week_tags_keep_exact_date() {
        let tag: TimeTag = "WEEK:2000-01-08".parse().unwrap();
        assert_eq!(tag.instant().date(), date(2000, 1, 8));
        assert_eq!(tag.granularity(), Granularity::Week);
    }

    #[test]
    fn rejects_unknown_prefix_and_malformed_values() {
        assert_eq!("".parse::<TimeTag>(), Err(TagParseError::Empty));
        assert_eq!(
            "DECADE:2000".parse::<TimeTag>(),
            Err(TagParseError::UnknownPrefix("DECADE".to_string()))
        );
        assert!(matches!(
            "MONTH:FOO-2000".parse::<TimeTag>(),
            Err(TagParseError::MalformedValue { .. })
        ));
        assert!(matches!(
            "DAY:2001-02-30".parse::<TimeTag>(),
            Err(TagParseError::MalformedValue { .. })
        ));
        assert!(matches!(
            "HOUR:2000-01-01 13pm".parse::<TimeTag>(),
            Err(TagParseError::MalformedValue { .. })
        ));
    }

    #[test]
    fn normalizes_anchor_to_granularity_start() {
        let instant = date(2005, 3, 17).and_hms_opt(13, 45, 10).unwrap();
        assert_eq!(
            TimeTag::new(Granularity::Year, instant).instant(),
            date(2005, 1, 1).and_hms_opt(0, 0, 0).unwrap()
        );
        assert_eq!(
            TimeTag::new(Granularity::Month, instant).to_string(),
            "MONTH:MAR-2005"
        );
        assert_eq!(
            TimeTag::new(Granularity::Hour, instant).instant(),
            date(2005, 3, 17).and_hms_opt(13, 0, 0).unwrap()
        );
    }
}
