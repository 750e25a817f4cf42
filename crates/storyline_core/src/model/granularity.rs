//! Time granularity shared by tags, rows and zoom levels.
//!
//! # Invariants
//! - Variants are ordered coarse to fine: `Year < Month < Week < Day < Hour`.
//! - Zoom level `n` always maps to `Granularity::ALL[n]`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Lowest zoom level (years).
pub const MIN_ZOOM_LEVEL: u8 = 0;
/// Highest zoom level (hours).
pub const MAX_ZOOM_LEVEL: u8 = 4;

/// Calendar granularity of a tag, a timeline row, or the current zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Granularity {
    Year,
    Month,
    Week,
    Day,
    Hour,
}

impl Granularity {
    /// All granularities in row order (coarse to fine).
    pub const ALL: [Granularity; 5] = [
        Granularity::Year,
        Granularity::Month,
        Granularity::Week,
        Granularity::Day,
        Granularity::Hour,
    ];

    /// Maps a zoom level to its granularity.
    ///
    /// Returns `None` outside `0..=4`.
    pub fn from_zoom_level(level: i32) -> Option<Self> {
        usize::try_from(level)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }

    /// Maps a zoom level to its granularity, falling back to `Year` for
    /// unrecognized levels.
    pub fn from_zoom_level_or_year(level: i32) -> Self {
        Self::from_zoom_level(level).unwrap_or(Granularity::Year)
    }

    /// Zoom level (`0..=4`) of this granularity.
    pub fn zoom_level(self) -> u8 {
        match self {
            Self::Year => 0,
            Self::Month => 1,
            Self::Week => 2,
            Self::Day => 3,
            Self::Hour => 4,
        }
    }

    /// Tag prefix without the trailing colon, e.g. `MONTH`.
    pub fn tag_prefix(self) -> &'static str {
        match self {
            Self::Year => "YEAR",
            Self::Month => "MONTH",
            Self::Week => "WEEK",
            Self::Day => "DAY",
            Self::Hour => "HOUR",
        }
    }

    /// Parses a tag prefix (case-sensitive, without colon).
    pub fn from_tag_prefix(prefix: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|granularity| granularity.tag_prefix() == prefix)
    }

    /// Plural display label used for zoom indicators and row headers.
    pub fn plural_label(self) -> &'static str {
        match self {
            Self::Year => "YEARS",
            Self::Month => "MONTHS",
            Self::Week => "WEEKS",
            Self::Day => "DAYS",
            Self::Hour => "HOURS",
        }
    }

    /// Granularities visible as rows at this zoom: the prefix of
    /// [`Granularity::ALL`] up to and including `self`.
    pub fn visible_prefix(self) -> &'static [Granularity] {
        &Self::ALL[..=usize::from(self.zoom_level())]
    }

    /// One level finer, if any.
    pub fn finer(self) -> Option<Self> {
        Self::from_zoom_level(i32::from(self.zoom_level()) + 1)
    }

    /// One level coarser, if any.
    pub fn coarser(self) -> Option<Self> {
        Self::from_zoom_level(i32::from(self.zoom_level()) - 1)
    }
}

impl Display for Granularity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag_prefix())
    }
}
