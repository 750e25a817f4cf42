//! Scene domain model.
//!
//! # Responsibility
//! - Define the record arranged on the timeline or held in the stack.
//! - Provide placement transitions between timeline and stack.
//!
//! # Invariants
//! - `id` is unique within one scene collection.
//! - A scene is on the timeline when `stack_index == 0` and `time` is set.
//! - A scene is stacked when `stack_index > 0`; `time` is then meaningless.
//! - The model tolerates the other field being present; transitions always
//!   clear it.

use crate::model::time_tag::TimeTag;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Scene identifier, assigned monotonically from 1.
pub type SceneId = u64;

/// Stack index reserved for "not in stack".
pub const NOT_STACKED: u32 = 0;
/// Highest stack index accepted from imported documents; leaves headroom for
/// appending and cycling.
pub const MAX_STACK_INDEX: u32 = u32::MAX / 2;

/// Validation errors for scene records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneValidationError {
    /// Logline is blank after trim.
    EmptyLogline,
    /// Id 0 is never assigned.
    ZeroId,
}

impl Display for SceneValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyLogline => write!(f, "scene logline must not be blank"),
            Self::ZeroId => write!(f, "scene id must be >= 1"),
        }
    }
}

impl Error for SceneValidationError {}

/// One narrative scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: SceneId,
    /// One-line summary shown on the card.
    pub logline: String,
    /// Category name; unknown names render with the fallback color.
    pub category: String,
    /// Timeline placement; meaningful only when `stack_index == 0`.
    pub time: Option<TimeTag>,
    /// Stack order, 1 = front; 0 = not stacked.
    pub stack_index: u32,
}

impl Scene {
    /// Creates a scene held in the stack at `stack_index`.
    pub fn stacked(
        id: SceneId,
        logline: impl Into<String>,
        category: impl Into<String>,
        stack_index: u32,
    ) -> Self {
        Self {
            id,
            logline: logline.into(),
            category: category.into(),
            time: None,
            stack_index,
        }
    }

    /// Creates a scene placed on the timeline at `time`.
    pub fn placed(
        id: SceneId,
        logline: impl Into<String>,
        category: impl Into<String>,
        time: TimeTag,
    ) -> Self {
        Self {
            id,
            logline: logline.into(),
            category: category.into(),
            time: Some(time),
            stack_index: NOT_STACKED,
        }
    }

    /// Validates record-level invariants.
    pub fn validate(&self) -> Result<(), SceneValidationError> {
        if self.id == 0 {
            return Err(SceneValidationError::ZeroId);
        }
        if self.logline.trim().is_empty() {
            return Err(SceneValidationError::EmptyLogline);
        }
        Ok(())
    }

    /// Whether the scene renders on the timeline.
    pub fn is_on_timeline(&self) -> bool {
        self.stack_index == NOT_STACKED && self.time.is_some()
    }

    /// Whether the scene is held in the stack.
    pub fn is_stacked(&self) -> bool {
        self.stack_index > NOT_STACKED
    }

    /// Timeline tag when the scene is on the timeline.
    pub fn timeline_tag(&self) -> Option<&TimeTag> {
        if self.stack_index == NOT_STACKED {
            self.time.as_ref()
        } else {
            None
        }
    }

    /// Moves the scene onto the timeline at `tag`.
    pub fn place_at(&mut self, tag: TimeTag) {
        self.time = Some(tag);
        self.stack_index = NOT_STACKED;
    }

    /// Moves the scene into the stack at `stack_index` (must be >= 1).
    pub fn stack_at(&mut self, stack_index: u32) {
        debug_assert!(stack_index > NOT_STACKED);
        self.time = None;
        self.stack_index = stack_index;
    }
}
