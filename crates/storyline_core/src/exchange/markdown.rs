//! Markdown exchange format for scene collections.
//!
//! # Responsibility
//! - Export scenes as line-oriented `## SCENE:` blocks.
//! - Import such documents leniently, recovering field-level parse failures.
//!
//! # Invariants
//! - Export writes scenes in collection order, after a title line.
//! - Import reassigns ids from 1 in block order, after dropping blocks without
//!   a logline.
//! - Import of a document without any valid block is an error; callers keep
//!   their previous collection.
//! - Every imported scene is either on the timeline or in the stack: timeline
//!   blocks whose time is missing or unreadable go to the back of the stack.
//! - Imported stack indexes are capped at `MAX_STACK_INDEX`.
//! - `export -> import` preserves logline, time, category and stack index of
//!   every scene whose logline is single-line.

use crate::model::scene::{Scene, SceneId, MAX_STACK_INDEX, NOT_STACKED};
use crate::service::placement::next_stack_index;
use crate::model::time_tag::TimeTag;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Block delimiter.
pub const SCENE_DELIMITER: &str = "## SCENE:";
/// Literal written for scenes without a tag.
pub const UNSET_TIME: &str = "UNSET";

const LOGLINE_PREFIX: &str = "#LOGLINE:";
const TIME_PREFIX: &str = "#TIME:";
const CATEGORY_PREFIX: &str = "#CATEGORY:";
const STACK_INDEX_PREFIX: &str = "#STACK INDEX:";
const DEFAULT_STACK_INDEX: u32 = 1;

static LEADING_INT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([+-]?\d+)").expect("valid leading integer regex"));

/// Import failure; the caller's collection must stay unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// No block carried a non-blank logline.
    NoValidScenes,
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoValidScenes => write!(f, "No valid scenes found in the imported file."),
        }
    }
}

impl Error for ImportError {}

/// Parsed import payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedScenes {
    /// Scenes with ids `1..=n` in document order.
    pub scenes: Vec<Scene>,
    /// Category names in first-seen order, without duplicates.
    pub categories: Vec<String>,
    /// Blocks dropped for missing a logline.
    pub skipped_blocks: usize,
    /// `#TIME:` values that could not be parsed and were cleared.
    pub invalid_tags: usize,
    /// Timeline blocks without a usable time, moved to the stack.
    pub restacked: usize,
}

/// Renders `scenes` as a markdown exchange document.
pub fn export_markdown(title: &str, scenes: &[Scene]) -> String {
    let mut document = format!("# {}\n\n", single_line(title));
    for scene in scenes {
        let time = scene
            .time
            .map(|tag| tag.to_string())
            .unwrap_or_else(|| UNSET_TIME.to_string());
        document.push_str(SCENE_DELIMITER);
        document.push('\n');
        document.push_str(&format!("{LOGLINE_PREFIX} {}\n", single_line(&scene.logline)));
        document.push_str(&format!("{TIME_PREFIX} {time}\n"));
        document.push_str(&format!("{CATEGORY_PREFIX} {}\n", single_line(&scene.category)));
        document.push_str(&format!("{STACK_INDEX_PREFIX} {}\n\n", scene.stack_index));
    }
    document
}

/// Parses a markdown exchange document.
///
/// Field recovery rules:
/// - missing or blank category -> `fallback_category`
/// - missing, unparseable or negative stack index -> 1
/// - `UNSET`, blank or unparseable time -> no tag
pub fn parse_markdown(
    content: &str,
    fallback_category: &str,
) -> Result<ImportedScenes, ImportError> {
    let mut scenes = Vec::new();
    let mut categories: Vec<String> = Vec::new();
    let mut skipped_blocks = 0;
    let mut invalid_tags = 0;

    for block in content.split(SCENE_DELIMITER) {
        if block.trim().is_empty() {
            continue;
        }

        let parsed = parse_block(block, fallback_category);
        invalid_tags += parsed.invalid_tag as usize;
        if parsed.logline.is_empty() {
            skipped_blocks += 1;
            continue;
        }

        let id = scenes.len() as SceneId + 1;
        if !categories.contains(&parsed.category) {
            categories.push(parsed.category.clone());
        }
        scenes.push(Scene {
            id,
            logline: parsed.logline,
            category: parsed.category,
            time: parsed.time,
            stack_index: parsed.stack_index,
        });
    }

    let restacked = restack_untimed(&mut scenes);

    debug!(
        "event=markdown_parse module=exchange scenes={} skipped_blocks={} invalid_tags={} restacked={}",
        scenes.len(),
        skipped_blocks,
        invalid_tags,
        restacked
    );

    if scenes.is_empty() {
        return Err(ImportError::NoValidScenes);
    }

    Ok(ImportedScenes {
        scenes,
        categories,
        skipped_blocks,
        invalid_tags,
        restacked,
    })
}

/// Appends scenes that are neither stacked nor timed to the stack, in
/// document order.
fn restack_untimed(scenes: &mut [Scene]) -> usize {
    let mut restacked = 0;
    for index in 0..scenes.len() {
        let scene = &scenes[index];
        if scene.stack_index != NOT_STACKED || scene.time.is_some() {
            continue;
        }
        let back = next_stack_index(scenes);
        scenes[index].stack_at(back);
        restacked += 1;
    }
    restacked
}

struct ParsedBlock {
    logline: String,
    category: String,
    time: Option<TimeTag>,
    stack_index: u32,
    invalid_tag: bool,
}

fn parse_block(block: &str, fallback_category: &str) -> ParsedBlock {
    let mut parsed = ParsedBlock {
        logline: String::new(),
        category: fallback_category.to_string(),
        time: None,
        stack_index: DEFAULT_STACK_INDEX,
        invalid_tag: false,
    };

    for line in block.lines().map(str::trim_start) {
        if let Some(value) = line.strip_prefix(LOGLINE_PREFIX) {
            parsed.logline = value.trim().to_string();
        } else if let Some(value) = line.strip_prefix(TIME_PREFIX) {
            let value = value.trim();
            parsed.time = None;
            parsed.invalid_tag = false;
            if value.is_empty() || value == UNSET_TIME {
                continue;
            }
            match value.parse::<TimeTag>() {
                Ok(tag) => parsed.time = Some(tag),
                Err(err) => {
                    warn!("event=markdown_tag_invalid module=exchange status=recovered error={err}");
                    parsed.invalid_tag = true;
                }
            }
        } else if let Some(value) = line.strip_prefix(CATEGORY_PREFIX) {
            let value = value.trim();
            parsed.category = if value.is_empty() {
                fallback_category.to_string()
            } else {
                value.to_string()
            };
        } else if let Some(value) = line.strip_prefix(STACK_INDEX_PREFIX) {
            parsed.stack_index = parse_stack_index(value);
        }
    }

    parsed
}

fn parse_stack_index(value: &str) -> u32 {
    LEADING_INT_RE
        .captures(value.trim())
        .and_then(|caps| caps[1].parse::<i64>().ok())
        .filter(|index| *index >= 0)
        .map(|index| {
            u32::try_from(index).map_or(MAX_STACK_INDEX, |index| index.min(MAX_STACK_INDEX))
        })
        .unwrap_or(DEFAULT_STACK_INDEX)
}

fn single_line(value: &str) -> String {
    value.replace(['\n', '\r'], " ")
}
