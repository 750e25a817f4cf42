//! Editor configuration.
//!
//! # Responsibility
//! - Hold sizing, palette, fallback and seed values for one editor.
//! - Load overrides from JSON; every absent field keeps its default.
//!
//! # Invariants
//! - `initial_zoom` outside `0..=4` falls back to YEAR when applied.
//! - Seed scenes become the reset snapshot of a fresh editor.

use crate::axis::rows::RowLayout;
use crate::exchange::sink::FileSink;
use crate::model::category::{CategoryPalette, CategoryStyle};
use crate::model::granularity::Granularity;
use crate::model::scene::Scene;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_INITIAL_ZOOM: u8 = 2;
const DEFAULT_FALLBACK_COLOR: &str = "#6B7280";
const DEFAULT_EXPORT_TITLE: &str = "Story Timeline";
const DEFAULT_EXPORT_FILE_NAME: &str = "story-timeline.md";

/// Errors from loading an editor configuration.
#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid editor config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Starter scene placed in the stack of a fresh editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedScene {
    pub logline: String,
    pub category: String,
}

impl SeedScene {
    pub fn new(logline: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            logline: logline.into(),
            category: category.into(),
        }
    }
}

/// Configuration for one editor instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Zoom level at startup, `0..=4`.
    pub initial_zoom: u8,
    pub row_layout: RowLayout,
    /// Category given to imported scenes without one.
    pub fallback_category: String,
    /// Color for categories missing from `categories`.
    pub fallback_color: String,
    /// Known categories and their colors, in display order.
    pub categories: Vec<CategoryStyle>,
    /// Scenes stacked at startup, front first.
    pub seed_scenes: Vec<SeedScene>,
    /// Title line of exported documents.
    pub export_title: String,
    /// File name used when an export has no explicit destination.
    pub export_file_name: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            initial_zoom: DEFAULT_INITIAL_ZOOM,
            row_layout: RowLayout::default(),
            fallback_category: "Setup".to_string(),
            fallback_color: DEFAULT_FALLBACK_COLOR.to_string(),
            categories: vec![
                CategoryStyle::new("Setup", "#3B82F6"),
                CategoryStyle::new("Plot Point", "#EF4444"),
                CategoryStyle::new("Action", "#F59E0B"),
                CategoryStyle::new("Character", "#10B981"),
                CategoryStyle::new("Climax", "#8B5CF6"),
            ],
            seed_scenes: vec![
                SeedScene::new(
                    "Hero discovers the ancient map in grandmother's attic",
                    "Setup",
                ),
                SeedScene::new(
                    "First encounter with the mysterious stranger at the tavern",
                    "Plot Point",
                ),
                SeedScene::new("The great battle at the bridge of shadows", "Action"),
            ],
            export_title: DEFAULT_EXPORT_TITLE.to_string(),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        }
    }
}

impl EditorConfig {
    /// Parses a JSON config; absent fields keep defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads and parses a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Startup zoom as a granularity.
    pub fn initial_granularity(&self) -> Granularity {
        Granularity::from_zoom_level_or_year(i32::from(self.initial_zoom))
    }

    /// Default export destination: `export_file_name` inside `dir`.
    pub fn export_sink(&self, dir: impl AsRef<Path>) -> FileSink {
        FileSink::new(dir.as_ref().join(&self.export_file_name))
    }

    pub fn palette(&self) -> CategoryPalette {
        CategoryPalette::new(self.categories.clone(), self.fallback_color.clone())
    }

    /// Seed scenes with ids and stack indexes assigned from 1.
    ///
    /// Seeds with a blank logline are skipped.
    pub fn seed_collection(&self) -> Vec<Scene> {
        self.seed_scenes
            .iter()
            .filter(|seed| !seed.logline.trim().is_empty())
            .zip(1u32..)
            .map(|(seed, index)| {
                Scene::stacked(
                    u64::from(index),
                    seed.logline.trim(),
                    seed.category.as_str(),
                    index,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::EditorConfig;
    use crate::model::granularity::Granularity;

    #[test]
    fn defaults_match_reference_editor() {
        let config = EditorConfig::default();
        assert_eq!(config.initial_granularity(), Granularity::Week);
        assert_eq!(config.row_layout.base_offset, 60);
        assert_eq!(config.row_layout.row_height, 120);
        assert_eq!(config.palette().color_for("Climax"), "#8B5CF6");
        assert_eq!(config.palette().color_for("Epilogue"), "#6B7280");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            EditorConfig::from_json_str(r#"{ "initial_zoom": 4, "row_layout": { "row_height": 80 } }"#)
                .unwrap();
        assert_eq!(config.initial_granularity(), Granularity::Hour);
        assert_eq!(config.row_layout.row_height, 80);
        assert_eq!(config.row_layout.base_offset, 60);
        assert_eq!(config.fallback_category, "Setup");
    }

    #[test]
    fn seed_collection_assigns_ids_and_stack_order() {
        let scenes = EditorConfig::default().seed_collection();
        let shape: Vec<_> = scenes
            .iter()
            .map(|scene| (scene.id, scene.stack_index, scene.time))
            .collect();
        assert_eq!(shape, vec![(1, 1, None), (2, 2, None), (3, 3, None)]);
    }

    #[test]
    fn invalid_json_is_reported() {
        assert!(EditorConfig::from_json_str("{ not json").is_err());
    }
}
