//! Core domain logic for the storyline timeline editor.
//! This crate is the single source of truth for axis and placement rules.

pub mod axis;
pub mod config;
pub mod exchange;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use axis::convert::{
    position_to_tag, position_to_tag_for_row, tag_for_unit, tag_to_position, AxisError,
    AxisResult, UNIT_WIDTH_PX,
};
pub use axis::viewport::{Viewport, ZoomChange};
pub use config::{ConfigError, EditorConfig};
pub use exchange::markdown::{export_markdown, parse_markdown, ImportError, ImportedScenes};
pub use exchange::sink::{BufferSink, ExportOutcome, ExportSink, FileSink, SinkError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::{CategoryPalette, CategorySet, CategoryStyle};
pub use model::granularity::Granularity;
pub use model::scene::{Scene, SceneId, SceneValidationError};
pub use model::time_tag::{TagParseError, TimeTag};
pub use repo::scene_repo::{MemorySceneRepository, RepoError, RepoResult, SceneRepository};
pub use service::editor_service::{EditorError, EditorService, ImportSummary};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
