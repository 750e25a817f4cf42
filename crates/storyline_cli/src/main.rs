//! `storyline` command-line front end.
//!
//! # Responsibility
//! - Expose axis conversions and editor operations for scripting and quick
//!   local checks.
//! - Keep output line-oriented and deterministic.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::io::Write;
use std::path::{Path, PathBuf};
use storyline_core::axis::ruler::ruler_markers;
use storyline_core::{
    init_logging, position_to_tag, position_to_tag_for_row, tag_to_position, EditorConfig,
    EditorService, ExportSink, FileSink, Granularity, SinkError, Viewport,
};

#[derive(Parser)]
#[command(name = "storyline")]
#[command(about = "Story timeline editor core", version)]
struct Cli {
    /// JSON editor config; defaults are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Absolute directory for rotating log files; logging is off when omitted
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[arg(long, global = true, default_value_t = storyline_core::default_log_level().to_string())]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tag generated for an axis position
    Tag {
        #[arg(allow_hyphen_values = true)]
        position: i64,
        /// Zoom level (0-4) or name (YEAR..HOUR)
        #[arg(long, short, value_parser = parse_zoom)]
        zoom: Granularity,
    },
    /// Print the axis position of a tag at a viewing zoom
    Position {
        tag: String,
        #[arg(long, short, value_parser = parse_zoom)]
        zoom: Granularity,
    },
    /// Print the tag for a drop on a specific row
    RowTag {
        #[arg(allow_hyphen_values = true)]
        position: i64,
        #[arg(long, short, value_parser = parse_zoom)]
        zoom: Granularity,
        #[arg(long, short, value_parser = parse_zoom)]
        row: Granularity,
    },
    /// Re-anchor an offset from one zoom level to another
    Zoom {
        #[arg(long, value_parser = parse_zoom)]
        from: Granularity,
        #[arg(long, allow_hyphen_values = true)]
        offset: i64,
        /// Target levels, applied in order
        #[arg(required = true, value_parser = parse_zoom)]
        to: Vec<Granularity>,
    },
    /// List ruler markers for a viewport
    Markers {
        #[arg(long, short, value_parser = parse_zoom)]
        zoom: Granularity,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        offset: i64,
        #[arg(long, default_value = "1000")]
        width: i64,
    },
    /// List visible rows and their scenes
    Rows {
        /// Markdown document to load instead of the seed scenes
        #[arg(long, short)]
        input: Option<PathBuf>,
        #[arg(long, short, value_parser = parse_zoom)]
        zoom: Option<Granularity>,
    },
    /// List the stack, optionally after cycling it
    Stack {
        #[arg(long, short)]
        input: Option<PathBuf>,
        #[arg(long, default_value = "0")]
        cycle: usize,
    },
    /// Export the collection as markdown to `--output` or the configured file
    /// name (stdout when the file cannot be written)
    Export {
        #[arg(long, short)]
        input: Option<PathBuf>,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Validate a markdown document and summarize its scenes
    Import { path: PathBuf },
}

/// Writes exported documents to standard output.
struct StdoutSink;

impl ExportSink for StdoutSink {
    fn name(&self) -> &str {
        "stdout"
    }

    fn deliver(&mut self, document: &str) -> Result<(), SinkError> {
        std::io::stdout()
            .lock()
            .write_all(document.as_bytes())
            .map_err(|err| SinkError::Unavailable(err.to_string()))
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(log_dir) = &cli.log_dir {
        init_logging(&cli.log_level, log_dir).context("failed to initialize logging")?;
    }
    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };

    match cli.command {
        Commands::Tag { position, zoom } => {
            println!("{}", position_to_tag(position, zoom)?);
        }
        Commands::Position { tag, zoom } => {
            println!("{}", tag_to_position(&tag, zoom));
        }
        Commands::RowTag {
            position,
            zoom,
            row,
        } => {
            println!("{}", position_to_tag_for_row(position, zoom, row)?);
        }
        Commands::Zoom { from, offset, to } => {
            let mut viewport = Viewport::new(from);
            viewport.pan(offset);
            for target in to {
                let change = viewport
                    .change_zoom(i32::from(target.zoom_level()))
                    .ok_or_else(|| anyhow!("cannot re-anchor offset {offset} at {target}"))?;
                println!(
                    "{} offset={} context={}",
                    change.zoom.plural_label(),
                    change.offset,
                    change.context_date
                );
            }
        }
        Commands::Markers {
            zoom,
            offset,
            width,
        } => {
            for marker in ruler_markers(offset, width, zoom) {
                println!("{}\t{}", marker.position, marker.label);
            }
        }
        Commands::Rows { input, zoom } => {
            let mut editor = open_editor(&config, input.as_deref())?;
            if let Some(zoom) = zoom {
                editor.change_zoom(i32::from(zoom.zoom_level()));
            }
            println!("zoom={}", editor.viewport().zoom().plural_label());
            for row in editor.visible_rows() {
                println!("{}", row.label());
                for scene in &row.scenes {
                    let tag = scene
                        .timeline_tag()
                        .map(|tag| tag.to_string())
                        .unwrap_or_default();
                    println!("  #{} {} [{}] {}", scene.id, tag, scene.category, scene.logline);
                }
            }
        }
        Commands::Stack { input, cycle } => {
            let mut editor = open_editor(&config, input.as_deref())?;
            for _ in 0..cycle {
                editor.cycle_stack();
            }
            for scene in editor.stack() {
                println!(
                    "{}\t#{} [{}] {}",
                    scene.stack_index, scene.id, scene.category, scene.logline
                );
            }
        }
        Commands::Export { input, output } => {
            let editor = open_editor(&config, input.as_deref())?;
            let mut primary = match output {
                Some(path) => FileSink::new(path),
                None => config.export_sink("."),
            };
            let outcome = editor.export_to(&mut primary, &mut StdoutSink);
            info!(
                "event=cli_export module=cli path={} delivered={}",
                primary.path().display(),
                outcome.is_delivered()
            );
            if let Some(notice) = outcome.notice() {
                eprintln!("{notice}");
            }
            if !outcome.is_delivered() {
                bail!("export failed");
            }
        }
        Commands::Import { path } => {
            let mut editor = EditorService::from_config(&config)?;
            let summary = editor.import_markdown(&read_document(&path)?)?;
            println!("{}", summary.notice());
            for category in &summary.new_categories {
                println!("new category: {category}");
            }
            if summary.invalid_tags > 0 {
                println!("cleared {} unreadable time tags", summary.invalid_tags);
            }
            if summary.restacked > 0 {
                println!("moved {} untimed scenes to the stack", summary.restacked);
            }
        }
    }
    Ok(())
}

fn open_editor(config: &EditorConfig, input: Option<&Path>) -> Result<EditorService> {
    let mut editor = EditorService::from_config(config)?;
    if let Some(path) = input {
        let summary = editor.import_markdown(&read_document(path)?)?;
        info!(
            "event=cli_input_loaded module=cli scenes={}",
            summary.scene_count
        );
    }
    Ok(editor)
}

fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read `{}`", path.display()))
}

fn parse_zoom(raw: &str) -> Result<Granularity, String> {
    let trimmed = raw.trim();
    if let Ok(level) = trimmed.parse::<i32>() {
        return Granularity::from_zoom_level(level)
            .ok_or_else(|| format!("zoom level must be 0-4, got {level}"));
    }
    let upper = trimmed.to_ascii_uppercase();
    Granularity::from_tag_prefix(upper.trim_end_matches('S'))
        .ok_or_else(|| format!("unknown zoom `{raw}`; expected 0-4 or YEAR|MONTH|WEEK|DAY|HOUR"))
}
