//! Export delivery targets with a single fallback path.
//!
//! A primary sink (e.g. a save dialog or file) is tried first. If it fails the
//! document goes to a fallback sink (e.g. a clipboard) and the outcome carries
//! a user-facing notice. There are no retries.

use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Failure of one export sink.
#[derive(Debug)]
pub enum SinkError {
    /// The delivery mechanism is not available in this environment.
    Unavailable(String),
    /// Writing to a file failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for SinkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "export target unavailable: {reason}"),
            Self::Io { path, source } => {
                write!(f, "failed to write `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for SinkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unavailable(_) => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Destination for an exported document.
pub trait ExportSink {
    /// Short name used in notices and logs.
    fn name(&self) -> &str;
    /// Delivers the whole document or fails without partial effects visible
    /// to the editor.
    fn deliver(&mut self, document: &str) -> Result<(), SinkError>;
}

/// Writes the document to a file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl ExportSink for FileSink {
    fn name(&self) -> &str {
        "file"
    }

    fn deliver(&mut self, document: &str) -> Result<(), SinkError> {
        std::fs::write(&self.path, document).map_err(|source| SinkError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Keeps the last delivered document in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferSink {
    contents: Option<String>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl ExportSink for BufferSink {
    fn name(&self) -> &str {
        "buffer"
    }

    fn deliver(&mut self, document: &str) -> Result<(), SinkError> {
        self.contents = Some(document.to_string());
        Ok(())
    }
}

/// Outcome of an export attempt.
#[derive(Debug)]
pub enum ExportOutcome {
    /// Primary sink accepted the document.
    Delivered { sink: String },
    /// Primary failed; fallback accepted the document.
    DeliveredToFallback { sink: String, primary_error: SinkError },
    /// Both sinks failed.
    Failed {
        primary_error: SinkError,
        fallback_error: SinkError,
    },
}

impl ExportOutcome {
    pub fn is_delivered(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// User-facing notice, `None` when the primary path worked.
    pub fn notice(&self) -> Option<String> {
        match self {
            Self::Delivered { .. } => None,
            Self::DeliveredToFallback { sink, .. } => Some(format!(
                "Export failed, but content was copied to the {sink}. Save it as a .md file."
            )),
            Self::Failed { .. } => Some(
                "Export failed. Check the environment's permissions and try again.".to_string(),
            ),
        }
    }
}

/// Delivers `document` to `primary`, degrading to `fallback` on failure.
pub fn deliver_with_fallback(
    document: &str,
    primary: &mut dyn ExportSink,
    fallback: &mut dyn ExportSink,
) -> ExportOutcome {
    let primary_error = match primary.deliver(document) {
        Ok(()) => {
            info!(
                "event=export_delivered module=exchange sink={} bytes={}",
                primary.name(),
                document.len()
            );
            return ExportOutcome::Delivered {
                sink: primary.name().to_string(),
            };
        }
        Err(err) => err,
    };

    warn!(
        "event=export_fallback module=exchange status=degraded primary={} error={}",
        primary.name(),
        primary_error
    );
    match fallback.deliver(document) {
        Ok(()) => ExportOutcome::DeliveredToFallback {
            sink: fallback.name().to_string(),
            primary_error,
        },
        Err(fallback_error) => {
            warn!(
                "event=export_failed module=exchange status=error fallback={} error={}",
                fallback.name(),
                fallback_error
            );
            ExportOutcome::Failed {
                primary_error,
                fallback_error,
            }
        }
    }
}
