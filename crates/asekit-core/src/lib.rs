//! asekit core library: decoding of Aseprite sprite files.
//!
//! This crate turns the bytes of an `.aseprite` file into a `Document`:
//! canvas dimensions, layers in declaration order and the decompressed cels
//! of every frame. The binary decoder lives in `format` and is split into
//! layout/reader/header/chunks/decoders so that every fixed-offset read is
//! bounds-checked in one place. File access is isolated in `source`.
//!
//! Invariants:
//! - Layer indices are dense and follow declaration order.
//! - Every emitted cel holds exactly `width * height * bytes_per_pixel` bytes.
//! - Chunks are skipped by their declared size, so unknown chunk types never
//!   desynchronize the walk.
//! - The decoded document never borrows from the source buffer.
//!
//! Structural damage (truncated headers, chunk sizes that do not fit their
//! frame) is a fatal `FormatError`. Everything else that cannot be decoded is
//! recorded as a `Diagnostic` next to the document.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use asekit_core::decode_file;
//!
//! let decoded = decode_file(Path::new("hero.aseprite"))?;
//! for layer in &decoded.document.layers {
//!     println!("{}: {}", layer.index, layer.name);
//! }
//! for diagnostic in &decoded.diagnostics {
//!     eprintln!("{diagnostic}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

mod diagnostics;
mod document;
pub mod format;
mod source;

pub use diagnostics::{
    Diagnostic, DiagnosticKind, ID_CEL_PAYLOAD, ID_CEL_SIZE, ID_CEL_TYPE, ID_CHUNK_COUNT,
    ID_UNKNOWN_CHUNK,
};
pub use document::{Cel, Document, Layer};
pub use format::{
    Decoded, FileHeader, FormatError, FrameHeader, parse_document, read_file_header,
    read_frame_headers,
};
pub use source::{SourceError, load_file};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Timestamp used when the current time cannot be formatted.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Errors returned when decoding a file from disk.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("Format error: {0}")]
    Format(#[from] FormatError),
}

/// Load and decode an Aseprite file.
///
/// # Errors
/// Returns `DecodeError::Source` when the file cannot be read and
/// `DecodeError::Format` when its structure is invalid.
pub fn decode_file(path: &Path) -> Result<Decoded, DecodeError> {
    let bytes = load_file(path)?;
    Ok(parse_document(&bytes)?)
}

/// Load and decode an Aseprite file, then summarize it as a report.
pub fn inspect_file(path: &Path) -> Result<InspectReport, DecodeError> {
    let bytes = load_file(path)?;
    let decoded = parse_document(&bytes)?;
    let mut report = make_inspect_report(&path.display().to_string(), bytes.len() as u64, &decoded);
    report.generated_at = now_rfc3339();
    Ok(report)
}

/// Serializable summary of a decoded file. Pixel buffers are summarized by
/// their length only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectReport {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp of report generation.
    pub generated_at: String,
    /// Input file metadata.
    pub input: InputInfo,
    /// Canvas and frame information.
    pub sprite: SpriteSummary,
    /// Layers in declaration order.
    pub layers: Vec<LayerSummary>,
    /// Cels in file order.
    pub cels: Vec<CelSummary>,
    /// Non-fatal decoding events in file order.
    pub diagnostics: Vec<DiagnosticEntry>,
}

/// Tool metadata embedded in reports.
///
/// # Examples
/// ```
/// use asekit_core::ToolInfo;
///
/// let tool = ToolInfo {
///     name: "asekit".to_string(),
///     version: "0.1.0".to_string(),
/// };
/// assert_eq!(tool.name, "asekit");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the decoder.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteSummary {
    pub width: u16,
    pub height: u16,
    pub frames: u16,
    pub color_depth: u16,
    pub frame_durations_ms: Vec<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSummary {
    pub index: usize,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CelSummary {
    pub layer_index: u16,
    pub frame_index: usize,
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
    pub opacity: u8,
    /// Length of the decompressed pixel buffer.
    pub pixel_bytes: usize,
    /// Name of the referenced layer, when it exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_name: Option<String>,
}

/// Flattened diagnostic record.
///
/// # Examples
/// ```
/// use asekit_core::DiagnosticEntry;
///
/// let entry = DiagnosticEntry {
///     id: "ASE-CHUNK-UNKNOWN".to_string(),
///     severity: "warning".to_string(),
///     message: "unrecognized chunk type 0x2019 skipped".to_string(),
///     frame: 0,
///     offset: 144,
/// };
/// assert_eq!(entry.frame, 0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticEntry {
    /// Stable identifier (e.g., `ASE-CEL-PAYLOAD`).
    pub id: String,
    /// Severity label.
    pub severity: String,
    /// Human-readable explanation.
    pub message: String,
    /// Frame in which the event happened.
    pub frame: usize,
    /// Absolute byte offset of the chunk or frame.
    pub offset: usize,
}

impl From<&Diagnostic> for DiagnosticEntry {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            id: diagnostic.id().to_string(),
            severity: diagnostic.severity().to_string(),
            message: diagnostic.message(),
            frame: diagnostic.frame,
            offset: diagnostic.offset,
        }
    }
}

/// Build a report from a decoded document.
///
/// `generated_at` is left at `DEFAULT_GENERATED_AT`.
///
/// # Examples
/// ```
/// use asekit_core::{Decoded, Document, make_inspect_report};
///
/// let decoded = Decoded {
///     document: Document {
///         width: 16,
///         height: 16,
///         frames: 0,
///         color_depth: 32,
///         frame_durations_ms: Vec::new(),
///         layers: Vec::new(),
///         cels: Vec::new(),
///     },
///     diagnostics: Vec::new(),
/// };
/// let report = make_inspect_report("empty.aseprite", 128, &decoded);
/// assert_eq!(report.report_version, asekit_core::REPORT_VERSION);
/// assert!(report.layers.is_empty());
/// ```
pub fn make_inspect_report(input_path: &str, input_bytes: u64, decoded: &Decoded) -> InspectReport {
    let document = &decoded.document;
    InspectReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "asekit".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        sprite: SpriteSummary {
            width: document.width,
            height: document.height,
            frames: document.frames,
            color_depth: document.color_depth,
            frame_durations_ms: document.frame_durations_ms.clone(),
        },
        layers: document
            .layers
            .iter()
            .map(|layer| LayerSummary {
                index: layer.index,
                name: layer.name.clone(),
            })
            .collect(),
        cels: document
            .cels
            .iter()
            .map(|cel| CelSummary {
                layer_index: cel.layer_index,
                frame_index: cel.frame_index,
                x: cel.x,
                y: cel.y,
                width: cel.width,
                height: cel.height,
                opacity: cel.opacity,
                pixel_bytes: cel.pixels.len(),
                layer_name: document
                    .layer(usize::from(cel.layer_index))
                    .map(|layer| layer.name.clone()),
            })
            .collect(),
        diagnostics: decoded.diagnostics.iter().map(DiagnosticEntry::from).collect(),
    }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| DEFAULT_GENERATED_AT.to_string())
}
