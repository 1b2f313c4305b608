//! Non-fatal decoding events.
//!
//! Unknown chunks, unsupported cel kinds and broken cel payloads do not stop
//! a parse. Each one is recorded as a `Diagnostic` next to the decoded
//! document so callers (and tests) can inspect exactly what was skipped.

use serde::{Deserialize, Serialize};

pub const ID_UNKNOWN_CHUNK: &str = "ASE-CHUNK-UNKNOWN";
pub const ID_CHUNK_COUNT: &str = "ASE-CHUNK-COUNT";
pub const ID_CEL_TYPE: &str = "ASE-CEL-TYPE";
pub const ID_CEL_PAYLOAD: &str = "ASE-CEL-PAYLOAD";
pub const ID_CEL_SIZE: &str = "ASE-CEL-SIZE";

/// What went wrong, with the values needed to explain it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Chunk type code this decoder does not handle; the chunk was skipped.
    UnknownChunk { chunk_type: u16 },
    /// The frame header announced a different number of chunks than the
    /// frame's byte range contained.
    ChunkCountMismatch { declared: u32, walked: u32 },
    /// Cel stored in a form other than a compressed image.
    UnsupportedCelType { layer: u16, cel_type: u16 },
    /// The compressed cel payload could not be inflated.
    CelPayload { layer: u16, message: String },
    /// The inflated cel payload has the wrong length for its dimensions.
    CelSize {
        layer: u16,
        expected: usize,
        actual: usize,
    },
}

/// A recoverable event raised while walking the chunk stream.
///
/// # Examples
/// ```
/// use asekit_core::{Diagnostic, DiagnosticKind};
///
/// let diagnostic = Diagnostic {
///     frame: 0,
///     offset: 144,
///     kind: DiagnosticKind::UnknownChunk { chunk_type: 0x2019 },
/// };
/// assert_eq!(diagnostic.id(), "ASE-CHUNK-UNKNOWN");
/// assert!(diagnostic.message().contains("0x2019"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Frame in which the event happened.
    pub frame: usize,
    /// Absolute offset of the chunk (or frame) that raised it.
    pub offset: usize,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(frame: usize, offset: usize, kind: DiagnosticKind) -> Self {
        Self {
            frame,
            offset,
            kind,
        }
    }

    /// Stable identifier, suitable for filtering.
    pub fn id(&self) -> &'static str {
        match self.kind {
            DiagnosticKind::UnknownChunk { .. } => ID_UNKNOWN_CHUNK,
            DiagnosticKind::ChunkCountMismatch { .. } => ID_CHUNK_COUNT,
            DiagnosticKind::UnsupportedCelType { .. } => ID_CEL_TYPE,
            DiagnosticKind::CelPayload { .. } => ID_CEL_PAYLOAD,
            DiagnosticKind::CelSize { .. } => ID_CEL_SIZE,
        }
    }

    /// Every diagnostic is a warning; fatal problems are `FormatError`s.
    pub fn severity(&self) -> &'static str {
        "warning"
    }

    pub fn message(&self) -> String {
        match &self.kind {
            DiagnosticKind::UnknownChunk { chunk_type } => {
                format!("unrecognized chunk type {chunk_type:#06x} skipped")
            }
            DiagnosticKind::ChunkCountMismatch { declared, walked } => {
                format!("frame declares {declared} chunks, found {walked}")
            }
            DiagnosticKind::UnsupportedCelType { layer, cel_type } => {
                format!("cel on layer {layer} has unsupported cel type {cel_type}")
            }
            DiagnosticKind::CelPayload { layer, message } => {
                format!("cel on layer {layer} failed to decompress: {message}")
            }
            DiagnosticKind::CelSize {
                layer,
                expected,
                actual,
            } => {
                format!("cel on layer {layer} decompressed to {actual} bytes, expected {expected}")
            }
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} frame {} @ {}: {}",
            self.id(),
            self.frame,
            self.offset,
            self.message()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_stable() {
        let cases = [
            (DiagnosticKind::UnknownChunk { chunk_type: 1 }, ID_UNKNOWN_CHUNK),
            (
                DiagnosticKind::ChunkCountMismatch {
                    declared: 2,
                    walked: 1,
                },
                ID_CHUNK_COUNT,
            ),
            (
                DiagnosticKind::UnsupportedCelType {
                    layer: 0,
                    cel_type: 1,
                },
                ID_CEL_TYPE,
            ),
            (
                DiagnosticKind::CelPayload {
                    layer: 0,
                    message: "corrupt deflate stream".to_string(),
                },
                ID_CEL_PAYLOAD,
            ),
            (
                DiagnosticKind::CelSize {
                    layer: 0,
                    expected: 16,
                    actual: 12,
                },
                ID_CEL_SIZE,
            ),
        ];
        for (kind, id) in cases {
            assert_eq!(Diagnostic::new(0, 0, kind).id(), id);
        }
    }

    #[test]
    fn display_includes_position() {
        let diagnostic = Diagnostic::new(
            2,
            300,
            DiagnosticKind::UnsupportedCelType {
                layer: 1,
                cel_type: 1,
            },
        );
        assert_eq!(
            diagnostic.to_string(),
            "ASE-CEL-TYPE frame 2 @ 300: cel on layer 1 has unsupported cel type 1"
        );
    }

    #[test]
    fn serializes_flat_with_kind_tag() {
        let diagnostic = Diagnostic::new(0, 144, DiagnosticKind::UnknownChunk { chunk_type: 8217 });
        let value = serde_json::to_value(&diagnostic).expect("diagnostic json");
        assert_eq!(value["kind"], "unknown_chunk");
        assert_eq!(value["chunk_type"], 8217);
        assert_eq!(value["frame"], 0);
        assert_eq!(value["offset"], 144);
    }
}
