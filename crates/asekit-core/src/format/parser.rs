use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::document::{Cel, Document, Layer};

use super::cel::{CelOutcome, decode_cel};
use super::chunks::{ChunkKind, ChunkWalker};
use super::error::FormatError;
use super::header::{FileHeader, FrameHeader, read_file_header, read_frame_header};
use super::layer::decode_layer;
use super::layout;

/// A decoded document together with every non-fatal event raised on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub document: Document,
    pub diagnostics: Vec<Diagnostic>,
}

/// Decode a complete Aseprite file held in memory.
///
/// Layers and cels are collected in file order across all frames. Unknown
/// chunks, unsupported cel types and broken cel payloads are reported in
/// `Decoded::diagnostics`; structural problems abort with a `FormatError`.
///
/// # Errors
/// Returns `FormatError` when a header is truncated or has the wrong magic,
/// or when a frame or chunk length does not fit its container.
pub fn parse_document(bytes: &[u8]) -> Result<Decoded, FormatError> {
    let file = read_file_header(bytes)?;
    let mut state = ParseState::new(&file);

    let mut offset = layout::FILE_HEADER_SIZE;
    for frame_index in 0..file.frame_count as usize {
        let frame = read_frame_header(bytes, offset, frame_index)?;
        state.frame_durations_ms.push(frame.duration_ms);
        walk_frame(bytes, &frame, frame_index, &mut state)?;
        offset = frame.end();
    }

    Ok(state.finish(&file))
}

struct ParseState {
    bytes_per_pixel: usize,
    frame_durations_ms: Vec<u16>,
    layers: Vec<Layer>,
    cels: Vec<Cel>,
    diagnostics: Vec<Diagnostic>,
}

impl ParseState {
    fn new(file: &FileHeader) -> Self {
        Self {
            bytes_per_pixel: file.bytes_per_pixel(),
            frame_durations_ms: Vec::with_capacity(file.frame_count as usize),
            layers: Vec::new(),
            cels: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn finish(self, file: &FileHeader) -> Decoded {
        Decoded {
            document: Document {
                width: file.width,
                height: file.height,
                frames: file.frame_count,
                color_depth: file.color_depth,
                frame_durations_ms: self.frame_durations_ms,
                layers: self.layers,
                cels: self.cels,
            },
            diagnostics: self.diagnostics,
        }
    }
}

fn walk_frame(
    bytes: &[u8],
    frame: &FrameHeader,
    frame_index: usize,
    state: &mut ParseState,
) -> Result<(), FormatError> {
    let mut walked = 0u32;
    for chunk in ChunkWalker::new(bytes, frame) {
        let chunk = chunk?;
        walked += 1;
        match chunk.kind {
            ChunkKind::Layer => {
                let layer = decode_layer(&chunk, state.layers.len())?;
                state.layers.push(layer);
            }
            ChunkKind::Cel => match decode_cel(&chunk, frame_index, state.bytes_per_pixel)? {
                CelOutcome::Decoded(cel) => state.cels.push(cel),
                CelOutcome::Skipped(kind) => {
                    state
                        .diagnostics
                        .push(Diagnostic::new(frame_index, chunk.offset, kind));
                }
            },
            ChunkKind::Unknown(chunk_type) => {
                state.diagnostics.push(Diagnostic::new(
                    frame_index,
                    chunk.offset,
                    DiagnosticKind::UnknownChunk { chunk_type },
                ));
            }
        }
    }

    let declared = frame.chunk_count();
    if walked != declared {
        state.diagnostics.push(Diagnostic::new(
            frame_index,
            frame.offset,
            DiagnosticKind::ChunkCountMismatch { declared, walked },
        ));
    }
    Ok(())
}
