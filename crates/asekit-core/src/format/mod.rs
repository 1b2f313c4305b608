//! Aseprite file decoding.
//!
//! The decoder follows a layered structure:
//! - `layout`: byte offsets, ranges and magic numbers (source of truth)
//! - `reader`: bounds-checked little-endian reads over a byte slice
//! - `header`: file and frame headers
//! - `chunks`: the per-frame chunk walker and chunk type dispatch
//! - `layer` / `cel`: chunk decoders (no direct byte indexing)
//! - `parser`: the frame loop that assembles a `Document`
//! - `error`: fatal, actionable errors
//!
//! Decoding is pure and performs no I/O; `source` loads files.

pub mod cel;
pub mod chunks;
pub mod error;
pub mod header;
pub mod layer;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::FormatError;
pub use header::{FileHeader, FrameHeader, read_file_header, read_frame_header, read_frame_headers};
pub use parser::{Decoded, parse_document};
