use std::ops::Range;

// File header, relative to the start of the file.
pub const FILE_HEADER_SIZE: usize = 128;
pub const FILE_SIZE_RANGE: Range<usize> = 0..4;
pub const FILE_MAGIC_RANGE: Range<usize> = 4..6;
pub const FRAME_COUNT_RANGE: Range<usize> = 6..8;
pub const WIDTH_RANGE: Range<usize> = 8..10;
pub const HEIGHT_RANGE: Range<usize> = 10..12;
pub const COLOR_DEPTH_RANGE: Range<usize> = 12..14;

pub const FILE_MAGIC: u16 = 0xA5E0;

// Frame header, relative to the start of the frame.
pub const FRAME_HEADER_SIZE: usize = 16;
pub const FRAME_BYTES_RANGE: Range<usize> = 0..4;
pub const FRAME_MAGIC_RANGE: Range<usize> = 4..6;
pub const FRAME_LEGACY_CHUNKS_RANGE: Range<usize> = 6..8;
pub const FRAME_DURATION_RANGE: Range<usize> = 8..10;
pub const FRAME_CHUNKS_RANGE: Range<usize> = 12..16;

pub const FRAME_MAGIC: u16 = 0xF1FA;
pub const LEGACY_CHUNK_COUNT_SENTINEL: u16 = 0xFFFF;

// Chunk prefix, relative to the start of the chunk.
pub const CHUNK_SIZE_RANGE: Range<usize> = 0..4;
pub const CHUNK_TYPE_RANGE: Range<usize> = 4..6;
pub const CHUNK_HEADER_SIZE: usize = 6;

pub const CHUNK_TYPE_LAYER: u16 = 0x2004;
pub const CHUNK_TYPE_CEL: u16 = 0x2005;

// Layer chunk body, relative to the end of the chunk prefix.
pub const LAYER_NAME_OFFSET: usize = 16;
pub const STRING_LENGTH_SIZE: usize = 2;

// Cel chunk body, relative to the end of the chunk prefix.
pub const CEL_LAYER_RANGE: Range<usize> = 0..2;
pub const CEL_X_RANGE: Range<usize> = 2..4;
pub const CEL_Y_RANGE: Range<usize> = 4..6;
pub const CEL_OPACITY_OFFSET: usize = 6;
pub const CEL_TYPE_RANGE: Range<usize> = 7..9;
pub const CEL_WIDTH_RANGE: Range<usize> = 16..18;
pub const CEL_HEIGHT_RANGE: Range<usize> = 18..20;
pub const CEL_PAYLOAD_OFFSET: usize = 20;

pub const CEL_TYPE_RAW: u16 = 0;
pub const CEL_TYPE_LINKED: u16 = 1;
pub const CEL_TYPE_COMPRESSED: u16 = 2;
pub const CEL_TYPE_TILEMAP: u16 = 3;

pub const COLOR_DEPTH_RGBA: u16 = 32;
pub const COLOR_DEPTH_GRAYSCALE: u16 = 16;
pub const COLOR_DEPTH_INDEXED: u16 = 8;
