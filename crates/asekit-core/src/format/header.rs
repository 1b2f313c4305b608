use serde::{Deserialize, Serialize};

use super::error::FormatError;
use super::layout;
use super::reader::AseReader;

/// Fields of the fixed 128-byte file header that the decoder consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHeader {
    /// Total file size as declared by the file itself.
    pub file_size: u32,
    pub frame_count: u16,
    pub width: u16,
    pub height: u16,
    /// Bits per pixel: 32 (RGBA), 16 (grayscale), 8 (indexed).
    pub color_depth: u16,
}

impl FileHeader {
    /// Bytes per stored pixel for the declared color depth.
    ///
    /// Unknown depths fall back to RGBA.
    pub fn bytes_per_pixel(&self) -> usize {
        match self.color_depth {
            layout::COLOR_DEPTH_GRAYSCALE => 2,
            layout::COLOR_DEPTH_INDEXED => 1,
            _ => 4,
        }
    }
}

/// Fixed 16-byte header preceding each frame's chunk stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameHeader {
    /// Absolute offset of the frame (and of this header) in the file.
    pub offset: usize,
    /// Frame byte length, header included.
    pub length: u32,
    pub legacy_chunk_count: u16,
    pub duration_ms: u16,
    pub new_chunk_count: u32,
}

impl FrameHeader {
    /// Chunk count, preferring the 4-byte field when the legacy one holds
    /// the `0xFFFF` sentinel.
    pub fn chunk_count(&self) -> u32 {
        if self.legacy_chunk_count == layout::LEGACY_CHUNK_COUNT_SENTINEL {
            self.new_chunk_count
        } else {
            u32::from(self.legacy_chunk_count)
        }
    }

    /// Offset of the first chunk.
    pub fn chunks_start(&self) -> usize {
        self.offset + layout::FRAME_HEADER_SIZE
    }

    /// Offset one past the last byte of the frame.
    pub fn end(&self) -> usize {
        self.offset + self.length as usize
    }
}

/// Read and validate the file header.
///
/// # Errors
/// Returns `FormatError::TooShort` when the buffer cannot hold the header or
/// is shorter than the declared file size, and `FormatError::BadMagic` when
/// the magic number does not match.
pub fn read_file_header(bytes: &[u8]) -> Result<FileHeader, FormatError> {
    let reader = AseReader::new(bytes);
    reader.require_len(layout::FILE_HEADER_SIZE)?;

    let magic = reader.read_u16_le(layout::FILE_MAGIC_RANGE.clone())?;
    if magic != layout::FILE_MAGIC {
        return Err(FormatError::BadMagic {
            expected: layout::FILE_MAGIC,
            actual: magic,
        });
    }

    let file_size = reader.read_u32_le(layout::FILE_SIZE_RANGE.clone())?;
    reader.require_len(file_size as usize)?;

    Ok(FileHeader {
        file_size,
        frame_count: reader.read_u16_le(layout::FRAME_COUNT_RANGE.clone())?,
        width: reader.read_u16_le(layout::WIDTH_RANGE.clone())?,
        height: reader.read_u16_le(layout::HEIGHT_RANGE.clone())?,
        color_depth: reader.read_u16_le(layout::COLOR_DEPTH_RANGE.clone())?,
    })
}

/// Read and validate the header of frame number `frame` starting at `offset`.
///
/// The whole frame must fit in `bytes`.
pub fn read_frame_header(
    bytes: &[u8],
    offset: usize,
    frame: usize,
) -> Result<FrameHeader, FormatError> {
    let header = AseReader::new(bytes).read_slice(offset..offset + layout::FRAME_HEADER_SIZE)?;
    let reader = AseReader::with_base(header, offset);

    let length = reader.read_u32_le(layout::FRAME_BYTES_RANGE.clone())?;
    let magic = reader.read_u16_le(layout::FRAME_MAGIC_RANGE.clone())?;
    if magic != layout::FRAME_MAGIC {
        return Err(FormatError::BadFrameMagic {
            frame,
            expected: layout::FRAME_MAGIC,
            actual: magic,
        });
    }
    if (length as usize) < layout::FRAME_HEADER_SIZE {
        return Err(FormatError::FrameTooShort { frame, length });
    }
    let fits = offset
        .checked_add(length as usize)
        .is_some_and(|end| end <= bytes.len());
    if !fits {
        return Err(FormatError::FrameOutOfBounds {
            frame,
            offset,
            length,
            buffer_len: bytes.len(),
        });
    }

    Ok(FrameHeader {
        offset,
        length,
        legacy_chunk_count: reader.read_u16_le(layout::FRAME_LEGACY_CHUNKS_RANGE.clone())?,
        duration_ms: reader.read_u16_le(layout::FRAME_DURATION_RANGE.clone())?,
        new_chunk_count: reader.read_u32_le(layout::FRAME_CHUNKS_RANGE.clone())?,
    })
}

/// Read every frame header declared by the file header, in order.
pub fn read_frame_headers(
    bytes: &[u8],
    file: &FileHeader,
) -> Result<Vec<FrameHeader>, FormatError> {
    let mut frames = Vec::with_capacity(file.frame_count as usize);
    let mut offset = layout::FILE_HEADER_SIZE;
    for frame in 0..file.frame_count as usize {
        let header = read_frame_header(bytes, offset, frame)?;
        offset = header.end();
        frames.push(header);
    }
    Ok(frames)
}
