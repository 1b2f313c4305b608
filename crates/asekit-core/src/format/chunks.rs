use super::error::FormatError;
use super::header::FrameHeader;
use super::layout;
use super::reader::AseReader;

/// Chunk types the decoder dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    Layer,
    Cel,
    /// Any other type code: palettes, tags, user data, and whatever later
    /// format revisions add.
    Unknown(u16),
}

impl ChunkKind {
    pub fn from_code(code: u16) -> Self {
        match code {
            layout::CHUNK_TYPE_LAYER => ChunkKind::Layer,
            layout::CHUNK_TYPE_CEL => ChunkKind::Cel,
            other => ChunkKind::Unknown(other),
        }
    }

    pub fn code(self) -> u16 {
        match self {
            ChunkKind::Layer => layout::CHUNK_TYPE_LAYER,
            ChunkKind::Cel => layout::CHUNK_TYPE_CEL,
            ChunkKind::Unknown(code) => code,
        }
    }
}

/// One chunk of a frame, borrowed from the source buffer.
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
    /// Absolute offset of the chunk's size field.
    pub offset: usize,
    /// Declared size, prefix included.
    pub size: u32,
    pub kind: ChunkKind,
    /// Bytes after the 6-byte size/type prefix, up to the declared end.
    pub body: &'a [u8],
}

impl<'a> Chunk<'a> {
    /// Reader over the body, positioned so errors report absolute offsets.
    pub fn body_reader(&self) -> AseReader<'a> {
        AseReader::with_base(self.body, self.offset + layout::CHUNK_HEADER_SIZE)
    }
}

/// Iterates the chunks of one frame by their self-declared sizes.
///
/// The cursor always moves by exactly the declared chunk size, whatever the
/// chunk type. A size that is too small or that crosses the frame end yields
/// one error and ends the iteration.
#[derive(Debug, Clone)]
pub struct ChunkWalker<'a> {
    bytes: &'a [u8],
    cursor: usize,
    end: usize,
}

impl<'a> ChunkWalker<'a> {
    /// Walk the chunk stream of `frame`. `bytes` is the whole file and must
    /// contain the frame (see `read_frame_header`).
    pub fn new(bytes: &'a [u8], frame: &FrameHeader) -> Self {
        Self {
            bytes,
            cursor: frame.chunks_start(),
            end: frame.end(),
        }
    }

    /// Offset of the next chunk to read.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn end(&self) -> usize {
        self.end
    }

    fn next_chunk(&mut self) -> Result<Chunk<'a>, FormatError> {
        let offset = self.cursor;
        let remaining = self.end - offset;
        if remaining < layout::CHUNK_HEADER_SIZE {
            return Err(FormatError::ChunkHeaderTruncated { offset, remaining });
        }

        let frame_rest = AseReader::new(self.bytes).read_slice(offset..self.end)?;
        let frame_rest = AseReader::with_base(frame_rest, offset);
        let size = frame_rest.read_u32_le(layout::CHUNK_SIZE_RANGE.clone())?;
        let code = frame_rest.read_u16_le(layout::CHUNK_TYPE_RANGE.clone())?;

        if (size as usize) < layout::CHUNK_HEADER_SIZE {
            return Err(FormatError::ChunkTooSmall {
                offset,
                size,
                minimum: layout::CHUNK_HEADER_SIZE,
            });
        }
        if size as usize > remaining {
            return Err(FormatError::ChunkOverrun {
                offset,
                size,
                frame_end: self.end,
            });
        }

        let body = frame_rest.read_slice(layout::CHUNK_HEADER_SIZE..size as usize)?;
        self.cursor = offset + size as usize;
        Ok(Chunk {
            offset,
            size,
            kind: ChunkKind::from_code(code),
            body,
        })
    }
}

impl<'a> Iterator for ChunkWalker<'a> {
    type Item = Result<Chunk<'a>, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.end {
            return None;
        }
        let chunk = self.next_chunk();
        if chunk.is_err() {
            self.cursor = self.end;
        }
        Some(chunk)
    }
}
