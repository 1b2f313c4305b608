use thiserror::Error;

/// Fatal decoding errors. Any of these aborts the whole parse.
///
/// # Examples
/// ```
/// use asekit_core::FormatError;
///
/// let err = FormatError::TooShort { needed: 128, actual: 100 };
/// assert!(err.to_string().contains("buffer too short"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("buffer too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("invalid file magic: expected {expected:#06x}, got {actual:#06x}")]
    BadMagic { expected: u16, actual: u16 },
    #[error("invalid magic in frame {frame}: expected {expected:#06x}, got {actual:#06x}")]
    BadFrameMagic {
        frame: usize,
        expected: u16,
        actual: u16,
    },
    #[error("frame {frame} declares {length} bytes, smaller than its header")]
    FrameTooShort { frame: usize, length: u32 },
    #[error("frame {frame} at offset {offset} declares {length} bytes, past end of buffer ({buffer_len})")]
    FrameOutOfBounds {
        frame: usize,
        offset: usize,
        length: u32,
        buffer_len: usize,
    },
    #[error("corrupt chunk at offset {offset}: only {remaining} bytes left in frame for a chunk header")]
    ChunkHeaderTruncated { offset: usize, remaining: usize },
    #[error("corrupt chunk at offset {offset}: size {size} below minimum of {minimum}")]
    ChunkTooSmall {
        offset: usize,
        size: u32,
        minimum: usize,
    },
    #[error("corrupt chunk at offset {offset}: size {size} overruns frame end at {frame_end}")]
    ChunkOverrun {
        offset: usize,
        size: u32,
        frame_end: usize,
    },
    #[error("malformed string at offset {offset}: length {length} exceeds chunk bounds")]
    MalformedString { offset: usize, length: u16 },
    #[error("cel chunk at offset {offset} too short for its header: need {needed} bytes, got {actual}")]
    CelHeaderTruncated {
        offset: usize,
        needed: usize,
        actual: usize,
    },
}
