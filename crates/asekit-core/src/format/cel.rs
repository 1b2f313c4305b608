use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::diagnostics::DiagnosticKind;
use crate::document::Cel;

use super::chunks::Chunk;
use super::error::FormatError;
use super::layout;

/// Result of decoding one cel chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CelOutcome {
    Decoded(Cel),
    /// No cel was produced; the reason is recorded as a diagnostic.
    Skipped(DiagnosticKind),
}

/// Decode a cel chunk found in frame `frame`.
///
/// Only compressed-image cels are turned into `Cel`s. Other cel types and
/// payloads that fail to inflate to `width * height * bytes_per_pixel` bytes
/// are skipped. A chunk too short for the fixed cel fields is fatal.
pub fn decode_cel(
    chunk: &Chunk<'_>,
    frame: usize,
    bytes_per_pixel: usize,
) -> Result<CelOutcome, FormatError> {
    let reader = chunk.body_reader();
    require_cel_header(chunk, layout::CEL_TYPE_RANGE.end)?;

    let layer_index = reader.read_u16_le(layout::CEL_LAYER_RANGE.clone())?;
    let x = reader.read_i16_le(layout::CEL_X_RANGE.clone())?;
    let y = reader.read_i16_le(layout::CEL_Y_RANGE.clone())?;
    let opacity = reader.read_u8(layout::CEL_OPACITY_OFFSET)?;
    let cel_type = reader.read_u16_le(layout::CEL_TYPE_RANGE.clone())?;

    if cel_type != layout::CEL_TYPE_COMPRESSED {
        return Ok(CelOutcome::Skipped(DiagnosticKind::UnsupportedCelType {
            layer: layer_index,
            cel_type,
        }));
    }

    require_cel_header(chunk, layout::CEL_PAYLOAD_OFFSET)?;
    let width = reader.read_u16_le(layout::CEL_WIDTH_RANGE.clone())?;
    let height = reader.read_u16_le(layout::CEL_HEIGHT_RANGE.clone())?;
    let payload = reader.read_rest(layout::CEL_PAYLOAD_OFFSET)?;

    let expected = usize::from(width) * usize::from(height) * bytes_per_pixel;
    let pixels = match inflate(payload, expected) {
        Ok(pixels) => pixels,
        Err(message) => {
            return Ok(CelOutcome::Skipped(DiagnosticKind::CelPayload {
                layer: layer_index,
                message,
            }));
        }
    };
    if pixels.len() != expected {
        return Ok(CelOutcome::Skipped(DiagnosticKind::CelSize {
            layer: layer_index,
            expected,
            actual: pixels.len(),
        }));
    }

    Ok(CelOutcome::Decoded(Cel {
        layer_index,
        frame_index: frame,
        x,
        y,
        width,
        height,
        opacity,
        pixels,
    }))
}

fn require_cel_header(chunk: &Chunk<'_>, needed: usize) -> Result<(), FormatError> {
    if chunk.body.len() < needed {
        return Err(FormatError::CelHeaderTruncated {
            offset: chunk.offset,
            needed,
            actual: chunk.body.len(),
        });
    }
    Ok(())
}

/// Inflate a zlib stream, reading at most one byte past `expected` so an
/// oversized stream is detected without inflating all of it.
fn inflate(payload: &[u8], expected: usize) -> Result<Vec<u8>, String> {
    let mut pixels = Vec::new();
    ZlibDecoder::new(payload)
        .take(expected as u64 + 1)
        .read_to_end(&mut pixels)
        .map_err(|err| err.to_string())?;
    Ok(pixels)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::Compression;
    use flate2::write::ZlibEncoder;

    use super::{CelOutcome, decode_cel};
    use crate::diagnostics::DiagnosticKind;
    use crate::format::chunks::{Chunk, ChunkKind};
    use crate::format::error::FormatError;
    use crate::format::layout;

    fn compress(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn cel_body(layer: u16, x: i16, y: i16, cel_type: u16, w: u16, h: u16, payload: &[u8]) -> Vec<u8> {
        let mut body = vec![0u8; layout::CEL_PAYLOAD_OFFSET];
        body[layout::CEL_LAYER_RANGE.clone()].copy_from_slice(&layer.to_le_bytes());
        body[layout::CEL_X_RANGE.clone()].copy_from_slice(&x.to_le_bytes());
        body[layout::CEL_Y_RANGE.clone()].copy_from_slice(&y.to_le_bytes());
        body[layout::CEL_OPACITY_OFFSET] = 200;
        body[layout::CEL_TYPE_RANGE.clone()].copy_from_slice(&cel_type.to_le_bytes());
        body[layout::CEL_WIDTH_RANGE.clone()].copy_from_slice(&w.to_le_bytes());
        body[layout::CEL_HEIGHT_RANGE.clone()].copy_from_slice(&h.to_le_bytes());
        body.extend_from_slice(payload);
        body
    }

    fn chunk(body: &[u8]) -> Chunk<'_> {
        Chunk {
            offset: 200,
            size: (body.len() + layout::CHUNK_HEADER_SIZE) as u32,
            kind: ChunkKind::Cel,
            body,
        }
    }

    #[test]
    fn decodes_compressed_image() {
        let pixels: Vec<u8> = (0..16).collect();
        let body = cel_body(1, -3, 7, layout::CEL_TYPE_COMPRESSED, 2, 2, &compress(&pixels));
        let outcome = decode_cel(&chunk(&body), 4, 4).unwrap();
        let CelOutcome::Decoded(cel) = outcome else {
            panic!("expected decoded cel");
        };
        assert_eq!(cel.layer_index, 1);
        assert_eq!(cel.frame_index, 4);
        assert_eq!((cel.x, cel.y), (-3, 7));
        assert_eq!((cel.width, cel.height), (2, 2));
        assert_eq!(cel.opacity, 200);
        assert_eq!(cel.pixels, pixels);
    }

    #[test]
    fn decoded_length_follows_bytes_per_pixel() {
        let pixels = vec![9u8; 3 * 2 * 2];
        let body = cel_body(0, 0, 0, layout::CEL_TYPE_COMPRESSED, 3, 2, &compress(&pixels));
        let outcome = decode_cel(&chunk(&body), 0, 2).unwrap();
        assert!(matches!(outcome, CelOutcome::Decoded(cel) if cel.pixels.len() == 12));
    }

    #[test]
    fn raw_and_linked_cels_are_skipped() {
        for cel_type in [
            layout::CEL_TYPE_RAW,
            layout::CEL_TYPE_LINKED,
            layout::CEL_TYPE_TILEMAP,
        ] {
            let body = cel_body(2, 0, 0, cel_type, 1, 1, &[0, 0, 0, 0]);
            let outcome = decode_cel(&chunk(&body), 0, 4).unwrap();
            assert_eq!(
                outcome,
                CelOutcome::Skipped(DiagnosticKind::UnsupportedCelType { layer: 2, cel_type })
            );
        }
    }

    #[test]
    fn linked_cel_needs_only_short_header() {
        let mut body = cel_body(0, 0, 0, layout::CEL_TYPE_LINKED, 0, 0, &[]);
        body.truncate(layout::CEL_TYPE_RANGE.end + 2);
        let outcome = decode_cel(&chunk(&body), 0, 4).unwrap();
        assert!(matches!(outcome, CelOutcome::Skipped(DiagnosticKind::UnsupportedCelType { .. })));
    }

    #[test]
    fn corrupt_payload_is_skipped() {
        let body = cel_body(0, 0, 0, layout::CEL_TYPE_COMPRESSED, 2, 2, &[0xFF; 12]);
        let outcome = decode_cel(&chunk(&body), 0, 4).unwrap();
        assert!(matches!(
            outcome,
            CelOutcome::Skipped(DiagnosticKind::CelPayload { layer: 0, .. })
        ));
    }

    #[test]
    fn short_payload_is_skipped() {
        let body = cel_body(0, 0, 0, layout::CEL_TYPE_COMPRESSED, 2, 2, &compress(&[1; 12]));
        let outcome = decode_cel(&chunk(&body), 0, 4).unwrap();
        assert_eq!(
            outcome,
            CelOutcome::Skipped(DiagnosticKind::CelSize {
                layer: 0,
                expected: 16,
                actual: 12
            })
        );
    }

    #[test]
    fn oversized_payload_is_skipped() {
        let body = cel_body(0, 0, 0, layout::CEL_TYPE_COMPRESSED, 2, 2, &compress(&[1; 64]));
        let outcome = decode_cel(&chunk(&body), 0, 4).unwrap();
        assert_eq!(
            outcome,
            CelOutcome::Skipped(DiagnosticKind::CelSize {
                layer: 0,
                expected: 16,
                actual: 17
            })
        );
    }

    #[test]
    fn truncated_payload_never_yields_a_cel() {
        let pixels: Vec<u8> = (0..64u8).map(|i| i.wrapping_mul(37)).collect();
        let full = compress(&pixels);
        let body = cel_body(0, 0, 0, layout::CEL_TYPE_COMPRESSED, 4, 4, &full[..full.len() / 2]);
        let outcome = decode_cel(&chunk(&body), 0, 4).unwrap();
        assert!(matches!(outcome, CelOutcome::Skipped(_)));
    }

    #[test]
    fn header_shorter_than_cel_type() {
        let body = vec![0u8; 8];
        let err = decode_cel(&chunk(&body), 0, 4).unwrap_err();
        assert_eq!(
            err,
            FormatError::CelHeaderTruncated {
                offset: 200,
                needed: 9,
                actual: 8
            }
        );
    }

    #[test]
    fn compressed_header_shorter_than_dimensions() {
        let mut body = cel_body(0, 0, 0, layout::CEL_TYPE_COMPRESSED, 2, 2, &[]);
        body.truncate(18);
        let err = decode_cel(&chunk(&body), 0, 4).unwrap_err();
        assert!(matches!(err, FormatError::CelHeaderTruncated { needed: 20, actual: 18, .. }));
    }
}
