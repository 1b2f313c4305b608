use crate::document::Layer;

use super::chunks::Chunk;
use super::error::FormatError;
use super::layout;

/// Decode a layer chunk into the layer numbered `index`.
///
/// Only the name is extracted; flags, layer type, blend mode and opacity sit
/// before it and are skipped.
pub fn decode_layer(chunk: &Chunk<'_>, index: usize) -> Result<Layer, FormatError> {
    let name = chunk
        .body_reader()
        .read_sized_string(layout::LAYER_NAME_OFFSET)?;
    Ok(Layer { index, name })
}

#[cfg(test)]
mod tests {
    use super::decode_layer;
    use crate::format::chunks::{Chunk, ChunkKind};
    use crate::format::error::FormatError;
    use crate::format::layout;

    fn layer_body(name: &[u8], declared_len: u16) -> Vec<u8> {
        let mut body = vec![0u8; layout::LAYER_NAME_OFFSET];
        body.extend_from_slice(&declared_len.to_le_bytes());
        body.extend_from_slice(name);
        body
    }

    fn chunk(body: &[u8]) -> Chunk<'_> {
        Chunk {
            offset: 144,
            size: (body.len() + layout::CHUNK_HEADER_SIZE) as u32,
            kind: ChunkKind::Layer,
            body,
        }
    }

    #[test]
    fn decodes_name() {
        let body = layer_body(b"Base", 4);
        let layer = decode_layer(&chunk(&body), 3).unwrap();
        assert_eq!(layer.index, 3);
        assert_eq!(layer.name, "Base");
    }

    #[test]
    fn decodes_empty_name() {
        let body = layer_body(b"", 0);
        let layer = decode_layer(&chunk(&body), 0).unwrap();
        assert_eq!(layer.name, "");
    }

    #[test]
    fn ignores_bytes_after_name() {
        let mut body = layer_body("Ombre".as_bytes(), 5);
        body.extend_from_slice(&[0xAA; 4]);
        let layer = decode_layer(&chunk(&body), 0).unwrap();
        assert_eq!(layer.name, "Ombre");
    }

    #[test]
    fn name_past_chunk_end() {
        let body = layer_body(b"Base", 40);
        let err = decode_layer(&chunk(&body), 0).unwrap_err();
        assert_eq!(
            err,
            FormatError::MalformedString {
                offset: 144 + layout::CHUNK_HEADER_SIZE + layout::LAYER_NAME_OFFSET,
                length: 40
            }
        );
    }

    #[test]
    fn body_too_short_for_name_length() {
        let body = vec![0u8; layout::LAYER_NAME_OFFSET + 1];
        let err = decode_layer(&chunk(&body), 0).unwrap_err();
        assert!(matches!(err, FormatError::TooShort { .. }));
    }
}
