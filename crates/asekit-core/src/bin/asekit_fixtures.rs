use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::ZlibEncoder;

const FILE_HEADER_SIZE: usize = 128;
const FILE_MAGIC: u16 = 0xA5E0;
const FRAME_MAGIC: u16 = 0xF1FA;
const LEGACY_CHUNK_COUNT_SENTINEL: u16 = 0xFFFF;
const COLOR_DEPTH_RGBA: u16 = 32;

const CHUNK_OLD_PALETTE: u16 = 0x0004;
const CHUNK_LAYER: u16 = 0x2004;
const CHUNK_CEL: u16 = 0x2005;
const CHUNK_COLOR_PROFILE: u16 = 0x2007;
const CHUNK_TAGS: u16 = 0x2018;
const CHUNK_PALETTE: u16 = 0x2019;

const CEL_TYPE_RAW: u16 = 0;
const CEL_TYPE_LINKED: u16 = 1;
const CEL_TYPE_COMPRESSED: u16 = 2;

fn main() -> Result<(), String> {
    let root = PathBuf::from("tests/golden");
    write_basic(&root)?;
    write_unknown_chunks(&root)?;
    write_skipped_cels(&root)?;
    write_new_chunk_count(&root)?;
    Ok(())
}

fn write_basic(root: &Path) -> Result<(), String> {
    let frames = vec![
        FrameSpec::new(100)
            .chunk(layer("Body"))
            .chunk(layer("Hat"))
            .chunk(compressed_cel(0, 0, 0, 255, 4, 4, &pixels(4, 4, 1))?)
            .chunk(compressed_cel(1, 1, -1, 128, 2, 2, &pixels(2, 2, 2))?),
        FrameSpec::new(150)
            .chunk(compressed_cel(0, 0, 0, 255, 4, 4, &pixels(4, 4, 3))?)
            .chunk(compressed_cel(1, 2, -1, 128, 2, 2, &pixels(2, 2, 4))?),
    ];
    write_sprite(root.join("basic").join("input.aseprite"), 4, 4, frames)
}

fn write_unknown_chunks(root: &Path) -> Result<(), String> {
    let mut palette = Vec::new();
    palette.extend_from_slice(&1u32.to_le_bytes());
    palette.extend_from_slice(&[0u8; 16]);
    palette.extend_from_slice(&[0, 0, 0, 0, 0, 255]);

    let frames = vec![
        FrameSpec::new(100)
            .chunk(chunk(CHUNK_OLD_PALETTE, &[1, 0, 0, 1, 0x10, 0x20, 0x30]))
            .chunk(chunk(CHUNK_COLOR_PROFILE, &[1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]))
            .chunk(chunk(CHUNK_PALETTE, &palette))
            .chunk(layer("Base"))
            .chunk(chunk(CHUNK_TAGS, &[0u8; 10]))
            .chunk(compressed_cel(0, 0, 0, 255, 2, 2, &pixels(2, 2, 9))?),
    ];
    write_sprite(root.join("unknown_chunks").join("input.aseprite"), 2, 2, frames)
}

fn write_skipped_cels(root: &Path) -> Result<(), String> {
    let frames = vec![
        FrameSpec::new(80)
            .chunk(layer("Base"))
            .chunk(layer("Shadow"))
            .chunk(compressed_cel(0, 0, 0, 255, 2, 2, &pixels(2, 2, 5))?)
            .chunk(cel(1, 0, 0, 255, CEL_TYPE_RAW, 2, 2, &pixels(2, 2, 6))),
        FrameSpec::new(80)
            .chunk(linked_cel(0, 0))
            .chunk(compressed_cel(1, 0, 0, 255, 2, 2, &pixels(2, 1, 7))?)
            .chunk(compressed_cel(1, 0, 1, 64, 2, 1, &pixels(2, 1, 8))?),
    ];
    write_sprite(root.join("skipped_cels").join("input.aseprite"), 2, 2, frames)
}

fn write_new_chunk_count(root: &Path) -> Result<(), String> {
    let frames = vec![
        FrameSpec::new(100)
            .chunk(layer("Only"))
            .chunk(compressed_cel(0, -2, -2, 255, 3, 3, &pixels(3, 3, 11))?)
            .counts(LEGACY_CHUNK_COUNT_SENTINEL, 2),
        FrameSpec::new(100).chunk(layer("Late")).counts(3, 0),
    ];
    write_sprite(root.join("new_chunk_count").join("input.aseprite"), 3, 3, frames)
}

struct FrameSpec {
    duration_ms: u16,
    chunks: Vec<Vec<u8>>,
    counts: Option<(u16, u32)>,
}

impl FrameSpec {
    fn new(duration_ms: u16) -> Self {
        Self {
            duration_ms,
            chunks: Vec::new(),
            counts: None,
        }
    }

    fn chunk(mut self, chunk: Vec<u8>) -> Self {
        self.chunks.push(chunk);
        self
    }

    fn counts(mut self, legacy: u16, new: u32) -> Self {
        self.counts = Some((legacy, new));
        self
    }

    fn encode(&self) -> Vec<u8> {
        let body = self.chunks.concat();
        let (legacy, new) = self.counts.unwrap_or((self.chunks.len() as u16, 0));
        let mut bytes = Vec::with_capacity(16 + body.len());
        bytes.extend_from_slice(&((16 + body.len()) as u32).to_le_bytes());
        bytes.extend_from_slice(&FRAME_MAGIC.to_le_bytes());
        bytes.extend_from_slice(&legacy.to_le_bytes());
        bytes.extend_from_slice(&self.duration_ms.to_le_bytes());
        bytes.extend_from_slice(&[0, 0]);
        bytes.extend_from_slice(&new.to_le_bytes());
        bytes.extend_from_slice(&body);
        bytes
    }
}

fn write_sprite(path: PathBuf, width: u16, height: u16, frames: Vec<FrameSpec>) -> Result<(), String> {
    let body: Vec<u8> = frames.iter().flat_map(FrameSpec::encode).collect();
    let total = FILE_HEADER_SIZE + body.len();

    let mut bytes = Vec::with_capacity(total);
    bytes.extend_from_slice(&(total as u32).to_le_bytes());
    bytes.extend_from_slice(&FILE_MAGIC.to_le_bytes());
    bytes.extend_from_slice(&(frames.len() as u16).to_le_bytes());
    bytes.extend_from_slice(&width.to_le_bytes());
    bytes.extend_from_slice(&height.to_le_bytes());
    bytes.extend_from_slice(&COLOR_DEPTH_RGBA.to_le_bytes());
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&100u16.to_le_bytes());
    bytes.resize(FILE_HEADER_SIZE, 0);
    bytes.extend_from_slice(&body);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("create {}: {e}", parent.display()))?;
    }
    fs::write(&path, bytes).map_err(|e| format!("write {}: {e}", path.display()))
}

fn chunk(code: u16, body: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(6 + body.len());
    bytes.extend_from_slice(&((6 + body.len()) as u32).to_le_bytes());
    bytes.extend_from_slice(&code.to_le_bytes());
    bytes.extend_from_slice(body);
    bytes
}

fn layer(name: &str) -> Vec<u8> {
    let mut body = Vec::new();
    // flags (visible | editable), then type, child level, default size, blend mode
    body.extend_from_slice(&3u16.to_le_bytes());
    body.extend_from_slice(&[0u8; 10]);
    body.push(255);
    body.extend_from_slice(&[0u8; 3]);
    body.extend_from_slice(&(name.len() as u16).to_le_bytes());
    body.extend_from_slice(name.as_bytes());
    chunk(CHUNK_LAYER, &body)
}

fn cel_header(layer: u16, x: i16, y: i16, opacity: u8, cel_type: u16) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&layer.to_le_bytes());
    body.extend_from_slice(&x.to_le_bytes());
    body.extend_from_slice(&y.to_le_bytes());
    body.push(opacity);
    body.extend_from_slice(&cel_type.to_le_bytes());
    body.extend_from_slice(&[0u8; 7]);
    body
}

#[allow(clippy::too_many_arguments)]
fn cel(layer: u16, x: i16, y: i16, opacity: u8, cel_type: u16, w: u16, h: u16, payload: &[u8]) -> Vec<u8> {
    let mut body = cel_header(layer, x, y, opacity, cel_type);
    body.extend_from_slice(&w.to_le_bytes());
    body.extend_from_slice(&h.to_le_bytes());
    body.extend_from_slice(payload);
    chunk(CHUNK_CEL, &body)
}

fn compressed_cel(
    layer: u16,
    x: i16,
    y: i16,
    opacity: u8,
    w: u16,
    h: u16,
    pixels: &[u8],
) -> Result<Vec<u8>, String> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(pixels)
        .map_err(|e| format!("compress cel: {e}"))?;
    let payload = encoder.finish().map_err(|e| format!("compress cel: {e}"))?;
    Ok(cel(layer, x, y, opacity, CEL_TYPE_COMPRESSED, w, h, &payload))
}

fn linked_cel(layer: u16, frame_position: u16) -> Vec<u8> {
    let mut body = cel_header(layer, 0, 0, 255, CEL_TYPE_LINKED);
    body.extend_from_slice(&frame_position.to_le_bytes());
    chunk(CHUNK_CEL, &body)
}

fn pixels(width: usize, height: usize, seed: u8) -> Vec<u8> {
    (0..width * height * 4)
        .map(|i| (i as u8).wrapping_mul(7).wrapping_add(seed))
        .collect()
}
