use serde::Serialize;

/// Decoded sprite document. Owns all of its data; nothing borrows from the
/// source buffer.
///
/// # Examples
/// ```
/// use asekit_core::{Cel, Document, Layer};
///
/// let document = Document {
///     width: 2,
///     height: 2,
///     frames: 1,
///     color_depth: 32,
///     frame_durations_ms: vec![100],
///     layers: vec![Layer { index: 0, name: "Base".to_string() }],
///     cels: vec![Cel {
///         layer_index: 0,
///         frame_index: 0,
///         x: 0,
///         y: 0,
///         width: 2,
///         height: 2,
///         opacity: 255,
///         pixels: vec![0xFF; 16],
///     }],
/// };
/// assert_eq!(document.cel(0, 0).map(|cel| cel.pixels.len()), Some(16));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Canvas width in pixels.
    pub width: u16,
    /// Canvas height in pixels.
    pub height: u16,
    /// Number of animation frames.
    pub frames: u16,
    /// Declared bits per pixel.
    pub color_depth: u16,
    /// Duration of each frame, in frame order.
    pub frame_durations_ms: Vec<u16>,
    /// Layers in declaration order.
    pub layers: Vec<Layer>,
    /// Decoded cels in file order.
    pub cels: Vec<Cel>,
}

impl Document {
    /// Cels whose raw layer reference equals `layer`.
    pub fn cels_for_layer(&self, layer: usize) -> impl Iterator<Item = &Cel> {
        self.cels
            .iter()
            .filter(move |cel| usize::from(cel.layer_index) == layer)
    }

    /// First cel for `layer` in `frame`, if any.
    pub fn cel(&self, layer: usize, frame: usize) -> Option<&Cel> {
        self.cels_for_layer(layer)
            .find(|cel| cel.frame_index == frame)
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layer {
    /// Position in declaration order, starting at 0.
    pub index: usize,
    /// Display name; may be empty and need not be unique.
    pub name: String,
}

/// One layer's image in one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cel {
    /// Raw layer reference as stored; not checked against the layer list.
    pub layer_index: u16,
    pub frame_index: usize,
    /// Placement on the canvas; negative values sit partly off-canvas.
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
    pub opacity: u8,
    /// Decompressed pixels, `width * height * bytes_per_pixel` bytes.
    pub pixels: Vec<u8>,
}

impl Cel {
    pub fn area(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    pub fn bytes_per_pixel(&self) -> usize {
        match self.area() {
            0 => 0,
            area => self.pixels.len() / area,
        }
    }

    /// Mirror the pixel buffer left to right, in place.
    pub fn flip_horizontal(&mut self) {
        let bpp = self.bytes_per_pixel();
        let width = usize::from(self.width);
        if bpp == 0 || width < 2 {
            return;
        }
        for row in self.pixels.chunks_exact_mut(width * bpp) {
            for x in 0..width / 2 {
                let left = x * bpp;
                let right = (width - 1 - x) * bpp;
                for k in 0..bpp {
                    row.swap(left + k, right + k);
                }
            }
        }
    }

    /// Copy of this cel mirrored left to right.
    pub fn flipped_horizontally(&self) -> Cel {
        let mut cel = self.clone();
        cel.flip_horizontal();
        cel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cel(layer_index: u16, frame_index: usize, width: u16, height: u16, pixels: Vec<u8>) -> Cel {
        Cel {
            layer_index,
            frame_index,
            x: 0,
            y: 0,
            width,
            height,
            opacity: 255,
            pixels,
        }
    }

    #[test]
    fn flip_swaps_whole_pixels() {
        let pixels = vec![
            1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, //
            4, 4, 4, 4, 5, 5, 5, 5, 6, 6, 6, 6,
        ];
        let flipped = cel(0, 0, 3, 2, pixels).flipped_horizontally();
        assert_eq!(
            flipped.pixels,
            vec![
                3, 3, 3, 3, 2, 2, 2, 2, 1, 1, 1, 1, //
                6, 6, 6, 6, 5, 5, 5, 5, 4, 4, 4, 4,
            ]
        );
    }

    #[test]
    fn flip_twice_restores() {
        let pixels: Vec<u8> = (0..32).collect();
        let original = cel(0, 0, 4, 2, pixels);
        let mut twice = original.flipped_horizontally();
        twice.flip_horizontal();
        assert_eq!(twice, original);
    }

    #[test]
    fn flip_empty_cel_is_noop() {
        let mut empty = cel(0, 0, 0, 0, Vec::new());
        empty.flip_horizontal();
        assert!(empty.pixels.is_empty());
        assert_eq!(empty.bytes_per_pixel(), 0);
    }

    #[test]
    fn lookup_by_layer_and_frame() {
        let document = Document {
            width: 1,
            height: 1,
            frames: 2,
            color_depth: 32,
            frame_durations_ms: vec![100, 100],
            layers: vec![
                Layer {
                    index: 0,
                    name: "Body".to_string(),
                },
                Layer {
                    index: 1,
                    name: "Hat".to_string(),
                },
            ],
            cels: vec![
                cel(0, 0, 1, 1, vec![1; 4]),
                cel(1, 0, 1, 1, vec![2; 4]),
                cel(0, 1, 1, 1, vec![3; 4]),
            ],
        };
        assert_eq!(document.cels_for_layer(0).count(), 2);
        assert_eq!(document.cel(0, 1).map(|c| c.pixels[0]), Some(3));
        assert_eq!(document.cel(1, 1), None);
        assert_eq!(document.layer(1).map(|l| l.name.as_str()), Some("Hat"));
        assert!(document.layer(2).is_none());
    }
}
