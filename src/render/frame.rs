use std::fmt;

/// Width of the LED matrix in pixels
pub const FRAME_WIDTH: usize = 64;
/// Height of the LED matrix in pixels
pub const FRAME_HEIGHT: usize = 64;

/// An opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A 64x64 frame, row-major with the origin at the top left.
///
/// The size is fixed at construction, so every buffer handed to the
/// encoder has exactly `FRAME_WIDTH * FRAME_HEIGHT` pixels.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Box<[Rgb]>,
}

impl PixelBuffer {
    /// A frame filled with a single color
    pub fn filled(color: Rgb) -> Self {
        Self {
            pixels: vec![color; FRAME_WIDTH * FRAME_HEIGHT].into_boxed_slice(),
        }
    }

    pub fn width(&self) -> usize {
        FRAME_WIDTH
    }

    pub fn height(&self) -> usize {
        FRAME_HEIGHT
    }

    /// Color at (x, y). Panics when out of range.
    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * FRAME_WIDTH + x]
    }

    /// Set a pixel; writes outside the frame are clipped
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x < FRAME_WIDTH && y < FRAME_HEIGHT {
            self.pixels[y * FRAME_WIDTH + x] = color;
        }
    }

    /// Fill a `width` x `height` rectangle whose top-left corner is (x, y)
    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Rgb) {
        for py in y..y + height {
            for px in x..x + width {
                self.set_pixel(px, py, color);
            }
        }
    }

    /// Draw a one pixel outline along the frame edges
    pub fn stroke_border(&mut self, color: Rgb) {
        let (w, h) = (FRAME_WIDTH as i32, FRAME_HEIGHT as i32);
        self.fill_rect(0, 0, w, 1, color);
        self.fill_rect(0, h - 1, w, 1, color);
        self.fill_rect(0, 0, 1, h, color);
        self.fill_rect(w - 1, 0, 1, h, color);
    }

    /// All pixels in row-major order
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Iterate over rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Rgb]> + '_ {
        self.pixels.chunks_exact(FRAME_WIDTH)
    }

    /// Flatten to R,G,B bytes in row-major order
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for px in self.pixels.iter() {
            bytes.extend_from_slice(&[px.r, px.g, px.b]);
        }
        bytes
    }

    /// Rebuild a frame from R,G,B bytes, if the length matches exactly
    pub fn from_rgb_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != FRAME_WIDTH * FRAME_HEIGHT * 3 {
            return None;
        }
        let pixels = bytes
            .chunks_exact(3)
            .map(|c| Rgb::new(c[0], c[1], c[2]))
            .collect();
        Some(Self { pixels })
    }

    /// Number of pixels with the given color
    pub fn count(&self, color: Rgb) -> usize {
        self.pixels.iter().filter(|px| **px == color).count()
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::filled(Rgb::BLACK)
    }
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &FRAME_WIDTH)
            .field("height", &FRAME_HEIGHT)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_is_clipped() {
        let mut frame = PixelBuffer::default();
        frame.fill_rect(62, 62, 4, 4, Rgb::RED);

        assert_eq!(frame.count(Rgb::RED), 4);
        assert_eq!(frame.pixel(63, 63), Rgb::RED);

        frame.fill_rect(-2, -2, 3, 3, Rgb::WHITE);
        assert_eq!(frame.count(Rgb::WHITE), 1);
        assert_eq!(frame.pixel(0, 0), Rgb::WHITE);
    }

    #[test]
    fn test_border() {
        let mut frame = PixelBuffer::default();
        frame.stroke_border(Rgb::BLUE);

        assert_eq!(frame.count(Rgb::BLUE), 4 * 64 - 4);
        assert_eq!(frame.pixel(0, 31), Rgb::BLUE);
        assert_eq!(frame.pixel(63, 31), Rgb::BLUE);
        assert_eq!(frame.pixel(31, 63), Rgb::BLUE);
        assert_eq!(frame.pixel(1, 1), Rgb::BLACK);
    }

    #[test]
    fn test_rgb_bytes_are_row_major() {
        let mut frame = PixelBuffer::default();
        frame.set_pixel(1, 0, Rgb::new(1, 2, 3));
        frame.set_pixel(0, 1, Rgb::new(4, 5, 6));

        let bytes = frame.to_rgb_bytes();
        assert_eq!(bytes.len(), 64 * 64 * 3);
        assert_eq!(&bytes[3..6], &[1, 2, 3]);
        assert_eq!(&bytes[64 * 3..64 * 3 + 3], &[4, 5, 6]);

        assert_eq!(PixelBuffer::from_rgb_bytes(&bytes), Some(frame));
        assert_eq!(PixelBuffer::from_rgb_bytes(&bytes[1..]), None);
    }
}
