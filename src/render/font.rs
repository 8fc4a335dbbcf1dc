//! A 3x5 pixel bitmap font, enough for the game-over screen.

use super::frame::{PixelBuffer, Rgb, FRAME_WIDTH};

pub const GLYPH_WIDTH: i32 = 3;
pub const GLYPH_HEIGHT: i32 = 5;
/// Blank columns between glyphs, before scaling
const GLYPH_SPACING: i32 = 1;

/// Rows of a glyph, top to bottom. Bit 2 is the leftmost column.
type Glyph = [u8; 5];

fn glyph(c: char) -> Option<Glyph> {
    let rows = match c.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        ' ' => [0; 5],
        _ => return None,
    };
    Some(rows)
}

/// Width in pixels of `text` drawn at `scale`
pub fn text_width(text: &str, scale: i32) -> i32 {
    let count = text.chars().count() as i32;
    if count == 0 {
        return 0;
    }
    (count * GLYPH_WIDTH + (count - 1) * GLYPH_SPACING) * scale
}

/// Draw `text` with its top-left corner at (x, y).
///
/// Characters without a glyph advance like a space.
pub fn draw_text(frame: &mut PixelBuffer, text: &str, x: i32, y: i32, scale: i32, color: Rgb) {
    let advance = (GLYPH_WIDTH + GLYPH_SPACING) * scale;

    for (i, c) in text.chars().enumerate() {
        let Some(rows) = glyph(c) else {
            continue;
        };
        let left = x + i as i32 * advance;

        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (0b100u8 >> col) != 0 {
                    frame.fill_rect(
                        left + col * scale,
                        y + row as i32 * scale,
                        scale,
                        scale,
                        color,
                    );
                }
            }
        }
    }
}

/// Draw `text` horizontally centred on the frame, top edge at `y`
pub fn draw_text_centered(frame: &mut PixelBuffer, text: &str, y: i32, scale: i32, color: Rgb) {
    let x = (FRAME_WIDTH as i32 - text_width(text, scale)) / 2;
    draw_text(frame, text, x, y, scale, color);
}
