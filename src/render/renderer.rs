use crate::game::{GameState, Position};

use super::font::{draw_text_centered, text_width};
use super::frame::{PixelBuffer, Rgb, FRAME_WIDTH};

/// Side of one grid cell in pixels (64 px / 16 cells)
pub const CELL_SIZE: i32 = 4;

const BACKGROUND: Rgb = Rgb::BLACK;
const BORDER: Rgb = Rgb::BLUE;
const FOOD: Rgb = Rgb::RED;
const LABEL: Rgb = Rgb::RED;
const SCORE: Rgb = Rgb::WHITE;

/// Brightness of the dimmest possible segment
const MIN_BRIGHTNESS: f32 = 0.3;

/// Turns game state into LED matrix frames
#[derive(Debug, Clone, Default)]
pub struct FrameRenderer;

impl FrameRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render the playfield: border, snake with a head-to-tail gradient, food
    pub fn render(&self, state: &GameState) -> PixelBuffer {
        let mut frame = PixelBuffer::filled(BACKGROUND);
        frame.stroke_border(BORDER);

        let len = state.snake.len();
        for (index, segment) in state.snake.segments().enumerate() {
            fill_cell(&mut frame, *segment, segment_color(index, len));
        }

        fill_cell(&mut frame, state.food, FOOD);

        frame
    }

    /// Render the static game-over screen with the final score
    pub fn render_game_over(&self, score: u32) -> PixelBuffer {
        let mut frame = PixelBuffer::filled(BACKGROUND);

        draw_text_centered(&mut frame, "GAME", 16, 2, LABEL);
        draw_text_centered(&mut frame, "OVER", 28, 2, LABEL);

        let readout = format!("SCORE:{score}");
        let readout = if text_width(&readout, 1) <= FRAME_WIDTH as i32 - 2 {
            readout
        } else {
            score.to_string()
        };
        draw_text_centered(&mut frame, &readout, 46, 1, SCORE);

        frame
    }
}

/// Green shade for segment `index` of a snake of `len` segments (head = 0)
pub fn segment_color(index: usize, len: usize) -> Rgb {
    let factor = 1.0 - index as f32 / len.max(1) as f32;
    let brightness = MIN_BRIGHTNESS + factor * (1.0 - MIN_BRIGHTNESS);
    Rgb::new(0, (brightness * 255.0) as u8, 0)
}

fn fill_cell(frame: &mut PixelBuffer, cell: Position, color: Rgb) {
    frame.fill_rect(
        cell.x * CELL_SIZE,
        cell.y * CELL_SIZE,
        CELL_SIZE,
        CELL_SIZE,
        color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Snake};

    fn state() -> GameState {
        GameState::new(
            Snake::new(Position::new(8, 8), Direction::Right, 3),
            Position::new(2, 3),
            Direction::Right,
        )
    }

    #[test]
    fn test_render_layout() {
        let frame = FrameRenderer::new().render(&state());

        // Border
        assert_eq!(frame.pixel(0, 0), BORDER);
        assert_eq!(frame.pixel(63, 40), BORDER);
        // Background
        assert_eq!(frame.pixel(20, 20), BACKGROUND);
        // Food cell (2,3) covers pixels 8..12 x 12..16
        assert_eq!(frame.pixel(8, 12), FOOD);
        assert_eq!(frame.pixel(11, 15), FOOD);
        assert_eq!(frame.count(FOOD), 16);
        // Head cell (8,8) is full brightness
        assert_eq!(frame.pixel(32, 32), Rgb::new(0, 255, 0));
        assert_eq!(frame.pixel(35, 35), Rgb::new(0, 255, 0));
    }

    #[test]
    fn test_gradient_dims_towards_tail() {
        let frame = FrameRenderer::new().render(&state());
        let head = frame.pixel(8 * 4, 32).g;
        let body = frame.pixel(7 * 4, 32).g;
        let tail = frame.pixel(6 * 4, 32).g;

        assert_eq!(head, 255);
        assert!(head > body && body > tail);
        assert!(tail >= (MIN_BRIGHTNESS * 255.0) as u8);
        assert_eq!(frame.pixel(6 * 4, 32).r, 0);
        assert_eq!(frame.pixel(6 * 4, 32).b, 0);
    }

    #[test]
    fn test_segment_color_bounds() {
        assert_eq!(segment_color(0, 10), Rgb::new(0, 255, 0));
        for len in 1..300 {
            let tail = segment_color(len - 1, len);
            assert!(tail.g >= 76, "tail too dark for len {len}");
        }
    }

    #[test]
    fn test_snake_overwrites_border() {
        let mut state = state();
        state.snake = Snake::new(Position::new(0, 0), Direction::Down, 1);
        let frame = FrameRenderer::new().render(&state);

        assert_eq!(frame.pixel(0, 0), Rgb::new(0, 255, 0));
        assert_eq!(frame.pixel(0, 8), BORDER);
    }

    #[test]
    fn test_game_over_screen() {
        let renderer = FrameRenderer::new();
        let frame = renderer.render_game_over(42);

        assert!(frame.count(LABEL) > 0);
        assert!(frame.count(SCORE) > 0);
        // No border on the game-over screen
        assert_eq!(frame.pixel(0, 0), BACKGROUND);
        // Label sits above the score readout
        let label_rows: Vec<usize> = (0..64)
            .filter(|y| (0..64).any(|x| frame.pixel(x, *y) == LABEL))
            .collect();
        let score_rows: Vec<usize> = (0..64)
            .filter(|y| (0..64).any(|x| frame.pixel(x, *y) == SCORE))
            .collect();
        assert!(label_rows.iter().max() < score_rows.iter().min());
    }

    #[test]
    fn test_game_over_depends_only_on_score() {
        let renderer = FrameRenderer::new();
        assert_eq!(renderer.render_game_over(7), renderer.render_game_over(7));
        assert_ne!(renderer.render_game_over(7), renderer.render_game_over(8));
    }

    #[test]
    fn test_game_over_huge_score_still_drawn() {
        let frame = FrameRenderer::new().render_game_over(u32::MAX);
        assert!(frame.count(SCORE) > 0);
    }
}
