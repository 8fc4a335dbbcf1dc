use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::frame::{PixelBuffer, Rgb};
use crate::modes::Snapshot;

/// Terminal preview of what the LED matrix is showing.
///
/// Each terminal cell shows two vertically stacked pixels using an upper
/// half block, so the 64x64 frame fits in 64 columns by 32 rows.
pub struct PreviewRenderer {
    device_label: String,
}

impl PreviewRenderer {
    pub fn new(device_label: impl Into<String>) -> Self {
        Self {
            device_label: device_label.into(),
        }
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Matrix
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(snapshot), chunks[0]);

        let matrix_area = centered(chunks[1], 64 + 2, 32 + 2);
        frame.render_widget(self.render_matrix(snapshot), matrix_area);

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_matrix(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        let (title, border) = if snapshot.is_game_over() {
            (" Game Over ", Color::Red)
        } else {
            (" Snake ", Color::White)
        };

        Paragraph::new(pixel_lines(&snapshot.frame)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(border))
                .title(title)
                .title_bottom(Line::from(format!(" {} ", self.device_label)).right_aligned()),
        )
    }

    fn render_stats(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        let stats = &snapshot.stats;
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(
                snapshot.score().to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(stats.best_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Games: ", label),
            Span::styled(stats.games_played.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(stats.round_clock(), value),
            Span::raw("    "),
            Span::styled("Frames: ", label),
            Span::styled(stats.frames_published.to_string(), value),
            Span::styled(
                format!(" ({} dropped)", stats.frames_dropped),
                if stats.frames_dropped > 0 {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default().fg(Color::DarkGray)
                },
            ),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to steer | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

/// Pair up pixel rows into lines of half-block cells
pub fn pixel_lines(buffer: &PixelBuffer) -> Vec<Line<'static>> {
    let rows: Vec<&[Rgb]> = buffer.rows().collect();

    rows.chunks(2)
        .map(|pair| {
            let top = pair[0];
            let bottom = pair.get(1).copied().unwrap_or(top);
            let spans: Vec<Span<'static>> = top
                .iter()
                .zip(bottom.iter())
                .map(|(upper, lower)| {
                    Span::styled(
                        "▀",
                        Style::default().fg(to_color(*upper)).bg(to_color(*lower)),
                    )
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn to_color(px: Rgb) -> Color {
    Color::Rgb(px.r, px.g, px.b)
}

/// A `width` x `height` rect centred in `area`, shrunk to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
