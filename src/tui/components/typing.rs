use ratatui::widgets::{Block, Padding, Paragraph, Widget};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};

/// Rows the indicator occupies in the transcript canvas.
pub const HEIGHT: u16 = 3;
/// Columns the indicator bubble spans.
pub const WIDTH: u16 = 12;

const FRAMES: [&str; 4] = ["·", "· ·", "· · ·", "· ·"];

/// Placeholder bubble shown while a reply is pending.
///
/// Its existence is derived from a single flag in app state and it is drawn
/// directly after the last transcript entry, so there can never be more than
/// one of it.
pub struct TypingIndicator {
    pub frame: usize,
}

impl Widget for TypingIndicator {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = Style::default().fg(Color::DarkGray);
        let block = Block::bordered()
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(style.add_modifier(Modifier::DIM))
            .title("agent")
            .title_style(style)
            .padding(Padding::horizontal(1));

        Paragraph::new(FRAMES[self.frame % FRAMES.len()])
            .style(style.add_modifier(Modifier::BOLD))
            .block(block)
            .render(area, buf);
    }
}
