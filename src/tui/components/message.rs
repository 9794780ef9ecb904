use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Text;
use ratatui::widgets::{Block, Padding, Paragraph, Widget, Wrap};

use crate::core::state::{ChatMessage, Role};
use crate::tui::component::Component;
use crate::tui::markdown;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// A single transcript entry: a bordered bubble titled by role.
///
/// Stateless and created fresh each frame. Formatted agent text goes through
/// the markdown renderer; everything else renders literally, so a plain
/// status string can never introduce markup.
#[derive(Clone, Copy)]
pub struct MessageBubble<'a> {
    pub message: &'a ChatMessage,
}

impl<'a> MessageBubble<'a> {
    pub fn new(message: &'a ChatMessage) -> Self {
        Self { message }
    }

    /// Predict the rendered height for a given total width.
    ///
    /// Uses the same paragraph construction as `render`, so the measured
    /// line count matches the drawn one exactly. That lets the transcript
    /// view place entries in a scroll canvas without rendering them first.
    pub fn calculate_height(message: &ChatMessage, width: u16) -> u16 {
        let inner = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if inner == 0 {
            // Terminal too narrow for borders + padding; still takes one row.
            return 1;
        }
        let lines = body_paragraph(message).line_count(inner) as u16;
        lines.max(1) + VERTICAL_OVERHEAD
    }
}

fn role_title(role: Role) -> &'static str {
    match role {
        Role::User => "you",
        Role::Agent => "agent",
    }
}

fn role_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::Cyan),
        Role::Agent => Style::default().fg(Color::Green),
    }
}

/// Build the body paragraph. Shared by height calculation and rendering so
/// the two can never disagree.
fn body_paragraph(message: &ChatMessage) -> Paragraph<'static> {
    let body: Text<'static> = if message.formatted && message.role == Role::Agent {
        markdown::render(message.text.trim(), Color::Green)
    } else {
        Text::raw(message.text.trim().to_string())
    };
    Paragraph::new(body)
        .style(role_style(message.role))
        .wrap(Wrap { trim: false })
}

impl Widget for MessageBubble<'_> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = role_style(self.message.role);
        let block = Block::bordered()
            .title(role_title(self.message.role))
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(style.add_modifier(Modifier::DIM))
            .title_style(style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner = block.inner(area);
        block.render(area, buf);
        body_paragraph(self.message).render(inner, buf);
    }
}

impl Component for MessageBubble<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_of_empty_message_is_borders_only() {
        let message = ChatMessage::user("");
        assert_eq!(
            MessageBubble::calculate_height(&message, 80),
            VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn height_zero_width_degenerates_to_one_row() {
        let message = ChatMessage::user("hello");
        assert_eq!(MessageBubble::calculate_height(&message, 0), 1);
        assert_eq!(
            MessageBubble::calculate_height(&message, HORIZONTAL_OVERHEAD),
            1
        );
    }

    #[test]
    fn height_single_line_fits() {
        let message = ChatMessage::user("hello");
        assert_eq!(
            MessageBubble::calculate_height(&message, 80),
            1 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn height_grows_when_text_wraps() {
        let message = ChatMessage::user("hello world again");
        let wide = MessageBubble::calculate_height(&message, 80);
        let narrow = MessageBubble::calculate_height(&message, 12);
        assert!(narrow > wide, "narrow={narrow} wide={wide}");
    }

    #[test]
    fn formatted_message_counts_markdown_lines() {
        // Two paragraphs render as three lines (one blank between)
        let message = ChatMessage::agent_markdown("one\n\ntwo");
        assert_eq!(
            MessageBubble::calculate_height(&message, 80),
            3 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn plain_agent_message_is_not_markdown_rendered() {
        // A literal "**text**" stays 1 line and keeps its asterisks
        let message = ChatMessage::agent_plain("**not bold**");
        assert_eq!(
            MessageBubble::calculate_height(&message, 80),
            1 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn role_titles() {
        assert_eq!(role_title(Role::User), "you");
        assert_eq!(role_title(Role::Agent), "agent");
    }
}
