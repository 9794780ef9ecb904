//! Modal yes/no overlay for destructive actions.
//!
//! While a dialog is open it captures every key: `y` or Enter accepts,
//! `n` or Esc declines. Nothing is sent anywhere until the user accepts.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};

use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmEvent {
    Accepted,
    Declined,
}

pub struct ConfirmDialog {
    pub title: String,
    pub body: String,
}

impl ConfirmDialog {
    /// The `/forget` confirmation: deleting stored documents is
    /// irreversible, so it is spelled out.
    pub fn clear_documents() -> Self {
        Self {
            title: String::from("Delete all documents?"),
            body: String::from(
                "Every uploaded document will be removed from the assistant's store.\n\
                 This cannot be undone.\n\n\
                 [y] delete    [n] keep",
            ),
        }
    }

    pub fn handle_event(&mut self, event: &TuiEvent) -> Option<ConfirmEvent> {
        match event {
            TuiEvent::InputChar('y' | 'Y') | TuiEvent::Submit => Some(ConfirmEvent::Accepted),
            TuiEvent::InputChar('n' | 'N') | TuiEvent::Escape => Some(ConfirmEvent::Declined),
            _ => None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(58, 8, area);
        frame.render_widget(Clear, overlay);
        let block = Block::bordered()
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(Style::default().fg(Color::Yellow))
            .title(self.title.as_str());
        frame.render_widget(
            Paragraph::new(self.body.as_str())
                .block(block)
                .wrap(Wrap { trim: false }),
            overlay,
        );
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}
