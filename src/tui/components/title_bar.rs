//! # TitleBar Component
//!
//! Single status line at the top: app name, server address, link state, and
//! whatever transient status the reducer last set. Purely presentational;
//! all three props come from `App`.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::net::link::LinkState;
use crate::tui::component::Component;

pub struct TitleBar {
    pub server_url: String,
    pub link: LinkState,
    pub status_message: String,
}

fn link_label(link: LinkState) -> (&'static str, Color) {
    match link {
        LinkState::Idle => ("idle", Color::DarkGray),
        LinkState::Connecting => ("connecting", Color::Yellow),
        LinkState::Open => ("online", Color::Green),
        LinkState::Closed => ("offline", Color::Red),
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let (label, color) = link_label(self.link);
        let mut spans = vec![
            Span::styled("parley", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(" — {} ", self.server_url)),
            Span::styled(format!("[{label}]"), Style::default().fg(color)),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::raw(format!(" | {}", self.status_message)));
        }
        frame.render_widget(Line::from(spans), area);
    }
}
