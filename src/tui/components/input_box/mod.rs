//! # InputBox Component
//!
//! Multi-line message editor.
//!
//! ## Responsibilities
//!
//! - Capture and edit text (insert, delete, cursor movement, paste)
//! - Submit on Enter; a newline comes from Shift+Enter (`InputChar('\n')`)
//! - Reject empty and whitespace-only submissions silently
//! - Grow with content up to the visible line cap, then scroll internally;
//!   reset to the one-line baseline after a submit
//!
//! The rendered text is pre-wrapped with the same `textwrap` options the
//! height and cursor math use, so what is measured is what is drawn.

mod edit;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use edit::{
    BORDER_OFFSET, MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, boundary_after, boundary_before,
    inner_width, line_count, wrap_options,
};

/// High-level events emitted by the InputBox.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted non-blank text (Enter pressed).
    Submit(String),
    /// Text or cursor changed.
    ContentChanged,
}

pub struct InputBox {
    /// Text being composed.
    pub buffer: String,
    /// Cursor position as a byte offset into `buffer`.
    cursor: usize,
    /// First visible wrapped line when the content exceeds the cap.
    scroll_line: u16,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            scroll_line: 0,
        }
    }

    /// Height needed for the current content, clamped to the visible cap.
    /// Empty content yields the one-line baseline.
    pub fn calculate_height(&self, total_width: u16) -> u16 {
        let lines = line_count(&self.buffer, inner_width(total_width)).min(MAX_VISIBLE_LINES);
        lines + VERTICAL_OVERHEAD
    }

    // -- cursor geometry -------------------------------------------------

    /// Wrapped line index the cursor sits on.
    fn cursor_wrapped_line(&self, total_width: u16) -> u16 {
        let width = inner_width(total_width);
        if width == 0 {
            return 0;
        }
        let before = &self.buffer[..self.cursor];
        let wrapped = textwrap::wrap(before, wrap_options(width));
        let mut line = wrapped.len().saturating_sub(1) as u16;
        // textwrap does not represent a trailing newline as an empty line
        if self.cursor > 0
            && self.buffer.as_bytes()[self.cursor - 1] == b'\n'
            && !wrapped.last().is_some_and(|l| l.is_empty())
        {
            line += 1;
        }
        line
    }

    /// Keep the cursor's wrapped line inside the visible window.
    fn follow_cursor(&mut self, total_width: u16) {
        let total_lines = line_count(&self.buffer, inner_width(total_width));
        if total_lines <= MAX_VISIBLE_LINES {
            self.scroll_line = 0;
            return;
        }
        let cursor_line = self.cursor_wrapped_line(total_width);
        if cursor_line < self.scroll_line {
            self.scroll_line = cursor_line;
        } else if cursor_line >= self.scroll_line + MAX_VISIBLE_LINES {
            self.scroll_line = cursor_line.saturating_sub(MAX_VISIBLE_LINES - 1);
        }
    }

    /// Wrapped lines currently in the window, joined for the paragraph.
    fn visible_text(&self, total_width: u16) -> String {
        let width = inner_width(total_width);
        if width == 0 {
            return String::new();
        }
        let wrapped = textwrap::wrap(&self.buffer, wrap_options(width));
        let start = self.scroll_line as usize;
        if start >= wrapped.len() {
            return String::new();
        }
        let end = (start + MAX_VISIBLE_LINES as usize).min(wrapped.len());
        wrapped[start..end].join("\n")
    }

    /// Screen position for the terminal cursor.
    fn screen_cursor(&self, area: Rect) -> (u16, u16) {
        let width = inner_width(area.width);
        if width == 0 {
            return (area.x + BORDER_OFFSET, area.y + BORDER_OFFSET);
        }

        let line = self.cursor_wrapped_line(area.width);

        // Column: chars past the last wrap point of the logical line the
        // cursor is on. Counted from the raw text because textwrap trims
        // trailing spaces from wrapped segments.
        let before = &self.buffer[..self.cursor];
        let column = if self.cursor > 0 && before.ends_with('\n') {
            0
        } else {
            let logical_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
            let logical = &before[logical_start..];
            let segments = textwrap::wrap(logical, wrap_options(width));
            let prior: usize = segments
                .iter()
                .take(segments.len().saturating_sub(1))
                .map(|s| s.chars().count())
                .sum();
            (logical.chars().count().saturating_sub(prior)) as u16
        };

        let visible_line = line.saturating_sub(self.scroll_line);
        (
            area.x + BORDER_OFFSET + column,
            area.y + BORDER_OFFSET + visible_line,
        )
    }

    // -- editing ---------------------------------------------------------

    fn insert_str(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    /// Byte bounds of the logical line the cursor is on.
    fn line_bounds(&self) -> (usize, usize) {
        let start = self.buffer[..self.cursor]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        let end = self.buffer[self.cursor..]
            .find('\n')
            .map(|i| self.cursor + i)
            .unwrap_or(self.buffer.len());
        (start, end)
    }

    /// Move the cursor one logical line up or down, keeping the column
    /// (in chars) where possible. Returns false at the buffer edge.
    fn move_line(&mut self, delta: i32) -> bool {
        let before = &self.buffer[..self.cursor];
        let row = before.matches('\n').count();
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = self.buffer[line_start..self.cursor].chars().count();

        let target = row as i32 + delta;
        if target < 0 {
            return false;
        }
        let target = target as usize;

        let lines: Vec<&str> = self.buffer.split('\n').collect();
        if target >= lines.len() || target == row {
            return false;
        }

        let mut start = 0usize;
        for line in lines.iter().take(target) {
            start += line.len() + 1;
        }
        let kept: usize = lines[target]
            .chars()
            .take(column)
            .map(char::len_utf8)
            .sum();
        self.cursor = start + kept;
        true
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.follow_cursor(area.width);

        let block = Block::bordered()
            .border_type(ratatui::widgets::BorderType::Rounded)
            .title("message");

        let input = Paragraph::new(self.visible_text(area.width))
            .block(block)
            .style(Style::default().fg(Color::Cyan));
        frame.render_widget(input, area);

        let (x, y) = self.screen_cursor(area);
        frame.set_cursor_position((x, y));
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                self.insert_str(text);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => (self.cursor > 0).then(|| {
                let prev = boundary_before(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                InputEvent::ContentChanged
            }),
            TuiEvent::Delete => (self.cursor < self.buffer.len()).then(|| {
                let next = boundary_after(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorLeft => (self.cursor > 0).then(|| {
                self.cursor = boundary_before(&self.buffer, self.cursor);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor < self.buffer.len()).then(|| {
                self.cursor = boundary_after(&self.buffer, self.cursor);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => {
                let (start, _) = self.line_bounds();
                (self.cursor != start).then(|| {
                    self.cursor = start;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                let (_, end) = self.line_bounds();
                (self.cursor != end).then(|| {
                    self.cursor = end;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorUp => self.move_line(-1).then_some(InputEvent::ContentChanged),
            TuiEvent::CursorDown => self.move_line(1).then_some(InputEvent::ContentChanged),
            TuiEvent::Submit => {
                if self.buffer.trim().is_empty() {
                    // Blank submissions are a silent no-op
                    return None;
                }
                let text = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                self.scroll_line = 0;
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}
