//! # Transcript View
//!
//! Scrollable, append-only view of the conversation.
//!
//! ## Responsibilities
//!
//! - Lay entries out in a scroll canvas using cached heights
//! - Stay pinned to the newest entry until the user scrolls away
//! - Show the typing indicator row while a reply is pending
//!
//! `TranscriptView` is a transient wrapper created each frame around the
//! persistent `TranscriptState`, which matches ratatui's `StatefulWidget`
//! pattern: `render` takes `&mut self` and may update the cache and scroll
//! position during the pass.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::state::ChatMessage;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::MessageBubble;
use crate::tui::components::typing::{self, TypingIndicator};
use crate::tui::event::TuiEvent;

/// Scroll and layout state for the transcript. Lives in `TuiState`.
pub struct TranscriptState {
    pub scroll: ScrollViewState,
    pub heights: HeightCache,
    /// Auto-scroll to the newest entry while true. Scrolling up releases
    /// the pin; scrolling back to the end re-engages it.
    pub stick_to_bottom: bool,
    /// Last known viewport height, for clamping between frames.
    pub viewport_height: u16,
}

impl Default for TranscriptState {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptState {
    pub fn new() -> Self {
        Self {
            scroll: ScrollViewState::default(),
            heights: HeightCache::new(),
            stick_to_bottom: true,
            viewport_height: 0,
        }
    }

    /// Keep the offset inside the content bounds so the view never
    /// overscrolls past the last entry.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.heights.total().saturating_sub(self.viewport_height);
        let current = self.scroll.offset();
        if current.y > max_y {
            self.scroll.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll once a downward scroll reaches the end.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.heights.total().saturating_sub(self.viewport_height);
        if self.scroll.offset().y >= max_y {
            self.stick_to_bottom = true;
        }
    }
}

/// Per-entry height cache.
///
/// Entries are append-only and immutable, so every height measured at the
/// current width stays valid; only a width change invalidates the cache.
pub struct HeightCache {
    pub heights: Vec<u16>,
    /// Running totals: `prefix[i]` is the canvas row just past entry `i`.
    pub prefix: Vec<u16>,
    width: u16,
}

impl Default for HeightCache {
    fn default() -> Self {
        Self::new()
    }
}

impl HeightCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix: Vec::new(),
            width: 0,
        }
    }

    /// Measure any entries not yet cached at this width.
    pub fn refresh(&mut self, entries: &[ChatMessage], width: u16) {
        if self.width != width {
            self.heights.clear();
            self.width = width;
        }
        self.heights.truncate(entries.len());
        for entry in entries.iter().skip(self.heights.len()) {
            self.heights
                .push(MessageBubble::calculate_height(entry, width));
        }
        self.prefix = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc += h;
                Some(*acc)
            })
            .collect();
    }

    pub fn total(&self) -> u16 {
        self.prefix.last().copied().unwrap_or(0)
    }

    /// Entries intersecting the viewport, padded by half a screen on both
    /// sides so partial rows at the edges are always drawn.
    pub fn visible_range(&self, offset: u16, viewport: u16) -> std::ops::Range<usize> {
        let margin = viewport / 2;
        let lo = offset.saturating_sub(margin);
        let hi = offset.saturating_add(viewport).saturating_add(margin);

        let start = self.prefix.partition_point(|&end| end <= lo);
        let end = self
            .prefix
            .partition_point(|&end| end < hi)
            .saturating_add(1)
            .min(self.prefix.len());
        start..end
    }
}

/// Transient render wrapper; created each frame with borrowed state.
pub struct TranscriptView<'a> {
    pub state: &'a mut TranscriptState,
    pub entries: &'a [ChatMessage],
    pub awaiting_reply: bool,
    pub spinner_frame: usize,
}

impl Component for TranscriptView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // scrollbar column
        self.state.heights.refresh(self.entries, content_width);

        let indicator_height = if self.awaiting_reply { typing::HEIGHT } else { 0 };
        let canvas_height = self.state.heights.total() + indicator_height;

        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let mut view = ScrollView::new(Size::new(content_width, canvas_height.max(1)))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let offset = self.state.scroll.offset().y;
        let range = self.state.heights.visible_range(offset, area.height);

        let mut y = if range.start > 0 {
            self.state.heights.prefix[range.start - 1]
        } else {
            0
        };
        for i in range {
            let height = self.state.heights.heights[i];
            view.render_widget(
                MessageBubble::new(&self.entries[i]),
                Rect::new(0, y, content_width, height),
            );
            y += height;
        }

        if self.awaiting_reply {
            view.render_widget(
                TypingIndicator {
                    frame: self.spinner_frame,
                },
                Rect::new(
                    0,
                    self.state.heights.total(),
                    typing::WIDTH.min(content_width),
                    typing::HEIGHT,
                ),
            );
        }

        if self.state.stick_to_bottom {
            self.state.scroll.scroll_to_bottom();
        }
        frame.render_stateful_widget(view, area, &mut self.state.scroll);
    }
}

/// Event handling lives on the state, not the transient view: the scroll
/// position must survive between frames.
impl EventHandler for TranscriptState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => {
                self.scroll.scroll_to_bottom();
                self.stick_to_bottom = true;
            }
            _ => {}
        }
        None
    }
}
