use ratatui::Frame;
use ratatui::layout::Rect;

/// A renderable piece of the UI.
///
/// `render` takes `&mut self` so components can update layout caches and
/// scroll state during the draw pass, matching ratatui's `StatefulWidget`
/// shape.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that consumes terminal events and may emit one high-level
/// event for its parent.
pub trait EventHandler {
    type Event;

    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
