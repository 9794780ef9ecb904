//! Frame layout: title bar on top, transcript in the middle, input box at
//! the bottom (its height tracks the draft), confirm overlay above all.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::TitleBar;
use crate::tui::components::message_list::TranscriptView;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    let input_height = tui.input.calculate_height(frame.area().width);
    let layout = Layout::vertical([Length(1), Min(0), Length(input_height)]);
    let [title_area, transcript_area, input_area] = layout.areas(frame.area());

    let mut title_bar = TitleBar {
        server_url: app.server_url.clone(),
        link: app.link,
        status_message: app.status_message.clone(),
    };
    title_bar.render(frame, title_area);

    let mut transcript = TranscriptView {
        state: &mut tui.transcript,
        entries: &app.transcript,
        awaiting_reply: app.awaiting_reply,
        spinner_frame,
    };
    transcript.render(frame, transcript_area);

    tui.input.render(frame, input_area);

    if let Some(confirm) = &tui.confirm {
        confirm.render(frame, frame.area());
    }
}
