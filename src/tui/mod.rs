//! # TUI Adapter
//!
//! The ratatui-specific layer. Owns the terminal, translates keyboard
//! events into `core::Action` values, and performs the `Effect`s the
//! reducer returns. This is the only module that knows about ratatui and
//! crossterm.
//!
//! ## Redraw Strategy
//!
//! The loop redraws only when something happened: while a reply is pending
//! the typing indicator animates (~12 fps poll timeout), otherwise the loop
//! sleeps up to 250ms and wakes on events or background actions.
//!
//! ## Concurrency
//!
//! Network work never runs on the UI thread. The link's tasks report
//! through a forwarder into the same `std::sync::mpsc` action channel that
//! upload and clear tasks use; the loop drains it once per iteration.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use std::io::stdout;
use std::path::PathBuf;
use std::sync::mpsc;

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use log::{debug, info, warn};

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::net::api::DocumentClient;
use crate::net::link::{ChatLink, LinkEvent};
use crate::tui::component::EventHandler;
use crate::tui::components::confirm::{ConfirmDialog, ConfirmEvent};
use crate::tui::components::input_box::{InputBox, InputEvent};
use crate::tui::components::message_list::TranscriptState;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic).
pub struct TuiState {
    pub transcript: TranscriptState,
    pub input: InputBox,
    /// Pending destructive-action confirmation; captures all input while set.
    pub confirm: Option<ConfirmDialog>,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            transcript: TranscriptState::new(),
            input: InputBox::new(),
            confirm: None,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // The Kitty keyboard protocol lets us tell Shift+Enter from Enter;
        // terminals that don't support it ignore the push.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste
        );
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let mut app = App::from_config(&config);
    let mut tui = TuiState::new();

    let mut link = ChatLink::new(&config.server_url);
    let documents = DocumentClient::new(&config.server_url, &config.user_id);

    let mut terminal = ratatui::init();
    let _mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel::<Action>();

    // Link events flow through a forwarder into the same action channel
    let (link_tx, mut link_rx) = tokio::sync::mpsc::unbounded_channel::<LinkEvent>();
    {
        let tx = tx.clone();
        tokio::spawn(async move {
            while let Some(event) = link_rx.recv().await {
                if tx.send(Action::Link(event)).is_err() {
                    return;
                }
            }
        });
    }

    // Dial the server before the first frame
    let effect = update(&mut app, Action::Connect);
    apply_effect(effect, &mut tui, &mut link, &documents, &link_tx, &tx);

    let start_time = std::time::Instant::now();
    let mut needs_redraw = true;
    let mut should_quit = false;

    while !should_quit {
        let animating = app.awaiting_reply;
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let elapsed = start_time.elapsed().as_secs_f32();
            let spinner_frame = (elapsed * 6.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            std::time::Duration::from_millis(80)
        } else {
            std::time::Duration::from_millis(250)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            // Resize just needs the redraw already flagged above
            if matches!(event, TuiEvent::Resize) {
                continue;
            }

            // Ctrl+C always quits
            if matches!(event, TuiEvent::ForceQuit) {
                should_quit = true;
                continue;
            }

            // An open confirmation swallows every other event
            if let Some(confirm) = &mut tui.confirm {
                if let Some(decision) = confirm.handle_event(&event) {
                    tui.confirm = None;
                    let action = match decision {
                        ConfirmEvent::Accepted => Action::ClearConfirmed,
                        ConfirmEvent::Declined => Action::ClearDeclined,
                    };
                    let effect = update(&mut app, action);
                    should_quit |=
                        apply_effect(effect, &mut tui, &mut link, &documents, &link_tx, &tx);
                }
                continue;
            }

            // Transcript scrolling
            if matches!(
                event,
                TuiEvent::ScrollUp
                    | TuiEvent::ScrollDown
                    | TuiEvent::ScrollPageUp
                    | TuiEvent::ScrollPageDown
                    | TuiEvent::ScrollToBottom
            ) {
                tui.transcript.handle_event(&event);
                continue;
            }

            // Everything else belongs to the input box
            if let Some(InputEvent::Submit(text)) = tui.input.handle_event(&event) {
                let effect = update(&mut app, Action::Submit(text));
                should_quit |=
                    apply_effect(effect, &mut tui, &mut link, &documents, &link_tx, &tx);
            }
        }

        // Actions from the link and document tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            should_quit |= apply_effect(effect, &mut tui, &mut link, &documents, &link_tx, &tx);
        }
    }

    link.disconnect();
    ratatui::restore();
    Ok(())
}

/// Perform one effect. Returns true when the app should exit.
fn apply_effect(
    effect: Effect,
    tui: &mut TuiState,
    link: &mut ChatLink,
    documents: &DocumentClient,
    link_tx: &tokio::sync::mpsc::UnboundedSender<LinkEvent>,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match effect {
        Effect::None => {}
        Effect::Quit => return true,
        Effect::Connect => link.connect(link_tx.clone()),
        Effect::Transmit(text) => {
            // The reducer only transmits while Open; a frame lost to a race
            // here surfaces through the link's own lifecycle events.
            if !link.send(&text) {
                warn!("Dropped outbound frame: link not wired");
            }
        }
        Effect::Upload(paths) => spawn_upload_batch(documents.clone(), paths, tx.clone()),
        Effect::ConfirmClear => tui.confirm = Some(ConfirmDialog::clear_documents()),
        Effect::ClearDocuments => spawn_clear(documents.clone(), tx.clone()),
    }
    false
}

/// Upload each file in order, one round trip at a time, reporting progress
/// per file. A failed file never stops the rest of the batch.
fn spawn_upload_batch(documents: DocumentClient, paths: Vec<PathBuf>, tx: mpsc::Sender<Action>) {
    info!("Starting upload batch of {} file(s)", paths.len());
    tokio::spawn(async move {
        for path in paths {
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            if tx
                .send(Action::UploadStarted {
                    filename: filename.clone(),
                })
                .is_err()
            {
                return;
            }
            let outcome = documents.upload(&path).await;
            if tx.send(Action::UploadFinished { filename, outcome }).is_err() {
                return;
            }
        }
    });
}

fn spawn_clear(documents: DocumentClient, tx: mpsc::Sender<Action>) {
    info!("Clearing all stored documents");
    tokio::spawn(async move {
        let outcome = documents.clear_documents().await;
        if tx.send(Action::ClearFinished(outcome)).is_err() {
            warn!("Clear outcome dropped: receiver gone");
        }
    });
}
