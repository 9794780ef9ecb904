//! # Actions
//!
//! Everything that happens in parley becomes an `Action`. The user submits
//! text? That's `Action::Submit`. A frame arrives? `Action::Link(Frame)`.
//!
//! `update()` folds an action into the state and returns the `Effect` the
//! TUI layer must perform. No I/O happens here, which is what makes every
//! property of the chat flow a plain function test.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Error policy: every failure an action can carry is converted right here
//! into a transcript message. Nothing propagates past the reducer and
//! nothing is retried automatically.

use std::path::PathBuf;

use crate::core::command::{self, Command};
use crate::core::state::{App, ChatMessage};
use crate::net::link::{LinkEvent, LinkState};
use crate::net::types::{ClearOutcome, UploadOutcome};

/// Local greeting shown when the link opens. Client-side courtesy, never
/// server-sourced.
pub const GREETING: &str =
    "Hello! I'm your research assistant. Ask me anything, or type `/help` for commands.";

/// Shown when a send finds no open connection.
pub const NO_CONNECTION: &str = "**No connection to the server.**\n\n\
    Dialing again now; resend your message once the link is back up.";

/// Fixed text for frames that fail to decode. The payload itself is never
/// shown or interpreted.
pub const MALFORMED_REPLY: &str =
    "**Error:** the server sent a reply this client could not understand.";

/// Diagnostic for a failed dial or a dropped transport.
pub const LINK_FAILED: &str = "**Connection error.**\n\n\
    Could not reach the server. Check that:\n\
    1. the backend is running\n\
    2. the server address in your config is right\n\n\
    Then run `/reconnect`.";

/// Shown after an orderly close from the server side.
pub const LINK_CLOSED: &str =
    "**Connection closed.**\n\nRun `/reconnect` to start a new session.";

#[derive(Debug)]
pub enum Action {
    /// Raw input from the input box: chat text or a slash command.
    Submit(String),
    /// Establish (or re-establish) the link.
    Connect,
    /// Lifecycle or frame event from the link tasks.
    Link(LinkEvent),
    UploadStarted {
        filename: String,
    },
    UploadFinished {
        filename: String,
        outcome: UploadOutcome,
    },
    ClearConfirmed,
    ClearDeclined,
    ClearFinished(ClearOutcome),
    Quit,
}

/// I/O the TUI layer performs in response to an update.
#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    Quit,
    /// Transmit one raw text frame over the link.
    Transmit(String),
    /// Tear down any live connection and dial a new one.
    Connect,
    /// Run the sequential upload batch.
    Upload(Vec<PathBuf>),
    /// Ask the user to confirm document deletion.
    ConfirmClear,
    /// Issue the `DELETE /documents` request.
    ClearDocuments,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(raw) => submit(app, raw),
        Action::Connect => begin_connect(app),
        Action::Link(event) => link_event(app, event),
        Action::UploadStarted { filename } => {
            app.push(ChatMessage::agent_markdown(format!(
                "Uploading **{filename}**..."
            )));
            Effect::None
        }
        Action::UploadFinished { filename, outcome } => {
            app.push(upload_message(&filename, outcome));
            Effect::None
        }
        Action::ClearConfirmed => {
            app.status_message = String::from("Clearing documents...");
            Effect::ClearDocuments
        }
        Action::ClearDeclined => Effect::None,
        Action::ClearFinished(outcome) => {
            app.status_message.clear();
            app.push(clear_message(outcome));
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn submit(app: &mut App, raw: String) -> Effect {
    let text = raw.trim();
    if text.is_empty() {
        return Effect::None;
    }
    if text.starts_with('/') {
        return run_command(app, text);
    }

    app.push(ChatMessage::user(text));

    if app.link == LinkState::Open {
        app.awaiting_reply = true;
        Effect::Transmit(text.to_string())
    } else {
        app.push(ChatMessage::agent_markdown(NO_CONNECTION));
        begin_connect(app)
    }
}

fn run_command(app: &mut App, text: &str) -> Effect {
    match command::parse(text) {
        Ok(Command::Upload(paths)) => Effect::Upload(paths),
        Ok(Command::Forget) => Effect::ConfirmClear,
        Ok(Command::Reconnect) => begin_connect(app),
        Ok(Command::Help) => {
            app.push(ChatMessage::agent_plain(command::HELP_TEXT));
            Effect::None
        }
        Ok(Command::Quit) => Effect::Quit,
        Err(usage) => {
            app.push(ChatMessage::agent_plain(usage));
            Effect::None
        }
    }
}

fn begin_connect(app: &mut App) -> Effect {
    app.link = LinkState::Connecting;
    app.awaiting_reply = false;
    app.status_message = String::from("Connecting...");
    Effect::Connect
}

fn link_event(app: &mut App, event: LinkEvent) -> Effect {
    match event {
        LinkEvent::Opened => {
            app.link = LinkState::Open;
            app.status_message = String::from("Connected");
            app.push(ChatMessage::agent_markdown(GREETING));
        }
        LinkEvent::Frame(Ok(reply)) => {
            app.awaiting_reply = false;
            app.push(ChatMessage::agent_markdown(reply.content));
        }
        LinkEvent::Frame(Err(_)) => {
            app.awaiting_reply = false;
            app.push(ChatMessage::agent_markdown(MALFORMED_REPLY));
        }
        LinkEvent::Failed(_) => {
            app.link = LinkState::Closed;
            app.awaiting_reply = false;
            app.status_message = String::from("Disconnected");
            app.push(ChatMessage::agent_markdown(LINK_FAILED));
        }
        LinkEvent::Closed => {
            app.link = LinkState::Closed;
            app.awaiting_reply = false;
            app.status_message = String::from("Disconnected");
            app.push(ChatMessage::agent_markdown(LINK_CLOSED));
        }
    }
    Effect::None
}

fn upload_message(filename: &str, outcome: UploadOutcome) -> ChatMessage {
    match outcome {
        UploadOutcome::Accepted { filename, chunks } => ChatMessage::agent_markdown(format!(
            "Document **{filename}** stored. Chunks extracted: {chunks}."
        )),
        UploadOutcome::Rejected { message } => {
            let reason = message.unwrap_or_else(|| String::from("unknown error"));
            ChatMessage::agent_plain(format!("Upload of {filename} failed: {reason}."))
        }
        UploadOutcome::HttpFailure { status } => {
            ChatMessage::agent_plain(format!("Could not upload {filename} (HTTP {status})."))
        }
        UploadOutcome::Unreachable => {
            ChatMessage::agent_plain(format!("Network error while uploading {filename}."))
        }
        UploadOutcome::Unreadable { reason } => {
            ChatMessage::agent_plain(format!("Could not read {filename}: {reason}."))
        }
    }
}

fn clear_message(outcome: ClearOutcome) -> ChatMessage {
    match outcome {
        ClearOutcome::Cleared { deleted } => ChatMessage::agent_markdown(format!(
            "All documents removed.\n\nFiles deleted: **{deleted}**."
        )),
        ClearOutcome::Rejected => ChatMessage::agent_plain("Failed to clear documents."),
        ClearOutcome::Unreachable => {
            ChatMessage::agent_plain("Could not reach the server while clearing documents.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Role;
    use crate::net::types::{AgentReply, decode_frame};

    fn open_app() -> App {
        let mut app = App::new("http://localhost:8000", "default");
        app.link = LinkState::Open;
        app
    }

    fn agent_messages(app: &App) -> Vec<&ChatMessage> {
        app.transcript
            .iter()
            .filter(|m| m.role == Role::Agent)
            .collect()
    }

    // -- submit ----------------------------------------------------------

    #[test]
    fn empty_submit_is_a_noop() {
        let mut app = open_app();
        assert_eq!(update(&mut app, Action::Submit(String::new())), Effect::None);
        assert_eq!(
            update(&mut app, Action::Submit(String::from("   \n\t "))),
            Effect::None
        );
        assert!(app.transcript.is_empty());
        assert!(!app.awaiting_reply);
    }

    #[test]
    fn submit_while_open_transmits_and_shows_typing() {
        let mut app = open_app();
        let effect = update(&mut app, Action::Submit(String::from("  hello there  ")));
        assert_eq!(effect, Effect::Transmit(String::from("hello there")));
        assert_eq!(app.transcript.len(), 1);
        assert_eq!(app.transcript[0], ChatMessage::user("hello there"));
        assert!(app.awaiting_reply);
    }

    #[test]
    fn submit_while_closed_reports_and_reconnects_once() {
        let mut app = App::new("http://localhost:8000", "default");
        app.link = LinkState::Closed;
        let effect = update(&mut app, Action::Submit(String::from("hello")));
        assert_eq!(effect, Effect::Connect);
        // One user message, then exactly one agent error message.
        assert_eq!(app.transcript.len(), 2);
        assert_eq!(app.transcript[0].role, Role::User);
        assert_eq!(app.transcript[1].text, NO_CONNECTION);
        assert!(app.transcript[1].formatted);
        assert_eq!(app.link, LinkState::Connecting);
        assert!(!app.awaiting_reply);
    }

    // -- commands --------------------------------------------------------

    #[test]
    fn upload_command_becomes_effect() {
        let mut app = open_app();
        let effect = update(&mut app, Action::Submit(String::from("/upload a.txt b.txt")));
        assert_eq!(
            effect,
            Effect::Upload(vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")])
        );
        assert!(app.transcript.is_empty());
    }

    #[test]
    fn forget_command_asks_for_confirmation() {
        let mut app = open_app();
        assert_eq!(
            update(&mut app, Action::Submit(String::from("/forget"))),
            Effect::ConfirmClear
        );
    }

    #[test]
    fn reconnect_command_connects() {
        let mut app = open_app();
        assert_eq!(
            update(&mut app, Action::Submit(String::from("/reconnect"))),
            Effect::Connect
        );
        assert_eq!(app.link, LinkState::Connecting);
    }

    #[test]
    fn unknown_command_shows_plain_usage_message() {
        let mut app = open_app();
        assert_eq!(
            update(&mut app, Action::Submit(String::from("/nope"))),
            Effect::None
        );
        assert_eq!(app.transcript.len(), 1);
        assert!(!app.transcript[0].formatted);
        assert!(app.transcript[0].text.contains("/nope"));
    }

    #[test]
    fn quit_command_quits() {
        let mut app = open_app();
        assert_eq!(
            update(&mut app, Action::Submit(String::from("/quit"))),
            Effect::Quit
        );
    }

    // -- link lifecycle --------------------------------------------------

    #[test]
    fn opened_pushes_local_greeting() {
        let mut app = App::new("http://localhost:8000", "default");
        app.link = LinkState::Connecting;
        update(&mut app, Action::Link(LinkEvent::Opened));
        assert_eq!(app.link, LinkState::Open);
        assert_eq!(app.transcript.len(), 1);
        assert_eq!(app.transcript[0].text, GREETING);
        assert!(app.transcript[0].formatted);
    }

    #[test]
    fn valid_frame_appends_one_formatted_reply_and_clears_typing() {
        let mut app = open_app();
        update(&mut app, Action::Submit(String::from("question")));
        assert!(app.awaiting_reply);

        let reply = AgentReply {
            content: String::from("### Answer\n\nhere"),
        };
        update(&mut app, Action::Link(LinkEvent::Frame(Ok(reply))));

        assert!(!app.awaiting_reply);
        let agents = agent_messages(&app);
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].text, "### Answer\n\nhere");
        assert!(agents[0].formatted);
    }

    #[test]
    fn malformed_frame_appends_fixed_error_and_clears_typing() {
        let mut app = open_app();
        app.awaiting_reply = true;

        let decoded = decode_frame("not json at all");
        update(&mut app, Action::Link(LinkEvent::Frame(decoded)));

        assert!(!app.awaiting_reply);
        assert_eq!(app.transcript.len(), 1);
        assert_eq!(app.transcript[0].text, MALFORMED_REPLY);
        assert!(app.transcript[0].formatted);
    }

    #[test]
    fn link_failure_is_terminal_and_reported() {
        let mut app = open_app();
        app.awaiting_reply = true;
        update(
            &mut app,
            Action::Link(LinkEvent::Failed(String::from("refused"))),
        );
        assert_eq!(app.link, LinkState::Closed);
        assert!(!app.awaiting_reply);
        assert_eq!(app.transcript.len(), 1);
        assert_eq!(app.transcript[0].text, LINK_FAILED);
    }

    #[test]
    fn link_close_names_manual_recovery() {
        let mut app = open_app();
        update(&mut app, Action::Link(LinkEvent::Closed));
        assert_eq!(app.link, LinkState::Closed);
        assert_eq!(app.transcript[0].text, LINK_CLOSED);
    }

    // -- uploads ---------------------------------------------------------

    #[test]
    fn upload_batch_messages_arrive_in_file_order() {
        let mut app = open_app();
        let files = ["a.txt", "b.txt", "c.txt"];
        for (i, name) in files.iter().enumerate() {
            update(
                &mut app,
                Action::UploadStarted {
                    filename: name.to_string(),
                },
            );
            let outcome = if i == 1 {
                UploadOutcome::HttpFailure { status: 500 }
            } else {
                UploadOutcome::Accepted {
                    filename: name.to_string(),
                    chunks: 3,
                }
            };
            update(
                &mut app,
                Action::UploadFinished {
                    filename: name.to_string(),
                    outcome,
                },
            );
        }

        // One "uploading" plus one outcome per file, in file order.
        assert_eq!(app.transcript.len(), 6);
        assert!(app.transcript[0].text.contains("a.txt"));
        assert!(app.transcript[1].text.contains("a.txt"));
        assert!(app.transcript[2].text.contains("b.txt"));
        assert!(app.transcript[3].text.contains("b.txt"));
        assert!(app.transcript[4].text.contains("c.txt"));
        assert!(app.transcript[5].text.contains("c.txt"));

        // The failing file's outcome is plain and shaped unlike a success.
        assert!(!app.transcript[3].formatted);
        assert!(app.transcript[3].text.contains("500"));
        assert!(app.transcript[1].formatted);
        assert!(app.transcript[1].text.contains("Chunks extracted: 3"));
    }

    #[test]
    fn rejected_upload_uses_server_message_or_fallback() {
        let with_reason = upload_message(
            "a.txt",
            UploadOutcome::Rejected {
                message: Some(String::from("empty document")),
            },
        );
        assert!(with_reason.text.contains("empty document"));

        let fallback = upload_message("a.txt", UploadOutcome::Rejected { message: None });
        assert!(fallback.text.contains("unknown error"));
    }

    #[test]
    fn unreadable_file_is_reported_without_aborting() {
        let mut app = open_app();
        update(
            &mut app,
            Action::UploadFinished {
                filename: String::from("ghost.txt"),
                outcome: UploadOutcome::Unreadable {
                    reason: String::from("No such file or directory"),
                },
            },
        );
        assert!(app.transcript[0].text.contains("ghost.txt"));
        assert!(!app.transcript[0].formatted);
    }

    // -- document clear --------------------------------------------------

    #[test]
    fn confirmed_clear_issues_request() {
        let mut app = open_app();
        assert_eq!(update(&mut app, Action::ClearConfirmed), Effect::ClearDocuments);
    }

    #[test]
    fn declined_clear_does_nothing() {
        let mut app = open_app();
        assert_eq!(update(&mut app, Action::ClearDeclined), Effect::None);
        assert!(app.transcript.is_empty());
    }

    #[test]
    fn clear_result_renders_deleted_count() {
        let mut app = open_app();
        update(
            &mut app,
            Action::ClearFinished(ClearOutcome::Cleared { deleted: 7 }),
        );
        assert!(app.transcript[0].text.contains('7'));
        assert!(app.transcript[0].formatted);
    }

    #[test]
    fn clear_failures_render_plain_messages() {
        assert!(!clear_message(ClearOutcome::Rejected).formatted);
        assert!(!clear_message(ClearOutcome::Unreachable).formatted);
    }
}
