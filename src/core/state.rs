//! # Application State
//!
//! Core business state for parley: the transcript, the link lifecycle, and
//! the typing flag. No TUI types here; presentation state lives in the
//! `tui` module, and state changes only happen through `update(state,
//! action)` in action.rs.
//!
//! ```text
//! App
//! ├── transcript: Vec<ChatMessage>   // append-only conversation view
//! ├── link: LinkState                // Idle → Connecting → Open → Closed
//! ├── awaiting_reply: bool           // a reply is pending (typing indicator)
//! ├── status_message: String         // title bar text
//! ├── server_url: String             // resolved backend address
//! └── user_id: String                // identifier sent with uploads
//! ```

use crate::core::config::ResolvedConfig;
use crate::net::link::LinkState;

/// Who a transcript entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Agent,
}

/// One transcript entry. Entries are append-only and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    /// Formatted agent text renders as markdown; everything else renders
    /// literally, so plain status strings cannot inject markup.
    pub formatted: bool,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            formatted: false,
        }
    }

    /// Agent text carrying markup (server replies, rich status notes).
    pub fn agent_markdown(text: impl Into<String>) -> Self {
        Self {
            role: Role::Agent,
            text: text.into(),
            formatted: true,
        }
    }

    /// Agent text shown verbatim.
    pub fn agent_plain(text: impl Into<String>) -> Self {
        Self {
            role: Role::Agent,
            text: text.into(),
            formatted: false,
        }
    }
}

pub struct App {
    pub transcript: Vec<ChatMessage>,
    pub link: LinkState,
    /// True between a sent message and the next reply or link event. Drives
    /// the typing indicator, so at most one indicator can ever exist.
    pub awaiting_reply: bool,
    pub status_message: String,
    pub server_url: String,
    pub user_id: String,
}

impl App {
    pub fn new(server_url: &str, user_id: &str) -> Self {
        Self {
            transcript: Vec::new(),
            link: LinkState::Idle,
            awaiting_reply: false,
            status_message: String::new(),
            server_url: server_url.to_string(),
            user_id: user_id.to_string(),
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(&config.server_url, &config.user_id)
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.transcript.push(message);
    }
}
