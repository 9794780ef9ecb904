//! # TUI Components
//!
//! Two patterns, following the rest of the TUI layer:
//!
//! - **Stateless** components receive everything as props and are created
//!   fresh each frame: `TitleBar`, `MessageBubble`, `TypingIndicator`.
//! - **Stateful** components keep state across frames and handle events:
//!   `InputBox`, `TranscriptState` (wrapped by the transient
//!   `TranscriptView`), `ConfirmDialog`.
//!
//! Each file holds everything for its component (state, events, rendering,
//! tests), so one file answers "how does this piece work".

pub mod confirm;
pub mod input_box;
pub mod message;
pub mod message_list;
pub mod title_bar;
pub mod typing;

pub use confirm::{ConfirmDialog, ConfirmEvent};
pub use input_box::{InputBox, InputEvent};
pub use message_list::{TranscriptState, TranscriptView};
pub use title_bar::TitleBar;
