//! Network layer: the persistent WebSocket chat link and the HTTP document
//! API. Nothing here knows about the UI or the reducer.

pub mod api;
pub mod link;
pub mod types;

pub use api::DocumentClient;
pub use link::{ChatLink, LinkEvent, LinkState};
pub use types::{AgentReply, ClearOutcome, FrameError, UploadOutcome, decode_frame};
