//! Wire payload types for the agent backend.
//!
//! Everything the server sends is decoded through these serde structs, so a
//! malformed payload is rejected at the boundary instead of leaking partial
//! data into the transcript. Extra fields the server may add are ignored;
//! missing or mistyped required fields fail the decode.

use std::fmt;

use serde::Deserialize;

/// One chat reply frame from the `/ws` stream: `{"content": "..."}`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AgentReply {
    pub content: String,
}

/// An inbound frame that is not a valid reply object.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameError(String);

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "undecodable frame: {}", self.0)
    }
}

impl std::error::Error for FrameError {}

/// Decode one inbound text frame.
pub fn decode_frame(raw: &str) -> Result<AgentReply, FrameError> {
    serde_json::from_str(raw).map_err(|e| FrameError(e.to_string()))
}

/// `POST /upload` response body. Only `status` is required; the rest depends
/// on whether the server accepted the document.
#[derive(Debug, Deserialize)]
pub struct UploadReceipt {
    pub status: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub chunks: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Outcome of one file upload, as reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// Server stored and chunked the document.
    Accepted { filename: String, chunks: u32 },
    /// Server answered 2xx but reported a non-ok status.
    Rejected { message: Option<String> },
    /// Server answered with a non-success HTTP status.
    HttpFailure { status: u16 },
    /// The request never completed.
    Unreachable,
    /// The local file could not be read; nothing was sent.
    Unreadable { reason: String },
}

/// `DELETE /documents` response body.
#[derive(Debug, Deserialize)]
pub struct ClearReceipt {
    pub status: String,
    #[serde(default)]
    pub deleted_documents: Option<u64>,
}

/// Outcome of a whole-store deletion.
#[derive(Debug, Clone, PartialEq)]
pub enum ClearOutcome {
    Cleared { deleted: u64 },
    Rejected,
    Unreachable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_frame_valid() {
        let reply = decode_frame(r####"{"content":"### Answer\n\nhello"}"####).unwrap();
        assert_eq!(reply.content, "### Answer\n\nhello");
    }

    #[test]
    fn decode_frame_ignores_extra_fields() {
        let reply = decode_frame(r#"{"content":"hi","elapsed_ms":120}"#).unwrap();
        assert_eq!(reply.content, "hi");
    }

    #[test]
    fn decode_frame_missing_content_fails() {
        assert!(decode_frame(r#"{"body":"hi"}"#).is_err());
    }

    #[test]
    fn decode_frame_wrong_type_fails() {
        assert!(decode_frame(r#"{"content":42}"#).is_err());
    }

    #[test]
    fn decode_frame_not_json_fails() {
        let err = decode_frame("<html>oops</html>").unwrap_err();
        assert!(err.to_string().starts_with("undecodable frame"));
    }

    #[test]
    fn upload_receipt_sparse_body_parses() {
        let receipt: UploadReceipt = serde_json::from_str(r#"{"status":"error"}"#).unwrap();
        assert_eq!(receipt.status, "error");
        assert!(receipt.filename.is_none());
        assert!(receipt.chunks.is_none());
        assert!(receipt.message.is_none());
    }

    #[test]
    fn clear_receipt_parses() {
        let receipt: ClearReceipt =
            serde_json::from_str(r#"{"status":"ok","deleted_documents":7}"#).unwrap();
        assert_eq!(receipt.status, "ok");
        assert_eq!(receipt.deleted_documents, Some(7));
    }
}
