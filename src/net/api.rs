//! HTTP client for the backend's document store: multipart uploads and
//! whole-store deletion.
//!
//! Every failure mode collapses into an outcome value. Callers render
//! outcomes; they never see transport errors, and a failure here never
//! aborts anything beyond its own request.

use std::path::Path;

use log::{info, warn};
use reqwest::multipart;

use super::types::{ClearOutcome, ClearReceipt, UploadOutcome, UploadReceipt};

#[derive(Clone)]
pub struct DocumentClient {
    base_url: String,
    user_id: String,
    http: reqwest::Client,
}

impl DocumentClient {
    pub fn new(server_url: &str, user_id: &str) -> Self {
        Self {
            base_url: server_url.trim_end_matches('/').to_string(),
            user_id: user_id.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Upload one local file as a document. One request per call; the
    /// original filename travels in the multipart part.
    pub async fn upload(&self, path: &Path) -> UploadOutcome {
        let filename = display_name(path);

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Cannot read {}: {e}", path.display());
                return UploadOutcome::Unreadable {
                    reason: e.to_string(),
                };
            }
        };

        let part = multipart::Part::bytes(bytes).file_name(filename.clone());
        let form = multipart::Form::new()
            .text("user_id", self.user_id.clone())
            .part("file", part);

        let response = match self
            .http
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Upload of {filename} never completed: {e}");
                return UploadOutcome::Unreachable;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("Upload of {filename} rejected with HTTP {status}");
            return UploadOutcome::HttpFailure {
                status: status.as_u16(),
            };
        }

        match response.json::<UploadReceipt>().await {
            Ok(receipt) if receipt.status == "ok" => {
                let chunks = receipt.chunks.unwrap_or(0);
                info!("Uploaded {filename}: {chunks} chunks");
                UploadOutcome::Accepted {
                    filename: receipt.filename.unwrap_or(filename),
                    chunks,
                }
            }
            Ok(receipt) => UploadOutcome::Rejected {
                message: receipt.message,
            },
            Err(e) => {
                warn!("Upload receipt for {filename} undecodable: {e}");
                UploadOutcome::Rejected { message: None }
            }
        }
    }

    /// Delete every stored document for the configured user.
    pub async fn clear_documents(&self) -> ClearOutcome {
        let response = match self
            .http
            .delete(format!("{}/documents", self.base_url))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Document clear never completed: {e}");
                return ClearOutcome::Unreachable;
            }
        };

        if !response.status().is_success() {
            warn!("Document clear rejected with HTTP {}", response.status());
            return ClearOutcome::Rejected;
        }

        match response.json::<ClearReceipt>().await {
            Ok(receipt) if receipt.status == "ok" => {
                let deleted = receipt.deleted_documents.unwrap_or(0);
                info!("Cleared {deleted} documents");
                ClearOutcome::Cleared { deleted }
            }
            Ok(_) | Err(_) => ClearOutcome::Rejected,
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
