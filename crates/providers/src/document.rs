//! Document upload and query sub-protocol.
//!
//! Upload is multipart (`pdf` file part + `uid` text field); the backend
//! chunks and indexes the document and reports how many chunks it made.
//! Queries go as JSON keyed by `(uid, filename)`.

use crate::http::{status_error, transport, SHARED_HTTP};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::error::ApiError;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    chunks: u64,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    question: &'a str,
    uid: &'a str,
    filename: &'a str,
}

#[derive(Debug, Deserialize)]
struct AskResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct DocumentClient {
    http: Client,
    base_url: String,
}

impl DocumentClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: SHARED_HTTP.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Upload a PDF for the given identity. Returns the chunk count the
    /// indexer reported.
    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        uid: &str,
    ) -> Result<u64, ApiError> {
        let url = format!("{}/upload-pdf", self.base_url);
        tracing::info!(file_name, size = bytes.len(), "uploading document");
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .map_err(transport)?;
        let form = Form::new().part("pdf", part).text("uid", uid.to_string());
        let resp = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(transport)?;
        match serde_json::from_str::<UploadResponse>(&body) {
            Ok(parsed) => {
                if let Some(err) = parsed.error {
                    return Err(ApiError::Service(err));
                }
                if !status.is_success() {
                    return Err(status_error(status, &body));
                }
                if !parsed.success {
                    return Err(ApiError::Service("upload rejected".to_string()));
                }
                Ok(parsed.chunks)
            }
            Err(_) => Err(status_error(status, &body)),
        }
    }

    /// Ask a question against a previously uploaded document.
    pub async fn ask(
        &self,
        question: &str,
        uid: &str,
        filename: &str,
    ) -> Result<String, ApiError> {
        let url = format!("{}/ask-pdf", self.base_url);
        tracing::debug!(filename, "sending document query");
        let resp = self
            .http
            .post(&url)
            .json(&AskRequest {
                question,
                uid,
                filename,
            })
            .send()
            .await
            .map_err(transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(transport)?;
        match serde_json::from_str::<AskResponse>(&body) {
            Ok(parsed) => {
                if let Some(err) = parsed.error {
                    return Err(ApiError::Service(err));
                }
                if !status.is_success() {
                    return Err(status_error(status, &body));
                }
                Ok(parsed
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.message.and_then(|m| m.content))
                    .unwrap_or_else(|| "Sorry, I couldn't respond.".to_string()))
            }
            Err(_) => Err(status_error(status, &body)),
        }
    }
}
