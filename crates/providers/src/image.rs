//! Image generation sub-protocol.
//!
//! `POST {base}/generate-image` with the raw utterance as the prompt; the
//! backend runs the diffusion model and answers with a base64 data URI.

use crate::http::{status_error, transport, SHARED_HTTP};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::error::ApiError;

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

pub struct ImageClient {
    http: Client,
    base_url: String,
}

impl ImageClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: SHARED_HTTP.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Returns the generated image as a `data:image/png;base64,...` URI.
    pub async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        let url = format!("{}/generate-image", self.base_url);
        tracing::debug!(prompt_len = prompt.len(), "sending image request");
        let resp = self
            .http
            .post(&url)
            .json(&ImageRequest { prompt })
            .send()
            .await
            .map_err(transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(transport)?;
        match serde_json::from_str::<ImageResponse>(&body) {
            Ok(parsed) => {
                if let Some(err) = parsed.error {
                    return Err(ApiError::Service(err));
                }
                if !status.is_success() {
                    return Err(status_error(status, &body));
                }
                parsed
                    .image
                    .ok_or_else(|| ApiError::Service("No image returned".to_string()))
            }
            Err(_) => Err(status_error(status, &body)),
        }
    }
}
