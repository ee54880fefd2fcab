//! Web search sub-protocol.
//!
//! `POST {base}/search` with the query; the backend answers with a summary
//! in the chat-completion shape plus an ordered list of cited sources.

use crate::http::{status_error, transport, SHARED_HTTP};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::chat::SourceLink;
use shared::error::ApiError;

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    sources: Vec<SourceLink>,
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

/// A search answer: summary text plus its citations, in backend order.
#[derive(Debug, Clone)]
pub struct SearchAnswer {
    pub text: String,
    pub sources: Vec<SourceLink>,
}

pub struct SearchClient {
    http: Client,
    base_url: String,
}

impl SearchClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: SHARED_HTTP.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn search(&self, query: &str) -> Result<SearchAnswer, ApiError> {
        let url = format!("{}/search", self.base_url);
        tracing::debug!(query, "sending search request");
        let resp = self
            .http
            .post(&url)
            .json(&SearchRequest { query })
            .send()
            .await
            .map_err(transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(transport)?;
        match serde_json::from_str::<SearchResponse>(&body) {
            Ok(parsed) => {
                if let Some(err) = parsed.error {
                    return Err(ApiError::Service(err));
                }
                if !status.is_success() {
                    return Err(status_error(status, &body));
                }
                let text = parsed
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.message.and_then(|m| m.content))
                    .unwrap_or_else(|| "No results found.".to_string());
                Ok(SearchAnswer {
                    text,
                    sources: parsed.sources,
                })
            }
            Err(_) => Err(status_error(status, &body)),
        }
    }
}
