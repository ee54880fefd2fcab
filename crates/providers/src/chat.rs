//! Plain chat sub-protocol.
//!
//! `POST {base}/chat` with the full role-tagged history; the response is
//! OpenAI-shaped (`choices[0].message.content`). Older backend builds
//! returned `choices[0].text`, so both shapes are accepted.

use crate::http::{status_error, transport, SHARED_HTTP};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::api::ChatMessage;
use shared::error::ApiError;

#[derive(Debug, Serialize)]
struct ChatRequest {
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Fixed reply when the backend answers 2xx with an empty choice.
const EMPTY_REPLY: &str = "Sorry, I couldn't respond.";

fn extract_text(resp: ChatResponse) -> Result<String, ApiError> {
    // The error field wins even on a 2xx status.
    if let Some(err) = resp.error {
        return Err(ApiError::Service(err));
    }
    let text = resp
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.and_then(|m| m.content).or(c.text))
        .unwrap_or_else(|| EMPTY_REPLY.to_string());
    Ok(text)
}

pub struct ChatClient {
    http: Client,
    base_url: String,
}

impl ChatClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: SHARED_HTTP.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Send the full history (prior turns + the new utterance already
    /// appended by the caller) and await the assistant's single reply.
    pub async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, ApiError> {
        let url = format!("{}/chat", self.base_url);
        tracing::debug!(turns = messages.len(), "sending chat request");
        let resp = self
            .http
            .post(&url)
            .json(&ChatRequest { messages })
            .send()
            .await
            .map_err(transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(transport)?;
        match serde_json::from_str::<ChatResponse>(&body) {
            Ok(mut parsed) => {
                if let Some(err) = parsed.error.take() {
                    return Err(ApiError::Service(err));
                }
                if !status.is_success() {
                    return Err(status_error(status, &body));
                }
                extract_text(parsed)
            }
            Err(_) => Err(status_error(status, &body)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message_content() {
        let resp: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"hi there"}}]}"#).unwrap();
        assert_eq!(extract_text(resp).unwrap(), "hi there");
    }

    #[test]
    fn test_extract_legacy_text_shape() {
        let resp: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"text":"legacy reply"}]}"#).unwrap();
        assert_eq!(extract_text(resp).unwrap(), "legacy reply");
    }

    #[test]
    fn test_error_field_wins_over_choices() {
        let resp: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":"ignored"}}],"error":"rate limited"}"#,
        )
        .unwrap();
        match extract_text(resp) {
            Err(ApiError::Service(msg)) => assert_eq!(msg, "rate limited"),
            other => panic!("expected service error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_empty_choices_fall_back_to_fixed_reply() {
        let resp: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(extract_text(resp).unwrap(), EMPTY_REPLY);
    }
}
