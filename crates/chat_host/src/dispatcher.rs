//! Request dispatch: one outbound call per classified turn.
//!
//! Failures never propagate as `Err` out of `dispatch`; they come back as
//! a `Failed` outcome carrying the human-readable notice the log shows.
//! No retry, no backoff, no timeout beyond the transport default.

use crate::classifier::Intent;
use crate::session::ConversationSession;
use providers::chat::ChatClient;
use providers::document::DocumentClient;
use providers::image::ImageClient;
use providers::search::SearchClient;
use shared::chat::{Message, SourceLink};

#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    Chat { text: String },
    Image { prompt: String, data_uri: String },
    Search { text: String, sources: Vec<SourceLink> },
    Document { text: String },
    Failed { notice: String },
}

impl DispatchOutcome {
    /// Fold the outcome into the assistant message appended to the log.
    /// A failure becomes a synthetic assistant message, keeping the
    /// session usable.
    pub fn into_message(self) -> Message {
        match self {
            DispatchOutcome::Chat { text } => Message::assistant(text),
            DispatchOutcome::Image { prompt, data_uri } => Message::assistant_image(
                format!("Here's your image for: \"{}\"", prompt),
                data_uri,
            ),
            DispatchOutcome::Search { text, sources } => {
                Message::assistant(text).with_sources(sources)
            }
            DispatchOutcome::Document { text } => Message::assistant(text),
            DispatchOutcome::Failed { notice } => Message::assistant(notice),
        }
    }
}

pub struct Dispatcher {
    chat: ChatClient,
    image: ImageClient,
    search: SearchClient,
    document: DocumentClient,
    uid: String,
}

impl Dispatcher {
    pub fn new(base_url: &str, uid: &str) -> Self {
        Self {
            chat: ChatClient::new(base_url),
            image: ImageClient::new(base_url),
            search: SearchClient::new(base_url),
            document: DocumentClient::new(base_url),
            uid: uid.to_string(),
        }
    }

    /// Upload a document under this dispatcher's identity. Returns the
    /// chunk count the indexer reported.
    pub async fn upload_document(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<u64, shared::error::ApiError> {
        self.document.upload(bytes, file_name, &self.uid).await
    }

    /// Send exactly one request to the endpoint the intent selects and
    /// await its single response. The caller holds the busy guard.
    pub async fn dispatch(
        &self,
        intent: Intent,
        utterance: &str,
        session: &ConversationSession,
    ) -> DispatchOutcome {
        match intent {
            Intent::PlainChat => {
                let payload = session.build_history_payload(utterance);
                match self.chat.complete(payload).await {
                    Ok(text) => DispatchOutcome::Chat { text },
                    Err(e) => DispatchOutcome::Failed {
                        notice: format!("Error: {}", e),
                    },
                }
            }
            Intent::ImageGeneration => match self.image.generate(utterance).await {
                Ok(data_uri) => DispatchOutcome::Image {
                    prompt: utterance.to_string(),
                    data_uri,
                },
                Err(e) => DispatchOutcome::Failed {
                    notice: format!("Could not generate image: {}", e),
                },
            },
            Intent::WebSearch => match self.search.search(utterance).await {
                Ok(answer) => DispatchOutcome::Search {
                    text: answer.text,
                    sources: answer.sources,
                },
                Err(e) => DispatchOutcome::Failed {
                    notice: format!("Search error: {}", e),
                },
            },
            Intent::DocumentQuery => {
                let Some(doc) = session.active_document() else {
                    return DispatchOutcome::Failed {
                        notice: "Document error: no document uploaded".to_string(),
                    };
                };
                match self
                    .document
                    .ask(utterance, &self.uid, &doc.file_name)
                    .await
                {
                    Ok(text) => DispatchOutcome::Document { text },
                    Err(e) => DispatchOutcome::Failed {
                        notice: format!("Document error: {}", e),
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::chat::MessageKind;

    #[test]
    fn test_image_outcome_becomes_image_message() {
        let msg = DispatchOutcome::Image {
            prompt: "a sunset".to_string(),
            data_uri: "data:image/png;base64,AA".to_string(),
        }
        .into_message();
        assert_eq!(msg.kind, MessageKind::Image);
        assert_eq!(msg.text, "Here's your image for: \"a sunset\"");
        assert!(msg.image.is_some());
    }

    #[test]
    fn test_failed_outcome_becomes_plain_assistant_message() {
        let msg = DispatchOutcome::Failed {
            notice: "Search error: timeout".to_string(),
        }
        .into_message();
        assert_eq!(msg.kind, MessageKind::Text);
        assert_eq!(msg.text, "Search error: timeout");
        assert!(msg.image.is_none());
    }

    #[test]
    fn test_search_outcome_carries_sources() {
        let msg = DispatchOutcome::Search {
            text: "summary".to_string(),
            sources: vec![SourceLink {
                title: "A".to_string(),
                url: "https://a.example".to_string(),
            }],
        }
        .into_message();
        assert_eq!(msg.sources.len(), 1);
    }
}
