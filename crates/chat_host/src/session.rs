//! In-memory conversation state for the single active session.

use shared::api::ChatMessage;
use shared::chat::{Message, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    #[default]
    Normal,
    /// Every turn is answered from the uploaded document.
    DocumentQuery,
}

/// The uploaded document the session is currently scoped to.
#[derive(Debug, Clone)]
pub struct ActiveDocument {
    /// Display name shown to the user
    pub name: String,
    /// Identifier the query route keys on (the stored filename)
    pub file_name: String,
}

/// Ordered message log plus mode flags for one open chat.
///
/// Owned exclusively by the host for the lifetime of the session; reset
/// only on new-chat or sign-out. Document-query mode and normal mode are
/// mutually exclusive by construction.
#[derive(Debug, Default)]
pub struct ConversationSession {
    messages: Vec<Message>,
    mode: SessionMode,
    active_document: Option<ActiveDocument>,
}

impl ConversationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn active_document(&self) -> Option<&ActiveDocument> {
        self.active_document.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn append_user(&mut self, text: &str) {
        self.messages.push(Message::user(text));
    }

    pub fn append_assistant(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// The full context window for a chat turn: every prior message with
    /// its role mapped (`user` stays `user`, everything else becomes
    /// `assistant`), followed by the new utterance. No truncation; the
    /// window grows without bound over the session's life.
    pub fn build_history_payload(&self, new_utterance: &str) -> Vec<ChatMessage> {
        let mut payload: Vec<ChatMessage> = self
            .messages
            .iter()
            .map(|m| ChatMessage {
                role: match m.role {
                    Role::User => "user".to_string(),
                    _ => "assistant".to_string(),
                },
                content: m.text.clone(),
            })
            .collect();
        payload.push(ChatMessage {
            role: "user".to_string(),
            content: new_utterance.to_string(),
        });
        payload
    }

    /// Switch into document-query mode. A fresh document session starts
    /// blank: the log is cleared and seeded with the upload confirmation
    /// before the document identifier is recorded.
    pub fn enter_document_mode(&mut self, name: &str) {
        self.messages.clear();
        self.messages.push(Message::assistant(format!(
            "Uploaded \"{}\". Ask me anything about it.",
            name
        )));
        self.mode = SessionMode::DocumentQuery;
        self.active_document = Some(ActiveDocument {
            name: name.to_string(),
            file_name: name.to_string(),
        });
    }

    pub fn exit_document_mode(&mut self) {
        self.mode = SessionMode::Normal;
        self.active_document = None;
    }

    /// Clear all state. The caller persists the log first when it wants a
    /// snapshot; reset itself never touches the store.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.mode = SessionMode::Normal;
        self.active_document = None;
    }

    /// Replace the log with a saved snapshot's messages.
    pub fn restore(&mut self, messages: Vec<Message>) {
        self.messages = messages;
        self.mode = SessionMode::Normal;
        self.active_document = None;
    }
}
