//! Conversation message types.
//!
//! A `Message` is immutable once appended; the conversation log is an
//! append-only sequence that only explicit user actions truncate.

use chrono::Local;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    Image,
}

/// A cited source attached to a search answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLink {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
    /// Generated image as a `data:image/png;base64,...` URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceLink>,
    /// Display timestamp, e.g. "14:05"
    pub time: String,
    #[serde(default)]
    pub kind: MessageKind,
}

/// Wall-clock display timestamp for a freshly appended message.
pub fn display_time() -> String {
    Local::now().format("%H:%M").to_string()
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            image: None,
            sources: Vec::new(),
            time: display_time(),
            kind: MessageKind::Text,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            image: None,
            sources: Vec::new(),
            time: display_time(),
            kind: MessageKind::Text,
        }
    }

    pub fn assistant_image(caption: impl Into<String>, data_uri: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: caption.into(),
            image: Some(data_uri.into()),
            sources: Vec::new(),
            time: display_time(),
            kind: MessageKind::Image,
        }
    }

    pub fn with_sources(mut self, sources: Vec<SourceLink>) -> Self {
        self.sources = sources;
        self
    }
}
