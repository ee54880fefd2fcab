//! Remote chat-history store.
//!
//! Snapshots live in an account-scoped row store (Supabase-style REST).
//! The adapter is the sole writer: a snapshot is created once on a
//! session-ending action, never mutated, and deleted only on explicit
//! user request.

use async_trait::async_trait;
use chrono::{Local, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::chat::Message;
use shared::error::ApiError;
use shared::settings::StoreSettings;

/// A persisted, immutable copy of a session's message log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSnapshot {
    pub id: i64,
    pub uid: String,
    pub title: String,
    /// Display date, e.g. "Mar 04, 14:05"
    pub date: String,
    /// Unix milliseconds; the store orders by this, newest first
    pub created_at: i64,
    pub messages: Vec<Message>,
}

/// Insert payload; the store mints the row id.
#[derive(Debug, Serialize)]
struct NewSnapshot<'a> {
    uid: &'a str,
    title: String,
    date: String,
    created_at: i64,
    messages: &'a [Message],
}

/// Snapshot title: the first message's text, truncated to 40 characters.
/// An image-only or blank first message falls back to a fixed label.
pub fn derive_title(messages: &[Message]) -> String {
    let title: String = messages
        .first()
        .map(|m| m.text.trim().chars().take(40).collect())
        .unwrap_or_default();
    if title.is_empty() {
        "New Chat".to_string()
    } else {
        title
    }
}

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Persist the log as a new snapshot and return the created record.
    async fn save(&self, owner: &str, messages: &[Message]) -> Result<ChatSnapshot, ApiError>;
    /// All snapshots for the owner, newest first. No snapshots is an
    /// empty list, not an error.
    async fn load_all(&self, owner: &str) -> Result<Vec<ChatSnapshot>, ApiError>;
    async fn delete(&self, id: i64) -> Result<(), ApiError>;
}

pub struct ChatStore {
    http: Client,
    base_url: String,
    api_key: String,
    bearer: String,
}

impl ChatStore {
    /// Build a store client from settings. Returns `None` when the store
    /// is not configured; callers degrade to an unsaved session.
    pub fn from_settings(settings: &StoreSettings, access_token: Option<&str>) -> Option<Self> {
        let url = settings.url.as_deref()?;
        let api_key = settings.api_key.as_deref()?;
        Some(Self {
            http: Client::new(),
            base_url: format!("{}/rest/v1/chats", url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            bearer: access_token.unwrap_or(api_key).to_string(),
        })
    }

    fn persistence(e: reqwest::Error) -> ApiError {
        ApiError::Persistence(e.to_string())
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let detail: String = body.chars().take(300).collect();
        Err(ApiError::Persistence(format!("{} {}", status, detail)))
    }
}

#[async_trait]
impl SnapshotStore for ChatStore {
    async fn save(&self, owner: &str, messages: &[Message]) -> Result<ChatSnapshot, ApiError> {
        let row = NewSnapshot {
            uid: owner,
            title: derive_title(messages),
            date: Local::now().format("%b %d, %H:%M").to_string(),
            created_at: Utc::now().timestamp_millis(),
            messages,
        };
        tracing::info!(title = %row.title, count = messages.len(), "saving chat snapshot");
        let resp = self
            .http
            .post(&self.base_url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.bearer))
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await
            .map_err(Self::persistence)?;
        let created: Vec<ChatSnapshot> = Self::check(resp)
            .await?
            .json()
            .await
            .map_err(Self::persistence)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Persistence("insert returned no record".to_string()))
    }

    async fn load_all(&self, owner: &str) -> Result<Vec<ChatSnapshot>, ApiError> {
        let resp = self
            .http
            .get(&self.base_url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.bearer))
            .query(&[
                ("uid", format!("eq.{}", owner)),
                ("order", "created_at.desc".to_string()),
                ("select", "*".to_string()),
            ])
            .send()
            .await
            .map_err(Self::persistence)?;
        Self::check(resp)
            .await?
            .json()
            .await
            .map_err(Self::persistence)
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let resp = self
            .http
            .delete(&self.base_url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.bearer))
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await
            .map_err(Self::persistence)?;
        Self::check(resp).await?;
        tracing::info!(id, "deleted chat snapshot");
        Ok(())
    }
}
