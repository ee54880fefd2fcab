//! Chat export and image saving.

use anyhow::{anyhow, Context, Result};
use base64::Engine as _;
use shared::chat::{Message, Role};
use std::fs;
use std::path::Path;

/// Plain-text transcript in the classic export format:
/// `You [14:05]:` / `Intellio AI [14:05]:` blocks separated by rules.
pub fn format_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| {
            let who = match m.role {
                Role::User => "You",
                Role::Assistant => "Intellio AI",
            };
            let text = if m.text.is_empty() { "[Image]" } else { &m.text };
            format!("{} [{}]:\n{}\n", who, m.time, text)
        })
        .collect::<Vec<_>>()
        .join("\n---\n\n")
}

pub fn write_transcript(path: &Path, messages: &[Message]) -> Result<()> {
    fs::write(path, format_transcript(messages))
        .with_context(|| format!("could not write {}", path.display()))
}

/// Decode a `data:image/png;base64,...` URI and write the PNG bytes.
pub fn save_image(path: &Path, data_uri: &str) -> Result<()> {
    let payload = data_uri
        .split_once("base64,")
        .map(|(_, b64)| b64)
        .ok_or_else(|| anyhow!("not a base64 data URI"))?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .context("image payload is not valid base64")?;
    fs::write(path, bytes).with_context(|| format!("could not write {}", path.display()))
}
