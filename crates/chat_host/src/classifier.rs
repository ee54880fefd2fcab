//! Keyword-based intent routing.
//!
//! The rule is a fixed precedence over case-insensitive substring matches,
//! not inferred intent. It is deliberately literal: "paint a picture of
//! the stock market" hits both phrase lists and resolves to image
//! generation because search only wins when no image phrase is present.

use crate::session::SessionMode;

/// The classified purpose of a user utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    PlainChat,
    ImageGeneration,
    WebSearch,
    DocumentQuery,
}

/// Phrases that mark an utterance as an image request.
pub const IMAGE_PHRASES: [&str; 15] = [
    "generate image",
    "create image",
    "draw",
    "generate a picture",
    "show me a picture",
    "generate photo",
    "make an image",
    "create a photo",
    "paint",
    "illustrate",
    "generate a image",
    "create a image",
    "image of",
    "picture of",
    "photo of",
];

/// Phrases that mark an utterance as a web-search request.
pub const SEARCH_PHRASES: [&str; 13] = [
    "search for",
    "search the web",
    "look up",
    "google",
    "latest news",
    "news about",
    "weather in",
    "forecast",
    "price of",
    "stock market",
    "who won",
    "what's happening",
    "current events",
];

/// Classify an utterance. Pure function of `(utterance, mode)`.
///
/// Precedence, in order:
/// 1. document-query mode answers every turn, keywords ignored
/// 2. web-search, iff a search phrase matches and no image phrase does
/// 3. image-generation, iff an image phrase matches
/// 4. plain chat
pub fn classify(utterance: &str, mode: SessionMode) -> Intent {
    if mode == SessionMode::DocumentQuery {
        return Intent::DocumentQuery;
    }
    let lower = utterance.to_lowercase();
    let has_image = IMAGE_PHRASES.iter().any(|p| lower.contains(p));
    if SEARCH_PHRASES.iter().any(|p| lower.contains(p)) && !has_image {
        return Intent::WebSearch;
    }
    if has_image {
        return Intent::ImageGeneration;
    }
    Intent::PlainChat
}
