//! HTTP clients for the four inference sub-protocols.
//!
//! One outbound call per invocation, no retries, no streaming. Errors come
//! back as `ApiError` for the dispatcher to fold into the conversation.

pub mod chat;
pub mod document;
pub mod image;
pub mod search;

mod http;
