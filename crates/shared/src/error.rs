//! Error taxonomy for the capability and persistence calls.
//!
//! Every failure is caught at the call site and converted into either a
//! transient notice or a synthetic assistant message. Nothing here is fatal.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level failure: unreachable host, TLS, connection reset.
    #[error("network error: {0}")]
    Transport(String),

    /// The remote service answered with an `error` field or a bare non-2xx.
    #[error("{0}")]
    Service(String),

    /// The chat-history store rejected a read or write.
    #[error("history store error: {0}")]
    Persistence(String),

    /// The runtime cannot provide the capability at all (e.g. voice input).
    #[error("{0} is not available in this runtime")]
    UnsupportedCapability(&'static str),
}
