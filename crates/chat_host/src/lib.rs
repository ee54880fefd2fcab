//! Conversation orchestration: intent classification, request dispatch,
//! and the in-memory session log.

pub mod busy;
pub mod classifier;
pub mod dispatcher;
pub mod host;
pub mod session;

pub use classifier::{classify, Intent};
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use host::{ChatHost, HostError};
pub use session::{ActiveDocument, ConversationSession, SessionMode};
