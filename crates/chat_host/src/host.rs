//! The session host: glue between classifier, dispatcher, and the log.

use crate::busy::BusyFlag;
use crate::classifier::classify;
use crate::dispatcher::Dispatcher;
use crate::session::ConversationSession;
use shared::chat::Message;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum HostError {
    /// A dispatch is already outstanding for this session.
    #[error("a request is already in flight")]
    Busy,
}

/// One host per signed-in identity; owns the single active session.
pub struct ChatHost {
    session: ConversationSession,
    dispatcher: Dispatcher,
    busy: BusyFlag,
}

impl ChatHost {
    pub fn new(base_url: &str, uid: &str) -> Self {
        Self {
            session: ConversationSession::new(),
            dispatcher: Dispatcher::new(base_url, uid),
            busy: BusyFlag::new(),
        }
    }

    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ConversationSession {
        &mut self.session
    }

    pub fn busy_flag(&self) -> &BusyFlag {
        &self.busy
    }

    /// Handle one user turn: classify, dispatch the single outbound call,
    /// then append the user message and the assistant reply to the log.
    /// Returns the assistant message that was appended.
    pub async fn send(&mut self, text: &str) -> Result<Message, HostError> {
        let _guard = self.busy.try_acquire().ok_or(HostError::Busy)?;
        let intent = classify(text, self.session.mode());
        tracing::info!(request_id = %Uuid::new_v4(), ?intent, "dispatching user turn");

        // History payload is built from the log as it stood before this
        // turn; the dispatcher appends the new utterance itself.
        let outcome = self.dispatcher.dispatch(intent, text, &self.session).await;

        self.session.append_user(text);
        let reply = outcome.into_message();
        self.session.append_assistant(reply.clone());
        Ok(reply)
    }

    /// Upload a document and switch the session into document-query mode.
    /// Returns the chunk count reported by the indexer, or the notice to
    /// toast when the upload was rejected.
    pub async fn upload_document(
        &mut self,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<Result<u64, String>, HostError> {
        let _guard = self.busy.try_acquire().ok_or(HostError::Busy)?;
        match self.dispatcher.upload_document(bytes, file_name).await {
            Ok(chunks) => {
                self.session.enter_document_mode(file_name);
                Ok(Ok(chunks))
            }
            Err(e) => Ok(Err(format!("Could not upload document: {}", e))),
        }
    }
}
