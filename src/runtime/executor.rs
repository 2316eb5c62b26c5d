//! Conversation runtime executor

use crate::llm::{LlmError, LlmService};
use crate::session::{PendingReply, Session, SessionError};
use crate::state_machine::{Event, TransitionError};
use crate::store::KeyValueStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Drives a [`Session`] against a generation service.
///
/// Requests run as background tasks and report back through a channel,
/// so the session stays usable while a reply is pending.
pub struct ChatRuntime<S> {
    session: Session<S>,
    llm_client: Arc<dyn LlmService>,
    request_timeout: Duration,
    event_tx: mpsc::Sender<Event>,
    event_rx: mpsc::Receiver<Event>,
}

impl<S: KeyValueStore> ChatRuntime<S> {
    pub fn new(
        session: Session<S>,
        llm_client: Arc<dyn LlmService>,
        request_timeout: Duration,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::channel(8);
        Self {
            session,
            llm_client,
            request_timeout,
            event_tx,
            event_rx,
        }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<S> {
        &mut self.session
    }

    /// Start a send cycle; the reply arrives later via [`Self::recv_event`]
    #[allow(dead_code)] // Used in tests
    pub fn send(&mut self, text: &str) -> Result<(), TransitionError> {
        let pending = self.session.begin_send(text)?;
        self.spawn_request(pending);
        Ok(())
    }

    /// Commit the draft on the active tab, issuing a request if it was a send
    pub fn submit_draft(&mut self) -> Result<(), SessionError> {
        if let Some(pending) = self.session.submit_draft()? {
            self.spawn_request(pending);
        }
        Ok(())
    }

    /// Send and wait until the reply has been appended
    #[allow(dead_code)] // Used in tests
    pub async fn submit_user_message(&mut self, text: &str) -> Result<(), TransitionError> {
        self.send(text)?;
        self.wait_for_reply().await;
        Ok(())
    }

    /// Process events until no request is pending
    #[allow(dead_code)] // Used in tests
    pub async fn wait_for_reply(&mut self) {
        while self.session.is_awaiting_reply() {
            let Some(event) = self.event_rx.recv().await else {
                break;
            };
            self.handle_event(event);
        }
    }

    /// Next settled request
    pub async fn recv_event(&mut self) -> Option<Event> {
        self.event_rx.recv().await
    }

    pub fn handle_event(&mut self, event: Event) {
        if let Err(e) = self.session.handle_event(event) {
            tracing::warn!(error = %e, "Dropped conversation event");
        }
    }

    fn spawn_request(&self, pending: PendingReply) {
        let llm_client = Arc::clone(&self.llm_client);
        let event_tx = self.event_tx.clone();
        let timeout = self.request_timeout;

        tokio::spawn(async move {
            let event = request_reply(llm_client.as_ref(), &pending.prompt, timeout).await;
            if event_tx.send(event).await.is_err() {
                tracing::warn!("Runtime gone before reply was delivered");
            }
        });
    }
}

/// Run one generation call; a timeout settles like any other failure
pub async fn request_reply(llm_client: &dyn LlmService, prompt: &str, timeout: Duration) -> Event {
    match tokio::time::timeout(timeout, llm_client.generate(prompt)).await {
        Ok(outcome) => Event::from(outcome),
        Err(_) => {
            let err = LlmError::timeout(timeout);
            Event::LlmError {
                message: err.message,
                error_kind: err.kind,
            }
        }
    }
}
