//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O.

use crate::llm::{LlmError, LlmResponse, LlmService};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// Mock LLM Client
// ============================================================================

/// Mock LLM client that returns queued responses
pub struct MockLlmClient {
    responses: Mutex<VecDeque<Result<LlmResponse, LlmError>>>,
    model_id: String,
    /// Record of all prompts received
    pub prompts: Mutex<Vec<String>>,
}

impl MockLlmClient {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            model_id: model_id.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response
    pub fn queue_response(&self, response: LlmResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    /// Queue a successful single-text response
    pub fn queue_text(&self, text: &str) {
        self.queue_response(LlmResponse::from_text(text));
    }

    /// Queue an error response
    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded prompts
    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn next_response(&self) -> Result<LlmResponse, LlmError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock response queued")))
    }
}

#[async_trait]
impl LlmService for MockLlmClient {
    async fn generate(&self, prompt: &str) -> Result<LlmResponse, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.next_response()
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// ============================================================================
// Delayed Mock LLM Client
// ============================================================================

/// Mock LLM client with configurable delay
pub struct DelayedMockLlmClient {
    inner: MockLlmClient,
    delay: Duration,
    /// Notified when request starts (for test synchronization)
    pub request_started: Arc<Notify>,
}

impl DelayedMockLlmClient {
    pub fn new(model_id: impl Into<String>, delay: Duration) -> Self {
        Self {
            inner: MockLlmClient::new(model_id),
            delay,
            request_started: Arc::new(Notify::new()),
        }
    }

    pub fn queue_text(&self, text: &str) {
        self.inner.queue_text(text);
    }

    pub fn recorded_prompts(&self) -> Vec<String> {
        self.inner.recorded_prompts()
    }
}

#[async_trait]
impl LlmService for DelayedMockLlmClient {
    async fn generate(&self, prompt: &str) -> Result<LlmResponse, LlmError> {
        self.inner.prompts.lock().unwrap().push(prompt.to_string());
        self.request_started.notify_one();
        tokio::time::sleep(self.delay).await;
        self.inner.next_response()
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{request_reply, ChatRuntime};
    use crate::session::{Sender, Session, SessionError, Tab};
    use crate::llm::{Candidate, LlmErrorKind, Usage};
    use crate::state_machine::{Event, Mood, TransitionError, FAILURE_REPLY, FALLBACK_REPLY};
    use crate::store::MemoryStore;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn runtime(llm: Arc<dyn LlmService>) -> ChatRuntime<Arc<MemoryStore>> {
        ChatRuntime::new(Session::new(Arc::new(MemoryStore::new())), llm, TIMEOUT)
    }

    fn tail(rt: &ChatRuntime<Arc<MemoryStore>>, n: usize) -> Vec<(Sender, String)> {
        let msgs = rt.session().messages();
        msgs[msgs.len() - n..]
            .iter()
            .map(|m| (m.sender, m.text.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_mock_llm_client() {
        let mock = MockLlmClient::new("test-model");
        mock.queue_text("Hello");

        let response = mock.generate("prompt").await.unwrap();
        assert_eq!(response.text().as_deref(), Some("Hello"));

        // Second call should fail (no more responses)
        assert!(mock.generate("prompt").await.is_err());
        assert_eq!(mock.recorded_prompts().len(), 2);
    }

    /// Integration test: simple text response
    #[tokio::test]
    async fn test_simple_text_response() {
        let llm = Arc::new(MockLlmClient::new("test-model"));
        llm.queue_text("Hello! **You matter.**");

        let mut rt = runtime(llm.clone());
        rt.submit_user_message("Hi").await.unwrap();

        assert!(!rt.session().is_awaiting_reply());
        assert_eq!(rt.session().messages().len(), 3);
        assert_eq!(
            tail(&rt, 2),
            vec![
                (Sender::User, "Hi".to_string()),
                (Sender::Bot, "Hello! **You matter.**".to_string()),
            ]
        );
        assert_eq!(llm.recorded_prompts().len(), 1);
    }

    /// Integration test: network error degrades to an apology
    #[tokio::test]
    async fn test_llm_error_handling() {
        let llm = Arc::new(MockLlmClient::new("test-model"));
        llm.queue_error(LlmError::network("Connection failed"));

        let mut rt = runtime(llm);
        rt.submit_user_message("hi").await.unwrap();

        assert_eq!(
            tail(&rt, 2),
            vec![
                (Sender::User, "hi".to_string()),
                (Sender::Bot, FAILURE_REPLY.to_string()),
            ]
        );
        assert!(!rt.session().is_awaiting_reply());

        // the session is usable again afterwards
        rt.submit_user_message("still there?").await.unwrap();
        assert_eq!(rt.session().messages().len(), 5);
    }

    #[tokio::test]
    async fn test_each_cycle_adds_two_messages() {
        let llm = Arc::new(MockLlmClient::new("test-model"));
        llm.queue_text("one");
        llm.queue_error(LlmError::server_error("Server error: overloaded"));
        llm.queue_text("three");

        let mut rt = runtime(llm);
        for (i, text) in ["a", "b", "c"].into_iter().enumerate() {
            rt.submit_user_message(text).await.unwrap();
            assert_eq!(rt.session().messages().len(), 1 + 2 * (i + 1));
        }
    }

    #[tokio::test]
    async fn test_blank_message_is_noop() {
        let llm = Arc::new(MockLlmClient::new("test-model"));
        let mut rt = runtime(llm.clone());

        let err = rt.submit_user_message("   ").await.unwrap_err();
        assert_eq!(err, TransitionError::EmptyInput);
        assert_eq!(rt.session().messages().len(), 1);
        assert!(llm.recorded_prompts().is_empty());
    }

    /// A second send while the first is in flight is rejected
    #[tokio::test]
    async fn test_send_rejected_while_awaiting() {
        let llm = Arc::new(DelayedMockLlmClient::new(
            "test-model",
            Duration::from_millis(200),
        ));
        llm.queue_text("first reply");

        let mut rt = runtime(llm.clone());
        rt.send("first").unwrap();
        llm.request_started.notified().await;

        assert!(rt.session().is_awaiting_reply());
        assert_eq!(rt.send("second"), Err(TransitionError::AwaitingReply));
        assert_eq!(rt.session().messages().len(), 2);

        // other actions stay available while waiting
        rt.session_mut().set_mood(Mood::Reflective);
        rt.session_mut().save_entry("waiting patiently").unwrap();

        rt.wait_for_reply().await;
        assert!(!rt.session().is_awaiting_reply());
        assert_eq!(tail(&rt, 1), vec![(Sender::Bot, "first reply".to_string())]);
        assert_eq!(llm.recorded_prompts().len(), 1);
        assert_eq!(rt.session().journal_entries().len(), 1);
    }

    #[tokio::test]
    async fn test_mood_change_affects_next_prompt_only() {
        let llm = Arc::new(MockLlmClient::new("test-model"));
        llm.queue_text("ok");
        llm.queue_text("ok");

        let mut rt = runtime(llm.clone());
        rt.submit_user_message("hi").await.unwrap();
        rt.session_mut().set_mood(Mood::Happy);
        rt.submit_user_message("hi").await.unwrap();

        let prompts = llm.recorded_prompts();
        assert!(prompts[0].contains("calm") && !prompts[0].contains("happy"));
        assert!(prompts[1].contains("happy") && !prompts[1].contains("calm"));
    }

    #[tokio::test]
    async fn test_timeout_settles_as_failure() {
        let llm = Arc::new(DelayedMockLlmClient::new("test-model", Duration::from_secs(5)));
        llm.queue_text("too late");

        let mut rt = ChatRuntime::new(
            Session::new(Arc::new(MemoryStore::new())),
            llm,
            Duration::from_millis(20),
        );
        rt.submit_user_message("hello?").await.unwrap();

        assert_eq!(tail(&rt, 1), vec![(Sender::Bot, FAILURE_REPLY.to_string())]);
        assert!(!rt.session().is_awaiting_reply());
    }

    #[tokio::test]
    async fn test_blocked_reply_is_never_shown() {
        let llm = Arc::new(MockLlmClient::new("test-model"));
        llm.queue_response(LlmResponse {
            candidates: vec![Candidate {
                parts: vec!["unsafe content".to_string()],
                finish_reason: Some("SAFETY".to_string()),
            }],
            usage: Usage::default(),
        });

        let mut rt = runtime(llm);
        rt.submit_user_message("hi").await.unwrap();

        assert_eq!(tail(&rt, 1), vec![(Sender::Bot, FALLBACK_REPLY.to_string())]);
        assert!(rt
            .session()
            .messages()
            .iter()
            .all(|m| !m.text.contains("unsafe content")));
    }

    #[tokio::test]
    async fn test_request_reply_timeout_message() {
        let llm = DelayedMockLlmClient::new("test-model", Duration::from_secs(5));
        llm.queue_text("too late");

        match request_reply(&llm, "p", Duration::from_millis(20)).await {
            Event::LlmError {
                message,
                error_kind,
            } => {
                assert_eq!(message, "Request timed out after 20ms");
                assert_eq!(error_kind, LlmErrorKind::Network);
            }
            other => panic!("Expected LlmError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_request_reply_maps_outcomes() {
        let llm = MockLlmClient::new("test-model");
        llm.queue_text("fine");
        llm.queue_error(LlmError::auth("Authentication failed: bad key"));

        let ok = request_reply(&llm, "p", TIMEOUT).await;
        assert!(matches!(ok, Event::LlmResponse { .. }));

        let err = request_reply(&llm, "p", TIMEOUT).await;
        match err {
            Event::LlmError { message, .. } => assert!(message.contains("bad key")),
            other => panic!("Expected LlmError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_submit_draft_routes_by_tab() {
        let llm = Arc::new(MockLlmClient::new("test-model"));
        llm.queue_text("noted");
        let mut rt = runtime(llm.clone());

        rt.session_mut().set_tab(Tab::Journal);
        rt.session_mut().draft_mut().push_str("a quiet walk");
        rt.submit_draft().unwrap();
        assert_eq!(rt.session().journal_entries().len(), 1);
        assert!(llm.recorded_prompts().is_empty());

        rt.session_mut().set_tab(Tab::Chat);
        rt.session_mut().draft_mut().push_str("tell me something kind");
        rt.submit_draft().unwrap();
        assert!(rt.session().draft().is_empty());
        rt.wait_for_reply().await;
        assert_eq!(tail(&rt, 1), vec![(Sender::Bot, "noted".to_string())]);

        let err = rt.submit_draft().unwrap_err();
        assert!(matches!(err, SessionError::Conversation(TransitionError::EmptyInput)));
    }
}
