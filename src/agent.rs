use crate::backend::{AgentBackend, AgentRequest};
use crate::cache::ResponseCache;
use crate::config::Config;
use crate::error::ChatError;
use crate::normalize::{normalize, DerivedDisplay};
use crate::prompts;
use crate::session::SessionManager;
use std::sync::Arc;

/// Result of one completed turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReply {
    pub display: DerivedDisplay,
    /// Replayed from the response cache instead of calling the backend
    pub from_cache: bool,
    /// The backend could not be reached; `display` holds the error text
    pub transport_failed: bool,
}

/// Drives chat turns: session state, backend call, cache and normalization
pub struct ChatAgent {
    sessions: SessionManager,
    backend: Arc<dyn AgentBackend>,
    cache: ResponseCache,
    send_full_data: bool,
}

impl ChatAgent {
    pub fn new(config: &Config, backend: Arc<dyn AgentBackend>) -> Self {
        let mut sessions = SessionManager::new(config.default_category.clone());
        sessions.init();

        Self {
            sessions,
            backend,
            cache: ResponseCache::new(config.cache_ttl()),
            send_full_data: config.send_full_data,
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn sessions_mut(&mut self) -> &mut SessionManager {
        &mut self.sessions
    }

    /// Send a prompt and record the answer.
    ///
    /// Blank input and overlapping submissions are rejected before anything
    /// is recorded. Transport failures still complete the turn: the error
    /// text becomes the assistant's reply.
    ///
    /// The returned future must be driven to completion. Dropping it mid-call
    /// leaves the session awaiting a reply, and every later submission fails
    /// with [`ChatError::TurnInProgress`] until [`ChatAgent::new_session`].
    pub async fn submit_prompt(&mut self, text: &str) -> Result<TurnReply, ChatError> {
        let snapshot = self.sessions.begin_turn(text)?;
        let session_id = self.sessions.session_id().to_string();

        if let Some(raw) = self.cache.get(&session_id, &snapshot) {
            tracing::debug!(%session_id, messages = snapshot.len(), "Reply served from cache");
            let display = normalize(&raw);
            self.sessions.complete_turn(raw, display.clone());
            return Ok(TurnReply {
                display,
                from_cache: true,
                transport_failed: false,
            });
        }

        let full_data = if self.send_full_data {
            self.sessions.last_secondary_data().cloned()
        } else {
            None
        };
        let request = AgentRequest {
            session_id: session_id.clone(),
            messages: snapshot.clone(),
            full_data,
        };

        match self.backend.ask(&request).await {
            Ok(raw) => {
                self.cache.insert(&session_id, snapshot, raw.clone());
                let display = normalize(&raw);
                self.sessions.complete_turn(raw, display.clone());
                Ok(TurnReply {
                    display,
                    from_cache: false,
                    transport_failed: false,
                })
            }
            Err(err) => {
                tracing::warn!(%session_id, error = %err, "Backend call failed");
                self.sessions.fail_turn(&err);
                Ok(TurnReply {
                    display: DerivedDisplay {
                        display_text: err.to_string(),
                        secondary_data: None,
                    },
                    from_cache: false,
                    transport_failed: true,
                })
            }
        }
    }

    /// Submit the nth (1-based) example of the active category
    pub async fn submit_example(&mut self, index: usize) -> Option<Result<TurnReply, ChatError>> {
        let prompt = prompts::example_at(self.sessions.active_category(), index)?;
        Some(self.submit_prompt(prompt).await)
    }

    pub fn select_category(&mut self, name: &str) {
        self.sessions.set_active_category(name);
    }

    /// Example prompts of the active category
    pub fn active_examples(&mut self) -> &'static [&'static str] {
        prompts::examples_for(self.sessions.active_category())
    }

    /// Start over: new session id, empty log, cold cache
    pub fn new_session(&mut self) {
        self.sessions.reset();
        self.cache.clear();
    }
}
