use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ChatError;
use crate::events::{ChatMessage, MessageSnapshot};
use crate::normalize::DerivedDisplay;

/// Whether a backend call is outstanding for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    Idle,
    AwaitingReply,
}

/// Runtime state of one chat session
#[derive(Debug, Clone, Serialize)]
pub struct ActiveSession {
    pub session_id: String,
    pub messages: Vec<ChatMessage>,
    pub active_category: String,
    pub last_full_data: Option<Value>,
    pub last_display: Option<DerivedDisplay>,
    pub phase: TurnPhase,
    pub created_at: DateTime<Utc>,
}

impl ActiveSession {
    fn fresh(category: &str) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            messages: Vec::new(),
            active_category: category.to_string(),
            last_full_data: None,
            last_display: None,
            phase: TurnPhase::Idle,
            created_at: Utc::now(),
        }
    }
}

/// Session manager owning the conversation log and its turn state
#[derive(Debug, Clone)]
pub struct SessionManager {
    default_category: String,
    current_session: Option<ActiveSession>,
}

impl SessionManager {
    pub fn new(default_category: impl Into<String>) -> Self {
        Self {
            default_category: default_category.into(),
            current_session: None,
        }
    }

    /// Start a session if none exists; an existing one is left untouched.
    pub fn init(&mut self) -> &mut ActiveSession {
        let category = &self.default_category;
        self.current_session.get_or_insert_with(|| {
            let session = ActiveSession::fresh(category);
            tracing::info!(session_id = %session.session_id, "Started chat session");
            session
        })
    }

    /// Get current session, if one was started
    pub fn current_session(&self) -> Option<&ActiveSession> {
        self.current_session.as_ref()
    }

    pub fn session_id(&mut self) -> &str {
        &self.init().session_id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.current_session
            .as_ref()
            .map(|s| s.messages.as_slice())
            .unwrap_or_default()
    }

    pub fn active_category(&mut self) -> &str {
        &self.init().active_category
    }

    pub fn phase(&self) -> TurnPhase {
        self.current_session
            .as_ref()
            .map_or(TurnPhase::Idle, |s| s.phase)
    }

    /// Last raw backend payload, kept for the debug panel
    pub fn last_full_data(&self) -> Option<&Value> {
        self.current_session.as_ref()?.last_full_data.as_ref()
    }

    /// Secondary payload extracted from the last reply
    pub fn last_secondary_data(&self) -> Option<&Value> {
        self.current_session
            .as_ref()?
            .last_display
            .as_ref()?
            .secondary_data
            .as_ref()
    }

    /// Append a user message. Blank input is ignored; returns whether it was added.
    pub fn append_user_message(&mut self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        self.init().messages.push(ChatMessage::user(text));
        true
    }

    pub fn append_assistant_message(&mut self, text: &str) {
        self.init().messages.push(ChatMessage::assistant(text));
    }

    /// Switch example category. Unknown names are accepted as-is.
    pub fn set_active_category(&mut self, name: &str) {
        self.init().active_category = name.to_string();
    }

    /// Throw the session away and start a new one with a new id.
    pub fn reset(&mut self) {
        if let Some(old) = self.current_session.take() {
            tracing::info!(session_id = %old.session_id, "Discarded chat session");
        }
        self.init();
    }

    /// Owned copy of the conversation log for a backend call
    pub fn snapshot_for_call(&self) -> MessageSnapshot {
        MessageSnapshot::new(self.messages())
    }

    /// Commit the user's prompt and mark a reply as pending.
    ///
    /// Returns the snapshot to send. Nothing changes on error.
    pub fn begin_turn(&mut self, text: &str) -> Result<MessageSnapshot, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyInput);
        }
        if self.phase() == TurnPhase::AwaitingReply {
            return Err(ChatError::TurnInProgress);
        }

        self.append_user_message(text);
        self.init().phase = TurnPhase::AwaitingReply;
        Ok(self.snapshot_for_call())
    }

    /// Record a backend reply and close the turn with the assistant's answer.
    pub fn complete_turn(&mut self, raw: Value, display: DerivedDisplay) {
        let session = self.init();
        session.messages.push(ChatMessage::assistant(display.display_text.as_str()));
        session.last_full_data = Some(raw);
        session.last_display = Some(display);
        session.phase = TurnPhase::Idle;
    }

    /// Close the turn after a transport failure; the error text becomes the reply.
    pub fn fail_turn(&mut self, error: &ChatError) {
        let message = error.to_string();
        let session = self.init();
        session.messages.push(ChatMessage::assistant(message.as_str()));
        session.last_full_data = Some(json!({ "error": message }));
        session.last_display = Some(DerivedDisplay {
            display_text: message,
            secondary_data: None,
        });
        session.phase = TurnPhase::Idle;
    }

    /// Session state as JSON for the debug panel
    pub fn debug_state(&self) -> Value {
        match &self.current_session {
            Some(session) => json!({
                "session_id": session.session_id,
                "messages": session.messages,
                "active_category": session.active_category,
                "last_full_data": session.last_full_data,
                "phase": session.phase,
                "created_at": session.created_at.to_rfc3339(),
            }),
            None => Value::Null,
        }
    }
}
