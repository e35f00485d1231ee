use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Internal application events produced by the terminal surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Send a prompt (typed or picked from the examples) to the backend
    SubmitPrompt { text: String },

    /// Submit the nth example of the active category (1-based)
    SubmitExample { index: usize },

    /// Change the active example category
    SelectCategory { name: String },

    /// List the known categories
    ListCategories,

    /// Show the example prompts of the active category
    ShowExamples,

    /// Drop the conversation and start over with a fresh session id
    NewSession,

    /// Print the last raw backend payload
    ShowRaw,

    /// Print the last secondary payload extracted from a response
    ShowData,

    /// Print the whole session state as JSON
    ShowDebug,

    /// Print the session id
    ShowSession,

    /// Print the conversation so far
    ShowHistory,

    /// Show slash command help
    ShowHelp,

    /// Request to exit the application
    ExitRequest,
}

/// Who authored a message. Serialized the way the backend expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum ConversationRole {
    User,
    Assistant,
}

/// One entry of the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "sl_role")]
    pub role: ConversationRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ConversationRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ConversationRole::Assistant,
            content: content.into(),
        }
    }
}

/// Owned, order-preserving copy of the conversation log.
///
/// Detached from the live session so it can be sent over the wire and used
/// as a cache key without aliasing mutable state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MessageSnapshot(Vec<ChatMessage>);

impl MessageSnapshot {
    pub fn new(messages: &[ChatMessage]) -> Self {
        Self(messages.to_vec())
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
