//! Chat error types

use thiserror::Error;

/// Failures a single chat turn can run into.
///
/// Backend-reported errors and unknown response layouts are not here: the
/// call succeeded, so they are rendered as assistant text by the normalizer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// Network failure, timeout, non-2xx status or an unparseable body
    #[error("Error communicating with agent: {0}")]
    Transport(String),

    /// Blank or whitespace-only input; nothing was sent
    #[error("empty prompt")]
    EmptyInput,

    /// A reply for this session is still outstanding
    #[error("a reply is still pending for this session")]
    TurnInProgress,
}

impl ChatError {
    pub fn transport(detail: impl std::fmt::Display) -> Self {
        Self::Transport(detail.to_string())
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("request timed out ({err})"))
        } else {
            Self::transport(err)
        }
    }
}
