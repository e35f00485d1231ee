//! Test doubles shared by the unit tests

use crate::backend::{AgentBackend, AgentRequest};
use crate::error::ChatError;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replays scripted replies and records every request it sees
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<Value, ChatError>>>,
    pub seen: Mutex<Vec<AgentRequest>>,
}

impl ScriptedBackend {
    pub fn with(replies: Vec<Result<Value, ChatError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl AgentBackend for ScriptedBackend {
    async fn ask(&self, request: &AgentRequest) -> Result<Value, ChatError> {
        self.seen.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({"response": "default"})))
    }
}

/// Never answers; for exercising abandoned calls
pub struct StalledBackend;

#[async_trait]
impl AgentBackend for StalledBackend {
    async fn ask(&self, _request: &AgentRequest) -> Result<Value, ChatError> {
        std::future::pending().await
    }
}
