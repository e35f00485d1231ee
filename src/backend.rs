use crate::config::Config;
use crate::error::ChatError;
use crate::events::MessageSnapshot;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Body item sent to the orchestration task
#[derive(Debug, Clone, Serialize)]
pub struct AgentRequest {
    pub session_id: String,
    pub messages: MessageSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_data: Option<Value>,
}

/// The remote service that answers prompts
#[async_trait]
pub trait AgentBackend: Send + Sync {
    /// Send the conversation and return the reply JSON as-is
    async fn ask(&self, request: &AgentRequest) -> Result<Value, ChatError>;
}

/// HTTP client for the orchestration endpoint
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let token = config
            .get_api_token()
            .context("No API token configured")?;
        Self::with_timeout(config.api_url.trim(), &token, config.timeout())
    }

    pub fn with_timeout(url: &str, token: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: url.to_string(),
            token: token.to_string(),
        })
    }
}

#[async_trait]
impl AgentBackend for HttpBackend {
    async fn ask(&self, request: &AgentRequest) -> Result<Value, ChatError> {
        // The task expects a one-element list
        let payload = [request];

        tracing::debug!(
            session_id = %request.session_id,
            messages = request.messages.len(),
            "Posting conversation to backend"
        );

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let detail = body.trim();
            return Err(ChatError::Transport(if detail.is_empty() {
                format!("HTTP {status}")
            } else {
                format!("HTTP {status}: {detail}")
            }));
        }

        serde_json::from_str(&body)
            .map_err(|e| ChatError::Transport(format!("invalid JSON in response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ChatMessage;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(full_data: Option<Value>) -> AgentRequest {
        AgentRequest {
            session_id: "abc".into(),
            messages: MessageSnapshot::new(&[
                ChatMessage::user("hi"),
                ChatMessage::assistant("hello"),
                ChatMessage::user("logo?"),
            ]),
            full_data,
        }
    }

    fn backend(server: &MockServer, timeout: Duration) -> HttpBackend {
        HttpBackend::with_timeout(&format!("{}/task", server.uri()), "tok", timeout).unwrap()
    }

    #[tokio::test]
    async fn posts_single_element_list_with_bearer_token() {
        let mock_server = MockServer::start().await;

        let expected = json!([{
            "session_id": "abc",
            "messages": [
                {"sl_role": "USER", "content": "hi"},
                {"sl_role": "ASSISTANT", "content": "hello"},
                {"sl_role": "USER", "content": "logo?"}
            ]
        }]);

        Mock::given(method("POST"))
            .and(path("/task"))
            .and(header("Authorization", "Bearer tok"))
            .and(body_json(&expected))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "ok"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let raw = backend(&mock_server, Duration::from_secs(5))
            .ask(&request(None))
            .await
            .unwrap();
        assert_eq!(raw, json!({"response": "ok"}));
    }

    #[tokio::test]
    async fn includes_previous_full_data_when_given() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&mock_server)
            .await;

        backend(&mock_server, Duration::from_secs(5))
            .ask(&request(Some(json!({"doc": 3}))))
            .await
            .unwrap();

        let received = mock_server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&received[0].body).unwrap();
        assert_eq!(body[0]["full_data"], json!({"doc": 3}));
    }

    #[tokio::test]
    async fn non_success_status_is_transport_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&mock_server)
            .await;

        let err = backend(&mock_server, Duration::from_secs(5))
            .ask(&request(None))
            .await
            .unwrap_err();
        match err {
            ChatError::Transport(detail) => {
                assert!(detail.contains("502"), "{detail}");
                assert!(detail.contains("bad gateway"), "{detail}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_json_is_transport_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let err = backend(&mock_server, Duration::from_secs(5))
            .ask(&request(None))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Transport(ref d) if d.contains("invalid JSON")));
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"response": "late"}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let err = backend(&mock_server, Duration::from_millis(200))
            .ask(&request(None))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Transport(ref d) if d.contains("timed out")));
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        // Nothing listens on this port
        let backend = HttpBackend::with_timeout(
            "http://127.0.0.1:59999/task",
            "tok",
            Duration::from_secs(2),
        )
        .unwrap();

        let err = backend.ask(&request(None)).await.unwrap_err();
        assert!(matches!(err, ChatError::Transport(_)));
    }

    #[test]
    fn new_rejects_incomplete_config() {
        assert!(HttpBackend::new(&Config::default()).is_err());
    }
}
