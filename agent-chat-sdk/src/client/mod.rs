//! Chat client trait and HTTP implementation
//!
//! [`ChatClient`] is the seam the research pipeline is written against. The
//! endpoint behind it is:
//!
//! - **stateful per session**: messages on one [`Session`] share history, and a
//!   prompt may leave the conversation in an agent sub-mode until
//!   [`RESET_COMMAND`] is sent
//! - **slow and unreliable**: callers race calls against their own timers
//! - **rate-limit sensitive**: callers space calls out
//!
//! Dropping the future returned by [`ChatClient::chat`] aborts the client side
//! of the request. The server may still run the prompt to completion; its
//! answer is discarded.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{ChatError, Result};
use crate::session::{Session, RESET_COMMAND};
use crate::types::{ChatRequest, ChatResponse};

/// One conversational call against a workspace session
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send `message` on `session` and return the answer text
    async fn chat(&self, session: &Session, message: &str) -> Result<String>;

    /// Leave any tool/agent sub-mode the session may be in
    async fn reset(&self, session: &Session) -> Result<()> {
        self.chat(session, RESET_COMMAND).await.map(|_| ())
    }
}

#[async_trait]
impl<T: ChatClient + ?Sized> ChatClient for Arc<T> {
    async fn chat(&self, session: &Session, message: &str) -> Result<String> {
        (**self).chat(session, message).await
    }

    async fn reset(&self, session: &Session) -> Result<()> {
        (**self).reset(session).await
    }
}

/// Connection settings for [`HttpChatClient`]
#[derive(Clone)]
pub struct EndpointConfig {
    /// Base URL without the `/api/v1` suffix
    pub base_url: String,
    /// Bearer token
    pub api_key: String,
    /// Optional hard timeout applied by the HTTP client itself
    pub request_timeout: Option<Duration>,
}

impl EndpointConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            request_timeout: None,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

impl fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// reqwest-backed [`ChatClient`]
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    config: EndpointConfig,
    client: reqwest::Client,
}

impl HttpChatClient {
    /// Build a client; fails only if the TLS backend cannot be initialised
    pub fn new(config: EndpointConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(ChatError::Config("base_url must not be empty".to_string()));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ChatError::Config(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Full URL of the chat route for `session`
    pub fn chat_url(&self, session: &Session) -> String {
        format!(
            "{}/api/v1/workspace/{}/chat",
            self.config.base_url.trim_end_matches('/'),
            session.slug()
        )
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn chat(&self, session: &Session, message: &str) -> Result<String> {
        let url = self.chat_url(session);

        #[cfg(feature = "tracing-support")]
        tracing::debug!(workspace = %session, chars = message.len(), "Sending chat message");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header("Accept", "application/json")
            .json(&ChatRequest::chat(message))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            #[cfg(feature = "tracing-support")]
            tracing::warn!(workspace = %session, status = status.as_u16(), "Chat request rejected");
            return Err(ChatError::from_status(status.as_u16(), body));
        }

        let payload: ChatResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Decode(e.to_string()))?;

        if let Some(error) = payload.error.as_deref().filter(|e| !e.is_empty()) {
            if payload.text_response.is_none() {
                return Err(ChatError::Upstream(error.to_string()));
            }
        }

        Ok(payload.into_text())
    }
}
