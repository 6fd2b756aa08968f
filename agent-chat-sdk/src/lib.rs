//! # Agent Chat SDK
//!
//! Async client for workspace-scoped chat endpoints that keep conversational
//! state per workspace and may switch into tool/agent sub-modes mid-conversation.
//!
//! The crate exposes a small surface:
//!
//! - [`ChatClient`]: the one operation the rest of the system needs,
//!   `chat(session, message) -> text`
//! - [`Session`]: an explicit handle naming the upstream workspace; every call
//!   takes one, there is no process-wide default
//! - [`HttpChatClient`]: reqwest-backed implementation speaking the
//!   `/api/v1/workspace/{slug}/chat` protocol with bearer auth
//! - [`ChatError`]: transport, status and decode failures
//!
//! # Example
//!
//! ```no_run
//! use agent_chat_sdk::{ChatClient, EndpointConfig, HttpChatClient, Session};
//!
//! # async fn example() -> Result<(), agent_chat_sdk::ChatError> {
//! let client = HttpChatClient::new(EndpointConfig::new("https://llm.example.com", "api-key"))?;
//! let session = Session::new("main");
//!
//! let answer = client.chat(&session, "Summarise our onboarding process").await?;
//! println!("{}", answer);
//!
//! // Leave any agent sub-mode the previous prompt may have entered
//! client.reset(&session).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod session;
pub mod types;

pub use client::{ChatClient, EndpointConfig, HttpChatClient};
pub use error::{ChatError, Result};
pub use session::{Session, RESET_COMMAND};
pub use types::{ChatMode, ChatRequest, ChatResponse};
