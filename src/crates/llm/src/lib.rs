//! Chat-completion client for PetroDealHub.
//!
//! Provides a small `ChatModel` abstraction plus an OpenAI-compatible remote
//! implementation. The API server uses it to write voyage narratives; any
//! endpoint that speaks the `/chat/completions` protocol works.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::{ChatMessage, ChatModel, ChatRequest};
//! use llm::config::RemoteLlmConfig;
//! use llm::remote::OpenAiClient;
//!
//! let config = RemoteLlmConfig::from_env(
//!     "OPENAI_API_KEY",
//!     "https://api.openai.com/v1",
//!     "gpt-4o-mini",
//! )?;
//! let client = OpenAiClient::new(config)?;
//!
//! let request = ChatRequest::new(vec![ChatMessage::user("Summarise this voyage")])
//!     .with_temperature(0.4);
//! let response = client.chat(request).await?;
//! println!("{}", response.content);
//! ```

pub mod chat;
pub mod config;
pub mod error;
pub mod remote;

pub use chat::{ChatMessage, ChatModel, ChatRequest, ChatResponse, ChatRole, UsageMetadata};
pub use config::RemoteLlmConfig;
pub use error::{LlmError, Result};
