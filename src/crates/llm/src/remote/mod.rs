//! Remote chat-completion providers.
//!
//! Only the OpenAI wire protocol is implemented; OpenRouter, Azure-style
//! gateways and local servers exposing `/chat/completions` reuse it through
//! `RemoteLlmConfig::base_url`.

pub mod openai;

pub use openai::OpenAiClient;
