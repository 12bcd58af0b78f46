//! LLM: chat completion client used by the assistant.
//!
//! The [`LlmChat`] trait is the seam between the chat service and the
//! network; [`OpenAiClient`] is the production implementation.

pub mod openai;
pub mod types;

pub use openai::OpenAiClient;
pub use types::{ChatResponse, LlmChat, LlmError, Message};
