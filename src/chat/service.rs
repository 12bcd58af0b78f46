//! Chat service: one user turn, one model call, one assistant reply.

use std::sync::Arc;

use tracing::{info, warn};

use crate::llm::LlmChat;
use crate::models::Conversation;
use crate::selection::SelectionStore;

use super::{Persona, build_request};

/// Appended when the model answers with no text
pub const EMPTY_RESPONSE_FALLBACK: &str = "Sorry, I could not generate a response.";

pub struct ChatService {
    llm: Arc<dyn LlmChat>,
    persona: Persona,
    max_tokens: u32,
}

impl ChatService {
    #[must_use]
    pub fn new(llm: Arc<dyn LlmChat>, persona: Persona, max_tokens: u32) -> Self {
        Self { llm, persona, max_tokens }
    }

    #[must_use]
    pub fn persona(&self) -> Persona {
        self.persona
    }

    /// Start a conversation seeded with this persona's welcome message
    #[must_use]
    pub fn new_conversation(&self) -> Conversation {
        Conversation::with_welcome(self.persona.welcome_message())
    }

    /// Append the user's text, ask the model, append its reply.
    ///
    /// Any failure of the call becomes a single `Error: ...` assistant message,
    /// so the conversation stays usable. Blank input is ignored. Returns whether
    /// anything was appended.
    pub async fn send(
        &self,
        conversation: &mut Conversation,
        selection: &SelectionStore,
        user_text: &str,
    ) -> bool {
        let user_text = user_text.trim();
        if user_text.is_empty() {
            return false;
        }

        conversation.push_user(user_text);
        let messages = build_request(self.persona, selection.list(), user_text);

        let reply = match self.llm.chat(self.max_tokens, &messages).await {
            Ok(response) if response.text.trim().is_empty() => {
                warn!("Model returned an empty completion");
                EMPTY_RESPONSE_FALLBACK.to_string()
            }
            Ok(response) => {
                info!(
                    selected = selection.len(),
                    output_tokens = response.output_tokens,
                    "Assistant replied"
                );
                response.text
            }
            Err(e) => {
                warn!("Chat completion failed: {e}");
                format!("Error: {e}")
            }
        };

        conversation.push_assistant(reply);
        true
    }
}
