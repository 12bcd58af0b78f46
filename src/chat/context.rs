//! Builds the outbound chat request from the selection and the user's text.

use crate::llm::Message;
use crate::models::Location;

use super::Persona;

/// Context block listing the selected locations, one per line
#[must_use]
pub fn selection_context(selected: &[Location]) -> String {
    if selected.is_empty() {
        return "Selected locations: none".to_string();
    }

    let lines: Vec<String> = selected
        .iter()
        .enumerate()
        .map(|(i, location)| {
            format!(
                "{}. {} ({})",
                i + 1,
                location.address,
                location.format_coordinates()
            )
        })
        .collect();
    format!("Selected locations:\n{}", lines.join("\n"))
}

/// System instruction followed by a single user message carrying the
/// selection context and the new text. Earlier turns are not replayed.
#[must_use]
pub fn build_request(persona: Persona, selected: &[Location], user_text: &str) -> Vec<Message> {
    vec![
        Message::system(persona.system_prompt()),
        Message::user(format!("{}\n\n{user_text}", selection_context(selected))),
    ]
}
