//! Chat module
//!
//! - Personas: system prompt and welcome message per assistant variant
//! - Context: the request sent to the model for one user turn
//! - Service: runs a turn and folds the result into the conversation

pub mod context;
pub mod persona;
pub mod service;

pub use context::{build_request, selection_context};
pub use persona::Persona;
pub use service::{ChatService, EMPTY_RESPONSE_FALLBACK};
