//! `TravelChat` - Location explorer with a travel assistant chat
//!
//! This library provides the location table, the five-slot selection
//! shared by the map and the table, and the chat service that sends the
//! selected locations to a language model as context.

pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod location_table;
pub mod logging;
pub mod models;
pub mod selection;
pub mod session;
pub mod web;

// Re-export core types for public API
pub use chat::{ChatService, Persona};
pub use config::TravelChatConfig;
pub use error::TravelChatError;
pub use location_table::LocationTable;
pub use models::{ChatMessage, Conversation, Location, Role};
pub use selection::{MAX_SELECTED, SelectionStore, ToggleOutcome};
pub use session::{Session, SessionStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TravelChatError>;
