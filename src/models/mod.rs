//! Data models for the TravelChat application
//!
//! This module contains the core domain models organized by concern:
//! - Location: a row of the static location table
//! - Conversation: the role-tagged chat transcript

pub mod conversation;
pub mod location;

// Re-export all public types for convenient access
pub use conversation::{ChatMessage, Conversation, Role};
pub use location::{CoordinateKey, Location};
