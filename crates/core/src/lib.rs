//! Shared types for the concierge agent
//!
//! Language selection, conversation turns, the guest detail record and the
//! request category enums used across the workspace.

pub mod conversation;
pub mod guest;
pub mod language;
pub mod requests;

pub use conversation::{ConversationHistory, Turn, TurnRole};
pub use guest::GuestDetails;
pub use language::Language;
pub use requests::{RequirementTag, ServiceCategory};
