//! Prompt building

use serde::{Deserialize, Serialize};
use std::fmt;

use concierge_core::Language;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Prompt builder for the concierge agent
///
/// Context blocks (rooms, availability, collected data) arrive pre-rendered
/// as text; the builder only composes messages.
pub struct PromptBuilder {
    messages: Vec<Message>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Build the system prompt for a hotel and language
    pub fn system_prompt(mut self, hotel_name: &str, hotel_info: &str, language: Language) -> Self {
        let mut system = format!(
            r#"You are the virtual concierge of {name}. You help guests choose and book rooms, order room service, and answer questions about the hotel.

## Communication rules
- Reply in {language}.
- Be warm, brief and concrete (2-4 sentences).
- When booking details are missing, ask for exactly one missing field per turn, never several at once.
- Never invent availability, prices or amenities. Only state what the provided hotel data says; when the data does not cover a question, say you will check with the reception.
- Never ask for payment details; a human operator completes the booking."#,
            name = hotel_name,
            language = language.display_name(),
        );

        if !hotel_info.trim().is_empty() {
            system.push_str("\n\n## About the hotel\n");
            system.push_str(hotel_info.trim());
        }

        self.messages.push(Message::system(system));
        self
    }

    /// Add a pre-rendered context block (room inventory, availability)
    pub fn with_context(mut self, context: &str) -> Self {
        if !context.trim().is_empty() {
            self.messages.push(Message::system(format!(
                "## Hotel data\n{}\n\nUse only this data when talking about rooms, prices and availability.",
                context.trim()
            )));
        }
        self
    }

    /// Add the booking-funnel summary: what is collected and what to ask next
    pub fn with_collected(mut self, collected: &str) -> Self {
        if !collected.trim().is_empty() {
            self.messages.push(Message::system(format!(
                "## Booking progress\n{}",
                collected.trim()
            )));
        }
        self
    }

    /// Name the single field to ask for on this turn
    pub fn with_next_field(mut self, field: Option<&str>) -> Self {
        if let Some(field) = field {
            self.messages.push(Message::system(format!(
                "Ask the guest for their {} now. Ask for nothing else this turn.",
                field
            )));
        }
        self
    }

    /// Add conversation history
    pub fn with_history(mut self, history: &[Message]) -> Self {
        self.messages.extend(history.iter().cloned());
        self
    }

    /// Add the current user message
    pub fn user_message(mut self, message: &str) -> Self {
        self.messages.push(Message::user(message));
        self
    }

    pub fn build(self) -> Vec<Message> {
        self.messages
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_encodes_rules() {
        let messages = PromptBuilder::new()
            .system_prompt("Sunrise", "Seafront hotel in Odesa", Language::En)
            .user_message("hi")
            .build();

        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("Sunrise"));
        assert!(messages[0].content.contains("exactly one missing field"));
        assert!(messages[0].content.contains("Never invent availability"));
        assert!(messages[0].content.contains("Seafront hotel in Odesa"));
        assert_eq!(messages.last().unwrap().role, Role::User);
    }

    #[test]
    fn test_empty_blocks_are_skipped() {
        let messages = PromptBuilder::new()
            .system_prompt("Sunrise", "", Language::Uk)
            .with_context("")
            .with_collected("  ")
            .with_next_field(None)
            .user_message("привіт")
            .build();

        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn test_next_field_instruction() {
        let messages = PromptBuilder::new()
            .system_prompt("Sunrise", "", Language::Uk)
            .with_next_field(Some("phone number"))
            .user_message("мене звати Олег")
            .build();

        assert!(messages
            .iter()
            .any(|m| m.content.contains("phone number") && m.content.contains("nothing else")));
    }
}
