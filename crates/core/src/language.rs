//! Guest-facing language selection

use serde::{Deserialize, Serialize};

/// Languages the concierge speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Ukrainian (default)
    #[default]
    Uk,
    /// Russian
    Ru,
    /// English
    En,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Uk => "uk",
            Language::Ru => "ru",
            Language::En => "en",
        }
    }

    /// Parse an ISO code, falling back to the default language
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "ru" => Language::Ru,
            "en" => Language::En,
            _ => Language::Uk,
        }
    }

    /// Human-readable name used in system prompts
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Uk => "Ukrainian",
            Language::Ru => "Russian",
            Language::En => "English",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(Language::from_code("ru"), Language::Ru);
        assert_eq!(Language::from_code("EN"), Language::En);
        assert_eq!(Language::from_code("de"), Language::Uk);
    }

    #[test]
    fn test_default_is_ukrainian() {
        assert_eq!(Language::default(), Language::Uk);
    }
}
