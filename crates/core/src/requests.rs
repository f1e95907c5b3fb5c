//! Request categories shared by the classifiers, the stores and the agent

use serde::{Deserialize, Serialize};

/// Tag describing a special-request requirement detected in a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementTag {
    RoomLocation,
    Workspace,
    Romantic,
    Accessibility,
    Jacuzzi,
    Family,
    Quiet,
    View,
}

impl RequirementTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoomLocation => "room_location",
            Self::Workspace => "workspace",
            Self::Romantic => "romantic",
            Self::Accessibility => "accessibility",
            Self::Jacuzzi => "jacuzzi",
            Self::Family => "family",
            Self::Quiet => "quiet",
            Self::View => "view",
        }
    }
}

impl std::fmt::Display for RequirementTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Room-service request category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    /// Default when a service request matches no narrower category
    #[default]
    Food,
    Cleaning,
    Towels,
    Minibar,
}

impl ServiceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Cleaning => "cleaning",
            Self::Towels => "towels",
            Self::Minibar => "minibar",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "cleaning" => Self::Cleaning,
            "towels" => Self::Towels,
            "minibar" => Self::Minibar,
            _ => Self::Food,
        }
    }
}

impl std::fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip() {
        assert_eq!(ServiceCategory::from_str("towels"), ServiceCategory::Towels);
        assert_eq!(ServiceCategory::Towels.as_str(), "towels");
        assert_eq!(ServiceCategory::from_str("unknown"), ServiceCategory::Food);
    }
}
