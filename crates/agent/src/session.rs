//! Session state
//!
//! The whole conversation state is one serializable value threaded through
//! `process`; persisting it under its own key lets a conversation survive a
//! restart. Missing or corrupt stored state loads as the default.

use serde::{Deserialize, Serialize};

use concierge_core::{ConversationHistory, Language, ServiceCategory};
use concierge_store::keys::SESSION_KEY;
use concierge_store::KeyValueStore;

use crate::cancellation::CancellationFlow;
use crate::funnel::BookingFunnel;
use crate::special::SpecialBooking;

/// A room-service offer made to the guest, awaiting their confirmation.
/// The order is only written once the guest agrees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingServiceOrder {
    pub category: ServiceCategory,
    /// The guest's own words, kept for the operator
    pub details: String,
}

/// Everything the agent knows about one conversation
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionState {
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub funnel: BookingFunnel,
    #[serde(default)]
    pub special: SpecialBooking,
    #[serde(default)]
    pub cancellation: CancellationFlow,
    #[serde(default)]
    pub pending_service: Option<PendingServiceOrder>,
    #[serde(default)]
    pub history: ConversationHistory,
}

impl SessionState {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Default::default()
        }
    }

    /// Load from the store; anything unexpected becomes a fresh session
    pub async fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(SESSION_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(state) => state,
                Err(e) => {
                    tracing::warn!(error = %e, "Stored session is corrupt, starting fresh");
                    Self::default()
                },
            },
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load session, starting fresh");
                Self::default()
            },
        }
    }

    /// Persist; returns false on failure (the conversation continues anyway)
    pub async fn save(&self, store: &dyn KeyValueStore) -> bool {
        let raw = match serde_json::to_string(self) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize session");
                return false;
            },
        };
        match store.set(SESSION_KEY, &raw).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "Failed to save session");
                false
            },
        }
    }
}
