//! Hotel service catalog store

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use concierge_core::ServiceCategory;

use crate::keys::SERVICES_KEY;
use crate::{KeyValueStore, StoreError};

/// A service the hotel offers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub category: ServiceCategory,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// Service catalog under the `services` key
#[derive(Clone)]
pub struct ServiceStore {
    store: Arc<dyn KeyValueStore>,
}

impl ServiceStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn load(&self) -> Result<Vec<Service>, StoreError> {
        match self.store.get(SERVICES_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    pub async fn all(&self) -> Vec<Service> {
        match self.load().await {
            Ok(services) => services,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load services");
                Vec::new()
            },
        }
    }

    pub async fn by_category(&self, category: ServiceCategory) -> Vec<Service> {
        self.all()
            .await
            .into_iter()
            .filter(|s| s.category == category && s.available)
            .collect()
    }

    pub async fn replace_all(&self, services: &[Service]) -> bool {
        let raw = match serde_json::to_string(services) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize services");
                return false;
            },
        };
        match self.store.set(SERVICES_KEY, &raw).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "Failed to save services");
                false
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[tokio::test]
    async fn test_by_category_filters_unavailable() {
        let store = ServiceStore::new(Arc::new(MemoryStore::new()));
        store
            .replace_all(&[
                Service {
                    id: "clean-1".to_string(),
                    name: "Room cleaning".to_string(),
                    category: ServiceCategory::Cleaning,
                    price: 0.0,
                    available: true,
                },
                Service {
                    id: "clean-2".to_string(),
                    name: "Deep cleaning".to_string(),
                    category: ServiceCategory::Cleaning,
                    price: 500.0,
                    available: false,
                },
            ])
            .await;

        let cleaning = store.by_category(ServiceCategory::Cleaning).await;
        assert_eq!(cleaning.len(), 1);
        assert_eq!(cleaning[0].id, "clean-1");
        assert!(store.by_category(ServiceCategory::Minibar).await.is_empty());
    }
}
