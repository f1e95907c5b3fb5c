//! Room-service order store

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use concierge_core::ServiceCategory;

use crate::keys::SERVICE_ORDERS_KEY;
use crate::{KeyValueStore, StoreError};

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

/// A room-service order placed from the chat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOrder {
    pub id: Uuid,
    pub category: ServiceCategory,
    /// The guest's own words, kept for the operator
    pub details: String,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl ServiceOrder {
    pub fn new(category: ServiceCategory, details: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            category,
            details: details.to_string(),
            room: None,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

/// Orders under the `service_orders` key
#[derive(Clone)]
pub struct ServiceOrderStore {
    store: Arc<dyn KeyValueStore>,
}

impl ServiceOrderStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn load(&self) -> Result<Vec<ServiceOrder>, StoreError> {
        match self.store.get(SERVICE_ORDERS_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    pub async fn all(&self) -> Vec<ServiceOrder> {
        match self.load().await {
            Ok(orders) => orders,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load service orders");
                Vec::new()
            },
        }
    }

    /// Append an order. Returns false on storage failure.
    pub async fn add(&self, order: ServiceOrder) -> bool {
        let result: Result<(), StoreError> = async {
            let mut orders = self.load().await?;
            orders.push(order.clone());
            let raw = serde_json::to_string(&orders)?;
            self.store.set(SERVICE_ORDERS_KEY, &raw).await
        }
        .await;

        match result {
            Ok(()) => {
                tracing::info!(
                    order_id = %order.id,
                    category = order.category.as_str(),
                    "Service order created"
                );
                true
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to add service order");
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
    async fn test_order_roundtrip() {
        let store = ServiceOrderStore::new(Arc::new(MemoryStore::new()));
        assert!(store.all().await.is_empty());

        let order = ServiceOrder::new(ServiceCategory::Towels, "принесіть рушники");
        assert!(store.add(order).await);

        let orders = store.all().await;
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].category, ServiceCategory::Towels);
        assert_eq!(orders[0].status, OrderStatus::Pending);
    }
}
