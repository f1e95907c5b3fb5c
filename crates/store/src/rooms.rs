//! Room inventory store

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::keys::ROOMS_KEY;
use crate::{KeyValueStore, StoreError};

/// A bookable room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_per_night: f64,
    pub capacity: u32,
    #[serde(default)]
    pub amenities: Vec<String>,
}

/// Room inventory under the `rooms` key
#[derive(Clone)]
pub struct RoomStore {
    store: Arc<dyn KeyValueStore>,
}

impl RoomStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn load(&self) -> Result<Vec<Room>, StoreError> {
        match self.store.get(ROOMS_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// All rooms; storage failures are logged and surfaced as an empty list
    pub async fn all(&self) -> Vec<Room> {
        match self.load().await {
            Ok(rooms) => rooms,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load rooms");
                Vec::new()
            },
        }
    }

    pub async fn find(&self, id: &str) -> Option<Room> {
        self.all().await.into_iter().find(|r| r.id == id)
    }

    /// Replace the whole inventory. Returns false on storage failure.
    pub async fn replace_all(&self, rooms: &[Room]) -> bool {
        let raw = match serde_json::to_string(rooms) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize rooms");
                return false;
            },
        };
        match self.store.set(ROOMS_KEY, &raw).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "Failed to save rooms");
                false
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    fn sample_rooms() -> Vec<Room> {
        vec![
            Room {
                id: "std-1".to_string(),
                name: "Standard".to_string(),
                description: "Cozy standard room".to_string(),
                price_per_night: 1800.0,
                capacity: 2,
                amenities: vec!["wifi".to_string()],
            },
            Room {
                id: "lux-1".to_string(),
                name: "Suite".to_string(),
                description: "Suite with jacuzzi".to_string(),
                price_per_night: 4200.0,
                capacity: 4,
                amenities: vec!["jacuzzi".to_string(), "view".to_string()],
            },
        ]
    }

    #[tokio::test]
    async fn test_room_store_roundtrip() {
        let store = RoomStore::new(Arc::new(MemoryStore::new()));
        assert!(store.all().await.is_empty());

        assert!(store.replace_all(&sample_rooms()).await);
        assert_eq!(store.all().await.len(), 2);
        assert_eq!(store.find("lux-1").await.unwrap().name, "Suite");
        assert!(store.find("nope").await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_rooms_surface_as_empty() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(ROOMS_KEY, "not json").await.unwrap();
        let store = RoomStore::new(kv);
        assert!(store.all().await.is_empty());
    }
}
