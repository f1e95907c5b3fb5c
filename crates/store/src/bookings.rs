//! Booking records and availability

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::keys::BOOKINGS_KEY;
use crate::{KeyValueStore, StoreError};

/// Booking status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "cancelled" => Self::Cancelled,
            "completed" => Self::Completed,
            _ => Self::Confirmed,
        }
    }
}

/// Booking record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub guest_name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    pub room_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default = "default_guests")]
    pub guests: u32,
    #[serde(default)]
    pub total_price: f64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_guests() -> u32 {
    1
}

impl Booking {
    pub fn new(
        guest_name: &str,
        phone: &str,
        room_id: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            guest_name: guest_name.to_string(),
            phone: phone.to_string(),
            email: None,
            room_id: room_id.to_string(),
            check_in,
            check_out,
            guests: default_guests(),
            total_price: 0.0,
            status: BookingStatus::Confirmed,
            created_at: now,
            updated_at: now,
        }
    }

    /// Nights are derived, never stored
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days().max(0)
    }

    /// Half-open range overlap: [check_in, check_out)
    pub fn overlaps(&self, check_in: NaiveDate, check_out: NaiveDate) -> bool {
        check_in < self.check_out && check_out > self.check_in
    }
}

/// Bookings under the `bookings` key
#[derive(Clone)]
pub struct BookingStore {
    store: Arc<dyn KeyValueStore>,
}

impl BookingStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn load(&self) -> Result<Vec<Booking>, StoreError> {
        match self.store.get(BOOKINGS_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, bookings: &[Booking]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(bookings)?;
        self.store.set(BOOKINGS_KEY, &raw).await
    }

    pub async fn all(&self) -> Vec<Booking> {
        match self.load().await {
            Ok(bookings) => bookings,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load bookings");
                Vec::new()
            },
        }
    }

    pub async fn find(&self, id: Uuid) -> Option<Booking> {
        self.all().await.into_iter().find(|b| b.id == id)
    }

    /// Append a booking. Returns false on storage failure.
    pub async fn add(&self, booking: Booking) -> bool {
        let result: Result<(), StoreError> = async {
            let mut bookings = self.load().await?;
            bookings.push(booking.clone());
            self.save(&bookings).await
        }
        .await;

        match result {
            Ok(()) => {
                tracing::info!(
                    booking_id = %booking.id,
                    room_id = %booking.room_id,
                    check_in = %booking.check_in,
                    check_out = %booking.check_out,
                    "Booking created"
                );
                true
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to add booking");
                false
            },
        }
    }

    /// Update the status of one booking. Returns false when the booking is
    /// missing or storage fails.
    pub async fn update_status(&self, id: Uuid, status: BookingStatus) -> bool {
        let result: Result<bool, StoreError> = async {
            let mut bookings = self.load().await?;
            let Some(booking) = bookings.iter_mut().find(|b| b.id == id) else {
                return Ok(false);
            };
            booking.status = status;
            booking.updated_at = Utc::now();
            self.save(&bookings).await?;
            Ok(true)
        }
        .await;

        match result {
            Ok(updated) => {
                if updated {
                    tracing::info!(booking_id = %id, status = status.as_str(), "Booking status updated");
                }
                updated
            },
            Err(e) => {
                tracing::error!(error = %e, booking_id = %id, "Failed to update booking");
                false
            },
        }
    }

    /// Hard delete; bookings are otherwise never removed
    pub async fn delete(&self, id: Uuid) -> bool {
        let result: Result<bool, StoreError> = async {
            let mut bookings = self.load().await?;
            let before = bookings.len();
            bookings.retain(|b| b.id != id);
            if bookings.len() == before {
                return Ok(false);
            }
            self.save(&bookings).await?;
            Ok(true)
        }
        .await;

        result.unwrap_or_else(|e| {
            tracing::error!(error = %e, booking_id = %id, "Failed to delete booking");
            false
        })
    }

    /// Confirmed bookings matching a guest name or phone, case-insensitively
    pub async fn find_active_by_guest(&self, query: &str) -> Vec<Booking> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.all()
            .await
            .into_iter()
            .filter(|b| b.status == BookingStatus::Confirmed)
            .filter(|b| {
                b.guest_name.to_lowercase().contains(&needle)
                    || b.phone.contains(needle.trim_start_matches('+'))
            })
            .collect()
    }

    /// A room is free for a range iff no confirmed booking overlaps it
    pub async fn is_room_available(
        &self,
        room_id: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> bool {
        !self
            .all()
            .await
            .iter()
            .filter(|b| b.room_id == room_id && b.status == BookingStatus::Confirmed)
            .any(|b| b.overlaps(check_in, check_out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store() -> BookingStore {
        BookingStore::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_add_and_nights() {
        let store = store();
        let booking = Booking::new(
            "Іван Петренко",
            "+380501234567",
            "std-1",
            date(2026, 1, 15),
            date(2026, 1, 20),
        );
        assert_eq!(booking.nights(), 5);
        assert!(store.add(booking.clone()).await);
        assert_eq!(store.all().await.len(), 1);
        assert!(store.find(booking.id).await.is_some());
    }

    #[tokio::test]
    async fn test_availability_overlap() {
        let store = store();
        let booking = Booking::new(
            "Guest",
            "+380000000000",
            "std-1",
            date(2026, 1, 15),
            date(2026, 1, 20),
        );
        store.add(booking.clone()).await;

        // Overlapping range
        assert!(
            !store
                .is_room_available("std-1", date(2026, 1, 18), date(2026, 1, 22))
                .await
        );
        // Back-to-back: checkout day equals next check-in
        assert!(
            store
                .is_room_available("std-1", date(2026, 1, 20), date(2026, 1, 25))
                .await
        );
        // Different room
        assert!(
            store
                .is_room_available("lux-1", date(2026, 1, 18), date(2026, 1, 22))
                .await
        );

        // Cancelled bookings do not block availability
        store.update_status(booking.id, BookingStatus::Cancelled).await;
        assert!(
            store
                .is_room_available("std-1", date(2026, 1, 18), date(2026, 1, 22))
                .await
        );
    }

    #[tokio::test]
    async fn test_find_active_by_guest() {
        let store = store();
        let booking = Booking::new(
            "Олена Шевченко",
            "+380671112233",
            "std-1",
            date(2026, 2, 1),
            date(2026, 2, 3),
        );
        store.add(booking.clone()).await;

        assert_eq!(store.find_active_by_guest("олена").await.len(), 1);
        assert_eq!(store.find_active_by_guest("380671112233").await.len(), 1);
        assert!(store.find_active_by_guest("Петро").await.is_empty());

        store.update_status(booking.id, BookingStatus::Cancelled).await;
        assert!(store.find_active_by_guest("олена").await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_bookings_surface_as_empty() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(BOOKINGS_KEY, "{broken").await.unwrap();
        let store = BookingStore::new(kv);
        assert!(store.all().await.is_empty());
        assert!(!store.update_status(Uuid::new_v4(), BookingStatus::Cancelled).await);
    }
}
