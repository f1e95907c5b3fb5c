//! Key-value persistence and the entity stores built on it
//!
//! One JSON document per well-known key. Entity stores do whole-value
//! read-modify-write under their key; storage failures are caught at the
//! store boundary, logged, and surfaced to callers as `false`/empty.

pub mod bookings;
pub mod keys;
pub mod kv;
pub mod orders;
pub mod rooms;
pub mod services;

pub use bookings::{Booking, BookingStatus, BookingStore};
pub use kv::{JsonFileStore, KeyValueStore, MemoryStore};
pub use orders::{OrderStatus, ServiceOrder, ServiceOrderStore};
pub use rooms::{Room, RoomStore};
pub use services::{Service, ServiceStore};

use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
