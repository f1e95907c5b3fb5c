//! Well-known storage keys

pub const ROOMS_KEY: &str = "rooms";
pub const SERVICES_KEY: &str = "services";
pub const BOOKINGS_KEY: &str = "bookings";
pub const SERVICE_ORDERS_KEY: &str = "service_orders";
pub const SESSION_KEY: &str = "session";
