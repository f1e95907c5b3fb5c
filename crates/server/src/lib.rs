//! Same-origin proxy in front of the completion service
//!
//! The browser widget never sees the API key: `POST /api/chat` injects the
//! server-held credential and relays the upstream response, streaming bytes
//! untouched when the client asked for a stream.

pub mod http;
pub mod state;

pub use http::create_router;
pub use state::AppState;
