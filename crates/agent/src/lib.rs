//! The concierge agent
//!
//! Booking funnel, special-booking mode, cancellation flow, session state and
//! the per-turn orchestrator tying them to the extractors, the stores and the
//! completion client.

pub mod agent;
pub mod cancellation;
pub mod funnel;
pub mod session;
pub mod special;

pub use agent::ConciergeAgent;
pub use cancellation::{CancelAction, CancellationFlow, CancellationStage};
pub use funnel::{BookingFunnel, CollectedData, FunnelStep};
pub use session::{PendingServiceOrder, SessionState};
pub use special::{ActivatedBy, SpecialBooking, SpecialStage};
