//! Booking funnel state machine
//!
//! The current step is always derived from the collected data, never stored:
//! it is the first unmet slot in a fixed order. Recomputing is idempotent and
//! order-independent, so details arriving out of order are simply absorbed
//! and skipped past on the next turn.

use serde::{Deserialize, Serialize};

use concierge_core::{GuestDetails, Language};

/// Funnel steps in slot order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStep {
    Initial,
    CollectingName,
    CollectingPhone,
    CollectingDates,
    CollectingEmail,
    SuggestingRooms,
    Completed,
}

impl FunnelStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::CollectingName => "collecting_name",
            Self::CollectingPhone => "collecting_phone",
            Self::CollectingDates => "collecting_dates",
            Self::CollectingEmail => "collecting_email",
            Self::SuggestingRooms => "suggesting_rooms",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for FunnelStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Scalar copies of everything the funnel has collected.
///
/// Only ids and plain values, never live entity objects, so a later change to
/// a room record cannot invalidate in-flight conversation state.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CollectedData {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// `YYYY-MM-DD`
    pub check_in: Option<String>,
    /// `YYYY-MM-DD`
    pub check_out: Option<String>,
    pub guests: Option<u32>,
    #[serde(default)]
    pub preferences: Vec<String>,
    pub selected_room: Option<String>,
    pub selected_room_name: Option<String>,
}

impl CollectedData {
    fn has_dates(&self) -> bool {
        self.check_in.is_some() && self.check_out.is_some()
    }

    fn has_any(&self) -> bool {
        self.full_name.is_some()
            || self.phone.is_some()
            || self.email.is_some()
            || self.check_in.is_some()
            || self.check_out.is_some()
            || self.selected_room.is_some()
    }
}

/// The booking funnel
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BookingFunnel {
    #[serde(default)]
    pub data: CollectedData,
    /// Set once the guest engages with booking (room intent or any detail)
    #[serde(default)]
    active: bool,
    /// Set when this session already produced a confirmed booking
    #[serde(default)]
    pub has_active_booking: bool,
}

impl BookingFunnel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the funnel engaged (room intent seen)
    pub fn start(&mut self) {
        self.active = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Derived step: the first unmet slot in fixed order
    pub fn step(&self) -> FunnelStep {
        if !self.active && !self.data.has_any() {
            return FunnelStep::Initial;
        }
        if self.data.full_name.is_none() {
            FunnelStep::CollectingName
        } else if self.data.phone.is_none() {
            FunnelStep::CollectingPhone
        } else if !self.data.has_dates() {
            FunnelStep::CollectingDates
        } else if self.data.email.is_none() {
            FunnelStep::CollectingEmail
        } else if self.data.selected_room.is_none() {
            FunnelStep::SuggestingRooms
        } else {
            FunnelStep::Completed
        }
    }

    /// Absorb extracted details; existing values always win
    pub fn absorb(&mut self, details: &GuestDetails) {
        if details.is_empty() {
            return;
        }
        self.active = true;
        let mut merged = GuestDetails {
            full_name: self.data.full_name.clone(),
            phone: self.data.phone.clone(),
            email: self.data.email.clone(),
            check_in: self.data.check_in.clone(),
            check_out: self.data.check_out.clone(),
            guests: self.data.guests,
        };
        merged.merge_missing(details);
        self.data.full_name = merged.full_name;
        self.data.phone = merged.phone;
        self.data.email = merged.email;
        self.data.check_in = merged.check_in;
        self.data.check_out = merged.check_out;
        self.data.guests = merged.guests;
    }

    pub fn select_room(&mut self, room_id: &str, room_name: &str) {
        self.data.selected_room = Some(room_id.to_string());
        self.data.selected_room_name = Some(room_name.to_string());
    }

    /// The only way back from `completed`
    pub fn reset(&mut self) {
        self.data = CollectedData::default();
        self.active = false;
        self.has_active_booking = false;
    }

    /// What to ask for this turn, phrased for the prompt
    pub fn next_missing_field(&self) -> Option<&'static str> {
        match self.step() {
            FunnelStep::CollectingName => Some("full name"),
            FunnelStep::CollectingPhone => Some("phone number"),
            FunnelStep::CollectingDates => Some("check-in and check-out dates"),
            FunnelStep::CollectingEmail => Some("email address"),
            FunnelStep::SuggestingRooms => Some("room choice"),
            FunnelStep::Initial | FunnelStep::Completed => None,
        }
    }

    /// Booking-progress block rendered into the prompt
    pub fn progress_summary(&self) -> String {
        let mut lines = Vec::new();
        if let Some(ref name) = self.data.full_name {
            lines.push(format!("Guest name: {}", name));
        }
        if let Some(ref phone) = self.data.phone {
            lines.push(format!("Phone: {}", phone));
        }
        if let Some(ref email) = self.data.email {
            lines.push(format!("Email: {}", email));
        }
        if let (Some(ci), Some(co)) = (&self.data.check_in, &self.data.check_out) {
            lines.push(format!("Stay: {} to {}", ci, co));
        }
        if let Some(guests) = self.data.guests {
            lines.push(format!("Guests: {}", guests));
        }
        if let Some(ref room) = self.data.selected_room_name {
            lines.push(format!("Chosen room: {}", room));
        }
        if !self.data.preferences.is_empty() {
            lines.push(format!("Preferences: {}", self.data.preferences.join(", ")));
        }
        lines.join("\n")
    }

    /// Fixed confirmation emitted when the funnel completes.
    /// Fulfillment is deferred to a human operator.
    pub fn confirmation_message(&self, language: Language) -> String {
        let room = self
            .data
            .selected_room_name
            .as_deref()
            .unwrap_or_default()
            .to_string();
        let dates = match (&self.data.check_in, &self.data.check_out) {
            (Some(ci), Some(co)) => format!("{} — {}", ci, co),
            _ => String::new(),
        };
        match language {
            Language::Uk => format!(
                "Дякуємо! Ваше бронювання прийнято: {room}, {dates}. \
                 Наш адміністратор зв'яжеться з вами для підтвердження деталей. Оплата при заселенні.",
            ),
            Language::Ru => format!(
                "Спасибо! Ваше бронирование принято: {room}, {dates}. \
                 Наш администратор свяжется с вами для подтверждения деталей. Оплата при заселении.",
            ),
            Language::En => format!(
                "Thank you! Your booking is confirmed: {room}, {dates}. \
                 Our receptionist will contact you to finalize the details. Payment is due at check-in.",
            ),
        }
    }
}
