//! Guest-message understanding
//!
//! Rule-based extraction of guest details (name, phone, email, dates, party
//! size) plus the intent classifiers. Supports Ukrainian, Russian and English
//! messages. No statistical NLU; everything is ordered pattern tables.

pub mod extractor;
pub mod intent;

pub use extractor::GuestExtractor;
pub use intent::{
    detect_requirements, detect_service_request, is_affirmative, is_general_topic,
    is_room_intent,
};
