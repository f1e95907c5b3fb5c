//! Booking cancellation flow
//!
//! Activation is detected from a cancel-phrase table. Lookups by name or
//! phone are bounded; after the third failed search the guest is directed to
//! a human operator instead of looping.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use concierge_core::Language;

/// Failed lookups tolerated before handing off to an operator
pub const MAX_SEARCH_ATTEMPTS: u32 = 3;

/// What the guest wants done with the booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelAction {
    CancelOnly,
    /// Cancel, then re-enter the funnel at date collection with the guest
    /// identity pre-filled
    CancelAndRebook,
}

/// Flow stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CancellationStage {
    #[default]
    Initial,
    AwaitingSearchParams,
    AwaitingConfirmation,
}

/// Rebooking phrasing, checked before plain cancellation
static REBOOK_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"перенести брон|перенести (?:моє|мое) бронюв",
        r"перебронюва|перебронирова",
        r"змінити (?:дати|бронюв)|поміняти дати",
        r"изменить (?:даты|бронирование)|поменять даты",
        r"на інші дати|на другие даты",
        r"\brebook\b",
        r"change (?:my )?(?:booking|reservation|dates)",
        r"move (?:my )?(?:booking|reservation)",
        r"cancel and (?:re)?book",
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){}", p)).unwrap())
    .collect()
});

static CANCEL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"скасу(?:йте|вати|вання)",
        r"відмінити бронюв|відміна бронюв",
        r"отмен(?:ите|ить|а)",
        r"анулюва|аннулирова",
        r"cancel (?:my )?(?:booking|reservation)",
        r"\bcancellation\b",
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){}", p)).unwrap())
    .collect()
});

static CONFIRM_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:так|да|yes|підтверджую|подтверждаю|confirm|ok|окей)\b").unwrap()
});

static DECLINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:ні|нет|\bno\b|не (?:треба|надо)|залиш|остав)").unwrap()
});

/// Cancellation flow state
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CancellationFlow {
    #[serde(default)]
    pub is_active: bool,
    pub action: Option<CancelAction>,
    #[serde(default)]
    pub stage: CancellationStage,
    #[serde(default)]
    pub search_attempts: u32,
    pub last_search_type: Option<String>,
    /// Booking found and awaiting the guest's confirmation
    pub pending_booking: Option<Uuid>,
}

impl CancellationFlow {
    /// Detect a cancellation request in a message
    pub fn detect_request(text: &str) -> Option<CancelAction> {
        if REBOOK_PATTERNS.iter().any(|p| p.is_match(text)) {
            return Some(CancelAction::CancelAndRebook);
        }
        if CANCEL_PATTERNS.iter().any(|p| p.is_match(text)) {
            return Some(CancelAction::CancelOnly);
        }
        None
    }

    pub fn is_confirmation(text: &str) -> bool {
        CONFIRM_PATTERN.is_match(text)
    }

    pub fn is_decline(text: &str) -> bool {
        DECLINE_PATTERN.is_match(text)
    }

    pub fn activate(&mut self, action: CancelAction) {
        self.is_active = true;
        self.action = Some(action);
        self.stage = CancellationStage::AwaitingSearchParams;
        self.search_attempts = 0;
        self.pending_booking = None;
        tracing::info!(action = ?action, "Cancellation flow started");
    }

    /// Record a failed lookup. Returns true when the bound is exhausted.
    pub fn record_failed_search(&mut self, search_type: &str) -> bool {
        self.search_attempts += 1;
        self.last_search_type = Some(search_type.to_string());
        if self.search_attempts >= MAX_SEARCH_ATTEMPTS {
            tracing::warn!(
                attempts = self.search_attempts,
                "Cancellation search bound reached, handing off to operator"
            );
            self.deactivate();
            return true;
        }
        false
    }

    /// A booking was found; ask the guest to confirm
    pub fn await_confirmation(&mut self, booking_id: Uuid) {
        self.pending_booking = Some(booking_id);
        self.stage = CancellationStage::AwaitingConfirmation;
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.stage = CancellationStage::Initial;
        self.pending_booking = None;
    }

    pub fn ask_search_params_message(language: Language) -> &'static str {
        match language {
            Language::Uk => {
                "Назвіть, будь ласка, прізвище та ім'я або номер телефону, на який оформлене бронювання."
            },
            Language::Ru => {
                "Назовите, пожалуйста, фамилию и имя или номер телефона, на который оформлено бронирование."
            },
            Language::En => {
                "Please give me the full name or the phone number the booking was made under."
            },
        }
    }

    pub fn not_found_message(language: Language) -> &'static str {
        match language {
            Language::Uk => {
                "Не знаходжу бронювання за цими даними. Перевірте, будь ласка, ім'я або телефон і спробуйте ще раз."
            },
            Language::Ru => {
                "Не нахожу бронирование по этим данным. Проверьте, пожалуйста, имя или телефон и попробуйте ещё раз."
            },
            Language::En => {
                "I can't find a booking under those details. Please check the name or phone number and try again."
            },
        }
    }

    pub fn operator_message(language: Language) -> &'static str {
        match language {
            Language::Uk => {
                "На жаль, мені не вдалося знайти ваше бронювання. Зверніться, будь ласка, до адміністратора за телефоном рецепції, він допоможе."
            },
            Language::Ru => {
                "К сожалению, мне не удалось найти ваше бронирование. Обратитесь, пожалуйста, к администратору по телефону ресепшена, он поможет."
            },
            Language::En => {
                "Unfortunately I couldn't find your booking. Please contact the reception desk and an operator will help you."
            },
        }
    }

    pub fn cancelled_message(language: Language) -> &'static str {
        match language {
            Language::Uk => "Ваше бронювання скасовано.",
            Language::Ru => "Ваше бронирование отменено.",
            Language::En => "Your booking has been cancelled.",
        }
    }

    pub fn rebook_message(language: Language) -> &'static str {
        match language {
            Language::Uk => {
                "Бронювання скасовано. Давайте оберемо нові дати: коли ви хотіли б заїхати та виїхати?"
            },
            Language::Ru => {
                "Бронирование отменено. Давайте выберем новые даты: когда вы хотели бы заехать и выехать?"
            },
            Language::En => {
                "The booking is cancelled. Let's pick new dates: when would you like to check in and out?"
            },
        }
    }

    pub fn kept_message(language: Language) -> &'static str {
        match language {
            Language::Uk => "Добре, бронювання залишається без змін.",
            Language::Ru => "Хорошо, бронирование остаётся без изменений.",
            Language::En => "Alright, the booking stays as it is.",
        }
    }
}
