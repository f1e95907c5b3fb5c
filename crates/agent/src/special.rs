//! Special-booking mode for complex or VIP requests

use serde::{Deserialize, Serialize};

use concierge_core::{Language, RequirementTag};

/// How the mode was entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivatedBy {
    /// A complex-request pattern matched
    Auto,
    /// Operator or UI switch
    Manual,
}

/// Stages of a special booking.
///
/// Advancement is driven externally by completion-client round trips; there
/// is no timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpecialStage {
    #[default]
    Collecting,
    Analyzing,
    Finalizing,
    OfferReady,
}

/// Special-booking state
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SpecialBooking {
    #[serde(default)]
    pub is_active: bool,
    pub activated_by: Option<ActivatedBy>,
    #[serde(default)]
    pub stage: SpecialStage,
    #[serde(default)]
    pub requirements: Vec<RequirementTag>,
    pub current_offer: Option<String>,
}

impl SpecialBooking {
    /// Enter the mode. Re-activation keeps the existing stage and tags.
    pub fn activate(&mut self, by: ActivatedBy) {
        if !self.is_active {
            self.is_active = true;
            self.activated_by = Some(by);
            self.stage = SpecialStage::Collecting;
            tracing::info!(activated_by = ?by, "Special-booking mode entered");
        }
    }

    /// Add requirement tags, deduplicated by tag type across turns
    pub fn add_requirements(&mut self, tags: &[RequirementTag]) {
        for tag in tags {
            if !self.requirements.contains(tag) {
                self.requirements.push(*tag);
            }
        }
    }

    /// Advance one stage; `OfferReady` is terminal
    pub fn advance(&mut self) {
        self.stage = match self.stage {
            SpecialStage::Collecting => SpecialStage::Analyzing,
            SpecialStage::Analyzing => SpecialStage::Finalizing,
            SpecialStage::Finalizing | SpecialStage::OfferReady => SpecialStage::OfferReady,
        };
    }

    pub fn set_offer(&mut self, offer: impl Into<String>) {
        self.current_offer = Some(offer.into());
        self.stage = SpecialStage::OfferReady;
    }

    pub fn cancel(&mut self) {
        *self = SpecialBooking::default();
    }

    pub fn complete(&mut self) {
        *self = SpecialBooking::default();
    }

    /// Canned status line per stage and language
    pub fn status_message(&self, language: Language) -> &'static str {
        match (self.stage, language) {
            (SpecialStage::Collecting, Language::Uk) => {
                "Я занотовую ваші побажання. Розкажіть, що ще важливо для вашого проживання."
            },
            (SpecialStage::Collecting, Language::Ru) => {
                "Я записываю ваши пожелания. Расскажите, что ещё важно для вашего проживания."
            },
            (SpecialStage::Collecting, Language::En) => {
                "I'm noting your wishes. Tell me what else matters for your stay."
            },
            (SpecialStage::Analyzing, Language::Uk) => {
                "Підбираю варіанти під ваші побажання, хвилинку."
            },
            (SpecialStage::Analyzing, Language::Ru) => {
                "Подбираю варианты под ваши пожелания, минутку."
            },
            (SpecialStage::Analyzing, Language::En) => {
                "Matching options to your wishes, one moment."
            },
            (SpecialStage::Finalizing, Language::Uk) => {
                "Майже готово, формую персональну пропозицію."
            },
            (SpecialStage::Finalizing, Language::Ru) => {
                "Почти готово, формирую персональное предложение."
            },
            (SpecialStage::Finalizing, Language::En) => {
                "Almost there, preparing your personalized offer."
            },
            (SpecialStage::OfferReady, Language::Uk) => {
                "Ваша персональна пропозиція готова."
            },
            (SpecialStage::OfferReady, Language::Ru) => {
                "Ваше персональное предложение готово."
            },
            (SpecialStage::OfferReady, Language::En) => {
                "Your personalized offer is ready."
            },
        }
    }
}
