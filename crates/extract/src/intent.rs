//! Intent classifiers
//!
//! Pure, stateless classification over ordered case-insensitive pattern
//! tables. For category assignment the first matching table entry wins.

use once_cell::sync::Lazy;
use regex::Regex;

use concierge_core::{RequirementTag, ServiceCategory};

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?i){}", p)).unwrap())
        .collect()
}

/// Room browsing / booking phrasing
static ROOM_INTENT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"номер",
        r"кімнат",
        r"комнат",
        r"апартамент",
        r"люкс",
        r"забронюва",
        r"заброниро",
        r"бронь",
        r"бронюва",
        r"зупинитис",
        r"поселитис",
        r"заселитис",
        r"\broom\b",
        r"\bsuite\b",
        r"\bbook(?:ing)?\b",
        r"\bstay\b",
        r"\breserv",
        r"\baccommodat",
    ])
});

/// General hotel topics; any match abandons the room-specific focus
static GENERAL_TOPIC_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"сніданок",
        r"завтрак",
        r"\bbreakfast\b",
        r"ресторан",
        r"\brestaurant\b",
        r"спа\b",
        r"\bspa\b",
        r"басейн",
        r"бассейн",
        r"\bpool\b",
        r"парковк",
        r"паркінг",
        r"\bparking\b",
        r"\bwi-?fi\b",
        r"інтернет",
        r"интернет",
        r"трансфер",
        r"\btransfer\b",
        r"\bshuttle\b",
        r"тренажер",
        r"спортзал",
        r"\bgym\b",
        r"час заїзду",
        r"время заезда",
        r"check-?in time",
        r"\bpets?\b",
        r"тварин",
        r"животн",
    ])
});

/// Complex-request markers mapped to requirement tags
static REQUIREMENT_PATTERNS: Lazy<Vec<(Regex, RequirementTag)>> = Lazy::new(|| {
    let table: &[(&str, RequirementTag)] = &[
        (
            r"поверс|этаж|\bfloor\b|корпус|подалі від ліфт|подальше от лифт|away from the elevator",
            RequirementTag::RoomLocation,
        ),
        (
            r"робоче місце|рабочее место|стіл для роботи|стол для работы|\bworkspace\b|\bdesk\b|працювати з номер|работать из номер",
            RequirementTag::Workspace,
        ),
        (
            r"романтич|romantic|медов(?:ий|ый) (?:місяць|месяц)|\bhoneymoon\b|річниц|годовщин|\banniversary\b",
            RequirementTag::Romantic,
        ),
        (
            r"інвалід|инвалид|візок|коляск|\bwheelchair\b|\baccessib|безбар'єрн",
            RequirementTag::Accessibility,
        ),
        (
            r"джакузі|джакузи|\bjacuzzi\b|\bhot tub\b|гідромасаж|гидромассаж",
            RequirementTag::Jacuzzi,
        ),
        (
            r"дитяч|детск|з дітьми|с детьми|\bfamily\b|\bkids?\b|\bchildren\b|ліжечко|кроватк|\bbaby cot\b|\bcrib\b",
            RequirementTag::Family,
        ),
        (
            r"тих(?:ий|а|е|о)|тиш(?:а|і|ини)|подалі від шуму|подальше от шума|\bquiet\b|\bnoise\b",
            RequirementTag::Quiet,
        ),
        (
            r"вид на|видом на|краєвид|панорам|\bview\b|\boverlooking\b",
            RequirementTag::View,
        ),
    ];
    table
        .iter()
        .map(|(p, tag)| (Regex::new(&format!("(?i){}", p)).unwrap(), *tag))
        .collect()
});

/// Room-service intent gate
static SERVICE_INTENT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"в номер\b",
        r"у номер\b",
        r"принес",
        r"замов",
        r"закаж|заказ",
        r"приберіть|прибрати|прибирання",
        r"уберите|убрать|уборк",
        r"рушник",
        r"полотенц",
        r"\btowels?\b",
        r"мінібар|минибар|\bminibar\b",
        r"\broom service\b",
        r"\bhousekeeping\b",
        r"\bclean my room\b",
        r"голодн|поїсти|поесть|\bhungry\b",
        r"\bfood\b|\bmeal\b|\bdinner\b|\blunch\b|\bbreakfast to the room\b",
    ])
});

/// Sub-classification tables, checked in order; first match wins
static SERVICE_CATEGORY_PATTERNS: Lazy<Vec<(Regex, ServiceCategory)>> = Lazy::new(|| {
    let table: &[(&str, ServiceCategory)] = &[
        (
            r"рушник|полотенц|\btowels?\b",
            ServiceCategory::Towels,
        ),
        (
            r"приб(?:ер|ир|ра)|убор|убер|убрать|\bclean|\bhousekeeping\b",
            ServiceCategory::Cleaning,
        ),
        (
            r"мінібар|минибар|\bminibar\b",
            ServiceCategory::Minibar,
        ),
        (
            r"їж|еда|їсти|поесть|голодн|вечер|обід|обед|\bfood\b|\bmeal\b|\bdinner\b|\blunch\b|\bhungry\b",
            ServiceCategory::Food,
        ),
    ];
    table
        .iter()
        .map(|(p, cat)| (Regex::new(&format!("(?i){}", p)).unwrap(), *cat))
        .collect()
});

/// Short agreement replies to a pending offer
static AFFIRMATIVE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:так|ага|добре|гаразд|да|давайте|хорошо|конечно|звичайно|yes|yep|sure|okay|ok|окей)\b",
    )
    .unwrap()
});

/// Does the message talk about rooms or booking?
pub fn is_room_intent(text: &str) -> bool {
    ROOM_INTENT_PATTERNS.iter().any(|p| p.is_match(text))
}

/// Does the message switch to a general hotel topic?
pub fn is_general_topic(text: &str) -> bool {
    GENERAL_TOPIC_PATTERNS.iter().any(|p| p.is_match(text))
}

/// Collect every requirement tag the message mentions, each tag at most once
pub fn detect_requirements(text: &str) -> Vec<RequirementTag> {
    let mut tags = Vec::new();
    for (pattern, tag) in REQUIREMENT_PATTERNS.iter() {
        if pattern.is_match(text) && !tags.contains(tag) {
            tags.push(*tag);
        }
    }
    tags
}

/// Detect a room-service request and its category.
/// An ambiguous service match defaults to `Food`.
pub fn detect_service_request(text: &str) -> Option<ServiceCategory> {
    if !SERVICE_INTENT_PATTERNS.iter().any(|p| p.is_match(text)) {
        return None;
    }
    for (pattern, category) in SERVICE_CATEGORY_PATTERNS.iter() {
        if pattern.is_match(text) {
            return Some(*category);
        }
    }
    Some(ServiceCategory::Food)
}

/// Is the message a short agreement to something just offered?
pub fn is_affirmative(text: &str) -> bool {
    AFFIRMATIVE_PATTERN.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_replies() {
        assert!(is_affirmative("так, будь ласка"));
        assert!(is_affirmative("Да"));
        assert!(is_affirmative("sure, why not"));
        assert!(!is_affirmative("no thanks"));
        assert!(!is_affirmative("а що з парковкою?"));
    }

    #[test]
    fn test_room_intent() {
        assert!(is_room_intent("Хочу забронювати номер"));
        assert!(is_room_intent("I'd like to book a room"));
        assert!(is_room_intent("есть свободные комнаты?"));
        assert!(!is_room_intent("де у вас ресторан?"));
    }

    #[test]
    fn test_general_topic() {
        assert!(is_general_topic("во сколько завтрак?"));
        assert!(is_general_topic("is there a pool?"));
        assert!(is_general_topic("чи є парковка"));
        assert!(!is_general_topic("хочу номер на двох"));
    }

    #[test]
    fn test_detect_requirements() {
        let tags = detect_requirements("хочемо номер з джакузі на високому поверсі");
        assert!(tags.contains(&RequirementTag::Jacuzzi));
        assert!(tags.contains(&RequirementTag::RoomLocation));

        let tags = detect_requirements("it's our honeymoon, something romantic please");
        assert_eq!(tags, vec![RequirementTag::Romantic]);

        assert!(detect_requirements("звичайний номер").is_empty());
    }

    #[test]
    fn test_requirements_deduplicated_within_message() {
        // Two romantic markers in one message still yield a single tag
        let tags = detect_requirements("honeymoon trip, we want something romantic");
        assert_eq!(tags, vec![RequirementTag::Romantic]);
    }

    #[test]
    fn test_service_request_categories() {
        assert_eq!(
            detect_service_request("принесіть рушники, будь ласка"),
            Some(ServiceCategory::Towels)
        );
        assert_eq!(
            detect_service_request("уберите в номере"),
            Some(ServiceCategory::Cleaning)
        );
        assert_eq!(
            detect_service_request("please restock the minibar"),
            Some(ServiceCategory::Minibar)
        );
        assert_eq!(
            detect_service_request("хочу замовити вечерю в номер"),
            Some(ServiceCategory::Food)
        );
        assert_eq!(detect_service_request("how far is the airport?"), None);
    }

    #[test]
    fn test_ambiguous_service_defaults_to_food() {
        // Service intent with no narrower category
        assert_eq!(
            detect_service_request("room service please"),
            Some(ServiceCategory::Food)
        );
    }
}
