//! Rule-based guest detail extraction
//!
//! Every field has its own ordered pattern list; the first match wins.
//! Extraction never fails, it just leaves unmatched fields empty.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use concierge_core::GuestDetails;

/// Localized month names (genitive forms for uk/ru, as they appear after a day
/// number) mapped to month numbers.
static MONTH_NAMES: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    let mut map = HashMap::new();
    // Ukrainian
    for (name, month) in [
        ("січня", 1),
        ("лютого", 2),
        ("березня", 3),
        ("квітня", 4),
        ("травня", 5),
        ("червня", 6),
        ("липня", 7),
        ("серпня", 8),
        ("вересня", 9),
        ("жовтня", 10),
        ("листопада", 11),
        ("грудня", 12),
    ] {
        map.insert(name, month);
    }
    // Russian
    for (name, month) in [
        ("января", 1),
        ("февраля", 2),
        ("марта", 3),
        ("апреля", 4),
        ("мая", 5),
        ("июня", 6),
        ("июля", 7),
        ("августа", 8),
        ("сентября", 9),
        ("октября", 10),
        ("ноября", 11),
        ("декабря", 12),
    ] {
        map.insert(name, month);
    }
    // English
    for (name, month) in [
        ("january", 1),
        ("february", 2),
        ("march", 3),
        ("april", 4),
        ("may", 5),
        ("june", 6),
        ("july", 7),
        ("august", 8),
        ("september", 9),
        ("october", 10),
        ("november", 11),
        ("december", 12),
    ] {
        map.insert(name, month);
    }
    map
});

/// Spelled party sizes, a closed set. Anything outside it is not guessed.
const SPELLED_COUNTS: &[(&str, u32)] = &[
    ("два", 2),
    ("две", 2),
    ("дві", 2),
    ("двое", 2),
    ("двоє", 2),
    ("two", 2),
    ("три", 3),
    ("трое", 3),
    ("троє", 3),
    ("three", 3),
    ("четыре", 4),
    ("чотири", 4),
    ("четверо", 4),
    ("four", 4),
    ("пять", 5),
    ("п'ять", 5),
    ("п’ять", 5),
    ("five", 5),
];

/// Guest detail extractor
pub struct GuestExtractor {
    email_pattern: Regex,
    phone_patterns: Vec<Regex>,
    intro_name_pattern: Regex,
    whole_name_pattern: Regex,
    numeric_date_pattern: Regex,
    month_date_pattern: Regex,
    count_with_unit_pattern: Regex,
    count_preposition_pattern: Regex,
    night_word_pattern: Regex,
}

impl GuestExtractor {
    pub fn new() -> Self {
        Self {
            email_pattern: Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}")
                .unwrap(),
            phone_patterns: Self::build_phone_patterns(),
            // Self-introduction phrase followed by 1-3 capitalized words
            intro_name_pattern: Regex::new(
                r"(?:[Мм]еня зовут|[Мм]ене звати|[Мм]ене звуть|[Mm]y name is|I am|I'm)\s+(\p{Lu}[\p{L}'’\-]+(?:\s+\p{Lu}[\p{L}'’\-]+){0,2})",
            )
            .unwrap(),
            // Whole trimmed message is exactly 2-4 capitalized words
            whole_name_pattern: Regex::new(
                r"^\p{Lu}[\p{L}'’\-]+(?:\s+\p{Lu}[\p{L}'’\-]+){1,3}$",
            )
            .unwrap(),
            // D.M or D.M.YYYY (two-digit years accepted)
            numeric_date_pattern: Regex::new(r"\b(\d{1,2})\.(\d{1,2})(?:\.(\d{2,4}))?\b")
                .unwrap(),
            // "15 січня", "15 января 2026", "15 January"
            month_date_pattern: Regex::new(r"(?i)\b(\d{1,2})\s+(\p{L}+)(?:\s+(\d{4}))?").unwrap(),
            count_with_unit_pattern: Regex::new(
                r"(?i)\b(\d{1,2})\s*(?:гост(?:я|і|ей|ям|ями)?|человек(?:а)?|людей|осіб|особи|guests?|people|persons?|adults?)",
            )
            .unwrap(),
            count_preposition_pattern: Regex::new(r"(?i)(?:\bна|\bfor)\s+(\d{1,2})\b").unwrap(),
            night_word_pattern: Regex::new(r"(?i)^\s*(?:ніч|ноч|дн|день|доб|діб|night|day)")
                .unwrap(),
        }
    }

    fn build_phone_patterns() -> Vec<Regex> {
        vec![
            // Regional numbers: +380 XX XXX XX XX, 380..., or local 0XX XXX XX XX
            Regex::new(
                r"(?:\+?38[\s\-()]*0|\b0)[\s\-()]*\d{2}[\s\-()]*\d{3}[\s\-]*\d{2}[\s\-]*\d{2}",
            )
            .unwrap(),
            // Generic international number
            Regex::new(r"\+\d(?:[\s\-()]*\d){7,13}").unwrap(),
            // Bare digit run
            Regex::new(r"\b\d{10,12}\b").unwrap(),
        ]
    }

    /// Extract guest details from a message.
    ///
    /// `reference` supplies the year for dates given without one.
    pub fn extract(&self, text: &str, reference: NaiveDate) -> GuestDetails {
        let mut details = GuestDetails {
            email: self.extract_email(text),
            phone: self.extract_phone(text),
            full_name: self.extract_name(text),
            guests: self.extract_guest_count(text),
            ..Default::default()
        };
        self.extract_dates(text, reference, &mut details);
        if !details.is_empty() {
            tracing::debug!(
                has_name = details.full_name.is_some(),
                has_phone = details.phone.is_some(),
                has_email = details.email.is_some(),
                has_dates = details.check_in.is_some(),
                "Extracted guest details"
            );
        }
        details
    }

    fn extract_email(&self, text: &str) -> Option<String> {
        self.email_pattern.find(text).map(|m| m.as_str().to_string())
    }

    fn extract_phone(&self, text: &str) -> Option<String> {
        for pattern in &self.phone_patterns {
            if let Some(m) = pattern.find(text) {
                return Some(normalize_phone(m.as_str()));
            }
        }
        None
    }

    fn extract_name(&self, text: &str) -> Option<String> {
        if let Some(caps) = self.intro_name_pattern.captures(text) {
            return Some(caps[1].to_string());
        }
        let trimmed = text.trim();
        if self.whole_name_pattern.is_match(trimmed) {
            return Some(trimmed.to_string());
        }
        None
    }

    /// Numeric dates first (order of appearance: check-in, then check-out),
    /// then month-name dates fill only the fields still empty.
    fn extract_dates(&self, text: &str, reference: NaiveDate, details: &mut GuestDetails) {
        for caps in self.numeric_date_pattern.captures_iter(text) {
            let day: u32 = match caps[1].parse() {
                Ok(d) => d,
                Err(_) => continue,
            };
            let month: u32 = match caps[2].parse() {
                Ok(m) => m,
                Err(_) => continue,
            };
            let year = match caps.get(3) {
                Some(y) => match parse_year(y.as_str()) {
                    Some(y) => y,
                    None => continue,
                },
                None => reference.year(),
            };
            let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                continue;
            };
            if !push_date(details, date) {
                break;
            }
        }

        if details.check_in.is_some() && details.check_out.is_some() {
            return;
        }

        for caps in self.month_date_pattern.captures_iter(text) {
            let Some(&month) = MONTH_NAMES.get(caps[2].to_lowercase().as_str()) else {
                continue;
            };
            let day: u32 = match caps[1].parse() {
                Ok(d) => d,
                Err(_) => continue,
            };
            let year = caps
                .get(3)
                .and_then(|y| y.as_str().parse().ok())
                .unwrap_or_else(|| reference.year());
            let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                continue;
            };
            if !push_date(details, date) {
                break;
            }
        }
    }

    fn extract_guest_count(&self, text: &str) -> Option<u32> {
        if let Some(caps) = self.count_with_unit_pattern.captures(text) {
            if let Ok(n) = caps[1].parse() {
                return Some(n);
            }
        }

        for caps in self.count_preposition_pattern.captures_iter(text) {
            // «на 2 ночі» / "for 3 nights" is a stay length, not a party size
            let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
            if self.night_word_pattern.is_match(&text[end..]) {
                continue;
            }
            if let Ok(n) = caps[1].parse() {
                return Some(n);
            }
        }

        let lowered = text.to_lowercase();
        for (word, count) in SPELLED_COUNTS {
            if contains_word(&lowered, word) {
                return Some(*count);
            }
        }
        None
    }
}

impl Default for GuestExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep the leading `+`, drop every other separator
fn normalize_phone(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for (i, ch) in raw.chars().enumerate() {
        if ch.is_ascii_digit() || (ch == '+' && i == 0) {
            out.push(ch);
        }
    }
    out
}

fn parse_year(s: &str) -> Option<i32> {
    match s.len() {
        2 => s.parse::<i32>().ok().map(|y| 2000 + y),
        4 => s.parse().ok(),
        _ => None,
    }
}

/// First date found becomes check-in, the second check-out.
/// Returns false once both slots are filled.
fn push_date(details: &mut GuestDetails, date: NaiveDate) -> bool {
    let formatted = date.format("%Y-%m-%d").to_string();
    if details.check_in.is_none() {
        details.check_in = Some(formatted);
        true
    } else if details.check_out.is_none() {
        details.check_out = Some(formatted);
        false
    } else {
        false
    }
}

fn contains_word(text: &str, word: &str) -> bool {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '’'))
        .any(|w| w == word)
}
