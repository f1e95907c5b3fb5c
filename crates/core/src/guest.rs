//! Guest detail record produced by extraction

use serde::{Deserialize, Serialize};

/// Details extracted from a guest message
///
/// Every field is optional so extraction can never fail; unmatched fields stay
/// `None` and callers merge non-destructively.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GuestDetails {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Check-in date, normalized `YYYY-MM-DD`
    pub check_in: Option<String>,
    /// Check-out date, normalized `YYYY-MM-DD`
    pub check_out: Option<String>,
    pub guests: Option<u32>,
}

impl GuestDetails {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.check_in.is_none()
            && self.check_out.is_none()
            && self.guests.is_none()
    }

    /// Fill fields of `self` that are still empty from `other`.
    /// Existing values always win.
    pub fn merge_missing(&mut self, other: &GuestDetails) {
        if self.full_name.is_none() {
            self.full_name = other.full_name.clone();
        }
        if self.phone.is_none() {
            self.phone = other.phone.clone();
        }
        if self.email.is_none() {
            self.email = other.email.clone();
        }
        if self.check_in.is_none() {
            self.check_in = other.check_in.clone();
        }
        if self.check_out.is_none() {
            self.check_out = other.check_out.clone();
        }
        if self.guests.is_none() {
            self.guests = other.guests;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_existing() {
        let mut base = GuestDetails {
            full_name: Some("Іван Петренко".to_string()),
            ..Default::default()
        };
        let incoming = GuestDetails {
            full_name: Some("Other Name".to_string()),
            phone: Some("+380501234567".to_string()),
            ..Default::default()
        };
        base.merge_missing(&incoming);
        assert_eq!(base.full_name.as_deref(), Some("Іван Петренко"));
        assert_eq!(base.phone.as_deref(), Some("+380501234567"));
    }

    #[test]
    fn test_is_empty() {
        assert!(GuestDetails::default().is_empty());
    }
}
