use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Booked times per date, stored on the influencer as `slots_booked`.
///
/// Keys are the date strings the booking client sends (`D_M_YYYY`), values
/// the list of taken time strings for that date. Both are opaque here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotsBooked(BTreeMap<String, Vec<String>>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    InvalidDate(String),
    InvalidTime,
    AlreadyBooked,
}

impl fmt::Display for SlotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotError::InvalidDate(date) => write!(f, "Invalid slot date: '{}'", date),
            SlotError::InvalidTime => write!(f, "Slot time is required"),
            SlotError::AlreadyBooked => write!(f, "Slot Not Available"),
        }
    }
}

impl std::error::Error for SlotError {}

impl SlotsBooked {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_booked(&self, date: &str, time: &str) -> bool {
        self.0
            .get(date)
            .map(|times| times.iter().any(|t| t == time))
            .unwrap_or(false)
    }
}

/// Date keys become MongoDB field-path segments (`slots_booked.<date>`).
pub fn validate_slot(date: &str, time: &str) -> Result<(), SlotError> {
    if date.trim().is_empty() || date.contains('.') || date.starts_with('$') {
        return Err(SlotError::InvalidDate(date.to_string()));
    }
    if time.trim().is_empty() {
        return Err(SlotError::InvalidTime);
    }
    Ok(())
}

/// Field path of one date's time list inside an influencer document.
pub fn slot_field_path(date: &str) -> String {
    format!("slots_booked.{}", date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn slots(value: serde_json::Value) -> SlotsBooked {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn is_booked_matches_exact_date_and_time() {
        let slots = slots(json!({ "17_10_2026": ["10:00 AM", "11:00 AM"] }));

        assert!(slots.is_booked("17_10_2026", "10:00 AM"));
        assert!(slots.is_booked("17_10_2026", "11:00 AM"));
        assert!(!slots.is_booked("17_10_2026", "10:30 AM"));
        assert!(!slots.is_booked("18_10_2026", "10:00 AM"));
        assert!(!slots.is_booked("17_10_2026", "10:00 am"));
    }

    #[test]
    fn empty_map_books_nothing() {
        assert!(!SlotsBooked::new().is_booked("1_1_2026", "09:00 AM"));
        assert_eq!(slots(json!({})), SlotsBooked::new());
    }

    #[test]
    fn rejects_keys_unsafe_for_field_paths() {
        assert!(matches!(
            validate_slot("17.10.2026", "10:00 AM"),
            Err(SlotError::InvalidDate(_))
        ));
        assert!(matches!(validate_slot("$where", "10:00 AM"), Err(SlotError::InvalidDate(_))));
        assert!(matches!(validate_slot("", "10:00 AM"), Err(SlotError::InvalidDate(_))));
        assert_eq!(validate_slot("17_10_2026", "  "), Err(SlotError::InvalidTime));
        assert_eq!(validate_slot("17_10_2026", "10:00 AM"), Ok(()));
    }

    #[test]
    fn taken_slot_reads_slot_not_available() {
        assert_eq!(SlotError::AlreadyBooked.to_string(), "Slot Not Available");
    }

    #[test]
    fn serializes_as_plain_map() {
        let raw = json!({ "17_10_2026": ["10:00 AM"], "18_10_2026": [] });
        let slots = slots(raw.clone());

        assert_eq!(serde_json::to_value(&slots).unwrap(), raw);
    }

    #[test]
    fn field_path_uses_date_key() {
        assert_eq!(slot_field_path("17_10_2026"), "slots_booked.17_10_2026");
    }
}
