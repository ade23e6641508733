//! Feedback entries appended to a day's ledger.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One timestamped note from a staff member.
///
/// Entries are append-only: once in a ledger they are never edited or
/// removed, only followed by newer entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedbackEntry {
    /// Staff key of the author.
    pub staff: String,
    /// When the note was recorded, in the shop's fixed `+09:00` offset.
    pub timestamp: DateTime<FixedOffset>,
    /// Free-form note text.
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_round_trips_with_offset() {
        let entry = FeedbackEntry {
            staff: "ben".to_string(),
            timestamp: "2025-11-19T17:45:00+09:00".parse().unwrap(),
            content: "Good pace".to_string(),
        };
        let yaml = serde_yaml::to_string(&entry).unwrap();
        assert!(yaml.contains("+09:00"));
        let back: FeedbackEntry = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(entry, back);
    }
}
