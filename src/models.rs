use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq)]
pub enum InputMode {
    Navigate,
    Search,
}

/// Discriminator stored alongside each entry; selects how the body is
/// interpreted ("free" text vs. prompt/response pairs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    #[serde(rename = "free")]
    Free,
    #[serde(rename = "prompts")]
    Prompts,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Free => "free",
            EntryKind::Prompts => "prompts",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptResponse {
    pub prompt: String,
    pub response: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryContent {
    Free(String),
    Prompts(Vec<PromptResponse>),
}

impl EntryContent {
    pub fn kind(&self) -> EntryKind {
        match self {
            EntryContent::Free(_) => EntryKind::Free,
            EntryContent::Prompts(_) => EntryKind::Prompts,
        }
    }
}

/// A single journal record for one calendar date. The store owns these; the
/// screen only caches them. `date` is `None` when the stored date was missing
/// or unparseable, in which case the entry is hidden from the recent list.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    pub id: String,
    pub title: String,
    pub content: EntryContent,
    pub date: Option<NaiveDate>,
}

impl JournalEntry {
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Untitled Entry"
        } else {
            &self.title
        }
    }

    pub fn display_date(&self) -> String {
        match self.date {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => "No Date".to_string(),
        }
    }
}

/// Number of entries shown in the Past Entries section.
pub const RECENT_ENTRY_CAP: usize = 4;

/// Derives the most recent entries for display: drops undated entries, sorts
/// by date descending with ascending id as the tie-break, and caps the result.
pub fn recent_entries(entries: &[JournalEntry], cap: usize) -> Vec<JournalEntry> {
    let mut dated: Vec<JournalEntry> = entries
        .iter()
        .filter(|entry| entry.date.is_some())
        .cloned()
        .collect();
    dated.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
    dated.truncate(cap);
    dated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, date: Option<&str>) -> JournalEntry {
        JournalEntry {
            id: id.to_string(),
            title: format!("Entry {id}"),
            content: EntryContent::Free("body".to_string()),
            date: date.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
        }
    }

    #[test]
    fn recent_entries_sorts_descending_and_caps_at_four() {
        let entries = vec![
            entry("a", Some("2024-01-01")),
            entry("b", Some("2024-03-05")),
            entry("c", Some("2024-02-10")),
            entry("d", Some("2024-03-05")),
            entry("e", Some("2023-12-31")),
        ];

        let recent = recent_entries(&entries, RECENT_ENTRY_CAP);

        assert_eq!(recent.len(), 4);
        let ids: Vec<&str> = recent.iter().map(|e| e.id.as_str()).collect();
        // Equal dates break the tie by ascending id.
        assert_eq!(ids, vec!["b", "d", "c", "a"]);
    }

    #[test]
    fn recent_entries_drops_undated_entries() {
        let entries = vec![
            entry("a", None),
            entry("b", Some("2024-03-05")),
            entry("c", None),
        ];

        let recent = recent_entries(&entries, RECENT_ENTRY_CAP);

        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, "b");
    }

    #[test]
    fn recent_entries_returns_fewer_than_cap_when_short() {
        let entries = vec![entry("a", Some("2024-01-01"))];
        assert_eq!(recent_entries(&entries, RECENT_ENTRY_CAP).len(), 1);
        assert!(recent_entries(&[], RECENT_ENTRY_CAP).is_empty());
    }

    #[test]
    fn display_title_falls_back_for_blank_titles() {
        let mut e = entry("a", Some("2024-01-01"));
        e.title = "   ".to_string();
        assert_eq!(e.display_title(), "Untitled Entry");
    }

    #[test]
    fn entry_kind_round_trips_wire_names() {
        assert_eq!(EntryKind::Free.as_str(), "free");
        assert_eq!(EntryKind::Prompts.as_str(), "prompts");
        let kind: EntryKind = serde_json::from_str("\"prompts\"").unwrap();
        assert_eq!(kind, EntryKind::Prompts);
    }
}
