//! The journal store facade. Entries are owned by an external document
//! store; this module exposes the CRUD contract the screen consumes, an HTTP
//! implementation of it, and an in-memory implementation used when no remote
//! store is configured.

use crate::config::StoreConfig;
use crate::models::{EntryContent, EntryKind, JournalEntry, PromptResponse};
use chrono::NaiveDate;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Request(String),
    #[error("store returned an unreadable response: {0}")]
    Decode(String),
    #[error("store rejected the credentials")]
    Unauthorized,
    #[error("entry not found")]
    NotFound,
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Request(err.to_string())
    }
}

/// Fields of an entry that `update_entry` may replace. `None` leaves the
/// stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    pub title: Option<String>,
    pub content: Option<EntryContent>,
}

pub trait JournalStore: Send + Sync {
    fn create_entry(
        &self,
        content: EntryContent,
        title: &str,
        date: NaiveDate,
        kind: EntryKind,
    ) -> Result<JournalEntry, StoreError>;

    /// Full collection fetch; no pagination.
    fn list_entries(&self) -> Result<Vec<JournalEntry>, StoreError>;

    fn update_entry(&self, id: &str, patch: EntryPatch) -> Result<JournalEntry, StoreError>;

    fn delete_entry(&self, id: &str) -> Result<(), StoreError>;
}

/// Dispatches a full-collection fetch on a background thread. The result
/// arrives on the returned receiver and is drained by the runtime tick, so
/// the cache is only ever replaced with a complete collection.
pub fn spawn_list_entries(
    store: Arc<dyn JournalStore>,
) -> Receiver<Result<Vec<JournalEntry>, StoreError>> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let _ = sender.send(store.list_entries());
    });
    receiver
}

// Wire schema of the external document store. Field names follow the stored
// document shape, not Rust conventions.
#[derive(Deserialize)]
struct WireEntry {
    id: String,
    #[serde(rename = "entryTitle", default)]
    entry_title: String,
    #[serde(rename = "entryText", default)]
    entry_text: serde_json::Value,
    #[serde(rename = "journalDate", default)]
    journal_date: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<EntryKind>,
}

#[derive(Serialize)]
struct WireEntryUpsert {
    #[serde(rename = "entryTitle")]
    entry_title: String,
    #[serde(rename = "entryText")]
    entry_text: serde_json::Value,
    #[serde(rename = "journalDate")]
    journal_date: String,
    #[serde(rename = "type")]
    kind: EntryKind,
}

#[derive(Serialize)]
struct WireEntryPatch {
    #[serde(rename = "entryTitle", skip_serializing_if = "Option::is_none")]
    entry_title: Option<String>,
    #[serde(rename = "entryText", skip_serializing_if = "Option::is_none")]
    entry_text: Option<serde_json::Value>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<EntryKind>,
}

fn decode_entry(wire: WireEntry) -> JournalEntry {
    let content = match (wire.kind, wire.entry_text) {
        (Some(EntryKind::Free), text) => EntryContent::Free(text_to_string(text)),
        (_, serde_json::Value::Array(items)) => {
            let pairs = items
                .into_iter()
                .filter_map(|item| serde_json::from_value::<PromptResponse>(item).ok())
                .collect();
            EntryContent::Prompts(pairs)
        }
        (_, text) => EntryContent::Free(text_to_string(text)),
    };

    let date = wire
        .journal_date
        .as_deref()
        .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok());

    JournalEntry {
        id: wire.id,
        title: wire.entry_title,
        content,
        date,
    }
}

fn text_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn encode_content(content: &EntryContent) -> serde_json::Value {
    match content {
        EntryContent::Free(text) => serde_json::Value::String(text.clone()),
        EntryContent::Prompts(pairs) => {
            serde_json::to_value(pairs).unwrap_or(serde_json::Value::Null)
        }
    }
}

/// JSON-over-HTTP store client: `{base_url}/entries` for the collection and
/// `{base_url}/entries/{id}` for a single document.
pub struct HttpStore {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpStore {
    pub fn new(config: &StoreConfig) -> Self {
        let token = if config.token.trim().is_empty() {
            None
        } else {
            Some(config.token.trim().to_string())
        };
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn entries_url(&self) -> String {
        format!("{}/entries", self.base_url)
    }

    fn entry_url(&self, id: &str) -> String {
        format!("{}/entries/{}", self.base_url, id)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn check_status(status: StatusCode) -> Result<(), StoreError> {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StoreError::Unauthorized);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound);
        }
        if !status.is_success() {
            return Err(StoreError::Request(format!("status {status}")));
        }
        Ok(())
    }

    fn read_entry(response: reqwest::blocking::Response) -> Result<JournalEntry, StoreError> {
        let wire = response
            .json::<WireEntry>()
            .map_err(|err| StoreError::Decode(err.to_string()))?;
        Ok(decode_entry(wire))
    }
}

impl JournalStore for HttpStore {
    fn create_entry(
        &self,
        content: EntryContent,
        title: &str,
        date: NaiveDate,
        kind: EntryKind,
    ) -> Result<JournalEntry, StoreError> {
        let body = WireEntryUpsert {
            entry_title: title.to_string(),
            entry_text: encode_content(&content),
            journal_date: date.format("%Y-%m-%d").to_string(),
            kind,
        };
        let response = self
            .authorize(self.client.post(self.entries_url()))
            .json(&body)
            .send()?;
        Self::check_status(response.status())?;
        Self::read_entry(response)
    }

    fn list_entries(&self) -> Result<Vec<JournalEntry>, StoreError> {
        let response = self.authorize(self.client.get(self.entries_url())).send()?;
        Self::check_status(response.status())?;
        let wires = response
            .json::<Vec<WireEntry>>()
            .map_err(|err| StoreError::Decode(err.to_string()))?;
        Ok(wires.into_iter().map(decode_entry).collect())
    }

    fn update_entry(&self, id: &str, patch: EntryPatch) -> Result<JournalEntry, StoreError> {
        let body = WireEntryPatch {
            entry_title: patch.title,
            kind: patch.content.as_ref().map(EntryContent::kind),
            entry_text: patch.content.as_ref().map(encode_content),
        };
        let response = self
            .authorize(self.client.patch(self.entry_url(id)))
            .json(&body)
            .send()?;
        Self::check_status(response.status())?;
        Self::read_entry(response)
    }

    fn delete_entry(&self, id: &str) -> Result<(), StoreError> {
        let response = self
            .authorize(self.client.delete(self.entry_url(id)))
            .send()?;
        Self::check_status(response.status())
    }
}

/// Session-local store used when no remote store is configured. Entries live
/// only for the lifetime of the process. Also backs the test suite, which
/// asserts on its call counters.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<Vec<JournalEntry>>,
    next_id: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    /// When set, every mutating call fails with `StoreError::Request`.
    pub fail_writes: std::sync::atomic::AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<JournalEntry>) -> Self {
        let store = Self::new();
        store.next_id.store(entries.len() + 1, Ordering::SeqCst);
        *store.entries.lock().expect("store lock") = entries;
        store
    }

    fn writes_fail(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(StoreError::Request("synthetic failure".to_string()))
        } else {
            Ok(())
        }
    }
}

impl JournalStore for MemoryStore {
    fn create_entry(
        &self,
        content: EntryContent,
        title: &str,
        date: NaiveDate,
        _kind: EntryKind,
    ) -> Result<JournalEntry, StoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.writes_fail()?;
        let id = format!("m{}", self.next_id.fetch_add(1, Ordering::SeqCst).max(1));
        let entry = JournalEntry {
            id,
            title: title.to_string(),
            content,
            date: Some(date),
        };
        self.entries.lock().expect("store lock").push(entry.clone());
        Ok(entry)
    }

    fn list_entries(&self) -> Result<Vec<JournalEntry>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.lock().expect("store lock").clone())
    }

    fn update_entry(&self, id: &str, patch: EntryPatch) -> Result<JournalEntry, StoreError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.writes_fail()?;
        let mut entries = self.entries.lock().expect("store lock");
        let entry = entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(StoreError::NotFound)?;
        if let Some(title) = patch.title {
            entry.title = title;
        }
        if let Some(content) = patch.content {
            entry.content = content;
        }
        Ok(entry.clone())
    }

    fn delete_entry(&self, id: &str) -> Result<(), StoreError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.writes_fail()?;
        let mut entries = self.entries.lock().expect("store lock");
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        if entries.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn decodes_free_entry_from_wire_document() {
        let raw = r#"{
            "id": "e1",
            "entryTitle": "Today",
            "entryText": "Hello",
            "journalDate": "2024-06-01",
            "type": "free"
        }"#;
        let wire: WireEntry = serde_json::from_str(raw).unwrap();
        let entry = decode_entry(wire);

        assert_eq!(entry.id, "e1");
        assert_eq!(entry.title, "Today");
        assert_eq!(entry.content, EntryContent::Free("Hello".to_string()));
        assert_eq!(entry.date, Some(date("2024-06-01")));
    }

    #[test]
    fn decodes_prompt_entry_and_tolerates_malformed_pairs() {
        let raw = r#"{
            "id": "e2",
            "entryTitle": "Guided",
            "entryText": [
                {"prompt": "What made you smile?", "response": "Coffee"},
                {"oops": true}
            ],
            "journalDate": "2024-06-02",
            "type": "prompts"
        }"#;
        let wire: WireEntry = serde_json::from_str(raw).unwrap();
        let entry = decode_entry(wire);

        match entry.content {
            EntryContent::Prompts(pairs) => {
                assert_eq!(pairs.len(), 1);
                assert_eq!(pairs[0].response, "Coffee");
            }
            other => panic!("expected prompts content, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_dates_become_none() {
        let raw = r#"{"id": "e3", "entryTitle": "t", "entryText": "x", "journalDate": "junk"}"#;
        let wire: WireEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(decode_entry(wire).date, None);
    }

    #[test]
    fn array_body_without_type_is_treated_as_prompts() {
        let raw = r#"{
            "id": "e4",
            "entryTitle": "Old doc",
            "entryText": [{"prompt": "p", "response": "r"}],
            "journalDate": "2024-01-01"
        }"#;
        let wire: WireEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(decode_entry(wire).content.kind(), EntryKind::Prompts);
    }

    #[test]
    fn memory_store_create_then_list_round_trips() {
        let store = MemoryStore::new();
        let created = store
            .create_entry(
                EntryContent::Free("Hello".to_string()),
                "Today",
                date("2024-06-01"),
                EntryKind::Free,
            )
            .unwrap();

        let listed = store.list_entries().unwrap();
        assert_eq!(listed, vec![created]);
        assert_eq!(store.create_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn memory_store_delete_unknown_id_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.delete_entry("missing"),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn memory_store_update_patches_only_provided_fields() {
        let store = MemoryStore::new();
        let created = store
            .create_entry(
                EntryContent::Free("body".to_string()),
                "Before",
                date("2024-06-01"),
                EntryKind::Free,
            )
            .unwrap();

        let updated = store
            .update_entry(
                &created.id,
                EntryPatch {
                    title: Some("After".to_string()),
                    content: None,
                },
            )
            .unwrap();

        assert_eq!(updated.title, "After");
        assert_eq!(updated.content, EntryContent::Free("body".to_string()));
    }

    #[test]
    fn spawn_list_entries_delivers_full_collection() {
        let store = Arc::new(MemoryStore::with_entries(vec![JournalEntry {
            id: "e1".to_string(),
            title: "t".to_string(),
            content: EntryContent::Free("x".to_string()),
            date: Some(date("2024-06-01")),
        }]));

        let receiver = spawn_list_entries(store);
        let entries = receiver.recv().unwrap().unwrap();
        assert_eq!(entries.len(), 1);
    }
}
