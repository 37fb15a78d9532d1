use crate::auth::{self, AuthEvent, AuthUser};
use crate::config::Config;
use crate::models::{InputMode, JournalEntry, RECENT_ENTRY_CAP, recent_entries};
use crate::prompts;
use crate::store::{JournalStore, StoreError};
use chrono::{DateTime, Duration, Local, NaiveDate};
use ratatui::widgets::ListState;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use tui_textarea::TextArea;

pub const PLACEHOLDER_SEARCH: &str = "Search past entries…";
pub const PLACEHOLDER_BODY: &str = "Write your thoughts here...";
pub const PLACEHOLDER_RESPONSE: &str = "Write your answer here...";

/// Duration of each fade phase when the create modal swaps sub-views.
const FADE_PHASE_MS: i64 = 200;

/// Requests passed in from outside the screen (CLI navigation parameters):
/// auto-open the view modal for an entry, or the create modal for a date.
#[derive(Debug, Clone, Default)]
pub struct ScreenParams {
    pub view_entry_id: Option<String>,
    pub selected_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptField {
    Title,
    Response(usize),
}

pub struct FreeDraft<'a> {
    pub title: String,
    pub body: TextArea<'a>,
    pub focus: DraftField,
}

impl<'a> FreeDraft<'a> {
    pub fn new() -> Self {
        let mut body = TextArea::default();
        body.set_placeholder_text(PLACEHOLDER_BODY);
        Self {
            title: String::new(),
            body,
            focus: DraftField::Title,
        }
    }

    pub fn body_text(&self) -> String {
        self.body.lines().join("\n")
    }
}

pub struct PromptDraft {
    pub title: String,
    pub prompts: Vec<&'static str>,
    pub responses: Vec<String>,
    pub focus: PromptField,
}

impl PromptDraft {
    pub fn new(prompts: Vec<&'static str>) -> Self {
        let responses = vec![String::new(); prompts.len()];
        Self {
            title: String::new(),
            prompts,
            responses,
            focus: PromptField::Title,
        }
    }
}

/// Sub-views of the create-entry modal. Each state carries exactly the draft
/// it needs; switching states discards the previous draft.
pub enum CreateView<'a> {
    Chooser { selected: usize },
    FreeWrite(FreeDraft<'a>),
    UsePrompts(PromptDraft),
}

/// Visual phase of the sub-view swap. The swap itself happens when the tick
/// observes the fade-out expiry, so correctness does not depend on frame
/// cadence; the phases only drive dimmed rendering.
pub enum ModalPhase<'a> {
    Steady,
    FadeOut {
        next: Box<CreateView<'a>>,
        until: DateTime<Local>,
    },
    FadeIn {
        until: DateTime<Local>,
    },
}

pub struct CreateModal<'a> {
    pub date: NaiveDate,
    pub view: CreateView<'a>,
    pub phase: ModalPhase<'a>,
}

impl<'a> CreateModal<'a> {
    /// Opens the modal for a target date. Always starts at the chooser with
    /// blank drafts.
    pub fn open(date: NaiveDate) -> Self {
        Self {
            date,
            view: CreateView::Chooser { selected: 0 },
            phase: ModalPhase::Steady,
        }
    }

    pub fn begin_transition(&mut self, next: CreateView<'a>, now: DateTime<Local>) {
        self.phase = ModalPhase::FadeOut {
            next: Box::new(next),
            until: now + Duration::milliseconds(FADE_PHASE_MS),
        };
    }

    /// Advances the fade phases; called from the runtime tick.
    pub fn advance(&mut self, now: DateTime<Local>) {
        match std::mem::replace(&mut self.phase, ModalPhase::Steady) {
            ModalPhase::FadeOut { next, until } => {
                if now >= until {
                    self.view = *next;
                    self.phase = ModalPhase::FadeIn {
                        until: now + Duration::milliseconds(FADE_PHASE_MS),
                    };
                } else {
                    self.phase = ModalPhase::FadeOut { next, until };
                }
            }
            ModalPhase::FadeIn { until } => {
                if now < until {
                    self.phase = ModalPhase::FadeIn { until };
                }
            }
            ModalPhase::Steady => {}
        }
    }

    pub fn is_fading(&self) -> bool {
        !matches!(self.phase, ModalPhase::Steady)
    }
}

pub enum EditBody<'a> {
    Free {
        text: TextArea<'a>,
        focus: DraftField,
    },
    Prompts {
        prompts: Vec<String>,
        responses: Vec<String>,
        focus: PromptField,
    },
}

pub struct EditModal<'a> {
    pub id: String,
    pub date: Option<NaiveDate>,
    pub title: String,
    pub body: EditBody<'a>,
}

impl<'a> EditModal<'a> {
    pub fn from_entry(entry: &JournalEntry) -> Self {
        use crate::models::EntryContent;
        let body = match &entry.content {
            EntryContent::Free(text) => {
                let lines: Vec<String> = text.lines().map(|line| line.to_string()).collect();
                let mut area = TextArea::from(lines);
                area.set_placeholder_text(PLACEHOLDER_BODY);
                EditBody::Free {
                    text: area,
                    focus: DraftField::Title,
                }
            }
            EntryContent::Prompts(pairs) => EditBody::Prompts {
                prompts: pairs.iter().map(|pair| pair.prompt.clone()).collect(),
                responses: pairs.iter().map(|pair| pair.response.clone()).collect(),
                focus: PromptField::Title,
            },
        };
        Self {
            id: entry.id.clone(),
            date: entry.date,
            title: entry.title.clone(),
            body,
        }
    }
}

/// Top-level screen state: the cached entry collection, the derived date
/// set, modal visibility, and the receivers the runtime tick drains.
pub struct App<'a> {
    pub input_mode: InputMode,
    pub textarea: TextArea<'a>,
    pub search_query: Option<String>,

    pub user: Option<AuthUser>,
    pub auth_rx: Option<Receiver<AuthEvent>>,

    pub quote: &'static str,
    pub active_date: NaiveDate,

    pub entries: Vec<JournalEntry>,
    pub entry_dates: BTreeSet<NaiveDate>,
    pub loading: bool,
    pub fetch_rx: Option<Receiver<Result<Vec<JournalEntry>, StoreError>>>,

    pub list_state: ListState,
    pub view_entry: Option<JournalEntry>,
    pub show_delete_confirm: bool,
    pub create_modal: Option<CreateModal<'a>>,
    pub edit_modal: Option<EditModal<'a>>,
    pub show_help_popup: bool,
    pub pending_view_id: Option<String>,

    pub toast_message: Option<String>,
    pub toast_expiry: Option<DateTime<Local>>,

    pub should_quit: bool,
    pub store: Arc<dyn JournalStore>,
    pub config: Config,
}

impl<'a> App<'a> {
    pub fn new(config: Config, store: Arc<dyn JournalStore>, params: ScreenParams) -> App<'a> {
        let mut textarea = TextArea::default();
        textarea.set_placeholder_text(PLACEHOLDER_SEARCH);

        let auth_rx = Some(auth::spawn_auth_watch(config.auth.clone()));
        let today = Local::now().date_naive();

        let create_modal = params.selected_date.map(CreateModal::open);

        App {
            input_mode: InputMode::Navigate,
            textarea,
            search_query: None,
            user: None,
            auth_rx,
            quote: prompts::random_quote(),
            active_date: today,
            entries: Vec::new(),
            entry_dates: BTreeSet::new(),
            loading: false,
            fetch_rx: None,
            list_state: ListState::default(),
            view_entry: None,
            show_delete_confirm: false,
            create_modal,
            edit_modal: None,
            show_help_popup: false,
            pending_view_id: params.view_entry_id,
            toast_message: None,
            toast_expiry: None,
            should_quit: false,
            store,
            config,
        }
    }

    pub fn greeting_name(&self) -> &str {
        self.user
            .as_ref()
            .and_then(AuthUser::first_name)
            .unwrap_or("User")
    }

    pub fn search_input(&self) -> String {
        self.textarea.lines().join(" ").trim().to_string()
    }

    /// Query currently narrowing the list: live input while the search bar
    /// is focused, the submitted query otherwise.
    pub fn active_query(&self) -> Option<String> {
        if self.input_mode == InputMode::Search {
            let live = self.search_input();
            if live.is_empty() { None } else { Some(live) }
        } else {
            self.search_query.clone()
        }
    }

    /// Entries shown in the list section: title matches while a query is
    /// active, otherwise the recent-entry selection.
    pub fn visible_entries(&self) -> Vec<JournalEntry> {
        match self.active_query() {
            Some(query) => {
                let needle = query.to_lowercase();
                let mut matches: Vec<JournalEntry> = self
                    .entries
                    .iter()
                    .filter(|entry| entry.title.to_lowercase().contains(&needle))
                    .cloned()
                    .collect();
                matches.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
                matches
            }
            None => recent_entries(&self.entries, RECENT_ENTRY_CAP),
        }
    }

    pub fn selected_entry(&self) -> Option<JournalEntry> {
        let visible = self.visible_entries();
        self.list_state
            .selected()
            .and_then(|i| visible.get(i).cloned())
    }

    pub fn select_next(&mut self) {
        let len = self.visible_entries().len();
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let next = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.list_state.select(Some(next));
    }

    pub fn select_prev(&mut self) {
        let len = self.visible_entries().len();
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let prev = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(prev));
    }

    pub fn select_first(&mut self) {
        if self.visible_entries().is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let len = self.visible_entries().len();
        if len == 0 {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(len - 1));
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_entries().len();
        if len == 0 {
            self.list_state.select(None);
        } else {
            match self.list_state.selected() {
                Some(i) if i < len => {}
                _ => self.list_state.select(Some(0)),
            }
        }
    }

    /// Replaces the cache (entries plus derived date set) with a completed
    /// fetch, or records a failed one. The previous cache survives failures
    /// so the user can keep working from stale data.
    pub fn apply_fetch_result(&mut self, result: Result<Vec<JournalEntry>, StoreError>) {
        self.loading = false;
        self.fetch_rx = None;

        match result {
            Ok(entries) => {
                self.entry_dates = entries.iter().filter_map(|entry| entry.date).collect();
                self.entries = entries;
                self.clamp_selection();
                self.resolve_pending_view();
            }
            Err(err) => {
                tracing::error!(error = %err, "fetching journal entries failed");
                self.toast("Couldn't load your journal entries.");
            }
        }
    }

    fn resolve_pending_view(&mut self) {
        let Some(id) = self.pending_view_id.take() else {
            return;
        };
        match self.entries.iter().find(|entry| entry.id == id) {
            Some(entry) => self.view_entry = Some(entry.clone()),
            None => self.toast("Entry not found."),
        }
    }

    pub fn apply_auth_event(&mut self, event: AuthEvent) {
        match event {
            AuthEvent::SignedIn(user) => {
                tracing::debug!(uid = %user.uid, "auth state: signed in");
                self.user = Some(user);
            }
            AuthEvent::SignedOut => {
                tracing::debug!("auth state: signed out");
                self.user = None;
            }
        }
    }

    pub fn has_entry_for(&self, date: NaiveDate) -> bool {
        self.entry_dates.contains(&date)
    }

    pub fn insert_entry_date(&mut self, date: NaiveDate) {
        self.entry_dates.insert(date);
    }

    /// Removes a deleted entry from the cache. Its date leaves the date set
    /// only when no other cached entry still occupies it.
    pub fn remove_entry_from_cache(&mut self, id: &str) {
        let removed_date = self
            .entries
            .iter()
            .find(|entry| entry.id == id)
            .and_then(|entry| entry.date);
        self.entries.retain(|entry| entry.id != id);

        if let Some(date) = removed_date
            && !self.entries.iter().any(|entry| entry.date == Some(date))
        {
            self.entry_dates.remove(&date);
        }
        self.clamp_selection();
    }

    pub fn open_create_modal(&mut self, date: NaiveDate) {
        self.create_modal = Some(CreateModal::open(date));
    }

    pub fn close_create_modal(&mut self) {
        self.create_modal = None;
    }

    pub fn open_view_modal(&mut self, entry: JournalEntry) {
        self.view_entry = Some(entry);
        self.show_delete_confirm = false;
    }

    pub fn close_view_modal(&mut self) {
        self.view_entry = None;
        self.show_delete_confirm = false;
    }

    pub fn toast(&mut self, message: impl Into<String>) {
        self.toast_message = Some(message.into());
        self.toast_expiry = Some(Local::now() + Duration::seconds(3));
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryContent;
    use crate::store::MemoryStore;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    fn entry(id: &str, day: &str) -> JournalEntry {
        JournalEntry {
            id: id.to_string(),
            title: format!("Entry {id}"),
            content: EntryContent::Free("body".to_string()),
            date: Some(date(day)),
        }
    }

    fn make_app() -> App<'static> {
        App::new(
            Config::default(),
            Arc::new(MemoryStore::new()),
            ScreenParams::default(),
        )
    }

    #[test]
    fn fetch_success_replaces_cache_and_derives_dates() {
        let mut app = make_app();
        app.apply_fetch_result(Ok(vec![entry("e1", "2024-06-01"), entry("e2", "2024-06-02")]));

        assert_eq!(app.entries.len(), 2);
        assert!(app.has_entry_for(date("2024-06-01")));
        assert!(app.has_entry_for(date("2024-06-02")));
        assert!(!app.loading);
    }

    #[test]
    fn fetch_failure_keeps_previous_cache() {
        let mut app = make_app();
        app.apply_fetch_result(Ok(vec![entry("e1", "2024-06-01")]));
        app.loading = true;

        app.apply_fetch_result(Err(StoreError::Request("boom".to_string())));

        assert_eq!(app.entries.len(), 1);
        assert!(app.has_entry_for(date("2024-06-01")));
        assert!(!app.loading);
        assert!(app.toast_message.is_some());
    }

    #[test]
    fn removing_entry_drops_date_only_when_unshared() {
        let mut app = make_app();
        let mut twin = entry("e2", "2024-06-01");
        twin.title = "Twin".to_string();
        app.apply_fetch_result(Ok(vec![
            entry("e1", "2024-06-01"),
            twin,
            entry("e3", "2024-06-02"),
        ]));

        app.remove_entry_from_cache("e1");
        assert_eq!(app.entries.len(), 2);
        // Another cached entry still occupies 2024-06-01.
        assert!(app.has_entry_for(date("2024-06-01")));

        app.remove_entry_from_cache("e3");
        assert_eq!(app.entries.len(), 1);
        assert!(!app.has_entry_for(date("2024-06-02")));
    }

    #[test]
    fn create_modal_opens_at_chooser_with_steady_phase() {
        let modal = CreateModal::open(date("2024-06-01"));
        assert!(matches!(modal.view, CreateView::Chooser { selected: 0 }));
        assert!(!modal.is_fading());
    }

    #[test]
    fn transition_swaps_view_only_after_fade_out_expires() {
        let now = Local::now();
        let mut modal = CreateModal::open(date("2024-06-01"));
        modal.begin_transition(CreateView::FreeWrite(FreeDraft::new()), now);

        // Mid fade-out: still the chooser, still fading.
        modal.advance(now + Duration::milliseconds(100));
        assert!(matches!(modal.view, CreateView::Chooser { .. }));
        assert!(modal.is_fading());

        // Fade-out expired: view swapped, fade-in running.
        modal.advance(now + Duration::milliseconds(250));
        assert!(matches!(modal.view, CreateView::FreeWrite(_)));
        assert!(modal.is_fading());

        // Fade-in expired: steady.
        modal.advance(now + Duration::milliseconds(500));
        assert!(!modal.is_fading());
    }

    #[test]
    fn visible_entries_filters_by_title_when_searching() {
        let mut app = make_app();
        let mut walk = entry("e1", "2024-06-01");
        walk.title = "Morning walk".to_string();
        let mut tea = entry("e2", "2024-06-02");
        tea.title = "Tea notes".to_string();
        app.apply_fetch_result(Ok(vec![walk, tea]));

        app.search_query = Some("walk".to_string());
        let visible = app.visible_entries();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "e1");

        app.search_query = None;
        assert_eq!(app.visible_entries().len(), 2);
    }

    #[test]
    fn selection_clamps_to_visible_entries() {
        let mut app = make_app();
        app.apply_fetch_result(Ok(vec![entry("e1", "2024-06-01"), entry("e2", "2024-06-02")]));
        app.select_first();
        app.select_next();
        assert_eq!(app.list_state.selected(), Some(1));
        app.select_next();
        assert_eq!(app.list_state.selected(), Some(1));
        app.select_prev();
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn greeting_falls_back_without_user() {
        let mut app = make_app();
        assert_eq!(app.greeting_name(), "User");

        app.apply_auth_event(AuthEvent::SignedIn(AuthUser {
            uid: "u1".to_string(),
            display_name: Some("Ada Lovelace".to_string()),
        }));
        assert_eq!(app.greeting_name(), "Ada");

        app.apply_auth_event(AuthEvent::SignedOut);
        assert_eq!(app.greeting_name(), "User");
    }

    #[test]
    fn pending_view_request_opens_modal_once_fetch_lands() {
        let mut app = App::new(
            Config::default(),
            Arc::new(MemoryStore::new()),
            ScreenParams {
                view_entry_id: Some("e2".to_string()),
                selected_date: None,
            },
        );
        assert!(app.view_entry.is_none());

        app.apply_fetch_result(Ok(vec![entry("e1", "2024-06-01"), entry("e2", "2024-06-02")]));
        assert_eq!(app.view_entry.as_ref().map(|e| e.id.as_str()), Some("e2"));
        assert!(app.pending_view_id.is_none());
    }

    #[test]
    fn edit_modal_prefills_drafts_from_entry() {
        let source = entry("e1", "2024-06-01");
        let modal = EditModal::from_entry(&source);
        assert_eq!(modal.title, "Entry e1");
        match modal.body {
            EditBody::Free { text, .. } => assert_eq!(text.lines().join("\n"), "body"),
            EditBody::Prompts { .. } => panic!("expected free body"),
        }
    }
}
