use crate::{
    app::{App, CreateView, EditBody, EditModal, FreeDraft, PromptDraft},
    models::{EntryContent, EntryKind, InputMode, PromptResponse},
    prompts, store,
};
use chrono::{Local, NaiveDate};

/// Client-side checks that run before any store call. Each variant doubles
/// as the user-facing toast text.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please provide a title for your journal entry.")]
    EmptyTitle,
    #[error("Please write something before saving.")]
    EmptyBody,
    #[error("Please provide at least one response to the prompts.")]
    NoResponses,
    #[error("A journal entry already exists for this date.")]
    DuplicateDate,
}

const SAVE_FAILED: &str = "An error occurred while saving the journal entry. Please try again.";

pub fn validate_free(title: &str, body: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if body.trim().is_empty() {
        return Err(ValidationError::EmptyBody);
    }
    Ok(())
}

pub fn validate_prompts(title: &str, responses: &[String]) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if !responses.iter().any(|response| !response.trim().is_empty()) {
        return Err(ValidationError::NoResponses);
    }
    Ok(())
}

/// Dispatches a full-collection fetch unless one is already in flight. The
/// runtime tick replaces the cache when the result arrives.
pub fn fetch_entries(app: &mut App) {
    if app.fetch_rx.is_some() {
        return;
    }
    app.loading = true;
    app.fetch_rx = Some(store::spawn_list_entries(app.store.clone()));
}

pub fn open_create_modal_for_today(app: &mut App) {
    app.open_create_modal(Local::now().date_naive());
}

pub fn choose_free_write(app: &mut App) {
    let now = Local::now();
    if let Some(modal) = app.create_modal.as_mut()
        && !modal.is_fading()
    {
        modal.begin_transition(CreateView::FreeWrite(FreeDraft::new()), now);
    }
}

/// Reshuffles the prompt pool on every entry into the prompts view.
pub fn choose_prompts(app: &mut App) {
    let now = Local::now();
    if let Some(modal) = app.create_modal.as_mut()
        && !modal.is_fading()
    {
        let draft = PromptDraft::new(prompts::draw_prompts());
        modal.begin_transition(CreateView::UsePrompts(draft), now);
    }
}

/// Saves a free-writing entry. Validation and the duplicate-date guard run
/// first; no store call is made when either rejects. On store failure the
/// modal stays open with the draft intact so the user can retry.
pub fn save_free_entry(app: &mut App) {
    let Some(modal) = app.create_modal.as_ref() else {
        return;
    };
    let CreateView::FreeWrite(draft) = &modal.view else {
        return;
    };

    let title = draft.title.trim().to_string();
    let body = draft.body_text().trim().to_string();
    let date = modal.date;

    if let Err(err) = validate_free(&title, &body) {
        app.toast(err.to_string());
        return;
    }
    if app.has_entry_for(date) {
        app.toast(ValidationError::DuplicateDate.to_string());
        return;
    }

    persist_new_entry(app, EntryContent::Free(body), title, date, EntryKind::Free);
}

/// Saves a prompt-based entry, keeping only pairs whose trimmed response is
/// non-empty.
pub fn save_prompt_entry(app: &mut App) {
    let Some(modal) = app.create_modal.as_ref() else {
        return;
    };
    let CreateView::UsePrompts(draft) = &modal.view else {
        return;
    };

    let title = draft.title.trim().to_string();
    let date = modal.date;

    if let Err(err) = validate_prompts(&title, &draft.responses) {
        app.toast(err.to_string());
        return;
    }
    if app.has_entry_for(date) {
        app.toast(ValidationError::DuplicateDate.to_string());
        return;
    }

    let pairs: Vec<PromptResponse> = draft
        .prompts
        .iter()
        .zip(draft.responses.iter())
        .filter(|(_, response)| !response.trim().is_empty())
        .map(|(prompt, response)| PromptResponse {
            prompt: prompt.to_string(),
            response: response.trim().to_string(),
        })
        .collect();

    persist_new_entry(
        app,
        EntryContent::Prompts(pairs),
        title,
        date,
        EntryKind::Prompts,
    );
}

fn persist_new_entry(
    app: &mut App,
    content: EntryContent,
    title: String,
    date: NaiveDate,
    kind: EntryKind,
) {
    match app.store.create_entry(content, &title, date, kind) {
        Ok(_) => {
            app.insert_entry_date(date);
            fetch_entries(app);
            app.close_create_modal();
            app.input_mode = InputMode::Navigate;
            app.toast("Entry saved.");
        }
        Err(err) => {
            tracing::error!(error = %err, date = %date, "saving journal entry failed");
            app.toast(SAVE_FAILED);
        }
    }
}

pub fn open_view_for_selected(app: &mut App) {
    if let Some(entry) = app.selected_entry() {
        app.open_view_modal(entry);
    }
}

/// Hands the viewed entry to the edit flow and closes the view modal.
pub fn open_edit_from_view(app: &mut App) {
    let Some(entry) = app.view_entry.clone() else {
        return;
    };
    app.edit_modal = Some(EditModal::from_entry(&entry));
    app.close_view_modal();
}

pub fn request_delete(app: &mut App) {
    if app.view_entry.is_some() {
        app.show_delete_confirm = true;
    }
}

/// Runs after the explicit confirm step. On success the entry leaves the
/// cache (and its date leaves the date set when unshared); on failure the
/// view modal stays open.
pub fn confirm_delete(app: &mut App) {
    let Some(entry) = app.view_entry.clone() else {
        return;
    };

    match app.store.delete_entry(&entry.id) {
        Ok(()) => {
            app.remove_entry_from_cache(&entry.id);
            app.close_view_modal();
            app.toast("Journal entry deleted.");
        }
        Err(err) => {
            tracing::error!(error = %err, id = %entry.id, "deleting journal entry failed");
            app.show_delete_confirm = false;
            app.toast("Couldn't delete the entry. Please try again.");
        }
    }
}

pub fn save_edited_entry(app: &mut App) {
    let Some(modal) = app.edit_modal.as_ref() else {
        return;
    };

    let title = modal.title.trim().to_string();
    let content = match &modal.body {
        EditBody::Free { text, .. } => {
            let body = text.lines().join("\n").trim().to_string();
            if let Err(err) = validate_free(&title, &body) {
                app.toast(err.to_string());
                return;
            }
            EntryContent::Free(body)
        }
        EditBody::Prompts {
            prompts, responses, ..
        } => {
            if let Err(err) = validate_prompts(&title, responses) {
                app.toast(err.to_string());
                return;
            }
            let pairs: Vec<PromptResponse> = prompts
                .iter()
                .zip(responses.iter())
                .filter(|(_, response)| !response.trim().is_empty())
                .map(|(prompt, response)| PromptResponse {
                    prompt: prompt.clone(),
                    response: response.trim().to_string(),
                })
                .collect();
            EntryContent::Prompts(pairs)
        }
    };

    let patch = store::EntryPatch {
        title: Some(title),
        content: Some(content),
    };
    let id = modal.id.clone();

    match app.store.update_entry(&id, patch) {
        Ok(_) => {
            app.edit_modal = None;
            fetch_entries(app);
            app.toast("Entry updated.");
        }
        Err(err) => {
            tracing::error!(error = %err, id = %id, "updating journal entry failed");
            app.toast(SAVE_FAILED);
        }
    }
}

pub fn submit_search(app: &mut App) {
    let query = app.search_input();
    app.search_query = if query.is_empty() { None } else { Some(query) };
    app.select_first();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{DraftField, PromptField, ScreenParams};
    use crate::config::Config;
    use crate::models::JournalEntry;
    use crate::store::{JournalStore, MemoryStore};
    use std::sync::Arc;
    use std::sync::atomic::Ordering;
    use tui_textarea::TextArea;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    fn app_with_store(store: Arc<MemoryStore>) -> App<'static> {
        App::new(Config::default(), store, ScreenParams::default())
    }

    fn arm_free_draft(app: &mut App, day: &str, title: &str, body: &str) {
        app.open_create_modal(date(day));
        let draft = FreeDraft {
            title: title.to_string(),
            body: TextArea::from(vec![body.to_string()]),
            focus: DraftField::Body,
        };
        app.create_modal.as_mut().unwrap().view = CreateView::FreeWrite(draft);
    }

    fn arm_prompt_draft(app: &mut App, day: &str, title: &str, responses: Vec<&str>) {
        app.open_create_modal(date(day));
        let prompts: Vec<&'static str> = vec!["p1", "p2", "p3", "p4", "p5"];
        let mut draft = PromptDraft::new(prompts);
        draft.title = title.to_string();
        draft.responses = responses.into_iter().map(|r| r.to_string()).collect();
        draft.focus = PromptField::Title;
        app.create_modal.as_mut().unwrap().view = CreateView::UsePrompts(draft);
    }

    fn drain_fetch(app: &mut App) {
        let rx = app.fetch_rx.take().expect("fetch dispatched");
        app.loading = false;
        let result = rx.recv().expect("fetch result");
        app.apply_fetch_result(result);
    }

    #[test]
    fn duplicate_date_is_rejected_without_store_call() {
        let store = Arc::new(MemoryStore::new());
        let mut app = app_with_store(store.clone());
        app.insert_entry_date(date("2024-06-01"));

        arm_free_draft(&mut app, "2024-06-01", "Today", "Hello");
        save_free_entry(&mut app);

        assert_eq!(store.create_calls.load(Ordering::SeqCst), 0);
        assert!(app.create_modal.is_some());
        assert_eq!(
            app.toast_message.as_deref(),
            Some("A journal entry already exists for this date.")
        );
    }

    #[test]
    fn free_save_calls_store_once_and_records_date() {
        let store = Arc::new(MemoryStore::new());
        let mut app = app_with_store(store.clone());

        arm_free_draft(&mut app, "2024-06-01", "Today", "Hello");
        save_free_entry(&mut app);

        assert_eq!(store.create_calls.load(Ordering::SeqCst), 1);
        assert!(app.has_entry_for(date("2024-06-01")));
        assert!(app.create_modal.is_none());

        // The store received exactly ("Hello", "Today", 2024-06-01, free).
        let stored = store.list_entries().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].title, "Today");
        assert_eq!(stored[0].content, EntryContent::Free("Hello".to_string()));
        assert_eq!(stored[0].date, Some(date("2024-06-01")));

        // End to end: the dispatched re-fetch lands in the cache.
        drain_fetch(&mut app);
        assert_eq!(app.entries.len(), 1);
        assert!(app.has_entry_for(date("2024-06-01")));
    }

    #[test]
    fn empty_title_and_body_abort_before_the_store() {
        let store = Arc::new(MemoryStore::new());
        let mut app = app_with_store(store.clone());

        arm_free_draft(&mut app, "2024-06-01", "   ", "Hello");
        save_free_entry(&mut app);
        assert_eq!(
            app.toast_message.as_deref(),
            Some("Please provide a title for your journal entry.")
        );

        arm_free_draft(&mut app, "2024-06-01", "Today", "   ");
        save_free_entry(&mut app);
        assert_eq!(
            app.toast_message.as_deref(),
            Some("Please write something before saving.")
        );

        assert_eq!(store.create_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn prompt_save_requires_at_least_one_response() {
        let store = Arc::new(MemoryStore::new());
        let mut app = app_with_store(store.clone());

        arm_prompt_draft(&mut app, "2024-06-02", "Guided", vec!["", "  ", "", "", ""]);
        save_prompt_entry(&mut app);

        assert_eq!(store.create_calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            app.toast_message.as_deref(),
            Some("Please provide at least one response to the prompts.")
        );
    }

    #[test]
    fn prompt_save_drops_pairs_with_empty_responses() {
        let store = Arc::new(MemoryStore::new());
        let mut app = app_with_store(store.clone());

        arm_prompt_draft(
            &mut app,
            "2024-06-02",
            "Guided",
            vec!["Coffee", "", " walked ", "", ""],
        );
        save_prompt_entry(&mut app);

        assert_eq!(store.create_calls.load(Ordering::SeqCst), 1);
        let stored = store.list_entries().unwrap();
        match &stored[0].content {
            EntryContent::Prompts(pairs) => {
                assert_eq!(pairs.len(), 2);
                assert_eq!(pairs[0].prompt, "p1");
                assert_eq!(pairs[0].response, "Coffee");
                assert_eq!(pairs[1].prompt, "p3");
                assert_eq!(pairs[1].response, "walked");
            }
            other => panic!("expected prompts content, got {other:?}"),
        }
    }

    #[test]
    fn store_failure_keeps_modal_and_draft_for_retry() {
        let store = Arc::new(MemoryStore::new());
        store.fail_writes.store(true, Ordering::SeqCst);
        let mut app = app_with_store(store.clone());

        arm_free_draft(&mut app, "2024-06-01", "Today", "Hello");
        save_free_entry(&mut app);

        assert!(app.create_modal.is_some());
        assert!(!app.has_entry_for(date("2024-06-01")));
        assert_eq!(app.toast_message.as_deref(), Some(SAVE_FAILED));

        let modal = app.create_modal.as_ref().unwrap();
        match &modal.view {
            CreateView::FreeWrite(draft) => {
                assert_eq!(draft.title, "Today");
                assert_eq!(draft.body_text(), "Hello");
            }
            _ => panic!("draft should survive a failed save"),
        }
    }

    #[test]
    fn confirmed_delete_reconciles_cache_and_closes_modal() {
        let store = Arc::new(MemoryStore::new());
        let mut app = app_with_store(store.clone());
        let seeded = store
            .create_entry(
                EntryContent::Free("x".to_string()),
                "Seed",
                date("2024-06-01"),
                EntryKind::Free,
            )
            .unwrap();
        app.apply_fetch_result(Ok(vec![seeded.clone()]));

        app.open_view_modal(seeded);
        request_delete(&mut app);
        assert!(app.show_delete_confirm);
        confirm_delete(&mut app);

        assert_eq!(store.delete_calls.load(Ordering::SeqCst), 1);
        assert!(app.entries.is_empty());
        assert!(!app.has_entry_for(date("2024-06-01")));
        assert!(app.view_entry.is_none());
    }

    #[test]
    fn failed_delete_leaves_the_view_modal_open() {
        let store = Arc::new(MemoryStore::new());
        let mut app = app_with_store(store.clone());
        let entry = JournalEntry {
            id: "e1".to_string(),
            title: "t".to_string(),
            content: EntryContent::Free("x".to_string()),
            date: Some(date("2024-06-01")),
        };
        app.apply_fetch_result(Ok(vec![entry.clone()]));
        store.fail_writes.store(true, Ordering::SeqCst);

        app.open_view_modal(entry);
        request_delete(&mut app);
        confirm_delete(&mut app);

        assert!(app.view_entry.is_some());
        assert_eq!(app.entries.len(), 1);
        assert!(app.toast_message.is_some());
    }

    #[test]
    fn edited_entry_is_patched_and_refetched() {
        let store = Arc::new(MemoryStore::new());
        let mut app = app_with_store(store.clone());
        let seeded = store
            .create_entry(
                EntryContent::Free("old body".to_string()),
                "Old title",
                date("2024-06-01"),
                EntryKind::Free,
            )
            .unwrap();
        app.apply_fetch_result(Ok(vec![seeded.clone()]));

        app.open_view_modal(seeded);
        open_edit_from_view(&mut app);
        assert!(app.view_entry.is_none());

        let modal = app.edit_modal.as_mut().unwrap();
        modal.title = "New title".to_string();
        save_edited_entry(&mut app);

        assert_eq!(store.update_calls.load(Ordering::SeqCst), 1);
        assert!(app.edit_modal.is_none());
        drain_fetch(&mut app);
        assert_eq!(app.entries[0].title, "New title");
    }

    #[test]
    fn choosing_prompts_arms_a_five_slot_draft() {
        let store = Arc::new(MemoryStore::new());
        let mut app = app_with_store(store);
        app.open_create_modal(date("2024-06-01"));

        choose_prompts(&mut app);
        let modal = app.create_modal.as_ref().unwrap();
        assert!(modal.is_fading());
        match &modal.phase {
            crate::app::ModalPhase::FadeOut { next, .. } => match next.as_ref() {
                CreateView::UsePrompts(draft) => {
                    assert_eq!(draft.prompts.len(), prompts::PROMPTS_PER_ENTRY);
                    assert_eq!(draft.responses.len(), prompts::PROMPTS_PER_ENTRY);
                }
                _ => panic!("expected prompts view queued"),
            },
            _ => panic!("expected fade-out phase"),
        }
    }

    #[test]
    fn validation_error_messages_are_user_facing() {
        assert_eq!(
            ValidationError::DuplicateDate.to_string(),
            "A journal entry already exists for this date."
        );
        assert_eq!(
            validate_free("  ", "body"),
            Err(ValidationError::EmptyTitle)
        );
        assert_eq!(
            validate_prompts("t", &["".to_string()]),
            Err(ValidationError::NoResponses)
        );
    }
}
