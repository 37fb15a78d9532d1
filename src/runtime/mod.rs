//! Per-frame housekeeping between input polls: drains the background
//! channels, advances modal fade phases, expires toasts, and tracks day
//! rollover.

use crate::app::App;
use chrono::Local;
use std::sync::mpsc::TryRecvError;

pub fn tick(app: &mut App) {
    drain_fetch(app);
    drain_auth(app);

    let now = Local::now();

    if let Some(modal) = app.create_modal.as_mut() {
        modal.advance(now);
    }

    if let Some(expiry) = app.toast_expiry
        && now >= expiry
    {
        app.toast_message = None;
        app.toast_expiry = None;
    }

    // Past midnight the duplicate-date guard and the header date both follow
    // the new day.
    let today = now.date_naive();
    if app.active_date != today {
        app.active_date = today;
    }
}

fn drain_fetch(app: &mut App) {
    let Some(rx) = app.fetch_rx.take() else {
        return;
    };
    match rx.try_recv() {
        Ok(result) => app.apply_fetch_result(result),
        Err(TryRecvError::Empty) => app.fetch_rx = Some(rx),
        Err(TryRecvError::Disconnected) => {
            tracing::warn!("entry fetch worker disconnected before sending");
            app.loading = false;
        }
    }
}

fn drain_auth(app: &mut App) {
    let Some(rx) = app.auth_rx.take() else {
        return;
    };
    loop {
        match rx.try_recv() {
            Ok(event) => app.apply_auth_event(event),
            Err(TryRecvError::Empty) => {
                app.auth_rx = Some(rx);
                return;
            }
            Err(TryRecvError::Disconnected) => return,
        }
    }
}
