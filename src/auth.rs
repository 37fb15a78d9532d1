//! Authentication state subscription. Identity lives in an external
//! provider; the screen only mirrors the current user for the greeting and
//! never enforces access control.

use crate::config::AuthConfig;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
    pub display_name: Option<String>,
}

impl AuthUser {
    /// First word of the display name, for the greeting banner.
    pub fn first_name(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .and_then(|name| name.split_whitespace().next())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(AuthUser),
    SignedOut,
}

#[derive(Deserialize)]
struct SessionResponse {
    user: Option<WireUser>,
}

#[derive(Deserialize)]
struct WireUser {
    uid: String,
    #[serde(rename = "displayName", default)]
    display_name: Option<String>,
}

/// Subscribes to auth-state transitions. A background thread polls the
/// identity endpoint and emits an event on every transition, starting with
/// the current state. Dropping the receiver ends the thread at its next
/// poll. Without a configured endpoint the subscription degenerates to a
/// single `SignedOut`.
pub fn spawn_auth_watch(config: AuthConfig) -> Receiver<AuthEvent> {
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            let _ = sender.send(AuthEvent::SignedOut);
            return;
        }

        let client = Client::new();
        let session_url = format!("{base_url}/session");
        let poll_interval = Duration::from_secs(config.poll_secs.max(1));
        let mut last_sent: Option<AuthEvent> = None;

        loop {
            match fetch_session(&client, &session_url, &config.token) {
                Ok(event) => {
                    if last_sent.as_ref() != Some(&event) {
                        if sender.send(event.clone()).is_err() {
                            return;
                        }
                        last_sent = Some(event);
                    }
                }
                Err(message) => {
                    tracing::warn!(error = %message, "auth state poll failed");
                    // Degrade to signed-out once; keep polling for recovery.
                    if last_sent.is_none() {
                        if sender.send(AuthEvent::SignedOut).is_err() {
                            return;
                        }
                        last_sent = Some(AuthEvent::SignedOut);
                    }
                }
            }

            thread::sleep(poll_interval);
        }
    });

    receiver
}

fn fetch_session(client: &Client, url: &str, token: &str) -> Result<AuthEvent, String> {
    let mut request = client.get(url);
    if !token.trim().is_empty() {
        request = request.bearer_auth(token.trim());
    }

    let response = request.send().map_err(|err| err.to_string())?;
    if !response.status().is_success() {
        return Err(format!("status {}", response.status()));
    }

    let session = response
        .json::<SessionResponse>()
        .map_err(|err| err.to_string())?;

    Ok(match session.user {
        Some(user) => AuthEvent::SignedIn(AuthUser {
            uid: user.uid,
            display_name: user.display_name,
        }),
        None => AuthEvent::SignedOut,
    })
}
