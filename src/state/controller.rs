//! Drives a session through hydration, persistence, and send cycles.
//!
//! DESIGN
//! ======
//! The controller owns the two seams (backend and storage) and mutates
//! session state through [`SessionHandle`], so the same code runs against a
//! Leptos signal in the browser and a `RefCell` in native tests. The message
//! log is written back as a full snapshot after every change to it.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::cell::RefCell;

use leptos::prelude::{RwSignal, Update};

use super::message::{CONNECTION_ERROR_TEXT, Message};
use super::session::{HistorySource, SessionState, storage_key};
use crate::net::api::ChatBackend;
use crate::net::types::{ChatReply, ChatRequest};
use crate::util::storage::{KeyValueStore, StorageError, load_json, save_json};

/// Mutable access to a live session.
pub trait SessionHandle {
    /// Run `f` against the session; `None` if the session is gone.
    fn update_session<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> Option<R>;
}

impl SessionHandle for RefCell<SessionState> {
    fn update_session<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }
}

impl SessionHandle for RwSignal<SessionState> {
    fn update_session<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> Option<R> {
        self.try_update(f)
    }
}

/// How a call to [`SessionController::send`] ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank draft or a reply already pending; nothing happened.
    Ignored,
    /// The backend answered and its reply was appended.
    Replied,
    /// The exchange failed and the apology message was appended.
    Failed,
}

/// Session orchestration for one `siteId`.
pub struct SessionController<B, S> {
    site_id: String,
    backend: B,
    store: S,
}

impl<B: ChatBackend, S: KeyValueStore> SessionController<B, S> {
    pub fn new(site_id: impl Into<String>, backend: B, store: S) -> Self {
        Self { site_id: site_id.into(), backend, store }
    }

    #[must_use]
    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    #[must_use]
    pub fn storage_key(&self) -> String {
        storage_key(&self.site_id)
    }

    /// Build the initial session from storage, seeding the welcome message
    /// when there is no usable history.
    ///
    /// Only a seeded session is written back at mount; an unreadable stored
    /// value stays in storage until the next send replaces it.
    pub fn mount(&self) -> SessionState {
        let (state, source) = match self.load_history() {
            Ok(Some(messages)) => (SessionState::restored(messages), HistorySource::Stored),
            Ok(None) => (SessionState::seeded(), HistorySource::Seeded),
            Err(e) => {
                leptos::logging::warn!("chat history for {} discarded: {e}", self.site_id);
                (SessionState::seeded(), HistorySource::Discarded)
            }
        };
        if source.needs_persist() {
            self.persist(&state.messages);
        }
        state
    }

    /// Read the stored message log without touching session state.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when storage is unreadable or the stored
    /// value is not a message list.
    pub fn load_history(&self) -> Result<Option<Vec<Message>>, StorageError> {
        load_json(&self.store, &self.storage_key())
    }

    /// Overwrite the stored log with `messages`. Failures are logged only.
    pub fn persist(&self, messages: &[Message]) {
        if let Err(e) = save_json(&self.store, &self.storage_key(), messages) {
            leptos::logging::warn!("chat history not saved: {e}");
        }
    }

    /// Run one `Idle -> AwaitingReply -> Idle` cycle for the current draft.
    ///
    /// The guard lives in [`SessionState::begin_send`], so a call made while
    /// another is awaiting its reply returns [`SendOutcome::Ignored`] without
    /// touching state. Backend errors never escape: they are logged and
    /// replaced by the fixed apology message.
    pub async fn send<H: SessionHandle>(&self, session: &H) -> SendOutcome {
        let request = session
            .update_session(|s| {
                let text = s.begin_send()?;
                self.persist(&s.messages);
                Some(ChatRequest::new(self.site_id.clone(), text))
            })
            .flatten();
        let Some(request) = request else {
            return SendOutcome::Ignored;
        };

        let (reply, outcome) = match self.backend.send_message(&request).await {
            Ok(payload) => (ChatReply::from(payload).text_or_fallback(), SendOutcome::Replied),
            Err(e) => {
                leptos::logging::error!("chat send failed for {}: {e}", self.site_id);
                (CONNECTION_ERROR_TEXT.to_owned(), SendOutcome::Failed)
            }
        };

        session.update_session(|s| {
            s.finish_send(reply);
            self.persist(&s.messages);
        });
        outcome
    }
}
