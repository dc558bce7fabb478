use std::cell::RefCell;

use futures::channel::oneshot;
use futures::executor::block_on;
use serde_json::Value;

use super::*;
use crate::net::api::ApiError;
use crate::state::message::{FALLBACK_REPLY_TEXT, Sender, WELCOME_TEXT};
use crate::state::session::SessionPhase;
use crate::util::storage::MemoryStorage;

/// Backend answering every request with a fixed result.
struct ScriptedBackend {
    reply: fn() -> Result<Value, ApiError>,
    requests: RefCell<Vec<ChatRequest>>,
}

impl ScriptedBackend {
    fn new(reply: fn() -> Result<Value, ApiError>) -> Self {
        Self { reply, requests: RefCell::new(Vec::new()) }
    }
}

#[async_trait::async_trait(?Send)]
impl ChatBackend for ScriptedBackend {
    async fn send_message(&self, request: &ChatRequest) -> Result<Value, ApiError> {
        self.requests.borrow_mut().push(request.clone());
        (self.reply)()
    }
}

/// Backend whose single reply is released by the test.
struct GatedBackend {
    gate: RefCell<Option<oneshot::Receiver<Value>>>,
}

#[async_trait::async_trait(?Send)]
impl ChatBackend for GatedBackend {
    async fn send_message(&self, _request: &ChatRequest) -> Result<Value, ApiError> {
        let rx = self.gate.borrow_mut().take().ok_or_else(|| ApiError::Request("gate already used".to_owned()))?;
        rx.await.map_err(|e| ApiError::Request(e.to_string()))
    }
}

fn hi_there() -> Result<Value, ApiError> {
    Ok(serde_json::json!({ "response": "hi there" }))
}

fn offline() -> Result<Value, ApiError> {
    Err(ApiError::Request("network down".to_owned()))
}

fn stored_messages(store: &MemoryStorage, key: &str) -> Vec<Message> {
    let raw = store.get_item(key).unwrap().expect("history stored");
    serde_json::from_str(&raw).unwrap()
}

fn draft(session: &RefCell<SessionState>, text: &str) {
    session.borrow_mut().set_input(text.to_owned());
}

// =============================================================
// Hydration
// =============================================================

#[test]
fn mount_without_history_seeds_and_persists_welcome() {
    let store = MemoryStorage::new();
    let controller = SessionController::new("acme", ScriptedBackend::new(hi_there), &store);

    let state = controller.mount();

    assert_eq!(state.messages.len(), 1);
    assert_eq!(state.messages[0].sender, Sender::Bot);
    assert_eq!(state.messages[0].text, WELCOME_TEXT);
    assert_eq!(stored_messages(&store, "chat_acme"), state.messages);
}

#[test]
fn mount_restores_existing_history_without_welcome() {
    let store = MemoryStorage::new();
    store
        .set_item(
            "chat_acme",
            r#"[{"id":"42","text":"earlier","sender":"user","timestamp":"2024-01-01T00:00:00.000Z"}]"#,
        )
        .unwrap();
    let controller = SessionController::new("acme", ScriptedBackend::new(hi_there), &store);

    let state = controller.mount();

    assert_eq!(state.messages.len(), 1);
    assert_eq!(state.messages[0].id, "42");
    assert_eq!(state.messages[0].timestamp.as_str(), "2024-01-01T00:00:00.000Z");
}

#[test]
fn mount_keeps_stored_empty_history_empty() {
    let store = MemoryStorage::new();
    store.set_item("chat_acme", "[]").unwrap();
    let controller = SessionController::new("acme", ScriptedBackend::new(hi_there), &store);

    assert!(controller.mount().messages.is_empty());
    assert_eq!(store.get_item("chat_acme").unwrap().as_deref(), Some("[]"));
}

#[test]
fn mount_shows_welcome_but_keeps_corrupt_history_stored() {
    let store = MemoryStorage::new();
    store.set_item("chat_acme", "{definitely not a list").unwrap();
    let controller = SessionController::new("acme", ScriptedBackend::new(hi_there), &store);

    let state = controller.mount();

    assert_eq!(state.messages.len(), 1);
    assert_eq!(state.messages[0].text, WELCOME_TEXT);
    assert_eq!(store.get_item("chat_acme").unwrap().as_deref(), Some("{definitely not a list"));
}

#[test]
fn mount_keeps_records_with_null_timestamps() {
    let stored = r##"[{"id":"1","text":"Hi! How can I help you today?","sender":"bot","timestamp":"2024-01-01T00:00:00.000Z"},{"id":"2","text":"my order #991","sender":"user","timestamp":null}]"##;
    let store = MemoryStorage::new();
    store.set_item("chat_acme", stored).unwrap();
    let controller = SessionController::new("acme", ScriptedBackend::new(hi_there), &store);

    let state = controller.mount();

    let texts: Vec<&str> = state.messages.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, [WELCOME_TEXT, "my order #991"]);
    assert_eq!(state.messages[1].sender, Sender::User);
    assert_eq!(store.get_item("chat_acme").unwrap().as_deref(), Some(stored));
}

#[test]
fn sessions_are_scoped_by_site_id() {
    let store = MemoryStorage::new();
    let acme = SessionController::new("acme", ScriptedBackend::new(hi_there), &store);
    let session = RefCell::new(acme.mount());
    draft(&session, "hello");
    block_on(acme.send(&session));

    let other = SessionController::new("globex", ScriptedBackend::new(hi_there), &store);
    assert_eq!(other.mount().messages.len(), 1);
    assert_eq!(stored_messages(&store, "chat_acme").len(), 3);
}

// =============================================================
// Send
// =============================================================

#[test]
fn fresh_session_scenario_persists_three_messages() {
    let store = MemoryStorage::new();
    let controller = SessionController::new("acme", ScriptedBackend::new(hi_there), &store);
    let session = RefCell::new(controller.mount());

    draft(&session, "hello");
    let outcome = block_on(controller.send(&session));

    assert_eq!(outcome, SendOutcome::Replied);
    let state = session.borrow();
    let texts: Vec<(&str, Sender)> = state.messages.iter().map(|m| (m.text.as_str(), m.sender)).collect();
    assert_eq!(texts, vec![(WELCOME_TEXT, Sender::Bot), ("hello", Sender::User), ("hi there", Sender::Bot)]);
    assert!(!state.is_loading);
    assert_eq!(stored_messages(&store, "chat_acme"), state.messages);
}

#[test]
fn send_posts_site_id_and_message() {
    let store = MemoryStorage::new();
    let backend = ScriptedBackend::new(hi_there);
    let controller = SessionController::new("acme", &backend, &store);
    let session = RefCell::new(controller.mount());

    draft(&session, "where is my order?");
    block_on(controller.send(&session));

    assert_eq!(backend.requests.borrow().as_slice(), &[ChatRequest::new("acme", "where is my order?")]);
}

#[test]
fn blank_draft_is_ignored_without_request() {
    let store = MemoryStorage::new();
    let backend = ScriptedBackend::new(hi_there);
    let controller = SessionController::new("acme", &backend, &store);
    let session = RefCell::new(controller.mount());

    draft(&session, "   ");
    let outcome = block_on(controller.send(&session));

    assert_eq!(outcome, SendOutcome::Ignored);
    assert_eq!(session.borrow().messages.len(), 1);
    assert!(!session.borrow().is_loading);
    assert!(backend.requests.borrow().is_empty());
}

#[test]
fn transport_failure_appends_single_apology() {
    let store = MemoryStorage::new();
    let controller = SessionController::new("acme", ScriptedBackend::new(offline), &store);
    let session = RefCell::new(controller.mount());

    draft(&session, "hello");
    let outcome = block_on(controller.send(&session));

    assert_eq!(outcome, SendOutcome::Failed);
    let state = session.borrow();
    assert_eq!(state.messages.len(), 3);
    let apologies = state.messages.iter().filter(|m| m.text == CONNECTION_ERROR_TEXT).count();
    assert_eq!(apologies, 1);
    assert_eq!(state.messages[2].sender, Sender::Bot);
    assert!(!state.is_loading);
    assert_eq!(stored_messages(&store, "chat_acme"), state.messages);
}

#[test]
fn reply_without_response_field_uses_fallback_text() {
    let store = MemoryStorage::new();
    let controller = SessionController::new("acme", ScriptedBackend::new(|| Ok(serde_json::json!({}))), &store);
    let session = RefCell::new(controller.mount());

    draft(&session, "hello");
    assert_eq!(block_on(controller.send(&session)), SendOutcome::Replied);
    assert_eq!(session.borrow().messages[2].text, FALLBACK_REPLY_TEXT);
}

#[test]
fn second_send_while_awaiting_reply_is_a_noop() {
    let store = MemoryStorage::new();
    let (tx, rx) = oneshot::channel();
    let controller = SessionController::new("acme", GatedBackend { gate: RefCell::new(Some(rx)) }, &store);
    let session = RefCell::new(controller.mount());
    draft(&session, "first");

    let first = controller.send(&session);
    let second = async {
        assert_eq!(session.borrow().phase(), SessionPhase::AwaitingReply);
        draft(&session, "second");
        let outcome = controller.send(&session).await;
        assert_eq!(session.borrow().messages.len(), 2);
        assert!(tx.send(serde_json::json!({ "response": "done" })).is_ok());
        outcome
    };

    let (first, second) = block_on(async { futures::join!(first, second) });

    assert_eq!(first, SendOutcome::Replied);
    assert_eq!(second, SendOutcome::Ignored);
    let state = session.borrow();
    assert_eq!(state.messages.len(), 3);
    assert_eq!(state.messages[2].text, "done");
    assert_eq!(state.input_value, "second");
    assert_eq!(state.phase(), SessionPhase::Idle);
}

#[test]
fn user_message_is_persisted_before_reply_arrives() {
    let store = MemoryStorage::new();
    let (tx, rx) = oneshot::channel();
    let controller = SessionController::new("acme", GatedBackend { gate: RefCell::new(Some(rx)) }, &store);
    let session = RefCell::new(controller.mount());
    draft(&session, "hello");

    let send = controller.send(&session);
    let check = async {
        let stored = stored_messages(&store, "chat_acme");
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].text, "hello");
        assert!(tx.send(serde_json::json!({ "response": "ok" })).is_ok());
    };
    block_on(async { futures::join!(send, check) });

    assert_eq!(stored_messages(&store, "chat_acme").len(), 3);
}

#[test]
fn history_round_trips_through_a_fresh_mount() {
    let store = MemoryStorage::new();
    let controller = SessionController::new("acme", ScriptedBackend::new(hi_there), &store);
    let session = RefCell::new(controller.mount());
    for text in ["one", "two", "three"] {
        draft(&session, text);
        block_on(controller.send(&session));
    }

    let remounted = SessionController::new("acme", ScriptedBackend::new(hi_there), &store).mount();

    assert_eq!(remounted.messages, session.borrow().messages);
    assert_eq!(remounted.messages.len(), 7);
    assert!(!remounted.is_open);
}
