#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use super::message::{Message, Sender};

/// Storage key holding the message log for `site_id`.
#[must_use]
pub fn storage_key(site_id: &str) -> String {
    format!("chat_{site_id}")
}

/// Where a session's initial message list came from.
#[derive(Debug)]
pub enum HistorySource {
    /// Decoded from storage and used verbatim.
    Stored,
    /// Nothing stored; the welcome message was seeded.
    Seeded,
    /// Something was stored but unreadable; the welcome message is shown
    /// but the stored value is left in place.
    Discarded,
}

impl HistorySource {
    /// Whether the hydrated list must be written back before first use.
    #[must_use]
    pub fn needs_persist(&self) -> bool {
        matches!(self, Self::Seeded)
    }
}

/// Request/response lifecycle of the widget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Idle,
    AwaitingReply,
}

/// Per-site widget state: the message log plus transient UI state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub messages: Vec<Message>,
    pub is_open: bool,
    pub input_value: String,
    pub is_loading: bool,
}

impl SessionState {
    /// Session restored from persisted history.
    #[must_use]
    pub fn restored(messages: Vec<Message>) -> Self {
        Self { messages, ..Self::default() }
    }

    /// Fresh session containing only the welcome message.
    #[must_use]
    pub fn seeded() -> Self {
        Self::restored(vec![Message::welcome()])
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.is_loading { SessionPhase::AwaitingReply } else { SessionPhase::Idle }
    }

    pub fn toggle_open(&mut self) {
        self.is_open = !self.is_open;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn set_input(&mut self, value: String) {
        self.input_value = value;
    }

    /// Whether the send control would start a request right now.
    #[must_use]
    pub fn can_send(&self) -> bool {
        !self.is_loading && !self.input_value.trim().is_empty()
    }

    /// `Idle -> AwaitingReply`: commit the draft as a user message.
    ///
    /// Returns the text to send, or `None` (state untouched) when the draft
    /// is blank or a reply is still pending. The draft is sent as typed; the
    /// trim only decides whether there is anything to send.
    pub fn begin_send(&mut self) -> Option<String> {
        if !self.can_send() {
            return None;
        }
        let text = std::mem::take(&mut self.input_value);
        self.messages.push(Message::new(text.clone(), Sender::User));
        self.is_loading = true;
        Some(text)
    }

    /// `AwaitingReply -> Idle`: append the bot's reply (or apology).
    pub fn finish_send(&mut self, reply: String) {
        self.messages.push(Message::new(reply, Sender::Bot));
        self.is_loading = false;
    }
}
