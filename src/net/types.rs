//! Wire payloads for `POST /chat`.
//!
//! DESIGN
//! ======
//! The request carries only `siteId` and `message`. Replies are kept as raw
//! JSON because the backend makes no promise beyond an optional `response`
//! string; [`ChatReply`] extracts it without rejecting anything else.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::message::FALLBACK_REPLY_TEXT;

/// Body of one chat request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub site_id: String,
    pub message: String,
}

impl ChatRequest {
    #[must_use]
    pub fn new(site_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self { site_id: site_id.into(), message: message.into() }
    }
}

/// Decoded reply body, whatever its shape.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatReply(pub Value);

impl ChatReply {
    /// The `response` field when it is a non-empty string.
    #[must_use]
    pub fn response(&self) -> Option<&str> {
        self.0
            .get("response")
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
    }

    /// Text to show for this reply: `response`, or the fixed fallback.
    #[must_use]
    pub fn text_or_fallback(&self) -> String {
        self.response().unwrap_or(FALLBACK_REPLY_TEXT).to_owned()
    }
}

impl From<Value> for ChatReply {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
