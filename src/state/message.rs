#[cfg(test)]
#[path = "message_test.rs"]
mod message_test;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub const WELCOME_MESSAGE_ID: &str = "1";
pub const WELCOME_TEXT: &str = "Hi! How can I help you today?";
pub const FALLBACK_REPLY_TEXT: &str = "I'm sorry, I couldn't process your request.";
pub const CONNECTION_ERROR_TEXT: &str = "Sorry, I'm having trouble connecting. Please try again later.";

/// Who authored a message.
///
/// Stored history is read without validation: anything other than `"user"`
/// is shown as a bot message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    #[default]
    Bot,
}

impl<'de> Deserialize<'de> for Sender {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(de)?;
        Ok(if raw.as_str() == Some("user") { Self::User } else { Self::Bot })
    }
}

/// Creation time as stored: an RFC 3339 string.
///
/// Rehydrated history keeps whatever was stored (`null` becomes empty); call
/// [`Timestamp::parse`] when a structured time is needed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        lenient_text(de).map(Self)
    }
}

/// Strings as-is, `null` as empty, any other JSON value as its source text.
fn lenient_text<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

impl Timestamp {
    /// Current UTC time.
    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime(OffsetDateTime::now_utc())
    }

    #[must_use]
    pub fn from_datetime(at: OffsetDateTime) -> Self {
        Self(at.format(&Rfc3339).unwrap_or_default())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the stored string, if it is valid RFC 3339.
    #[must_use]
    pub fn parse(&self) -> Option<OffsetDateTime> {
        match OffsetDateTime::parse(&self.0, &Rfc3339) {
            Ok(at) => Some(at),
            Err(_) => None,
        }
    }
}

/// One entry in the conversation log.
///
/// Missing or mistyped fields in stored records fall back to empty values
/// instead of rejecting the whole history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub text: String,
    #[serde(default)]
    pub sender: Sender,
    #[serde(default)]
    pub timestamp: Timestamp,
}

impl Message {
    /// New message with a fresh UUID and the current time.
    #[must_use]
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            sender,
            timestamp: Timestamp::now(),
        }
    }

    /// The greeting seeded into a session with no stored history.
    #[must_use]
    pub fn welcome() -> Self {
        Self {
            id: WELCOME_MESSAGE_ID.to_owned(),
            text: WELCOME_TEXT.to_owned(),
            sender: Sender::Bot,
            timestamp: Timestamp::now(),
        }
    }

    #[must_use]
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}
