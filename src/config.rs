//! Widget configuration supplied by the host page and the build environment.
//!
//! SYSTEM CONTEXT
//! ==============
//! The host page passes a `ChatbotConfig` object to `initChatbot`; the loader
//! stores it on the container element and the widget reads it back on mount.
//! The backend origin is fixed at build time through `CHATBOT_API_URL`.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::util::color::normalize_css_color;

pub const DEFAULT_SITE_ID: &str = "themarketinglads";
pub const DEFAULT_PRIMARY_COLOR: &str = "#4a69bd";
pub const DEFAULT_TITLE: &str = "Chat with us";
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Errors raised while reading a host-supplied configuration object.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config payload was not valid JSON or had the wrong shape.
    #[error("invalid chatbot config: {0}")]
    Parse(#[from] serde_json::Error),

    /// `siteId` was missing or blank.
    #[error("chatbot config requires a non-empty siteId")]
    MissingSiteId,
}

/// Screen corner the widget is anchored to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl Position {
    /// CSS property for the vertical offset (`bottom` or `top`).
    #[must_use]
    pub fn vertical_anchor(self) -> &'static str {
        match self {
            Self::BottomRight | Self::BottomLeft => "bottom",
            Self::TopRight | Self::TopLeft => "top",
        }
    }

    /// CSS property for the horizontal offset (`right` or `left`).
    #[must_use]
    pub fn horizontal_anchor(self) -> &'static str {
        match self {
            Self::BottomRight | Self::TopRight => "right",
            Self::BottomLeft | Self::TopLeft => "left",
        }
    }

    /// Inline style pinning an element 20px from this corner.
    #[must_use]
    pub fn corner_style(self) -> String {
        format!("{}: 20px; {}: 20px;", self.vertical_anchor(), self.horizontal_anchor())
    }
}

/// Page-wide widget configuration. Immutable once the widget is mounted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatbotConfig {
    pub site_id: String,
    pub position: Position,
    pub primary_color: String,
    pub title: String,
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self {
            site_id: DEFAULT_SITE_ID.to_owned(),
            position: Position::BottomRight,
            primary_color: DEFAULT_PRIMARY_COLOR.to_owned(),
            title: DEFAULT_TITLE.to_owned(),
        }
    }
}

/// Host-facing shape: everything but `siteId` is optional, and optional
/// fields are read loosely so one bad value cannot stop the widget.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    #[serde(default)]
    site_id: Option<String>,
    #[serde(default)]
    position: Option<Value>,
    #[serde(default)]
    primary_color: Option<Value>,
    #[serde(default)]
    title: Option<Value>,
}

impl ChatbotConfig {
    /// Parse a host-supplied config object.
    ///
    /// Blank, missing or unusable `position`, `primaryColor` and `title`
    /// values fall back to their defaults; unusable ones are logged.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or a non-string
    /// `siteId`, and [`ConfigError::MissingSiteId`] when `siteId` is blank.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(raw)?;

        let site_id = non_blank(raw.site_id).ok_or(ConfigError::MissingSiteId)?;
        let position = lenient_position(raw.position);
        let primary_color = non_blank(text_field("primaryColor", raw.primary_color))
            .map_or_else(|| DEFAULT_PRIMARY_COLOR.to_owned(), |c| normalize_css_color(&c));
        let title = non_blank(text_field("title", raw.title)).unwrap_or_else(|| DEFAULT_TITLE.to_owned());

        Ok(Self { site_id, position, primary_color, title })
    }

    /// Serialize for storage on the container's data attribute.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }
}

fn lenient_position(value: Option<Value>) -> Position {
    match value {
        None | Some(Value::Null) => Position::default(),
        Some(value) => match serde_json::from_value(value.clone()) {
            Ok(position) => position,
            Err(_) => {
                leptos::logging::warn!("unknown chatbot position {value}; using bottom-right");
                Position::default()
            }
        },
    }
}

fn text_field(name: &str, value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => {
            leptos::logging::warn!("chatbot {name} must be a string, got {other}; using default");
            None
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Backend connection settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    /// Read `CHATBOT_API_URL` as captured at compile time.
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::from_value(option_env!("CHATBOT_API_URL"))
    }

    /// Build from an optional origin, falling back to [`DEFAULT_API_URL`].
    #[must_use]
    pub fn from_value(raw: Option<&str>) -> Self {
        let base_url = raw
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_owned();
        Self { base_url }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_value(None)
    }
}
