//! Widget UI components.
//!
//! SYSTEM CONTEXT
//! ==============
//! `chat_widget` renders the toggle button and panel and owns the input
//! wiring; `message_bubble` and `typing_indicator` render list entries.

pub mod chat_widget;
pub mod message_bubble;
pub mod typing_indicator;
