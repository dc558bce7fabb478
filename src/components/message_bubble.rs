//! One chat message in the panel's list.

#[cfg(test)]
#[path = "message_bubble_test.rs"]
mod message_bubble_test;

use leptos::prelude::*;

use crate::state::message::Message;

pub const BOT_BUBBLE_BACKGROUND: &str = "#f0f0f0";

/// Inline style for a bubble: user messages right-aligned in the primary
/// color, bot messages left-aligned and neutral.
pub fn bubble_style(is_user: bool, primary_color: &str) -> String {
    if is_user {
        format!("align-self: flex-end; background-color: {primary_color}; color: white;")
    } else {
        format!("align-self: flex-start; background-color: {BOT_BUBBLE_BACKGROUND}; color: black;")
    }
}

#[component]
pub fn MessageBubble(message: Message, primary_color: String) -> impl IntoView {
    let is_user = message.is_user();
    let style = bubble_style(is_user, &primary_color);
    let sent_at = message.timestamp.as_str().to_owned();

    view! {
        <div
            class="chatbot__bubble"
            class:chatbot__bubble--user=is_user
            style=style
            title=sent_at
        >
            {message.text}
        </div>
    }
}
