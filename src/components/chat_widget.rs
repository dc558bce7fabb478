//! Floating chat button plus the message panel it toggles.
//!
//! SYSTEM CONTEXT
//! ==============
//! Reads and writes the session signal directly for panel visibility and the
//! draft. Sending is delegated to `on_send`, which runs the controller's
//! request cycle; this component only re-renders what the cycle changes.

#[cfg(test)]
#[path = "chat_widget_test.rs"]
mod chat_widget_test;

use leptos::callback::Callable;
use leptos::prelude::*;

use crate::components::message_bubble::MessageBubble;
use crate::components::typing_indicator::TypingIndicator;
use crate::config::{ChatbotConfig, Position};
use crate::state::message::Message;
use crate::state::session::SessionState;

pub const INPUT_PLACEHOLDER: &str = "Type a message...";

/// Glyph on the floating button for the current panel state.
pub fn toggle_glyph(is_open: bool) -> &'static str {
    if is_open { "\u{2715}" } else { "\u{1F4AC}" }
}

/// Inline style for the floating toggle button.
pub fn button_style(position: Position, primary_color: &str) -> String {
    format!("{} background-color: {primary_color};", position.corner_style())
}

/// Inline style for the panel; hidden panels stay mounted.
pub fn panel_style(position: Position, is_open: bool) -> String {
    let display = if is_open { "flex" } else { "none" };
    format!("{} display: {display};", position.corner_style())
}

/// Whether a keydown in the input should submit the draft.
pub fn is_submit_key(key: &str) -> bool {
    key == "Enter"
}

/// The message log alone, so draft edits do not re-render the list.
pub fn message_log(session: RwSignal<SessionState>) -> Memo<Vec<Message>> {
    Memo::new(move |_| session.with(|s| s.messages.clone()))
}

/// The embeddable widget: toggle button, header, message list, input row.
#[component]
pub fn ChatWidget(config: ChatbotConfig, session: RwSignal<SessionState>, on_send: Callback<()>) -> impl IntoView {
    let ChatbotConfig { position, primary_color, title, .. } = config;

    let messages_ref = NodeRef::<leptos::html::Div>::new();
    let messages = message_log(session);
    let message_count = Memo::new(move |_| messages.with(Vec::len));

    Effect::new(move || {
        message_count.track();

        #[cfg(feature = "csr")]
        {
            if let Some(el) = messages_ref.get() {
                let scroll_height = el.scroll_height();
                el.set_scroll_top(scroll_height);
            }
        }
    });

    let on_toggle = move |_| session.update(SessionState::toggle_open);
    let on_close = move |_| session.update(SessionState::close);
    let on_click = move |_| on_send.run(());

    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if is_submit_key(&ev.key()) {
            ev.prevent_default();
            on_send.run(());
        }
    };

    let is_open = move || session.with(|s| s.is_open);
    let is_loading = move || session.with(|s| s.is_loading);
    let bubble_color = primary_color.clone();

    view! {
        <button
            class="chatbot__toggle"
            style=button_style(position, &primary_color)
            aria-label="Toggle chat"
            on:click=on_toggle
        >
            {move || toggle_glyph(is_open())}
        </button>

        <div class="chatbot__panel" style=move || panel_style(position, is_open())>
            <div class="chatbot__header" style=format!("background-color: {primary_color};")>
                <div class="chatbot__title">{title}</div>
                <button class="chatbot__close" aria-label="Close chat" on:click=on_close>
                    {toggle_glyph(true)}
                </button>
            </div>

            <div class="chatbot__messages" node_ref=messages_ref>
                {move || {
                    let color = bubble_color.clone();
                    messages
                        .get()
                        .into_iter()
                        .map(|message| view! { <MessageBubble message primary_color=color.clone()/> })
                        .collect::<Vec<_>>()
                }}
                {move || is_loading().then(|| view! { <TypingIndicator/> })}
            </div>

            <div class="chatbot__input-row">
                <input
                    class="chatbot__input"
                    type="text"
                    placeholder=INPUT_PLACEHOLDER
                    prop:value=move || session.with(|s| s.input_value.clone())
                    on:input=move |ev| session.update(|s| s.set_input(event_target_value(&ev)))
                    on:keydown=on_keydown
                />
                <button
                    class="chatbot__send"
                    style=format!("background-color: {primary_color};")
                    aria-label="Send message"
                    on:click=on_click
                    disabled=is_loading
                >
                    "\u{27A4}"
                </button>
            </div>
        </div>
    }
}
