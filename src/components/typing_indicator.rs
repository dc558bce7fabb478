//! Three-dot "bot is typing" placeholder shown while a reply is pending.

use leptos::prelude::*;

const DOT_DELAYS: [&str; 3] = ["0s", "0.2s", "0.4s"];

#[component]
pub fn TypingIndicator() -> impl IntoView {
    view! {
        <div class="chatbot__bubble chatbot__typing" aria-label="Waiting for reply">
            {DOT_DELAYS
                .iter()
                .map(|delay| {
                    view! { <span class="chatbot__typing-dot" style=format!("animation-delay: {delay};")></span> }
                })
                .collect::<Vec<_>>()}
        </div>
    }
}
