//! # chatbot-widget
//!
//! Leptos + WASM embeddable chat widget. A host page calls `initChatbot`
//! once; the loader injects a container and the widget bundle, and the bundle
//! mounts a floating chat button plus a message panel that talks to a remote
//! chat backend.
//!
//! This crate contains the loader, the widget components, session state, the
//! HTTP client for the backend, and the `localStorage` persistence of the
//! message log. Browser glue is gated behind the `csr` feature so the state
//! and protocol logic can be tested natively.

pub mod app;
pub mod components;
pub mod config;
pub mod loader;
pub mod net;
pub mod state;
pub mod util;
