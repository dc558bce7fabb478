//! Networking modules for the chat backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` performs the HTTP exchange and `types` defines the request and reply
//! payloads.

pub mod api;
pub mod types;
